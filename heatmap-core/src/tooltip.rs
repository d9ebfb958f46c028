/// Nơi hiển thị tooltip (thường là một phần tử DOM dùng chung).
pub trait TooltipSink {
    fn show(&mut self, html: &str, x: f64, y: f64);
    fn hide(&mut self);
}

/// Tooltip tạo sink ở lần dùng đầu tiên rồi tái sử dụng.
pub struct Tooltip<S, F = fn() -> S> {
    sink: Option<S>,
    create: F,
}

impl<S, F> Tooltip<S, F>
where
    S: TooltipSink,
    F: FnMut() -> S,
{
    pub fn new(create: F) -> Self {
        Self { sink: None, create }
    }

    pub fn show(&mut self, html: &str, x: f64, y: f64) {
        let create = &mut self.create;
        self.sink.get_or_insert_with(|| create()).show(html, x, y);
    }

    /// Chưa tạo sink thì không có gì để ẩn.
    pub fn hide(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.hide();
        }
    }

    pub fn is_created(&self) -> bool {
        self.sink.is_some()
    }

    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }
}

/// Toạ độ góc trái trên để tooltip nằm ngay phía trên con trỏ.
pub fn position_above(page_x: f64, page_y: f64, width: f64, height: f64) -> (f64, f64) {
    (page_x - width / 2.0, page_y - height - 15.0)
}
