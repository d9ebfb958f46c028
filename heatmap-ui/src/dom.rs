#![cfg(target_arch = "wasm32")]

use heatmap_core::tooltip::position_above;
use heatmap_core::TooltipSink;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, Document, HtmlElement};

use crate::{px, DEFAULT_TOOLTIP_CLASS, TOOLTIP_ELEMENT_ID};

/// Tooltip dùng chung cho mọi heatmap trên trang (`#tooltipDiv`).
///
/// Không tạo được phần tử thì tooltip im lặng, lỗi được ghi ra console.
pub struct DomTooltip {
    element: Option<HtmlElement>,
}

impl DomTooltip {
    pub fn attach_to_window() -> Self {
        let element = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))
            .and_then(|document| find_or_create(&document));

        match element {
            Ok(element) => Self {
                element: Some(element),
            },
            Err(err) => {
                console::error_1(&err);
                Self { element: None }
            }
        }
    }
}

fn find_or_create(document: &Document) -> Result<HtmlElement, JsValue> {
    if let Some(existing) = document.get_element_by_id(TOOLTIP_ELEMENT_ID) {
        return existing.dyn_into::<HtmlElement>().map_err(JsValue::from);
    }

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <body>"))?;

    let element = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)?;
    element.set_id(TOOLTIP_ELEMENT_ID);
    element.set_class_name(DEFAULT_TOOLTIP_CLASS);
    let style = element.style();
    style.set_property("position", "absolute")?;
    style.set_property("display", "none")?;
    body.append_child(&element)?;
    Ok(element)
}

impl TooltipSink for DomTooltip {
    fn show(&mut self, html: &str, x: f64, y: f64) {
        let Some(element) = &self.element else {
            return;
        };
        let style = element.style();
        element.set_inner_html(html);
        let result = style.set_property("display", "block").and_then(|_| {
            let rect = element.get_bounding_client_rect();
            let (left, top) = position_above(x, y, rect.width(), rect.height());
            style.set_property("left", &px(left))?;
            style.set_property("top", &px(top))
        });
        if let Err(err) = result {
            console::error_1(&err);
        }
    }

    fn hide(&mut self) {
        if let Some(element) = &self.element {
            if let Err(err) = element.style().set_property("display", "none") {
                console::error_1(&err);
            }
        }
    }
}
