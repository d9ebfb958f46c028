use serde::{Deserialize, Serialize};

/// Khoảng giá trị quan sát được, làm miền cho thang màu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Quét min/max trên các giá trị thật của đầu vào.
    ///
    /// Chỉ truyền giá trị trước khi lấp lưới: các số 0 tổng hợp không được
    /// kéo rộng cận dưới của thang màu.
    pub fn of<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(None, |acc, value| {
            Some(match acc {
                None => Extent {
                    min: value,
                    max: value,
                },
                Some(extent) => Extent {
                    min: extent.min.min(value),
                    max: extent.max.max(value),
                },
            })
        })
    }

    /// `min == max`: thang màu thu về một màu, không phải lỗi.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}
