use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::color::{ColorMode, Gradient};
use crate::locale::DayNameLength;
use crate::time_key::KeyFormat;
use crate::{HeatmapError, Period};

/// Cấu hình một lần dựng heatmap.
///
/// Chỉ ảnh hưởng tới cách đặt toạ độ, giới hạn liệt kê ô và nhãn; không có I/O.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    pub period: Period,
    /// Thẻ locale kiểu BCP 47 (`de-DE`) hoặc POSIX (`de_DE`).
    pub locale: String,
    pub day_name_length: DayNameLength,
    /// Ngày đầu tuần, nằm ở hàng 0 của lưới tuần.
    pub week_start: Weekday,
    /// Hiển thị thứ Bảy và Chủ nhật (chỉ áp dụng cho lưới tuần).
    pub include_weekend: bool,
    pub scale: f64,
    pub key_format: KeyFormat,
    /// Mốc dùng khi chuỗi đầu vào rỗng.
    pub reference_date: Option<NaiveDate>,
    /// Bố cục hẹp: nhãn thứ luôn dùng dạng ngắn.
    pub mobile_view: bool,
    pub color_mode: ColorMode,
    pub min_color: String,
    pub max_color: String,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            period: Period::Weekly,
            locale: "en-US".to_string(),
            day_name_length: DayNameLength::Long,
            week_start: Weekday::Mon,
            include_weekend: true,
            scale: 1.0,
            key_format: KeyFormat::Auto,
            reference_date: None,
            mobile_view: false,
            color_mode: ColorMode::Sqrt,
            min_color: "#ECF5E2".to_string(),
            max_color: "#222081".to_string(),
        }
    }
}

impl HeatmapConfig {
    /// Cấu hình mặc định cho một chu kỳ.
    pub fn for_period(period: Period) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), HeatmapError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(HeatmapError::InvalidConfig(format!(
                "scale phải là số dương, nhận {}",
                self.scale
            )));
        }
        Gradient::new(&self.min_color, &self.max_color)?;
        Ok(())
    }

    /// Độ dài tên thứ thực sự dùng cho nhãn.
    pub fn effective_day_name_length(&self) -> DayNameLength {
        if self.mobile_view {
            DayNameLength::Short
        } else {
            self.day_name_length
        }
    }
}
