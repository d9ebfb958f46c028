//! Logic lõi dựng lưới heatmap dạng lịch (tuần, tháng, năm).
//!
//! Luồng xử lý: dữ liệu thô → [`adapters`] → chuỗi thưa → [`fill`] (lấp ô
//! trống) → [`coords`] (hàng/cột) → [`order`] (thứ tự hiệu ứng) → lớp vẽ.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod adapters;
pub mod color;
pub mod config;
pub mod coords;
pub mod extent;
pub mod fill;
pub mod labels;
pub mod locale;
pub mod order;
pub mod pipeline;
pub mod time_key;
pub mod tooltip;

pub use adapters::{adapt, adapt_monthly, adapt_weekly, adapt_yearly, Envelope, SeriesInput, SparseSeries};
pub use color::{ColorMode, ColorScale, Gradient};
pub use config::HeatmapConfig;
pub use extent::Extent;
pub use labels::{AxisLabels, AxisTick};
pub use locale::{ChronoLocaleFormat, DateField, DayNameLength, LocaleDateFormat, MonthNameLength};
pub use pipeline::{render, render_each, render_each_with, render_with};
pub use time_key::{KeyFormat, TimeFields, TimeKey};
pub use tooltip::{Tooltip, TooltipSink};

/// Độ phân giải lịch của một lần vẽ, quyết định ngữ nghĩa hàng/cột.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Hàng = thứ trong tuần, cột = giờ.
    #[default]
    Weekly,
    /// Hàng = ngày trong tháng, cột = giờ.
    Monthly,
    /// Hàng = thứ trong tuần, cột = tuần trong năm.
    Yearly,
}

impl Period {
    /// Độ trễ (giây) giữa hai ô liên tiếp khi chạy hiệu ứng xuất hiện.
    pub fn animation_step_secs(self) -> f64 {
        match self {
            Period::Weekly => 0.00275,
            Period::Monthly | Period::Yearly => 0.00075,
        }
    }
}

impl FromStr for Period {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            "yearly" | "year" => Ok(Period::Yearly),
            other => Err(HeatmapError::InvalidConfig(format!(
                "Chu kỳ không hợp lệ: {other}"
            ))),
        }
    }
}

/// Một ô dữ liệu trong chuỗi (thưa hoặc đã lấp đầy).
///
/// Ý nghĩa của `day` phụ thuộc chu kỳ: thứ trong tuần với Chủ nhật = 0 (tuần),
/// ngày trong tháng tính từ 0 (tháng), ngày trong tháng tính từ 1 (năm).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DataPoint {
    pub year: i32,
    /// Tháng tính từ 0 (0-11).
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub week: u32,
    pub value: f64,
}

impl DataPoint {
    /// Ngày lịch của ô, chỉ xác định được với chu kỳ tháng và năm.
    ///
    /// Trường ngoài phạm vi (kể cả khi cộng 1 bị tràn) cho `None`.
    pub fn calendar_date(&self, period: Period) -> Option<NaiveDate> {
        let month = self.month.checked_add(1)?;
        match period {
            Period::Weekly => None,
            Period::Monthly => NaiveDate::from_ymd_opt(self.year, month, self.day.checked_add(1)?),
            Period::Yearly => NaiveDate::from_ymd_opt(self.year, month, self.day),
        }
    }
}

/// Ô đã có toạ độ và thứ hạng, giao cho lớp vẽ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub rank: usize,
    /// Nhóm "sóng" dùng cho hiệu ứng (ngày với tuần/tháng, tháng với năm).
    pub wave: u32,
    pub delay_secs: f64,
    #[serde(flatten)]
    pub point: DataPoint,
}

impl Cell {
    /// Nội dung tooltip khi rê chuột lên ô.
    pub fn tooltip_text(&self, period: Period) -> String {
        match period {
            Period::Yearly => format!(
                "{}: {}/{}",
                self.point.value,
                self.point.month.saturating_add(1),
                self.point.day
            ),
            Period::Weekly | Period::Monthly => self.point.value.to_string(),
        }
    }
}

/// Kết quả một lần dựng lưới.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapGrid {
    pub period: Period,
    pub rows: u32,
    pub columns: u32,
    pub scale: f64,
    /// Khoảng giá trị quan sát được; `None` khi chuỗi đầu vào rỗng.
    pub extent: Option<Extent>,
    pub labels: AxisLabels,
    pub cells: Vec<Cell>,
}

impl HeatmapGrid {
    /// Tìm ô theo toạ độ lưới.
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.col == col)
    }
}

/// Lỗi chung khi dựng heatmap.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeatmapError {
    #[error("Khóa thời gian `{key}` không hợp lệ: {reason}")]
    Parse { key: String, reason: String },
    #[error("Chuỗi dữ liệu rỗng, không suy ra được năm/tuần/tháng (cần reference_date)")]
    EmptySeries,
    #[error("Điểm dữ liệu không hợp lệ: {0}")]
    InvalidPoint(String),
    #[error("Cấu hình không hợp lệ: {0}")]
    InvalidConfig(String),
    #[error("Không đọc được dữ liệu nguồn: {0}")]
    Source(String),
}
