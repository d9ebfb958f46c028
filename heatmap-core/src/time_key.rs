//! Giải mã khóa thời gian (epoch mili-giây hoặc chuỗi `YYMMDD[HH]`) sang UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::HeatmapError;

/// Định danh một ô thời gian trong dữ liệu nguồn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeKey {
    EpochMillis(i64),
    /// Chuỗi các cặp chữ số `YYMMDDHH` hoặc `YYMMDD`.
    Compact(String),
}

/// Cách hiểu khóa dạng chuỗi trong bản đồ dữ liệu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyFormat {
    /// 6 hoặc 8 chữ số là dạng rút gọn, còn lại là epoch mili-giây.
    #[default]
    Auto,
    EpochMillis,
    Compact,
}

impl std::str::FromStr for KeyFormat {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(KeyFormat::Auto),
            "epoch" | "epoch_millis" | "ms" => Ok(KeyFormat::EpochMillis),
            "compact" => Ok(KeyFormat::Compact),
            other => Err(HeatmapError::InvalidConfig(format!(
                "Định dạng khóa không hợp lệ: {other}"
            ))),
        }
    }
}

/// Các trường lịch UTC đã giải mã từ một [`TimeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFields {
    datetime: NaiveDateTime,
    hourly: bool,
}

impl TimeFields {
    pub fn year(&self) -> i32 {
        self.datetime.year()
    }

    /// Tháng tính từ 0.
    pub fn month(&self) -> u32 {
        self.datetime.month0()
    }

    /// Ngày trong tháng tính từ 1.
    pub fn day(&self) -> u32 {
        self.datetime.day()
    }

    /// `None` với bản ghi theo ngày (khóa `YYMMDD`).
    pub fn hour(&self) -> Option<u32> {
        self.hourly.then(|| self.datetime.hour())
    }

    pub fn weekday(&self) -> Weekday {
        self.datetime.weekday()
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }
}

impl TimeKey {
    /// Dựng khóa từ chuỗi khóa của bản đồ dữ liệu.
    pub fn from_raw(raw: &str, format: KeyFormat) -> Result<Self, HeatmapError> {
        let raw = raw.trim();
        match format {
            KeyFormat::Compact => Ok(TimeKey::Compact(raw.to_string())),
            KeyFormat::EpochMillis => parse_millis(raw).map(TimeKey::EpochMillis),
            KeyFormat::Auto if is_compact_shape(raw) => Ok(TimeKey::Compact(raw.to_string())),
            KeyFormat::Auto => parse_millis(raw).map(TimeKey::EpochMillis),
        }
    }

    /// Giải mã khóa; khóa sai dạng hoặc ngày không tồn tại là lỗi cứng.
    pub fn parse(&self) -> Result<TimeFields, HeatmapError> {
        match self {
            TimeKey::EpochMillis(ms) => parse_epoch(*ms),
            TimeKey::Compact(raw) => parse_compact(raw),
        }
    }
}

fn is_compact_shape(raw: &str) -> bool {
    matches!(raw.len(), 6 | 8) && raw.bytes().all(|b| b.is_ascii_digit())
}

fn parse_millis(raw: &str) -> Result<i64, HeatmapError> {
    raw.parse::<i64>().map_err(|err| HeatmapError::Parse {
        key: raw.to_string(),
        reason: err.to_string(),
    })
}

fn parse_epoch(ms: i64) -> Result<TimeFields, HeatmapError> {
    let datetime = DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| HeatmapError::Parse {
        key: ms.to_string(),
        reason: "ngoài phạm vi thời gian hỗ trợ".to_string(),
    })?;

    Ok(TimeFields {
        datetime: datetime.naive_utc(),
        hourly: true,
    })
}

fn parse_compact(raw: &str) -> Result<TimeFields, HeatmapError> {
    let invalid = |reason: &str| HeatmapError::Parse {
        key: raw.to_string(),
        reason: reason.to_string(),
    };

    if !is_compact_shape(raw) {
        return Err(invalid("cần 6 hoặc 8 chữ số (YYMMDD[HH])"));
    }

    let bytes = raw.as_bytes();
    let pair = |i: usize| u32::from(bytes[i] - b'0') * 10 + u32::from(bytes[i + 1] - b'0');

    // Giả định thế kỷ 20xx cho hai chữ số năm.
    let year = 2000 + pair(0) as i32;
    let date = NaiveDate::from_ymd_opt(year, pair(2), pair(4))
        .ok_or_else(|| invalid("ngày không tồn tại"))?;

    let hour = (bytes.len() == 8).then(|| pair(6));
    let time = NaiveTime::from_hms_opt(hour.unwrap_or(0), 0, 0)
        .ok_or_else(|| invalid("giờ phải trong khoảng 0-23"))?;

    Ok(TimeFields {
        datetime: date.and_time(time),
        hourly: hour.is_some(),
    })
}
