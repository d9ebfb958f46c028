//! Định dạng tên thứ/tháng theo locale, thay cho `toLocaleString` của trình duyệt.

use chrono::{Locale, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::HeatmapError;

/// Độ dài tên thứ: `long` = "Friday", `short` = "Fri", `narrow` = "F".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayNameLength {
    #[default]
    Long,
    Short,
    Narrow,
}

impl std::str::FromStr for DayNameLength {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(DayNameLength::Long),
            "short" => Ok(DayNameLength::Short),
            "narrow" => Ok(DayNameLength::Narrow),
            other => Err(HeatmapError::InvalidConfig(format!(
                "dayNameLength không hợp lệ: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MonthNameLength {
    Long,
    Short,
}

/// Trường ngày cần định dạng.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Weekday(DayNameLength),
    Month(MonthNameLength),
    /// Ngày và tháng hai chữ số, theo thứ tự của locale.
    DayMonth,
}

/// Bộ định dạng ngày theo locale do lớp trình bày cung cấp.
pub trait LocaleDateFormat {
    fn format(&self, date: NaiveDate, field: DateField, locale: &str) -> String;
}

/// Cài đặt mặc định dựa trên dữ liệu locale của `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoLocaleFormat;

impl LocaleDateFormat for ChronoLocaleFormat {
    fn format(&self, date: NaiveDate, field: DateField, locale: &str) -> String {
        let resolved = resolve_locale(locale);
        let localized = |pattern: &str| {
            Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
                .format_localized(pattern, resolved)
                .to_string()
        };

        match field {
            DateField::Weekday(DayNameLength::Long) => localized("%A"),
            DateField::Weekday(DayNameLength::Short) => localized("%a"),
            DateField::Weekday(DayNameLength::Narrow) => localized("%A")
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
            DateField::Month(MonthNameLength::Long) => localized("%B"),
            DateField::Month(MonthNameLength::Short) => localized("%b"),
            DateField::DayMonth => localized(day_month_pattern(locale)),
        }
    }
}

/// `de-DE` → `de_DE`; locale không hỗ trợ quay về `en_US`.
pub fn resolve_locale(tag: &str) -> Locale {
    let normalized = tag.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).unwrap_or_else(|_| {
        warn!(locale = tag, "locale không được hỗ trợ, dùng en_US");
        Locale::en_US
    })
}

fn day_month_pattern(tag: &str) -> &'static str {
    let normalized = tag.trim().replace('_', "-");
    let mut parts = normalized.split('-');
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().unwrap_or_default().to_ascii_uppercase();

    match (language.as_str(), region.as_str()) {
        ("en", "US") | ("en", "") => "%m/%d",
        ("de" | "cs" | "da" | "fi" | "nb" | "pl" | "ru" | "sk" | "tr", _) => "%d.%m.",
        ("ja" | "zh" | "ko", _) => "%m/%d",
        _ => "%d/%m",
    }
}
