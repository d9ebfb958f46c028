//! Nhãn trục cho lưới (tên thứ, ngày, giờ, tháng) qua [`LocaleDateFormat`].

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::HeatmapConfig;
use crate::coords::{monday_ceil, monday_floor, weekday_rows};
use crate::fill::window_end;
use crate::locale::{DateField, LocaleDateFormat, MonthNameLength};
use crate::{DataPoint, HeatmapError, Period};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AxisTick {
    /// Cột mà nhãn gắn vào.
    pub index: u32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AxisLabels {
    /// Nhãn theo chỉ số hàng (hàng 0 trước).
    pub rows: Vec<String>,
    pub columns: Vec<AxisTick>,
    /// Hàng bắt đầu một tuần mới (Chủ nhật) trong lưới tháng.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub week_separators: Vec<u32>,
    /// Tiêu đề lưới tháng, ví dụ "February - 2019".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// 31/12/2018 là thứ Hai, dùng làm tuần mẫu để lấy tên thứ.
fn sample_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 12, 31).unwrap_or_default()
}

pub fn axis_labels(
    dense: &[DataPoint],
    config: &HeatmapConfig,
    formatter: &dyn LocaleDateFormat,
) -> Result<AxisLabels, HeatmapError> {
    match config.period {
        Period::Weekly => Ok(weekly_labels(config, formatter)),
        Period::Monthly => monthly_labels(dense, config, formatter),
        Period::Yearly => yearly_labels(dense, config, formatter),
    }
}

fn weekday_name(
    weekday_from_monday: u32,
    config: &HeatmapConfig,
    formatter: &dyn LocaleDateFormat,
) -> String {
    let date = sample_monday() + Duration::days(i64::from(weekday_from_monday));
    formatter.format(
        date,
        DateField::Weekday(config.effective_day_name_length()),
        &config.locale,
    )
}

fn hour_ticks(every: u32) -> Vec<AxisTick> {
    (0..24)
        .step_by(every as usize)
        .map(|hour| AxisTick {
            index: hour,
            text: format!("{hour}h"),
        })
        .collect()
}

fn weekly_labels(config: &HeatmapConfig, formatter: &dyn LocaleDateFormat) -> AxisLabels {
    AxisLabels {
        rows: weekday_rows(config)
            .into_iter()
            .map(|day| weekday_name(day.num_days_from_monday(), config, formatter))
            .collect(),
        columns: hour_ticks(2),
        week_separators: Vec::new(),
        title: None,
    }
}

fn monthly_labels(
    dense: &[DataPoint],
    config: &HeatmapConfig,
    formatter: &dyn LocaleDateFormat,
) -> Result<AxisLabels, HeatmapError> {
    let first = dense.first().ok_or(HeatmapError::EmptySeries)?;
    let start = first
        .month
        .checked_add(1)
        .and_then(|month| NaiveDate::from_ymd_opt(first.year, month, 1))
        .ok_or_else(|| {
            HeatmapError::InvalidPoint(format!(
                "tháng {} (tính từ 0) năm {} không hợp lệ",
                first.month, first.year
            ))
        })?;

    let dates: Vec<NaiveDate> = start
        .iter_days()
        .take_while(|date| date.month() == start.month())
        .collect();

    let rows = dates
        .iter()
        .map(|date| {
            format!(
                "{}, {}",
                formatter.format(*date, DateField::DayMonth, &config.locale),
                formatter.format(
                    *date,
                    DateField::Weekday(config.effective_day_name_length()),
                    &config.locale
                )
            )
        })
        .collect();

    let week_separators = dates
        .iter()
        .zip(0u32..)
        .skip(1)
        .filter(|(date, _)| date.weekday() == chrono::Weekday::Sun)
        .map(|(_, row)| row)
        .collect();

    let title = format!(
        "{} - {}",
        formatter.format(start, DateField::Month(MonthNameLength::Long), &config.locale),
        start.year()
    );

    Ok(AxisLabels {
        rows,
        columns: hour_ticks(4),
        week_separators,
        title: Some(title),
    })
}

fn yearly_labels(
    dense: &[DataPoint],
    config: &HeatmapConfig,
    formatter: &dyn LocaleDateFormat,
) -> Result<AxisLabels, HeatmapError> {
    let start = dense
        .iter()
        .filter_map(|point| point.calendar_date(Period::Yearly))
        .min()
        .ok_or(HeatmapError::EmptySeries)?;
    let end = window_end(start)?;

    let rows = (0..7)
        .map(|day| weekday_name(day, config, formatter))
        .collect();

    let first_month = start.with_day(1).unwrap_or(start);
    let columns = std::iter::successors(Some(first_month), |month| {
        month.checked_add_months(Months::new(1))
    })
    .take_while(|month| *month <= end)
    .map(|month| AxisTick {
        index: month_label_column(month),
        text: format!(
            "{} - {}",
            formatter.format(month, DateField::Month(MonthNameLength::Short), &config.locale),
            month.year()
        ),
    })
    .collect();

    Ok(AxisLabels {
        rows,
        columns,
        week_separators: Vec::new(),
        title: None,
    })
}

/// Cột của nhãn tháng: thứ Hai đầu tiên kể từ ngày 1 của tháng, cộng chỉ số tháng.
fn month_label_column(first_of_month: NaiveDate) -> u32 {
    let year_start = first_of_month.with_ordinal(1).unwrap_or(first_of_month);
    let weeks = (monday_ceil(first_of_month) - monday_floor(year_start)).num_days() / 7;
    weeks as u32 + first_of_month.month0()
}
