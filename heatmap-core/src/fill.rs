//! Lấp đầy lưới: mỗi ô thời gian của chu kỳ có đúng một điểm dữ liệu.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use tracing::{debug, trace};

use crate::config::HeatmapConfig;
use crate::coords::week_of_year;
use crate::{DataPoint, HeatmapError, Period};

pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_YEAR_WINDOW: i64 = 365;

/// Số ô cố định của chu kỳ tuần (168, hoặc 120 khi bỏ cuối tuần).
pub fn weekly_slot_count(include_weekend: bool) -> usize {
    (weekly_day_count(include_weekend) * HOURS_PER_DAY) as usize
}

fn weekly_day_count(include_weekend: bool) -> u32 {
    weekly_days(include_weekend).len() as u32
}

/// Các giá trị `day` (Chủ nhật = 0) có trên lưới tuần, theo thứ tự ô.
pub fn weekly_days(include_weekend: bool) -> Vec<u32> {
    if include_weekend {
        (0..7).collect()
    } else {
        (1..6).collect()
    }
}

/// Số ngày của tháng (tháng tính từ 0), tính bằng ngày cuối tháng.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if month > 11 {
        return None;
    }
    let (next_year, next_month) = if month == 11 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
}

/// Sinh chuỗi đặc từ chuỗi thưa theo chu kỳ trong cấu hình.
///
/// Khi nhiều bản ghi rơi vào cùng một ô, bản ghi gặp sau cùng được giữ.
pub fn fill(points: &[DataPoint], config: &HeatmapConfig) -> Result<Vec<DataPoint>, HeatmapError> {
    let dense = match config.period {
        Period::Weekly => fill_weekly(points, config.include_weekend, config.reference_date)?,
        Period::Monthly => fill_monthly(points, config.reference_date)?,
        Period::Yearly => fill_yearly(points, config.reference_date)?,
    };
    debug!(
        period = ?config.period,
        input = points.len(),
        slots = dense.len(),
        "đã lấp lưới"
    );
    Ok(dense)
}

fn fill_weekly(
    points: &[DataPoint],
    include_weekend: bool,
    reference: Option<NaiveDate>,
) -> Result<Vec<DataPoint>, HeatmapError> {
    let anchor = match points.first() {
        Some(first) => *first,
        None => {
            let date = reference.ok_or(HeatmapError::EmptySeries)?;
            DataPoint {
                year: date.year(),
                month: date.month0(),
                week: week_of_year(date.and_time(NaiveTime::MIN)),
                ..DataPoint::default()
            }
        }
    };

    let days = weekly_days(include_weekend);
    let mut slots: Vec<Option<DataPoint>> = vec![None; weekly_slot_count(include_weekend)];

    for point in points {
        if point.year != anchor.year || point.week != anchor.week {
            trace!(year = point.year, week = point.week, "bỏ bản ghi ngoài tuần đang vẽ");
            continue;
        }
        let position = days.iter().position(|day| *day == point.day);
        let Some(position) = position.filter(|_| point.hour < HOURS_PER_DAY) else {
            trace!(day = point.day, hour = point.hour, "bỏ bản ghi ngoài lưới tuần");
            continue;
        };
        let index = position * HOURS_PER_DAY as usize + point.hour as usize;
        if slots[index].replace(*point).is_some() {
            trace!(day = point.day, hour = point.hour, "ghi đè bản ghi trùng ô");
        }
    }

    Ok(slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or(DataPoint {
                year: anchor.year,
                month: anchor.month,
                week: anchor.week,
                day: days[index / HOURS_PER_DAY as usize],
                hour: (index % HOURS_PER_DAY as usize) as u32,
                value: 0.0,
            })
        })
        .collect())
}

fn fill_monthly(
    points: &[DataPoint],
    reference: Option<NaiveDate>,
) -> Result<Vec<DataPoint>, HeatmapError> {
    let (year, month) = match points.first() {
        Some(first) => (first.year, first.month),
        None => {
            let date = reference.ok_or(HeatmapError::EmptySeries)?;
            (date.year(), date.month0())
        }
    };
    let days = days_in_month(year, month)
        .ok_or_else(|| HeatmapError::InvalidPoint(format!("tháng {month} không hợp lệ")))?;

    let mut slots: Vec<Option<DataPoint>> = vec![None; (days * HOURS_PER_DAY) as usize];

    for point in points {
        if point.year != year || point.month != month {
            trace!(year = point.year, month = point.month, "bỏ bản ghi ngoài tháng đang vẽ");
            continue;
        }
        if point.day >= days || point.hour >= HOURS_PER_DAY {
            trace!(day = point.day, hour = point.hour, "bỏ bản ghi ngoài lưới tháng");
            continue;
        }
        let index = (point.day * HOURS_PER_DAY + point.hour) as usize;
        if slots[index].replace(*point).is_some() {
            trace!(day = point.day, hour = point.hour, "ghi đè bản ghi trùng ô");
        }
    }

    Ok(slots
        .into_iter()
        .zip(0u32..)
        .map(|(slot, index)| {
            slot.unwrap_or(DataPoint {
                year,
                month,
                day: index / HOURS_PER_DAY,
                hour: index % HOURS_PER_DAY,
                week: 0,
                value: 0.0,
            })
        })
        .collect())
}

fn fill_yearly(
    points: &[DataPoint],
    reference: Option<NaiveDate>,
) -> Result<Vec<DataPoint>, HeatmapError> {
    let dated = points
        .iter()
        .map(|point| {
            point
                .calendar_date(Period::Yearly)
                .map(|date| (date, *point))
                .ok_or_else(|| {
                    HeatmapError::InvalidPoint(format!(
                        "năm {} tháng {} (tính từ 0) ngày {} không phải ngày hợp lệ",
                        point.year, point.month, point.day
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let start = window_start(&dated, reference)?;
    let end = window_end(start)?;

    let mut by_date: HashMap<NaiveDate, DataPoint> = HashMap::with_capacity(dated.len());
    for (date, point) in dated {
        if date < start || date > end {
            trace!(%date, "bỏ bản ghi ngoài cửa sổ 365 ngày");
            continue;
        }
        if by_date.insert(date, point).is_some() {
            trace!(%date, "ghi đè bản ghi trùng ngày");
        }
    }

    Ok(start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            by_date.remove(&date).unwrap_or(DataPoint {
                year: date.year(),
                month: date.month0(),
                day: date.day(),
                hour: 0,
                week: 0,
                value: 0.0,
            })
        })
        .collect())
}

/// Ngày cuối của cửa sổ 365 ngày; lỗi nếu vượt quá phạm vi ngày của chrono.
pub fn window_end(start: NaiveDate) -> Result<NaiveDate, HeatmapError> {
    start
        .checked_add_signed(Duration::days(DAYS_PER_YEAR_WINDOW - 1))
        .ok_or_else(|| {
            HeatmapError::InvalidPoint(format!(
                "cửa sổ 365 ngày từ {start} vượt quá phạm vi ngày hỗ trợ"
            ))
        })
}

/// Mốc đầu cửa sổ 365 ngày.
///
/// Lấy ngày sớm nhất; nếu không có bản ghi nào thuộc tháng liền trước tháng
/// đó thì dời mốc về 1/1 của năm.
fn window_start(
    dated: &[(NaiveDate, DataPoint)],
    reference: Option<NaiveDate>,
) -> Result<NaiveDate, HeatmapError> {
    let earliest = dated
        .iter()
        .map(|(date, _)| *date)
        .min()
        .or(reference)
        .ok_or(HeatmapError::EmptySeries)?;

    let previous_month = i64::from(earliest.month0()) - 1;
    let has_previous_month = dated
        .iter()
        .any(|(_, point)| i64::from(point.month) == previous_month);

    if has_previous_month {
        Ok(earliest)
    } else {
        Ok(earliest.with_ordinal(1).unwrap_or(earliest))
    }
}
