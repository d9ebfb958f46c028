//! Tính vị trí (hàng, cột) của từng ô trên lưới lịch.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::HeatmapConfig;
use crate::{DataPoint, HeatmapError, Period};

/// Ô dữ liệu kèm toạ độ lưới.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Placed {
    pub row: u32,
    pub col: u32,
    pub point: DataPoint,
}

pub fn map_coordinates(
    points: Vec<DataPoint>,
    config: &HeatmapConfig,
) -> Result<Vec<Placed>, HeatmapError> {
    match config.period {
        Period::Weekly => {
            let rows = weekday_rows(config);
            points
                .into_iter()
                .map(|point| {
                    let row = rows
                        .iter()
                        .position(|weekday| weekday.num_days_from_sunday() == point.day)
                        .ok_or_else(|| {
                            HeatmapError::InvalidPoint(format!(
                                "thứ {} không có trên lưới tuần",
                                point.day
                            ))
                        })?;
                    Ok(Placed {
                        row: row as u32,
                        col: point.hour,
                        point,
                    })
                })
                .collect()
        }
        Period::Monthly => Ok(points
            .into_iter()
            .map(|point| Placed {
                row: point.day,
                col: point.hour,
                point,
            })
            .collect()),
        Period::Yearly => points
            .into_iter()
            .map(|point| {
                let date = point.calendar_date(Period::Yearly).ok_or_else(|| {
                    HeatmapError::InvalidPoint(format!(
                        "năm {} tháng {} (tính từ 0) ngày {} không phải ngày hợp lệ",
                        point.year, point.month, point.day
                    ))
                })?;
                Ok(Placed {
                    row: yearly_row(date),
                    col: yearly_column(date),
                    point,
                })
            })
            .collect(),
    }
}

/// Các thứ hiển thị trên lưới tuần, theo thứ tự hàng (hàng 0 = ngày đầu tuần).
pub fn weekday_rows(config: &HeatmapConfig) -> Vec<Weekday> {
    std::iter::successors(Some(config.week_start), |day| Some(day.succ()))
        .take(7)
        .filter(|day| config.include_weekend || !matches!(day, Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Hàng trong lưới năm: Chủ nhật = 0 được dời về thứ Hai = 0, tức `(weekday + 6) % 7`.
pub fn yearly_row(date: NaiveDate) -> u32 {
    (date.weekday().num_days_from_sunday() + 6) % 7
}

/// Cột trong lưới năm: số tuần (mốc thứ Hai) từ đầu năm cộng chỉ số tháng.
///
/// Phần cộng thêm tháng tạo khe "răng lược" giữa các tháng, lưới phụ thuộc vào nó.
pub fn yearly_column(date: NaiveDate) -> u32 {
    weeks_since_year_start(date) + date.month0()
}

/// Số mốc thứ Hai đi qua từ ngày 1/1 của năm chứa `date` tới `date`.
pub fn weeks_since_year_start(date: NaiveDate) -> u32 {
    let year_start = date.with_ordinal(1).unwrap_or(date);
    let days = (monday_floor(date) - monday_floor(year_start)).num_days();
    (days / 7) as u32
}

/// Thứ Hai gần nhất không sau `date`, dừng ở `NaiveDate::MIN`.
pub fn monday_floor(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(
        date.weekday().num_days_from_monday(),
    )))
    .unwrap_or(NaiveDate::MIN)
}

/// Thứ Hai gần nhất không trước `date`, dừng ở `NaiveDate::MAX`.
pub fn monday_ceil(date: NaiveDate) -> NaiveDate {
    let floor = monday_floor(date);
    if floor == date {
        date
    } else {
        floor
            .checked_add_signed(Duration::days(7))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Số tuần trong năm theo quy ước riêng của hệ thống (không phải ISO-8601):
/// `ceil((ngày_trôi_qua + thứ_của_1/1 + 1) / 7)`, trong đó số ngày tính cả
/// phần lẻ của giờ và thứ tính từ Chủ nhật = 0.
pub fn week_of_year(at: NaiveDateTime) -> u32 {
    let start = at.date().with_ordinal(1).unwrap_or(at.date());
    let elapsed_ms = (at - start.and_time(NaiveTime::MIN)).num_milliseconds();
    let elapsed_days = elapsed_ms as f64 / 86_400_000.0;
    let offset = f64::from(start.weekday().num_days_from_sunday());
    ((elapsed_days + offset + 1.0) / 7.0).ceil() as u32
}
