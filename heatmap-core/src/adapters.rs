//! Chuyển dữ liệu nguồn (bản đồ khóa → giá trị hoặc envelope) thành chuỗi thưa.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coords::week_of_year;
use crate::extent::Extent;
use crate::time_key::{KeyFormat, TimeFields, TimeKey};
use crate::{DataPoint, HeatmapError, Period};

/// Cận trên mặc định của envelope khi thiếu `maxPossible` (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Hai dạng đầu vào được hỗ trợ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SeriesInput {
    /// Dữ liệu đã định hình sẵn kèm cận giá trị.
    Envelope(Envelope),
    /// Khóa thời gian → giá trị, giữ nguyên thứ tự chèn.
    Keyed(IndexMap<String, f64>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub data: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_possible: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_possible: Option<f64>,
}

/// Chuỗi thưa cùng khoảng giá trị quan sát.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparseSeries {
    pub points: Vec<DataPoint>,
    pub extent: Option<Extent>,
}

impl SparseSeries {
    /// Envelope mang sẵn cận; cận thiếu lấy mặc định `0` và `2^53 - 1`.
    pub fn from_envelope(envelope: &Envelope) -> Self {
        let extent = (!envelope.data.is_empty()).then(|| Extent {
            min: envelope.min_possible.unwrap_or(0.0),
            max: envelope.max_possible.unwrap_or(MAX_SAFE_INTEGER),
        });
        Self {
            points: envelope.data.clone(),
            extent,
        }
    }
}

/// Chọn adapter theo chu kỳ.
pub fn adapt(
    input: &SeriesInput,
    period: Period,
    format: KeyFormat,
) -> Result<SparseSeries, HeatmapError> {
    match input {
        SeriesInput::Envelope(envelope) => Ok(SparseSeries::from_envelope(envelope)),
        SeriesInput::Keyed(values) => match period {
            Period::Weekly => adapt_weekly(values, format),
            Period::Monthly => adapt_monthly(values, format),
            Period::Yearly => adapt_yearly(values, format),
        },
    }
}

/// `day` = thứ tính từ Chủ nhật (= 0), kèm số tuần trong năm.
pub fn adapt_weekly(
    values: &IndexMap<String, f64>,
    format: KeyFormat,
) -> Result<SparseSeries, HeatmapError> {
    adapt_with(values, format, |fields, value| DataPoint {
        year: fields.year(),
        month: fields.month(),
        day: fields.weekday().num_days_from_sunday(),
        hour: fields.hour().unwrap_or(0),
        week: week_of_year(fields.datetime()),
        value,
    })
}

/// `day` = ngày trong tháng tính từ 0.
pub fn adapt_monthly(
    values: &IndexMap<String, f64>,
    format: KeyFormat,
) -> Result<SparseSeries, HeatmapError> {
    adapt_with(values, format, |fields, value| DataPoint {
        year: fields.year(),
        month: fields.month(),
        day: fields.day() - 1,
        hour: fields.hour().unwrap_or(0),
        week: 0,
        value,
    })
}

/// `day` = ngày trong tháng tính từ 1, bỏ giờ.
pub fn adapt_yearly(
    values: &IndexMap<String, f64>,
    format: KeyFormat,
) -> Result<SparseSeries, HeatmapError> {
    adapt_with(values, format, |fields, value| DataPoint {
        year: fields.year(),
        month: fields.month(),
        day: fields.day(),
        hour: 0,
        week: 0,
        value,
    })
}

fn adapt_with<F>(
    values: &IndexMap<String, f64>,
    format: KeyFormat,
    shape: F,
) -> Result<SparseSeries, HeatmapError>
where
    F: Fn(&TimeFields, f64) -> DataPoint,
{
    let points = values
        .iter()
        .map(|(raw, value)| {
            let fields = TimeKey::from_raw(raw, format)?.parse()?;
            Ok(shape(&fields, *value))
        })
        .collect::<Result<Vec<_>, HeatmapError>>()?;

    let extent = Extent::of(values.values().copied());
    debug!(points = points.len(), ?extent, "đã chuyển dữ liệu nguồn");

    Ok(SparseSeries { points, extent })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    #[test]
    fn weekly_adapter_decodes_weekday_and_week() {
        let series =
            adapt_weekly(&keyed(&[("19022810", 5.0), ("19022611", 9.0)]), KeyFormat::Auto)
                .unwrap();
        let first = series.points[0];
        assert_eq!((first.year, first.month, first.day, first.hour), (2019, 1, 4, 10));
        assert_eq!(first.week, 9);
        assert_eq!(series.points[1].day, 2);
        assert_eq!(series.extent, Some(Extent { min: 5.0, max: 9.0 }));
    }

    #[test]
    fn monthly_adapter_uses_zero_based_day() {
        let series = adapt_monthly(&keyed(&[("20022923", 1.0)]), KeyFormat::Compact).unwrap();
        let point = series.points[0];
        assert_eq!((point.month, point.day, point.hour), (1, 28, 23));
    }

    #[test]
    fn yearly_adapter_accepts_epoch_keys() {
        // 2019-03-01T00:00:00Z
        let series =
            adapt_yearly(&keyed(&[("1551398400000", 2.0)]), KeyFormat::EpochMillis).unwrap();
        let point = series.points[0];
        assert_eq!((point.year, point.month, point.day), (2019, 2, 1));
    }

    #[test]
    fn one_bad_key_fails_the_whole_series() {
        let result = adapt_yearly(&keyed(&[("190228", 1.0), ("191332", 2.0)]), KeyFormat::Auto);
        assert!(matches!(result, Err(HeatmapError::Parse { .. })));
    }

    #[test]
    fn envelope_bounds_default_when_missing() {
        let envelope = Envelope {
            data: vec![DataPoint::default()],
            min_possible: None,
            max_possible: Some(40.0),
        };
        let series = SparseSeries::from_envelope(&envelope);
        assert_eq!(series.extent, Some(Extent { min: 0.0, max: 40.0 }));

        let envelope = Envelope {
            max_possible: None,
            ..envelope
        };
        assert_eq!(
            SparseSeries::from_envelope(&envelope).extent.map(|e| e.max),
            Some(MAX_SAFE_INTEGER)
        );
    }

    #[test]
    fn series_input_deserializes_both_shapes() {
        let keyed: SeriesInput = serde_json::from_str(r#"{"190228": 3, "190301": 4.5}"#).unwrap();
        assert!(matches!(keyed, SeriesInput::Keyed(ref map) if map.len() == 2));

        let envelope: SeriesInput = serde_json::from_str(
            r#"{"data": [{"year": 2019, "month": 1, "day": 3, "hour": 4, "value": 2}], "minPossible": 1, "maxPossible": 8}"#,
        )
        .unwrap();
        match envelope {
            SeriesInput::Envelope(envelope) => {
                assert_eq!(envelope.data[0].hour, 4);
                assert_eq!(envelope.max_possible, Some(8.0));
            }
            other => panic!("expected envelope, got {other:?}"),
        }
    }
}
