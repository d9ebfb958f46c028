//! Bridge WASM <-> JavaScript cho heatmap, không phụ thuộc framework.

use chrono::{NaiveDate, Weekday};
use heatmap_core::{
    ColorMode, ColorScale, DayNameLength, Gradient, HeatmapConfig, HeatmapError, KeyFormat,
    Period, SeriesInput,
};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

/// Cấu hình phía JS: mọi trường đều tuỳ chọn, thiếu thì lấy mặc định.
#[derive(Debug, Default, Deserialize)]
struct JsHeatmapConfig {
    #[serde(default)]
    period: Option<Period>,
    #[serde(default)]
    locale: Option<String>,
    #[serde(default, alias = "dayNameLength")]
    day_name_length: Option<DayNameLength>,
    #[serde(default, alias = "weekStart")]
    week_start: Option<Weekday>,
    #[serde(default, alias = "includeWeekend")]
    include_weekend: Option<bool>,
    #[serde(default)]
    scale: Option<f64>,
    #[serde(default, alias = "keyFormat")]
    key_format: Option<KeyFormat>,
    #[serde(default, alias = "referenceDate")]
    reference_date: Option<NaiveDate>,
    #[serde(default, alias = "mobileView")]
    mobile_view: Option<bool>,
    /// Mã số như API cũ: 1 = linear, 2 = sqrt, 3 = cubehelix.
    #[serde(default, alias = "colorMode")]
    color_mode: Option<u8>,
    #[serde(default, alias = "minColor")]
    min_color: Option<String>,
    #[serde(default, alias = "maxColor")]
    max_color: Option<String>,
    /// Đường dẫn chấm tới chuỗi dữ liệu trong tài liệu, ví dụ `nodegroups.kz`.
    #[serde(default)]
    path: Option<String>,
}

impl TryFrom<JsHeatmapConfig> for HeatmapConfig {
    type Error = HeatmapError;

    fn try_from(cfg: JsHeatmapConfig) -> Result<Self, Self::Error> {
        let mut base = HeatmapConfig::for_period(cfg.period.unwrap_or_default());
        if let Some(locale) = cfg.locale {
            base.locale = locale;
        }
        if let Some(length) = cfg.day_name_length {
            base.day_name_length = length;
        }
        if let Some(day) = cfg.week_start {
            base.week_start = day;
        }
        if let Some(include) = cfg.include_weekend {
            base.include_weekend = include;
        }
        if let Some(scale) = cfg.scale {
            base.scale = scale;
        }
        if let Some(format) = cfg.key_format {
            base.key_format = format;
        }
        base.reference_date = cfg.reference_date;
        if let Some(mobile) = cfg.mobile_view {
            base.mobile_view = mobile;
        }
        if let Some(code) = cfg.color_mode {
            base.color_mode = ColorMode::from_code(code).ok_or_else(|| {
                HeatmapError::InvalidConfig(format!("colorMode phải là 1, 2 hoặc 3, nhận {code}"))
            })?;
        }
        if let Some(color) = cfg.min_color {
            base.min_color = color;
        }
        if let Some(color) = cfg.max_color {
            base.max_color = color;
        }
        base.validate()?;
        Ok(base)
    }
}

/// Dựng một lưới heatmap từ bản đồ khóa → giá trị hoặc envelope.
#[wasm_bindgen]
pub fn render_heatmap(input: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (series, cfg) = read_request(input, config)?;
    let grid = heatmap_core::render(&series, &cfg)
        .map_err(|err| JsValue::from_str(&format_heatmap_error(err)))?;
    to_js(&grid)
}

/// Dựng một lưới cho mỗi tuần/tháng có trong dữ liệu.
#[wasm_bindgen]
pub fn render_heatmaps(input: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (series, cfg) = read_request(input, config)?;
    let grids = heatmap_core::render_each(&series, &cfg)
        .map_err(|err| JsValue::from_str(&format_heatmap_error(err)))?;
    to_js(&grids)
}

/// Màu `#rrggbb` cho một giá trị, dùng khi lớp vẽ phía JS tự tô ô.
#[wasm_bindgen]
pub fn resolve_color(
    min: f64,
    max: f64,
    value: f64,
    mode: u8,
    min_color: Option<String>,
    max_color: Option<String>,
) -> Result<String, JsValue> {
    let defaults = HeatmapConfig::default();
    let mode = ColorMode::from_code(mode)
        .ok_or_else(|| JsValue::from_str(&format!("colorMode không hợp lệ: {mode}")))?;
    let gradient = Gradient::new(
        min_color.as_deref().unwrap_or(&defaults.min_color),
        max_color.as_deref().unwrap_or(&defaults.max_color),
    )
    .map_err(|err| JsValue::from_str(&format_heatmap_error(err)))?;
    Ok(gradient.resolve(min, max, value, mode))
}

fn read_request(
    input: JsValue,
    config: Option<JsValue>,
) -> Result<(SeriesInput, HeatmapConfig), JsValue> {
    let document = from_value::<serde_json::Value>(input)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được dữ liệu JSON: {err}")))?;

    let js_cfg = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => from_value(js_cfg)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?,
        _ => JsHeatmapConfig::default(),
    };
    let path = js_cfg.path.clone();
    let cfg = HeatmapConfig::try_from(js_cfg)
        .map_err(|err| JsValue::from_str(&format_heatmap_error(err)))?;

    let series = heatmap_source::load_series_value(&document, path.as_deref())
        .map_err(|err| JsValue::from_str(&format_heatmap_error(err)))?;
    Ok((series, cfg))
}

/// Ô dùng `#[serde(flatten)]`, nên cần serializer dạng JSON để ra object thường thay vì `Map`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

fn format_heatmap_error(err: HeatmapError) -> String {
    format!("Heatmap error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> JsHeatmapConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_fields_keep_defaults() {
        let cfg = HeatmapConfig::try_from(JsHeatmapConfig::default()).unwrap();
        assert_eq!(cfg, HeatmapConfig::default());
    }

    #[test]
    fn camel_case_fields_override_defaults() {
        let cfg = HeatmapConfig::try_from(parse(
            r#"{"period": "monthly", "weekStart": "Sun", "includeWeekend": false, "colorMode": 3, "dayNameLength": "short"}"#,
        ))
        .unwrap();
        assert_eq!(cfg.period, Period::Monthly);
        assert_eq!(cfg.week_start, Weekday::Sun);
        assert!(!cfg.include_weekend);
        assert_eq!(cfg.color_mode, ColorMode::CubeHelix);
        assert_eq!(cfg.day_name_length, DayNameLength::Short);
        assert_eq!(cfg.locale, "en-US");
    }

    #[test]
    fn unknown_color_mode_and_bad_scale_are_rejected() {
        assert!(matches!(
            HeatmapConfig::try_from(parse(r#"{"colorMode": 9}"#)),
            Err(HeatmapError::InvalidConfig(_))
        ));
        assert!(matches!(
            HeatmapConfig::try_from(parse(r#"{"scale": 0}"#)),
            Err(HeatmapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn error_message_is_prefixed() {
        assert_eq!(
            format_heatmap_error(HeatmapError::EmptySeries),
            format!("Heatmap error: {}", HeatmapError::EmptySeries)
        );
    }
}
