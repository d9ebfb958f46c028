//! JSON document to `SeriesInput` loader for the heatmap pipeline.

use heatmap_core::{
    render, render_each, Envelope, HeatmapConfig, HeatmapError, HeatmapGrid, SeriesInput,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Load a series from a JSON string, optionally descending a dotted path first.
pub fn load_series_str(document: &str, path: Option<&str>) -> Result<SeriesInput, HeatmapError> {
    let value: Value =
        serde_json::from_str(document).map_err(|err| HeatmapError::Source(err.to_string()))?;
    load_series_value(&value, path)
}

/// Load a series from a `serde_json::Value`.
///
/// The addressed node is either an envelope (an object carrying a `data`
/// array) or a flat object of time key to value.
pub fn load_series_value(
    document: &Value,
    path: Option<&str>,
) -> Result<SeriesInput, HeatmapError> {
    let node = match path {
        Some(path) => resolve_path(document, path)?,
        None => document,
    };

    let object = node.as_object().ok_or_else(|| {
        HeatmapError::Source(format!(
            "Expected an object at `{}`, found {}",
            path.unwrap_or("<root>"),
            kind_of(node)
        ))
    })?;

    if object.get("data").is_some_and(Value::is_array) {
        let envelope: Envelope = serde_json::from_value(node.clone())
            .map_err(|err| HeatmapError::Source(format!("Invalid envelope: {err}")))?;
        debug!(points = envelope.data.len(), "loaded envelope series");
        return Ok(SeriesInput::Envelope(envelope));
    }

    let values = keyed_values(object)?;
    debug!(entries = values.len(), "loaded keyed series");
    Ok(SeriesInput::Keyed(values))
}

/// Load and render a single grid.
pub fn render_document_str(
    document: &str,
    path: Option<&str>,
    config: &HeatmapConfig,
) -> Result<HeatmapGrid, HeatmapError> {
    let input = load_series_str(document, path)?;
    render(&input, config)
}

/// Load and render one grid per week or month found in the series.
pub fn render_document_each_str(
    document: &str,
    path: Option<&str>,
    config: &HeatmapConfig,
) -> Result<Vec<HeatmapGrid>, HeatmapError> {
    let input = load_series_str(document, path)?;
    render_each(&input, config)
}

/// Dotted paths of every object in the document that looks like a series.
pub fn series_paths(document: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_series_paths(document, String::new(), &mut paths);
    paths
}

fn collect_series_paths(node: &Value, prefix: String, out: &mut Vec<String>) {
    let Some(object) = node.as_object() else {
        return;
    };

    if object.get("data").is_some_and(Value::is_array) || looks_like_series(object) {
        if !prefix.is_empty() {
            out.push(prefix);
        }
        return;
    }

    for (key, child) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        collect_series_paths(child, path, out);
    }
}

fn looks_like_series(object: &Map<String, Value>) -> bool {
    !object.is_empty() && object.values().all(|value| numeric_value(value).is_some())
}

fn resolve_path<'a>(document: &'a Value, path: &str) -> Result<&'a Value, HeatmapError> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(document, |node, segment| {
            node.get(segment).ok_or_else(|| {
                HeatmapError::Source(format!("Path `{path}` not found at segment `{segment}`"))
            })
        })
}

fn keyed_values(object: &Map<String, Value>) -> Result<IndexMap<String, f64>, HeatmapError> {
    object
        .iter()
        .map(|(key, value)| {
            numeric_value(value)
                .map(|number| (key.clone(), number))
                .ok_or_else(|| {
                    HeatmapError::Source(format!(
                        "Value for `{key}` is not numeric ({})",
                        kind_of(value)
                    ))
                })
        })
        .collect()
}

/// Numbers pass through; strings are read like a lenient float parse
/// (leading numeric prefix, surrounding whitespace ignored).
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => numeric_prefix(text),
        _ => None,
    }
}

fn numeric_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (index, ch) in trimmed.char_indices() {
        match ch {
            '-' | '+' if index == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            c if c.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = index + ch.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end].trim_end_matches('.').parse::<f64>().ok()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
