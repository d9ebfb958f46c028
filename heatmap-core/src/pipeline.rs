//! Điểm vào: dữ liệu nguồn → lưới heatmap hoàn chỉnh.

use indexmap::IndexMap;
use tracing::{debug, debug_span};

use crate::adapters::{adapt, SeriesInput};
use crate::config::HeatmapConfig;
use crate::coords::{map_coordinates, weekday_rows};
use crate::extent::Extent;
use crate::fill::{fill, HOURS_PER_DAY};
use crate::labels::axis_labels;
use crate::locale::{ChronoLocaleFormat, LocaleDateFormat};
use crate::order::order;
use crate::{DataPoint, HeatmapError, HeatmapGrid, Period};

/// Dựng một lưới với bộ định dạng locale mặc định.
pub fn render(input: &SeriesInput, config: &HeatmapConfig) -> Result<HeatmapGrid, HeatmapError> {
    render_with(input, config, &ChronoLocaleFormat)
}

pub fn render_with(
    input: &SeriesInput,
    config: &HeatmapConfig,
    formatter: &dyn LocaleDateFormat,
) -> Result<HeatmapGrid, HeatmapError> {
    config.validate()?;
    let series = adapt(input, config.period, config.key_format)?;
    build_grid(&series.points, series.extent, config, formatter)
}

/// Một lưới cho mỗi tuần (hoặc tháng) xuất hiện trong dữ liệu, theo thứ tự
/// xuất hiện đầu tiên. Các lưới dùng chung khoảng giá trị của toàn bộ đầu vào.
pub fn render_each(
    input: &SeriesInput,
    config: &HeatmapConfig,
) -> Result<Vec<HeatmapGrid>, HeatmapError> {
    render_each_with(input, config, &ChronoLocaleFormat)
}

pub fn render_each_with(
    input: &SeriesInput,
    config: &HeatmapConfig,
    formatter: &dyn LocaleDateFormat,
) -> Result<Vec<HeatmapGrid>, HeatmapError> {
    config.validate()?;
    let series = adapt(input, config.period, config.key_format)?;

    if series.points.is_empty() || config.period == Period::Yearly {
        return build_grid(&series.points, series.extent, config, formatter).map(|grid| vec![grid]);
    }

    let mut groups: IndexMap<(i32, u32), Vec<DataPoint>> = IndexMap::new();
    for point in &series.points {
        let key = match config.period {
            Period::Weekly => (point.year, point.week),
            Period::Monthly | Period::Yearly => (point.year, point.month),
        };
        groups.entry(key).or_default().push(*point);
    }
    debug!(groups = groups.len(), "tách dữ liệu thành nhiều lưới");

    groups
        .values()
        .map(|points| build_grid(points, series.extent, config, formatter))
        .collect()
}

fn build_grid(
    points: &[DataPoint],
    extent: Option<Extent>,
    config: &HeatmapConfig,
    formatter: &dyn LocaleDateFormat,
) -> Result<HeatmapGrid, HeatmapError> {
    let _span = debug_span!("build_grid", period = ?config.period, input = points.len()).entered();

    let dense = fill(points, config)?;
    let labels = axis_labels(&dense, config, formatter)?;
    let rows = match config.period {
        Period::Weekly => weekday_rows(config).len() as u32,
        Period::Monthly => dense.len() as u32 / HOURS_PER_DAY,
        Period::Yearly => 7,
    };

    let placed = map_coordinates(dense, config)?;
    let columns = match config.period {
        Period::Weekly | Period::Monthly => HOURS_PER_DAY,
        Period::Yearly => placed.iter().map(|item| item.col + 1).max().unwrap_or(0),
    };

    let cells = order(placed, config.period);
    debug!(cells = cells.len(), rows, columns, "đã dựng lưới");

    Ok(HeatmapGrid {
        period: config.period,
        rows,
        columns,
        scale: config.scale,
        extent,
        labels,
        cells,
    })
}
