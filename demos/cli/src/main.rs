use std::path::PathBuf;

use anyhow::{anyhow, Context};
use chrono::{NaiveDate, Weekday};
use clap::Parser;
use heatmap_core::{
    ColorMode, ColorScale, DayNameLength, Gradient, HeatmapConfig, HeatmapGrid, Period,
};
use heatmap_source::{load_series_str, series_paths};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "heatmap-cli",
    about = "Dựng lưới heatmap dạng lịch từ file JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON dữ liệu.
    #[arg(short, long)]
    input: PathBuf,

    /// Đường dẫn chấm tới chuỗi trong tài liệu, ví dụ `nodegroups.kz`.
    #[arg(long)]
    path: Option<String>,

    /// weekly | monthly | yearly
    #[arg(long)]
    period: Option<Period>,

    #[arg(long)]
    locale: Option<String>,

    /// Ngày đầu tuần (mon, sun, ...).
    #[arg(long)]
    week_start: Option<String>,

    /// Bỏ thứ Bảy và Chủ nhật khỏi lưới tuần.
    #[arg(long)]
    no_weekend: bool,

    /// long | short | narrow
    #[arg(long)]
    day_name_length: Option<DayNameLength>,

    /// linear | sqrt | cubehelix
    #[arg(long)]
    color_mode: Option<ColorMode>,

    /// Ngày mốc (YYYY-MM-DD) khi dữ liệu rỗng.
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// File cấu hình JSON; các cờ dòng lệnh ghi đè lên.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Một lưới cho mỗi tuần/tháng có trong dữ liệu.
    #[arg(long)]
    split: bool,

    /// In kết quả dạng JSON.
    #[arg(long)]
    json: bool,

    /// -v: info, -vv: debug.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = build_config(&args)?;
    debug!(?config, "cấu hình sau khi ghép");

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    let input = load_series_str(&data, args.path.as_deref()).map_err(|err| {
        let hint = serde_json::from_str::<serde_json::Value>(&data)
            .map(|document| series_paths(&document))
            .unwrap_or_default();
        if hint.is_empty() {
            anyhow!(err)
        } else {
            anyhow!("{err} (các chuỗi có trong file: {})", hint.join(", "))
        }
    })?;

    let grids = if args.split {
        heatmap_core::render_each(&input, &config)?
    } else {
        vec![heatmap_core::render(&input, &config)?]
    };
    info!(grids = grids.len(), "đã dựng heatmap");

    if args.json {
        let output = if args.split {
            serde_json::to_string_pretty(&grids)
        } else {
            serde_json::to_string_pretty(&grids[0])
        }
        .context("Không serialize được kết quả")?;
        println!("{output}");
        return Ok(());
    }

    let gradient = Gradient::new(&config.min_color, &config.max_color)?;
    for grid in &grids {
        print!("{}", render_text(grid, &config, &gradient));
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> anyhow::Result<HeatmapConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
            serde_json::from_str::<HeatmapConfig>(&text)
                .with_context(|| format!("File cấu hình {path:?} không hợp lệ"))?
        }
        None => HeatmapConfig::default(),
    };

    if let Some(period) = args.period {
        config.period = period;
    }
    if let Some(locale) = &args.locale {
        config.locale = locale.clone();
    }
    if let Some(day) = &args.week_start {
        config.week_start = day
            .parse::<Weekday>()
            .map_err(|_| anyhow!("Ngày đầu tuần không hợp lệ: {day}"))?;
    }
    if args.no_weekend {
        config.include_weekend = false;
    }
    if let Some(length) = args.day_name_length {
        config.day_name_length = length;
    }
    if let Some(mode) = args.color_mode {
        config.color_mode = mode;
    }
    if let Some(date) = args.reference_date {
        config.reference_date = Some(date);
    }

    config.validate()?;
    Ok(config)
}

const SHADES: [char; 5] = ['░', '▒', '▓', '█', '■'];

/// Ký tự đại diện cho độ đậm của ô; ô bằng 0 in dấu chấm.
fn shade(value: f64, min: f64, max: f64, mode: ColorMode) -> char {
    if value == 0.0 {
        return '·';
    }
    let position = mode.position(min, max, value);
    let index = (position * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[index.min(SHADES.len() - 1)]
}

fn render_text(grid: &HeatmapGrid, config: &HeatmapConfig, gradient: &Gradient) -> String {
    let label_width = grid
        .labels
        .rows
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();

    let title = grid.labels.title.clone().unwrap_or_else(|| {
        grid.cells
            .first()
            .map(|cell| {
                format!(
                    "{:?} {}/{}",
                    grid.period,
                    cell.point.month.saturating_add(1),
                    cell.point.year
                )
            })
            .unwrap_or_else(|| format!("{:?}", grid.period))
    });
    out.push_str(&format!("{title} ({} x {})\n", grid.rows, grid.columns));

    let mut header = " ".repeat(label_width + 1);
    let mut cursor = 0;
    for tick in &grid.labels.columns {
        let target = tick.index as usize;
        if target >= cursor {
            header.push_str(&" ".repeat(target - cursor));
            header.push_str(&tick.text);
            cursor = target + tick.text.chars().count();
        }
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let (min, max) = grid
        .extent
        .map(|extent| (extent.min, extent.max))
        .unwrap_or((0.0, 0.0));

    for row in 0..grid.rows {
        if grid.labels.week_separators.contains(&row) {
            out.push_str(&format!("{}\n", "-".repeat(label_width + 1 + grid.columns as usize)));
        }
        let label = grid
            .labels
            .rows
            .get(row as usize)
            .map(String::as_str)
            .unwrap_or("");
        out.push_str(&format!("{label:>label_width$} "));
        for col in 0..grid.columns {
            let symbol = grid
                .cell_at(row, col)
                .map(|cell| shade(cell.point.value, min, max, config.color_mode))
                .unwrap_or(' ');
            out.push(symbol);
        }
        out.push('\n');
    }

    if let Some(extent) = grid.extent {
        out.push_str(&format!(
            "min {} {}  max {} {}\n\n",
            extent.min,
            gradient.resolve(extent.min, extent.max, extent.min, config.color_mode),
            extent.max,
            gradient.resolve(extent.min, extent.max, extent.max, config.color_mode),
        ));
    } else {
        out.push_str("(không có dữ liệu)\n\n");
    }
    out
}
