use chrono::{Datelike, NaiveDate, Weekday};
use heatmap_core::{
    render, render_each, ColorMode, ColorScale, Envelope, Extent, Gradient, HeatmapConfig,
    HeatmapError, Period, SeriesInput,
};
use indexmap::IndexMap;

fn keyed(entries: &[(&str, f64)]) -> SeriesInput {
    SeriesInput::Keyed(
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect::<IndexMap<_, _>>(),
    )
}

#[test]
fn weekly_grid_places_records_and_fills_the_rest() {
    let input = keyed(&[("19022810", 5.0), ("19022811", 7.5), ("19022610", 12.0)]);
    let grid = render(&input, &HeatmapConfig::for_period(Period::Weekly)).unwrap();

    assert_eq!(grid.cells.len(), 168);
    assert_eq!((grid.rows, grid.columns), (7, 24));
    assert_eq!(grid.labels.rows[0], "Monday");

    // 28/2/2019 là thứ Năm → hàng 3.
    assert_eq!(grid.cell_at(3, 10).unwrap().point.value, 5.0);
    assert_eq!(grid.cell_at(3, 11).unwrap().point.value, 7.5);
    assert_eq!(grid.cell_at(1, 10).unwrap().point.value, 12.0);
    assert_eq!(grid.cell_at(6, 23).unwrap().point.value, 0.0);

    let ranks: Vec<usize> = grid.cells.iter().map(|cell| cell.rank).collect();
    assert_eq!(ranks, (0..168).collect::<Vec<_>>());
}

#[test]
fn extent_ignores_synthesized_zeros() {
    let input = keyed(&[("19022810", 5.0), ("19022811", 9.0)]);
    let grid = render(&input, &HeatmapConfig::for_period(Period::Weekly)).unwrap();

    assert!(grid.cells.iter().any(|cell| cell.point.value == 0.0));
    assert_eq!(grid.extent, Some(Extent { min: 5.0, max: 9.0 }));
}

#[test]
fn rendering_twice_gives_identical_grids() {
    let input = keyed(&[("190228", 3.0), ("190301", 9.0), ("190615", 1.0)]);
    let config = HeatmapConfig::for_period(Period::Yearly);
    assert_eq!(render(&input, &config).unwrap(), render(&input, &config).unwrap());
}

#[test]
fn monthly_grid_for_leap_february() {
    let leap = render(
        &keyed(&[("20020100", 1.0)]),
        &HeatmapConfig::for_period(Period::Monthly),
    )
    .unwrap();
    assert_eq!(leap.cells.len(), 29 * 24);
    assert_eq!(leap.rows, 29);
    assert_eq!(leap.labels.rows.len(), 29);

    let common = render(
        &keyed(&[("21020100", 1.0)]),
        &HeatmapConfig::for_period(Period::Monthly),
    )
    .unwrap();
    assert_eq!(common.cells.len(), 28 * 24);
}

#[test]
fn yearly_grid_covers_365_days_with_comb_columns() {
    let input = keyed(&[("190101", 4.0), ("190201", 8.0)]);
    let grid = render(&input, &HeatmapConfig::for_period(Period::Yearly)).unwrap();

    assert_eq!(grid.cells.len(), 365);
    assert_eq!(grid.rows, 7);
    // 1/2/2019: thứ Sáu (hàng 4), tuần 4 + tháng 1.
    let feb_first = grid
        .cells
        .iter()
        .find(|cell| cell.point.month == 1 && cell.point.day == 1)
        .unwrap();
    assert_eq!((feb_first.row, feb_first.col), (4, 5));
    assert_eq!(feb_first.point.value, 8.0);
    // 31/12/2019: tuần 52 + tháng 11.
    assert_eq!(grid.columns, 64);
    assert_eq!(grid.labels.columns.len(), 12);
}

#[test]
fn workweek_grid_has_five_rows() {
    let config = HeatmapConfig {
        include_weekend: false,
        ..HeatmapConfig::for_period(Period::Weekly)
    };
    // 2/3/2019 là thứ Bảy, bị loại.
    let grid = render(&keyed(&[("19022810", 5.0), ("19030210", 50.0)]), &config).unwrap();
    assert_eq!(grid.cells.len(), 120);
    assert_eq!(grid.rows, 5);
    assert!(grid.cells.iter().all(|cell| cell.point.value != 50.0));
    assert_eq!(grid.labels.rows.last().map(String::as_str), Some("Friday"));
}

#[test]
fn week_start_moves_sunday_to_the_top() {
    let config = HeatmapConfig {
        week_start: Weekday::Sun,
        ..HeatmapConfig::for_period(Period::Weekly)
    };
    // 3/3/2019 là Chủ nhật.
    let grid = render(&keyed(&[("19030309", 2.0)]), &config).unwrap();
    assert_eq!(grid.cell_at(0, 9).unwrap().point.value, 2.0);
    assert_eq!(grid.labels.rows[0], "Sunday");
}

#[test]
fn empty_input_requires_reference_date() {
    let empty = keyed(&[]);
    let config = HeatmapConfig::for_period(Period::Monthly);
    assert_eq!(render(&empty, &config), Err(HeatmapError::EmptySeries));

    let config = HeatmapConfig {
        reference_date: NaiveDate::from_ymd_opt(2020, 2, 10),
        ..config
    };
    let grid = render(&empty, &config).unwrap();
    assert_eq!(grid.cells.len(), 29 * 24);
    assert_eq!(grid.extent, None);
}

#[test]
fn malformed_key_fails_the_render() {
    let input = keyed(&[("19022810", 5.0), ("19133010", 1.0)]);
    let result = render(&input, &HeatmapConfig::for_period(Period::Weekly));
    assert!(matches!(result, Err(HeatmapError::Parse { .. })));
}

#[test]
fn render_each_splits_by_week_and_shares_extent() {
    // 26/2 và 28/2/2019 cùng tuần 9; 12/3/2019 thuộc tuần 11.
    let input = keyed(&[("19022610", 1.0), ("19022810", 5.0), ("19031210", 20.0)]);
    let grids = render_each(&input, &HeatmapConfig::for_period(Period::Weekly)).unwrap();

    assert_eq!(grids.len(), 2);
    assert!(grids.iter().all(|grid| grid.cells.len() == 168));
    assert!(grids
        .iter()
        .all(|grid| grid.extent == Some(Extent { min: 1.0, max: 20.0 })));
    assert_eq!(grids[0].cells[0].point.week, 9);
    assert_eq!(grids[1].cells[0].point.week, 11);
}

#[test]
fn render_each_splits_monthly_input() {
    let input = keyed(&[("19013100", 1.0), ("19020100", 2.0), ("19013105", 3.0)]);
    let grids = render_each(&input, &HeatmapConfig::for_period(Period::Monthly)).unwrap();
    assert_eq!(grids.len(), 2);
    assert_eq!(grids[0].cells.len(), 31 * 24);
    assert_eq!(grids[1].cells.len(), 28 * 24);
}

#[test]
fn envelope_input_uses_its_bounds() {
    let envelope = Envelope {
        data: vec![heatmap_core::DataPoint {
            year: 2019,
            month: 1,
            day: 4,
            hour: 10,
            week: 9,
            value: 5.0,
        }],
        min_possible: Some(0.0),
        max_possible: Some(100.0),
    };
    let grid = render(
        &SeriesInput::Envelope(envelope),
        &HeatmapConfig::for_period(Period::Weekly),
    )
    .unwrap();
    assert_eq!(grid.extent, Some(Extent { min: 0.0, max: 100.0 }));
    // day = 4 là thứ Năm, cùng ô với khóa "19022810".
    assert_eq!(grid.cell_at(3, 10).unwrap().point.value, 5.0);

    let keyed_grid = render(
        &keyed(&[("19022810", 5.0)]),
        &HeatmapConfig::for_period(Period::Weekly),
    )
    .unwrap();
    let keyed_cell = keyed_grid.cell_at(3, 10).unwrap();
    assert_eq!(keyed_cell.point.day, 4);
    assert_eq!(keyed_cell.point.value, 5.0);
}

fn envelope(point: heatmap_core::DataPoint) -> SeriesInput {
    SeriesInput::Envelope(Envelope {
        data: vec![point],
        min_possible: None,
        max_possible: None,
    })
}

#[test]
fn week_runs_from_sunday_to_saturday() {
    // 24/2/2019 (Chủ nhật) và 25/2 cùng tuần 9; 3/3/2019 (Chủ nhật) sang tuần 10.
    let input = keyed(&[("19022510", 1.0), ("19022410", 7.0), ("19030310", 2.0)]);
    let grid = render(&input, &HeatmapConfig::for_period(Period::Weekly)).unwrap();

    assert_eq!(grid.cell_at(0, 10).unwrap().point.value, 1.0);
    let sunday = grid.cell_at(6, 10).unwrap();
    assert_eq!((sunday.point.day, sunday.point.value), (0, 7.0));
    assert!(grid.cells.iter().all(|cell| cell.point.value != 2.0));
    assert!(grid.cells.iter().all(|cell| cell.point.week == 9));

    let sunday_first = HeatmapConfig {
        week_start: Weekday::Sun,
        ..HeatmapConfig::for_period(Period::Weekly)
    };
    let grid = render(&input, &sunday_first).unwrap();
    assert_eq!(grid.cell_at(0, 10).unwrap().point.value, 7.0);
    assert_eq!(grid.cell_at(1, 10).unwrap().point.value, 1.0);
}

#[test]
fn epoch_and_compact_keys_for_the_same_hour_share_a_cell() {
    // 1551348000000 = 2019-02-28T10:00Z.
    let input = keyed(&[("1551348000000", 3.0), ("19022810", 8.0)]);
    let grid = render(&input, &HeatmapConfig::for_period(Period::Weekly)).unwrap();

    assert_eq!(grid.cells.len(), 168);
    assert_eq!(grid.cell_at(3, 10).unwrap().point.value, 8.0);
    assert_eq!(
        grid.cells.iter().filter(|cell| cell.point.value != 0.0).count(),
        1
    );
}

#[test]
fn envelope_fields_past_the_calendar_are_rejected() {
    let yearly = envelope(heatmap_core::DataPoint {
        year: 2019,
        month: u32::MAX,
        day: 1,
        value: 1.0,
        ..Default::default()
    });
    assert!(matches!(
        render(&yearly, &HeatmapConfig::for_period(Period::Yearly)),
        Err(HeatmapError::InvalidPoint(_))
    ));

    let monthly = envelope(heatmap_core::DataPoint {
        year: i32::MAX,
        month: 11,
        value: 1.0,
        ..Default::default()
    });
    assert!(matches!(
        render(&monthly, &HeatmapConfig::for_period(Period::Monthly)),
        Err(HeatmapError::InvalidPoint(_))
    ));
}

#[test]
fn yearly_envelope_at_the_first_supported_date() {
    let first = envelope(heatmap_core::DataPoint {
        year: NaiveDate::MIN.year(),
        month: 0,
        day: 1,
        value: 4.0,
        ..Default::default()
    });
    let grid = render(&first, &HeatmapConfig::for_period(Period::Yearly)).unwrap();
    assert_eq!(grid.cells.len(), 365);
    assert!(grid.cells.iter().any(|cell| cell.point.value == 4.0));
}

#[test]
fn grid_cells_resolve_to_colors() {
    let input = keyed(&[("19022810", 5.0), ("19022811", 15.0)]);
    let config = HeatmapConfig {
        color_mode: ColorMode::Linear,
        ..HeatmapConfig::for_period(Period::Weekly)
    };
    let grid = render(&input, &config).unwrap();
    let extent = grid.extent.unwrap();
    let gradient = Gradient::new(&config.min_color, &config.max_color).unwrap();

    let hottest = grid.cell_at(3, 11).unwrap();
    assert_eq!(
        gradient.resolve(extent.min, extent.max, hottest.point.value, config.color_mode),
        "#222081"
    );
}

#[test]
fn invalid_scale_is_rejected_before_rendering() {
    let config = HeatmapConfig {
        scale: -1.0,
        ..HeatmapConfig::default()
    };
    assert!(matches!(
        render(&keyed(&[("19022810", 5.0)]), &config),
        Err(HeatmapError::InvalidConfig(_))
    ));
}
