//! Thứ tự xuất hiện của các ô, điều khiển hiệu ứng "sóng" khi vẽ.

use std::cmp::Ordering;

use crate::coords::Placed;
use crate::{Cell, DataPoint, Period};

/// Sắp xếp ô và gán thứ hạng, nhóm sóng, độ trễ hiệu ứng.
pub fn order(mut placed: Vec<Placed>, period: Period) -> Vec<Cell> {
    match period {
        Period::Weekly | Period::Monthly => {
            placed.sort_by_key(|item| item.point.day);
            binary_insertion_sort(&mut placed, |a, b| wave_comparator(&a.point, &b.point));
        }
        Period::Yearly => {
            placed.sort_by_key(|item| (item.point.year, item.point.month, item.point.day));
            placed.sort_by_key(|item| item.point.month);
        }
    }

    let step = period.animation_step_secs();
    placed
        .into_iter()
        .enumerate()
        .map(|(rank, item)| Cell {
            row: item.row,
            col: item.col,
            rank,
            wave: match period {
                Period::Weekly | Period::Monthly => item.point.day,
                Period::Yearly => item.point.month,
            },
            delay_secs: rank as f64 * step,
            point: item.point,
        })
        .collect()
}

/// So sánh thứ cấp của hiệu ứng sóng.
///
/// Nhánh đầu so `b.hour` với `a.day` (hai trường khác loại); giữ nguyên vì
/// hình dạng sóng phụ thuộc vào nó. Đây không phải một thứ tự toàn phần.
pub fn wave_comparator(a: &DataPoint, b: &DataPoint) -> Ordering {
    if b.hour < a.day {
        Ordering::Greater
    } else if a.hour < b.hour {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// Sắp xếp chèn nhị phân, ổn định: phần tử đang chèn là `a`, phần tử đã đặt là `b`.
///
/// Không dùng `sort_by` của thư viện chuẩn vì bộ so sánh không toàn phần.
fn binary_insertion_sort<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for start in 1..items.len() {
        let (mut left, mut right) = (0, start);
        while left < right {
            let mid = left + (right - left) / 2;
            if compare(&items[start], &items[mid]) == Ordering::Less {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        items[left..=start].rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(day: u32, hour: u32) -> Placed {
        Placed {
            row: day,
            col: hour,
            point: DataPoint {
                day,
                hour,
                ..DataPoint::default()
            },
        }
    }

    fn day_hour(cells: &[Cell]) -> Vec<(u32, u32)> {
        cells
            .iter()
            .map(|cell| (cell.point.day, cell.point.hour))
            .collect()
    }

    #[test]
    fn wave_comparator_is_not_a_plain_day_hour_sort() {
        let cells = order(vec![placed(0, 5), placed(3, 1)], Period::Weekly);
        assert_eq!(day_hour(&cells), vec![(3, 1), (0, 5)]);
        assert_eq!(cells[0].rank, 0);
        assert_eq!(cells[1].rank, 1);
    }

    #[test]
    fn comparator_branches() {
        let a = DataPoint {
            day: 3,
            hour: 1,
            ..DataPoint::default()
        };
        let b = DataPoint {
            day: 0,
            hour: 2,
            ..DataPoint::default()
        };
        // b.hour (2) < a.day (3)
        assert_eq!(wave_comparator(&a, &b), Ordering::Greater);
        // b.hour (1) >= a.day (0), a.hour (2) > b.hour (1)
        assert_eq!(wave_comparator(&b, &a), Ordering::Equal);
    }

    #[test]
    fn single_day_orders_by_hour() {
        let input = vec![placed(0, 4), placed(0, 2), placed(0, 9), placed(0, 0)];
        let cells = order(input, Period::Monthly);
        assert_eq!(day_hour(&cells), vec![(0, 0), (0, 2), (0, 4), (0, 9)]);
    }

    #[test]
    fn ordering_is_deterministic_and_keeps_every_cell() {
        let input: Vec<Placed> = (0..7)
            .rev()
            .flat_map(|day| (0..24).map(move |hour| placed(day, hour)))
            .collect();
        let first = order(input.clone(), Period::Weekly);
        let second = order(input, Period::Weekly);
        assert_eq!(first, second);
        assert_eq!(first.len(), 168);

        let mut seen = day_hour(&first);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 168);
    }

    #[test]
    fn delay_grows_with_rank() {
        let cells = order(vec![placed(0, 0), placed(0, 1), placed(0, 2)], Period::Weekly);
        assert_eq!(cells[0].delay_secs, 0.0);
        assert!((cells[2].delay_secs - 2.0 * 0.00275).abs() < 1e-12);
    }

    #[test]
    fn yearly_cells_group_by_month() {
        let point = |year, month, day| Placed {
            row: 0,
            col: 0,
            point: DataPoint {
                year,
                month,
                day,
                ..DataPoint::default()
            },
        };
        let cells = order(
            vec![point(2019, 11, 2), point(2020, 0, 5), point(2019, 11, 1)],
            Period::Yearly,
        );
        let order: Vec<_> = cells.iter().map(|c| (c.point.year, c.point.month, c.point.day)).collect();
        assert_eq!(order, vec![(2020, 0, 5), (2019, 11, 1), (2019, 11, 2)]);
        assert_eq!(cells[0].wave, 0);
        assert_eq!(cells[2].wave, 11);
    }
}
