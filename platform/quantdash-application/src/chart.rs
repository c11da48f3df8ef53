//! Chart model for the equity curve: points over the sequence index,
//! auto-scaled bounds and the hover tooltip.

use crate::formatting::to_fixed;
use crate::series::SeriesPoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub label: String,
    pub value: String,
}

/// Tooltip values always carry exactly three decimals.
pub fn format_tooltip_value(value: f64) -> String {
    to_fixed(value, 3)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartModel {
    points: Vec<(f64, f64)>,
    labels: Vec<String>,
}

impl ChartModel {
    pub fn from_series(series: &[SeriesPoint]) -> Self {
        Self {
            points: series
                .iter()
                .enumerate()
                .map(|(idx, point)| (idx as f64, point.equity))
                .collect(),
            labels: series.iter().map(|point| point.label.clone()).collect(),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        let x_min = self.points.first().map(|p| p.0).unwrap_or(0.0);
        let mut x_max = self.points.last().map(|p| p.0).unwrap_or(x_min + 1.0);
        if x_max <= x_min {
            x_max = x_min + 1.0;
        }
        (x_min, x_max)
    }

    /// Data range padded by 5%. A flat series is padded by 1% of its value
    /// (at least 1), an empty one gets `0..1`.
    pub fn y_bounds(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (_, y) in &self.points {
            min = min.min(*y);
            max = max.max(*y);
        }
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        if max <= min {
            let pad = (min.abs() * 0.01).max(1.0);
            return (min - pad, max + pad);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }

    pub fn y_axis_labels(&self) -> [String; 3] {
        let (min, max) = self.y_bounds();
        let mid = (min + max) / 2.0;
        [
            format!("{min:.2}"),
            format!("{mid:.2}"),
            format!("{max:.2}"),
        ]
    }

    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        let (_, value) = self.points.get(index)?;
        let label = self.labels.get(index)?;
        Some(Tooltip {
            label: label.clone(),
            value: format_tooltip_value(*value),
        })
    }

    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        self.points.get(index).copied()
    }
}

/// Hover position over the chart; `None` while the chart is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartCursor {
    index: Option<usize>,
}

impl ChartCursor {
    /// Starts on the most recent point.
    pub fn for_len(len: usize) -> Self {
        Self {
            index: len.checked_sub(1),
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn left(&mut self, step: usize) {
        if let Some(idx) = self.index.as_mut() {
            *idx = idx.saturating_sub(step);
        }
    }

    pub fn right(&mut self, step: usize, len: usize) {
        if let Some(idx) = self.index.as_mut() {
            *idx = (*idx + step).min(len.saturating_sub(1));
        }
    }

    pub fn first(&mut self) {
        if self.index.is_some() {
            self.index = Some(0);
        }
    }

    pub fn last(&mut self, len: usize) {
        if self.index.is_some() {
            self.index = len.checked_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format_tooltip_value, ChartCursor, ChartModel};
    use crate::formatting::to_fixed;
use crate::series::SeriesPoint;

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(idx, v)| SeriesPoint {
                equity: *v,
                label: format!("t{idx}"),
            })
            .collect()
    }

    #[test]
    fn tooltip_value_has_three_decimals() {
        assert_eq!(format_tooltip_value(10250.5), "10250.500");
        assert_eq!(format_tooltip_value(0.0001), "0.000");
        assert_eq!(format_tooltip_value(-1.23456), "-1.235");
        assert_eq!(format_tooltip_value(123456789.0), "123456789.000");
        assert_eq!(format_tooltip_value(0.0625), "0.063");
        assert_eq!(format_tooltip_value(10000.0625), "10000.063");
    }

    #[test]
    fn points_are_indexed_by_position() {
        let model = ChartModel::from_series(&series(&[10000.0, 10250.5]));
        assert_eq!(model.points(), &[(0.0, 10000.0), (1.0, 10250.5)]);
        assert_eq!(model.x_bounds(), (0.0, 1.0));
        let tip = model.tooltip(1).expect("tooltip");
        assert_eq!(tip.label, "t1");
        assert_eq!(tip.value, "10250.500");
        assert!(model.tooltip(2).is_none());
    }

    #[test]
    fn empty_model_has_safe_bounds() {
        let model = ChartModel::from_series(&[]);
        assert!(model.is_empty());
        assert_eq!(model.x_bounds(), (0.0, 1.0));
        assert_eq!(model.y_bounds(), (0.0, 1.0));
        assert!(model.tooltip(0).is_none());
        assert_eq!(model.y_axis_labels(), ["0.00", "0.50", "1.00"].map(String::from));
    }

    #[test]
    fn y_bounds_pad_the_data_range() {
        let model = ChartModel::from_series(&series(&[100.0, 200.0, 150.0]));
        assert_eq!(model.y_bounds(), (95.0, 205.0));

        let flat = ChartModel::from_series(&series(&[5.0, 5.0]));
        assert_eq!(flat.y_bounds(), (4.0, 6.0));

        let single = ChartModel::from_series(&series(&[7.0]));
        assert_eq!(single.x_bounds(), (0.0, 1.0));
        assert_eq!(single.y_bounds(), (6.0, 8.0));
    }

    #[test]
    fn flat_series_keeps_a_visible_range_at_any_magnitude() {
        let huge = ChartModel::from_series(&series(&[1e17, 1e17]));
        let (lo, hi) = huge.y_bounds();
        assert!(lo < 1e17 && hi > 1e17, "got ({lo}, {hi})");
        assert!(hi - lo > 1e15, "got ({lo}, {hi})");

        let negative = ChartModel::from_series(&series(&[-500.0]));
        assert_eq!(negative.y_bounds(), (-505.0, -495.0));
    }

    #[test]
    fn cursor_stays_inside_the_series() {
        let mut cursor = ChartCursor::for_len(3);
        assert_eq!(cursor.index(), Some(2));
        cursor.right(5, 3);
        assert_eq!(cursor.index(), Some(2));
        cursor.left(1);
        assert_eq!(cursor.index(), Some(1));
        cursor.left(10);
        assert_eq!(cursor.index(), Some(0));
        cursor.last(3);
        assert_eq!(cursor.index(), Some(2));
        cursor.first();
        assert_eq!(cursor.index(), Some(0));
    }

    #[test]
    fn cursor_on_empty_chart_never_moves() {
        let mut cursor = ChartCursor::for_len(0);
        cursor.right(1, 0);
        cursor.last(0);
        cursor.first();
        assert_eq!(cursor.index(), None);
    }
}
