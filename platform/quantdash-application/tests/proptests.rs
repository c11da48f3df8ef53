use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use quantdash_application::chart::{format_tooltip_value, ChartModel};
use quantdash_application::formatting::{format_percent, format_ratio};
use quantdash_application::series::{normalize_series, LabelTimezone};
use quantdash_domain::value_objects::equity_point::EquityPoint;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn normalizer_preserves_length_and_equity_order(
        values in prop::collection::vec(-1e9f64..1e9, 1..200),
        step_minutes in 0i64..1440,
    ) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points: Vec<EquityPoint> = values
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                let ts = start + Duration::minutes(step_minutes * idx as i64);
                EquityPoint::new(ts.to_rfc3339(), *v)
            })
            .collect();

        let series = normalize_series(&points, LabelTimezone::Utc);
        prop_assert_eq!(series.len(), points.len());
        for (out, input) in series.iter().zip(points.iter()) {
            prop_assert_eq!(out.equity.to_bits(), input.equity.to_bits());
            prop_assert!(!out.label.is_empty());
            prop_assert_ne!(&out.label, &input.datetime);
        }
    }

    #[test]
    fn percent_strings_recover_the_ratio(ratio in -1.0f64..=1.0) {
        let text = format_percent(ratio);
        prop_assert!(text.ends_with('%'));
        let numeric: f64 = text.trim_end_matches('%').parse().unwrap();
        prop_assert!((numeric / 100.0 - ratio).abs() <= 0.0005 + 1e-12);
        if ratio < -0.0005 {
            prop_assert!(text.starts_with('-'));
        }
    }

    #[test]
    fn ratio_strings_have_two_decimals(value in -100.0f64..100.0) {
        let text = format_ratio(value);
        let (_, decimals) = text.split_once('.').unwrap();
        prop_assert_eq!(decimals.len(), 2);
        let parsed: f64 = text.parse().unwrap();
        prop_assert!((parsed - value).abs() <= 0.005 + 1e-12);
    }

    #[test]
    fn tooltip_values_have_three_decimals(value in -1e12f64..1e12) {
        let text = format_tooltip_value(value);
        let (_, decimals) = text.split_once('.').unwrap();
        prop_assert_eq!(decimals.len(), 3);
    }

    #[test]
    fn chart_bounds_contain_every_point(values in prop::collection::vec(-1e6f64..1e6, 0..100)) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points: Vec<EquityPoint> = values
            .iter()
            .enumerate()
            .map(|(idx, v)| EquityPoint::new((start + Duration::hours(idx as i64)).to_rfc3339(), *v))
            .collect();
        let model = ChartModel::from_series(&normalize_series(&points, LabelTimezone::Utc));
        let (y_min, y_max) = model.y_bounds();
        let (x_min, x_max) = model.x_bounds();
        prop_assert!(y_min < y_max);
        prop_assert!(x_min < x_max);
        for (x, y) in model.points() {
            prop_assert!(*y >= y_min && *y <= y_max);
            prop_assert!(*x >= x_min && *x <= x_max);
        }
    }
}
