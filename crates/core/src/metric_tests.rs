// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn extend_concatenates_in_arrival_order() {
    let mut series = MetricSeries::single(1.0, 0.5);
    series.extend(MetricSeries {
        x: vec![2.0, 3.0],
        y: vec![0.4, 0.3],
    });
    assert_eq!(series.x, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.y, vec![0.5, 0.4, 0.3]);
    assert_eq!(series.last(), Some((3.0, 0.3)));
}

#[test]
fn merge_metrics_keeps_existing_series() {
    let mut into: Metrics = Metrics::new();
    into.insert("loss".to_string(), MetricSeries::single(1.0, 0.9));

    let mut from: Metrics = Metrics::new();
    from.insert("loss".to_string(), MetricSeries::single(2.0, 0.8));
    from.insert("acc".to_string(), MetricSeries::single(2.0, 0.1));

    merge_metrics(&mut into, from);
    assert_eq!(into.len(), 2);
    assert_eq!(into["loss"].len(), 2);
    assert_eq!(into["loss"].x, vec![1.0, 2.0]);
    assert_eq!(into["acc"].len(), 1);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Merging series with non-decreasing X in arrival order preserves
        // monotonicity, which is what chunked history delivery relies on.
        #[test]
        fn merge_preserves_monotone_x(
            steps in proptest::collection::vec(0u32..1000, 1..50),
            split in 0usize..50,
        ) {
            let mut sorted: Vec<f64> = steps.iter().map(|&s| f64::from(s)).collect();
            sorted.sort_by(f64::total_cmp);
            let split = split.min(sorted.len());

            let first = MetricSeries {
                x: sorted[..split].to_vec(),
                y: vec![0.0; split],
            };
            let second = MetricSeries {
                x: sorted[split..].to_vec(),
                y: vec![0.0; sorted.len() - split],
            };

            let mut merged: Metrics = Metrics::new();
            merged.insert("m".to_string(), first);
            let mut from = Metrics::new();
            from.insert("m".to_string(), second);
            merge_metrics(&mut merged, from);

            let xs = &merged["m"].x;
            prop_assert_eq!(xs.len(), sorted.len());
            prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
