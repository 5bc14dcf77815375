//! Fuel economy and cost statistics.
//!
//! Statistics are computed from a car's full fuel-log history on every read.
//! The computation is a total function: it never fails, never divides by
//! zero and never mutates its input. A ratio whose denominator is missing
//! comes back as `None` while every other field stays populated, so one
//! malformed record can not blank a whole statistics panel.
//!
//! Consumption ratios are segment based: the history is sorted by odometer
//! and each adjacent pair forms a segment whose distance was covered on the
//! fuel of the later refill. Segments with a non-positive distance (out of
//! order or duplicate readings) or a non-positive quantity are dropped from
//! the segment math but their entries still count toward the aggregate
//! totals.

use crate::FuelLog;

/// Aggregated fuel statistics for one car.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FuelStatistics {
    /// Average consumption, L/100km. Segment based.
    pub avg_liters_per_100km: Option<f64>,
    /// Average fuel economy, km/L. Segment based.
    pub avg_km_per_liter: Option<f64>,
    /// Average cost per 100 km. Segment based.
    pub avg_cost_per_100km: Option<f64>,
    /// Average price paid per liter. Computed over the aggregate totals, not
    /// the segment totals; see the module docs of [`crate::stats`].
    pub avg_cost_per_liter: Option<f64>,
    /// Average cost per km. Segment based.
    pub avg_cost_per_km: Option<f64>,
    /// Sum of valid segment distances, km.
    pub total_distance: f64,
    /// Sum of fuel quantities over all entries, L.
    pub total_liters: f64,
    /// Sum of amounts paid over all entries.
    pub total_cost: f64,
    /// Number of fuel-log entries, regardless of segment validity.
    pub total_fill_ups: u64,
    /// Best single-segment economy, km/L.
    pub best_fuel_economy: Option<f64>,
    /// Worst single-segment economy, km/L.
    pub worst_fuel_economy: Option<f64>,
}

struct Segment {
    distance: f64,
    liters: f64,
    cost: f64,
    km_per_liter: f64,
}

impl FuelStatistics {
    /// Computes the statistics for one car's fuel-log history.
    ///
    /// The input may be in any order; entries are sorted by odometer
    /// internally (stable, ties keep their input order).
    pub fn from_logs(logs: &[FuelLog]) -> Self {
        if logs.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<&FuelLog> = logs.iter().collect();
        sorted.sort_by(|a, b| a.odometer.total_cmp(&b.odometer));

        let total_cost = sorted.iter().map(|log| log.amount_paid).sum();
        let total_liters = sorted.iter().map(|log| log.quantity).sum();
        let total_fill_ups = sorted.len() as u64;

        let segments: Vec<Segment> = sorted
            .windows(2)
            .filter_map(|pair| {
                let (prev, curr) = (pair[0], pair[1]);
                let distance = curr.odometer - prev.odometer;
                (distance > 0.0 && curr.quantity > 0.0).then(|| Segment {
                    distance,
                    liters: curr.quantity,
                    cost: curr.amount_paid,
                    km_per_liter: distance / curr.quantity,
                })
            })
            .collect();

        let total_distance: f64 = segments.iter().map(|seg| seg.distance).sum();
        let segment_liters: f64 = segments.iter().map(|seg| seg.liters).sum();
        let segment_cost: f64 = segments.iter().map(|seg| seg.cost).sum();

        let mut stats = Self {
            total_distance,
            total_liters,
            total_cost,
            total_fill_ups,
            ..Self::default()
        };

        if total_distance > 0.0 && segment_liters > 0.0 {
            stats.avg_km_per_liter = Some(total_distance / segment_liters);
            stats.avg_liters_per_100km = Some(segment_liters / total_distance * 100.0);

            if segment_cost > 0.0 {
                stats.avg_cost_per_100km = Some(segment_cost / total_distance * 100.0);
                stats.avg_cost_per_km = Some(segment_cost / total_distance);
            }
        }

        if total_liters > 0.0 {
            stats.avg_cost_per_liter = Some(total_cost / total_liters);
        }

        if !segments.is_empty() {
            stats.best_fuel_economy = segments
                .iter()
                .map(|seg| seg.km_per_liter)
                .reduce(f64::max);
            stats.worst_fuel_economy = segments
                .iter()
                .map(|seg| seg.km_per_liter)
                .reduce(f64::min);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn log(odometer: f64, quantity: f64, amount_paid: f64) -> FuelLog {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        FuelLog::new(
            Uuid::nil(),
            now,
            amount_paid,
            quantity,
            odometer,
            String::new(),
            String::new(),
            now,
        )
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a computed ratio");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_history_has_zero_totals_and_no_ratios() {
        let stats = FuelStatistics::from_logs(&[]);

        assert_eq!(stats, FuelStatistics::default());
        assert_eq!(stats.total_fill_ups, 0);
        assert!(stats.avg_km_per_liter.is_none());
        assert!(stats.avg_cost_per_liter.is_none());
        assert!(stats.best_fuel_economy.is_none());
    }

    #[test]
    fn single_entry_counts_but_forms_no_segment() {
        let stats = FuelStatistics::from_logs(&[log(1000.0, 40.0, 50.0)]);

        assert_eq!(stats.total_fill_ups, 1);
        assert_eq!(stats.total_cost, 50.0);
        assert_eq!(stats.total_liters, 40.0);
        assert_eq!(stats.total_distance, 0.0);
        assert!(stats.avg_km_per_liter.is_none());
        assert!(stats.avg_liters_per_100km.is_none());
        assert!(stats.best_fuel_economy.is_none());
        assert!(stats.worst_fuel_economy.is_none());
        // Cost per liter uses the aggregate totals, so one entry is enough.
        assert_close(stats.avg_cost_per_liter, 1.25);
    }

    #[test]
    fn two_entry_example() {
        let stats = FuelStatistics::from_logs(&[log(1000.0, 40.0, 50.0), log(1500.0, 38.0, 48.0)]);

        assert_eq!(stats.total_fill_ups, 2);
        assert_eq!(stats.total_distance, 500.0);
        assert_close(stats.avg_km_per_liter, 500.0 / 38.0);
        assert_close(stats.avg_liters_per_100km, 7.6);
        assert_close(stats.avg_cost_per_100km, 9.6);
        assert_close(stats.avg_cost_per_km, 0.096);
        assert_close(stats.avg_cost_per_liter, 98.0 / 78.0);
        assert_close(stats.best_fuel_economy, 500.0 / 38.0);
        assert_close(stats.worst_fuel_economy, 500.0 / 38.0);
    }

    #[test]
    fn strictly_increasing_history_uses_every_adjacent_pair() {
        let logs = vec![
            log(1000.0, 40.0, 50.0),
            log(1400.0, 35.0, 44.0),
            log(1900.0, 42.0, 52.0),
            log(2300.0, 30.0, 39.0),
        ];
        let stats = FuelStatistics::from_logs(&logs);

        // Three segments out of four entries, covering the whole span.
        assert_eq!(stats.total_distance, 1300.0);
        assert_eq!(stats.total_fill_ups, 4);
        let best = stats.best_fuel_economy.unwrap();
        let worst = stats.worst_fuel_economy.unwrap();
        assert!(best >= worst);
        assert_close(Some(best), 400.0 / 30.0);
        assert_close(Some(worst), 400.0 / 35.0);
    }

    #[test]
    fn out_of_order_entries_still_count_toward_totals() {
        let stats = FuelStatistics::from_logs(&[log(100.0, 5.0, 10.0), log(80.0, 3.0, 6.0)]);

        // After sorting, the pair (80 -> 100) is a valid segment; totals
        // include both entries either way.
        assert_eq!(stats.total_fill_ups, 2);
        assert_eq!(stats.total_cost, 16.0);
        assert_eq!(stats.total_liters, 8.0);
        assert_eq!(stats.total_distance, 20.0);
        assert_close(stats.avg_km_per_liter, 20.0 / 5.0);
    }

    #[test]
    fn duplicate_odometer_segment_is_dropped() {
        let stats = FuelStatistics::from_logs(&[
            log(1000.0, 40.0, 50.0),
            log(1000.0, 20.0, 25.0),
            log(1500.0, 38.0, 48.0),
        ]);

        // The zero-distance pair is excluded; the 1000 -> 1500 segment
        // survives and the duplicate still counts as a fill-up.
        assert_eq!(stats.total_fill_ups, 3);
        assert_eq!(stats.total_distance, 500.0);
        assert_eq!(stats.total_liters, 98.0);
        assert_close(stats.avg_km_per_liter, 500.0 / 38.0);
    }

    #[test]
    fn zero_quantity_never_becomes_a_denominator() {
        let stats = FuelStatistics::from_logs(&[
            log(1000.0, 40.0, 50.0),
            log(1500.0, 0.0, 0.0),
            log(2000.0, 38.0, 48.0),
        ]);

        // The 1000 -> 1500 segment has no fuel and is dropped; nothing in the
        // output may be NaN or infinite.
        assert_eq!(stats.total_distance, 500.0);
        assert_close(stats.avg_km_per_liter, 500.0 / 38.0);
        for ratio in [
            stats.avg_liters_per_100km,
            stats.avg_km_per_liter,
            stats.avg_cost_per_100km,
            stats.avg_cost_per_liter,
            stats.avg_cost_per_km,
            stats.best_fuel_economy,
            stats.worst_fuel_economy,
        ]
        .into_iter()
        .flatten()
        {
            assert!(ratio.is_finite());
        }
    }

    #[test]
    fn input_order_does_not_matter() {
        let logs = vec![
            log(1000.0, 40.0, 50.0),
            log(1400.0, 35.0, 44.0),
            log(1900.0, 42.0, 52.0),
        ];
        let mut shuffled = logs.clone();
        shuffled.reverse();
        shuffled.swap(0, 1);

        assert_eq!(
            FuelStatistics::from_logs(&logs),
            FuelStatistics::from_logs(&shuffled)
        );
    }

    #[test]
    fn recomputing_is_idempotent() {
        let logs = vec![log(1000.0, 40.0, 50.0), log(1500.0, 38.0, 48.0)];

        assert_eq!(
            FuelStatistics::from_logs(&logs),
            FuelStatistics::from_logs(&logs)
        );
    }

    #[test]
    fn fill_up_count_ignores_segment_filtering() {
        let logs = vec![
            log(500.0, 10.0, 12.0),
            log(500.0, 10.0, 12.0),
            log(400.0, 10.0, 12.0),
            log(600.0, 0.0, 0.0),
        ];
        let stats = FuelStatistics::from_logs(&logs);

        assert_eq!(stats.total_fill_ups, 4);
    }
}
