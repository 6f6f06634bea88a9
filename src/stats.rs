use std::error::Error;
use std::fmt;

use crate::scheduler::SimulationResult;

/// Lower edge of each histogram column, as printed.
pub const BUCKET_LABELS: [u32; 7] = [1, 10, 100, 500, 1000, 5000, 10000];
const BUCKET_UPPER: [f64; 7] = [10.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0, f64::INFINITY];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    /// Nothing completed before the horizon, so mean and deviation are undefined.
    NoData,
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::NoData => f.write_str("no requests completed before the horizon"),
        }
    }
}

impl Error for StatsError {}

/// Latency counts per fixed bucket, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    pub counts: [usize; 7],
}

impl Histogram {
    /// A latency lands in the first bucket whose upper bound is strictly
    /// greater than it.
    pub fn bucket_of(latency: f64) -> usize {
        BUCKET_UPPER
            .iter()
            .position(|&upper| latency < upper)
            .unwrap_or(BUCKET_UPPER.len() - 1)
    }

    pub fn from_latencies(latencies: &[f64]) -> Histogram {
        let mut counts = [0; 7];
        for &latency in latencies {
            counts[Histogram::bucket_of(latency)] += 1;
        }
        Histogram { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub processed: usize,
    /// Length of the replayed workload.
    pub total: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub max_queue_len: usize,
    pub idle_time: f64,
    pub utilization: f64,
    pub head_movement: u64,
    pub histogram: Histogram,
}

impl Summary {
    pub fn from_result(result: &SimulationResult, total: usize) -> Result<Summary, StatsError> {
        let latencies = &result.latencies;
        if result.total_processed == 0 || latencies.is_empty() {
            return Err(StatsError::NoData);
        }

        let n = latencies.len() as f64;
        let min = latencies.iter().copied().fold(f64::INFINITY, f64::min);
        let max = latencies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = latencies.iter().sum::<f64>() / n;
        let variance = latencies.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;

        Ok(Summary {
            processed: result.total_processed,
            total,
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            max_queue_len: result.max_queue_len,
            idle_time: result.idle_time,
            utilization: result.busy_time / (result.busy_time + result.idle_time),
            head_movement: result.head_movement,
            histogram: Histogram::from_latencies(latencies),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result_with(latencies: Vec<f64>) -> SimulationResult {
        SimulationResult {
            total_processed: latencies.len(),
            busy_time: 30.0,
            idle_time: 10.0,
            latencies,
            ..SimulationResult::default()
        }
    }

    #[test]
    fn summary_of_known_samples() {
        let samples = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = Summary::from_result(&result_with(samples), 10).unwrap();
        assert_eq!(summary.processed, 8);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.std_dev, 2.0);
        assert_eq!(summary.utilization, 0.75);
    }

    #[test]
    fn empty_result_is_no_data() {
        let err = Summary::from_result(&SimulationResult::default(), 3).unwrap_err();
        assert_eq!(err, StatsError::NoData);
    }

    #[test]
    fn bucket_edges_go_up() {
        assert_eq!(Histogram::bucket_of(0.4), 0);
        assert_eq!(Histogram::bucket_of(9.99), 0);
        assert_eq!(Histogram::bucket_of(10.0), 1);
        assert_eq!(Histogram::bucket_of(500.0), 3);
        assert_eq!(Histogram::bucket_of(9999.0), 5);
        assert_eq!(Histogram::bucket_of(10000.0), 6);
        assert_eq!(Histogram::bucket_of(1.0e9), 6);
    }

    proptest! {
        #[test]
        fn histogram_counts_every_sample(latencies in prop::collection::vec(0.0f64..50_000.0, 1..200)) {
            let result = result_with(latencies);
            let summary = Summary::from_result(&result, result.total_processed).unwrap();
            prop_assert_eq!(summary.histogram.total(), result.total_processed);
            prop_assert!(summary.min - 1e-6 <= summary.mean && summary.mean <= summary.max + 1e-6);
            prop_assert!(summary.std_dev >= 0.0);
        }
    }
}
