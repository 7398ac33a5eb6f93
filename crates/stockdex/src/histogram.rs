//! Return-distribution histogram with VaR tail marking
//!
//! Buckets span `[min, max]` of the returns in equal widths. A bucket is in
//! the tail when its midpoint lies below the VaR threshold, so tail buckets
//! always form a prefix of the output.

use serde::{Deserialize, Serialize};

/// Default number of buckets
pub const DEFAULT_BIN_COUNT: usize = 40;

/// Bucket width used when every return is identical
pub const ZERO_SPAN_BIN_WIDTH: f64 = 1e-4;

/// One histogram bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub bin_start: f64,
    pub bin_end: f64,
    pub count: usize,
    pub midpoint: f64,
    pub is_tail: bool,
}

impl Bucket {
    /// Axis label: bucket start as a percentage, one decimal
    pub fn label(&self) -> String {
        format!("{:.1}%", self.bin_start * 100.0)
    }
}

/// Bucket the returns; empty when there is nothing to bin
///
/// Non-finite returns are ignored. The maximum is clamped into the last
/// bucket rather than spilling past it.
pub fn bin(returns: &[f64], var_threshold: f64, bin_count: usize) -> Vec<Bucket> {
    Histogram::build(returns, var_threshold, bin_count)
        .map(|h| h.buckets)
        .unwrap_or_default()
}

/// Bucketed returns plus the parameters they were built with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub buckets: Vec<Bucket>,
    pub bin_size: f64,
    pub var_threshold: f64,
    /// Number of finite returns binned
    pub sample_count: usize,
}

impl Histogram {
    /// Build from scratch; `None` for no finite returns or zero buckets
    pub fn build(returns: &[f64], var_threshold: f64, bin_count: usize) -> Option<Self> {
        if bin_count == 0 {
            return None;
        }

        let finite: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
        let min = finite.iter().copied().reduce(f64::min)?;
        let max = finite.iter().copied().reduce(f64::max)?;

        let span = max - min;
        let bin_size = if span > 0.0 {
            span / bin_count as f64
        } else {
            ZERO_SPAN_BIN_WIDTH
        };

        let mut buckets: Vec<Bucket> = (0..bin_count)
            .map(|i| {
                let bin_start = min + i as f64 * bin_size;
                let midpoint = bin_start + bin_size / 2.0;
                Bucket {
                    bin_start,
                    bin_end: min + (i + 1) as f64 * bin_size,
                    count: 0,
                    midpoint,
                    is_tail: midpoint < var_threshold,
                }
            })
            .collect();

        let last = bin_count - 1;
        for value in &finite {
            let index = ((value - min) / bin_size).floor() as usize;
            buckets[index.min(last)].count += 1;
        }

        Some(Self {
            buckets,
            bin_size,
            var_threshold,
            sample_count: finite.len(),
        })
    }

    /// Index of the bucket where the VaR line is drawn
    ///
    /// This is the first tail bucket. `None` when the threshold lies below
    /// every bucket.
    pub fn var_marker(&self) -> Option<usize> {
        self.buckets.iter().position(|b| b.is_tail)
    }

    /// Number of returns in tail buckets
    pub fn tail_count(&self) -> usize {
        self.buckets
            .iter()
            .filter(|b| b.is_tail)
            .map(|b| b.count)
            .sum()
    }

    /// Largest bucket count, for scaling bars
    pub fn peak(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}
