//! Sample histograms and percentile lookup for 8-bit frames.
//!
//! Percentiles follow the "linear" definition: the value at fractional rank
//! `p / 100 * (n - 1)` of the sorted samples, interpolated between the two
//! closest ranks. Working from a 256-bin histogram avoids sorting the whole
//! buffer.

/// Counts of every 8-bit sample value.
#[derive(Debug, Clone)]
pub struct SampleHistogram {
    /// Number of samples per value (256 bins).
    pub bins: [u64; 256],
    /// Total number of samples counted.
    pub total: u64,
}

impl Default for SampleHistogram {
    fn default() -> Self {
        Self {
            bins: [0; 256],
            total: 0,
        }
    }
}

impl SampleHistogram {
    /// Count every sample (all channels together).
    ///
    /// # Example
    /// ```
    /// use utpnerves_core::histogram::SampleHistogram;
    ///
    /// let hist = SampleHistogram::from_samples(&[0, 0, 255]);
    /// assert_eq!(hist.bins[0], 2);
    /// assert_eq!(hist.total, 3);
    /// ```
    pub fn from_samples(samples: &[u8]) -> Self {
        let mut hist = Self::default();
        for &s in samples {
            hist.bins[s as usize] += 1;
        }
        hist.total = samples.len() as u64;
        hist
    }

    /// Value of the `rank`-th smallest sample (0-based).
    ///
    /// Returns `None` when `rank` is past the last sample.
    pub fn value_at_rank(&self, rank: u64) -> Option<u8> {
        if rank >= self.total {
            return None;
        }
        let mut seen = 0u64;
        for (value, &count) in self.bins.iter().enumerate() {
            seen += count;
            if seen > rank {
                return Some(value as u8);
            }
        }
        None
    }

    /// Linear-interpolated percentile in sample units (0.0 to 255.0).
    ///
    /// `pct` is clamped to `[0, 100]`. Returns `None` for an empty histogram.
    pub fn percentile(&self, pct: f64) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let pct = pct.clamp(0.0, 100.0);
        let rank = pct / 100.0 * (self.total - 1) as f64;
        let lower = rank.floor();
        let frac = rank - lower;

        let lo = self.value_at_rank(lower as u64)? as f64;
        if frac == 0.0 {
            return Some(lo);
        }
        let hi = self.value_at_rank(lower as u64 + 1)? as f64;
        Some(lo + (hi - lo) * frac)
    }

    /// Smallest and largest sample values present.
    pub fn min_max(&self) -> Option<(u8, u8)> {
        let min = self.bins.iter().position(|&c| c > 0)?;
        let max = self.bins.iter().rposition(|&c| c > 0)?;
        Some((min as u8, max as u8))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: percentiles stay within the observed sample range.
        #[test]
        fn prop_percentile_within_min_max(
            samples in prop::collection::vec(any::<u8>(), 1..500),
            pct in 0.0f64..=100.0,
        ) {
            let hist = SampleHistogram::from_samples(&samples);
            let (min, max) = hist.min_max().unwrap();
            let p = hist.percentile(pct).unwrap();
            prop_assert!(p >= min as f64 && p <= max as f64);
        }

        /// Property: percentiles are monotonic in `pct`.
        #[test]
        fn prop_percentile_monotonic(
            samples in prop::collection::vec(any::<u8>(), 1..500),
            a in 0.0f64..=100.0,
            b in 0.0f64..=100.0,
        ) {
            let hist = SampleHistogram::from_samples(&samples);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(hist.percentile(lo).unwrap() <= hist.percentile(hi).unwrap());
        }
    }
}
