#![forbid(unsafe_code)]

use std::collections::VecDeque;

/// Rolling window of measured download bandwidth samples.
#[derive(Clone, Debug)]
pub struct BandwidthHistory {
    samples: VecDeque<u64>,
    capacity: usize,
    sum: u128,
}

impl BandwidthHistory {
    pub const DEFAULT_WINDOW: usize = 16;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0,
        }
    }

    pub fn push(&mut self, bps: u64) {
        while self.samples.len() >= self.capacity {
            let Some(evicted) = self.samples.pop_front() else {
                break;
            };
            self.sum -= u128::from(evicted);
        }
        self.samples.push_back(bps);
        self.sum += u128::from(bps);
    }

    /// Mean of the samples in the window, `None` before the first sample.
    #[expect(clippy::cast_possible_truncation)] // mean of u64 samples fits u64
    pub fn average_bps(&self) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }
        Some((self.sum / self.samples.len() as u128) as u64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.sum = 0;
    }
}

impl Default for BandwidthHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn empty_has_no_average() {
        assert_eq!(BandwidthHistory::default().average_bps(), None);
    }

    #[rstest]
    #[case(4, &[1_000_000], 1_000_000)]
    #[case(4, &[1_000_000, 3_000_000], 2_000_000)]
    #[case(2, &[9_000_000, 1_000_000, 3_000_000], 2_000_000)]
    #[case(1, &[5, 7], 7)]
    fn average_over_window(#[case] window: usize, #[case] samples: &[u64], #[case] expected: u64) {
        let mut history = BandwidthHistory::new(window);
        for &bps in samples {
            history.push(bps);
        }
        assert_eq!(history.average_bps(), Some(expected));
        assert!(history.len() <= window);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = BandwidthHistory::new(0);
        history.push(10);
        history.push(20);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.average_bps(), Some(20));
    }

    #[test]
    fn large_samples_do_not_overflow() {
        let mut history = BandwidthHistory::new(3);
        for _ in 0..3 {
            history.push(u64::MAX);
        }
        assert_eq!(history.average_bps(), Some(u64::MAX));
    }

    #[test]
    fn clear_resets() {
        let mut history = BandwidthHistory::new(3);
        history.push(100);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.average_bps(), None);
    }
}
