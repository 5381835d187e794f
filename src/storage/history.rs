//! Bounded history of byte rates feeding the chart.

use std::collections::VecDeque;
use std::collections::vec_deque;

/// Default number of samples kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 4096;

/// One history entry, bytes per second in each direction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatePoint {
    pub rx: f64,
    pub tx: f64,
}

/// Ring buffer of rate points, oldest first.
///
/// Once full, every append evicts the oldest point.
#[derive(Debug, Clone)]
pub struct RateHistory {
    points: VecDeque<RatePoint>,
    capacity: usize,
}

impl Default for RateHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl RateHistory {
    /// Creates an empty history. A capacity of 0 is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, rx: f64, tx: f64) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(RatePoint { rx, tx });
    }

    /// The most recent `n` points (fewer if the history is shorter), oldest
    /// first.
    pub fn recent(&self, n: usize) -> vec_deque::Iter<'_, RatePoint> {
        let start = self.points.len().saturating_sub(n);
        self.points.range(start..)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_returns_chronological_tail() {
        let mut history = RateHistory::new(8);
        for i in 0..5 {
            history.append(i as f64, (i * 10) as f64);
        }

        let rx: Vec<f64> = history.recent(3).map(|p| p.rx).collect();
        assert_eq!(rx, vec![2.0, 3.0, 4.0]);
        let tx: Vec<f64> = history.recent(3).map(|p| p.tx).collect();
        assert_eq!(tx, vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_recent_more_than_len() {
        let mut history = RateHistory::new(8);
        history.append(1.0, 2.0);
        assert_eq!(history.recent(100).len(), 1);
        assert_eq!(RateHistory::new(8).recent(5).len(), 0);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let capacity = 16;
        let extra = 5;
        let mut history = RateHistory::new(capacity);
        for i in 0..capacity + extra {
            history.append(i as f64, 0.0);
            assert!(history.len() <= capacity);
        }

        assert_eq!(history.len(), capacity);
        let rx: Vec<f64> = history.recent(capacity).map(|p| p.rx).collect();
        let expected: Vec<f64> = (extra..capacity + extra).map(|i| i as f64).collect();
        assert_eq!(rx, expected);
    }

    #[test]
    fn test_recent_does_not_consume() {
        let mut history = RateHistory::new(4);
        history.append(1.0, 1.0);
        history.append(2.0, 2.0);
        let _ = history.recent(2).count();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_zero_capacity() {
        let mut history = RateHistory::new(0);
        history.append(1.0, 1.0);
        history.append(2.0, 2.0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.recent(1).next(), Some(&RatePoint { rx: 2.0, tx: 2.0 }));
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(RateHistory::default().capacity(), DEFAULT_HISTORY_CAPACITY);
        assert!(RateHistory::default().is_empty());
    }
}
