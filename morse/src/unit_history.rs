//! Bounded history of accepted unit lengths, used as the "current unit" by
//! the long-pause detector and as the encoder's default pacing when nothing
//! has been learned yet.

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct UnitHistory {
    history: VecDeque<f64>,
    capacity: usize,
    fallback: f64,
}

impl UnitHistory {
    pub fn new(capacity: usize, fallback: f64) -> Self {
        UnitHistory {
            history: VecDeque::with_capacity(capacity),
            capacity,
            fallback,
        }
    }

    pub fn push(&mut self, unit: f64) {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(unit);
    }

    /// The mean of every accepted unit still in history, or the configured
    /// fallback if clustering hasn't yet produced one.
    pub fn current(&self) -> f64 {
        if self.history.is_empty() {
            self.fallback
        } else {
            self.history.iter().sum::<f64>() / self.history.len() as f64
        }
    }

    pub fn is_learned(&self) -> bool {
        !self.history.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn falls_back_before_anything_learned() {
        let h = UnitHistory::new(4, 300.0);
        assert_eq!(h.current(), 300.0);
        assert!(!h.is_learned());
    }

    #[test]
    fn averages_and_evicts_past_capacity() {
        let mut h = UnitHistory::new(2, 300.0);
        h.push(100.0);
        h.push(200.0);
        assert_eq!(h.current(), 150.0);
        h.push(300.0);
        assert_eq!(h.current(), 250.0);
        assert!(h.is_learned());
    }
}
