//! A window of one polarity (marks or gaps): the ring buffer, its
//! classification offset, the learned ratio table, and the glue that drives
//! them through k-means and the validator each time new data arrives.

use crate::config::MorseConfig;
use crate::error::{MorseError, Result};
use crate::kmeans;
use crate::ratio::RatioTable;
use crate::symbol::MorseSymbol;
use crate::unit_history::UnitHistory;
use crate::validator;
use crate::window::RingWindow;

pub struct ClassWindow {
    window: RingWindow,
    /// Count of samples (from the oldest) already turned into symbols.
    /// Advances only on a successful classification; an eviction below this
    /// offset means already-classified history was lost, which is fatal.
    offset: usize,
    k: usize,
    ratios: RatioTable,
}

impl ClassWindow {
    pub fn new(k: usize, capacity: usize, ratios: RatioTable) -> Self {
        ClassWindow {
            window: RingWindow::new(capacity),
            offset: 0,
            k,
            ratios,
        }
    }

    pub fn ratios(&self) -> &RatioTable {
        &self.ratios
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn last_mut(&mut self) -> Option<&mut f64> {
        self.window.last_mut()
    }

    /// Append `duration`, evicting the oldest sample first once full. An
    /// eviction that would cross into still-unclassified history can never
    /// happen by construction (eviction only removes the oldest element,
    /// and `offset` only ever points at already-classified entries), but an
    /// eviction that reaches into the *classified* prefix shrinks `offset`
    /// to keep it aligned with the remaining data; if there's nothing left
    /// of the classified prefix to give up, the window has lost data the
    /// caller already emitted symbols for, which is unrecoverable.
    pub fn append(&mut self, duration: f64) -> Result<()> {
        let evicted = self.window.append(duration);
        if evicted {
            if self.offset == 0 {
                return Err(MorseError::missing_variation());
            }
            self.offset -= 1;
        }
        Ok(())
    }

    /// Attempt to cluster and classify the run once it's reached `min_len`.
    /// Returns newly classified symbols in window order, oldest first, or an
    /// empty vec if there isn't enough data yet, the k-means retries were
    /// exhausted, or the validator rejected the centroid spread.
    pub fn try_classify(
        &mut self,
        config: &MorseConfig,
        unit_history: &mut UnitHistory,
    ) -> Vec<MorseSymbol> {
        if self.window.len() < config.min_len {
            return vec![];
        }

        let xs = self.window.to_vec();
        let (centroids, labels) = match kmeans::stable_kmeans(&xs, self.k, config.cluster_iter) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::debug!(error = %e, "window not ready: k-means did not converge");
                return vec![];
            }
        };

        if !validator::validate(&centroids, config.mean_min_diff, config.mean_max_diff) {
            tracing::debug!("window not ready: centroid spread rejected by validator");
            return vec![];
        }

        let unit = centroids.iter().cloned().fold(f64::MAX, f64::min);
        tracing::debug!(k = self.k, ?centroids, unit, "clustering attempt accepted");
        let sorted_tags = self.ratios.tags_by_mean_ascending();
        let mut sorted_centroids = centroids.clone();
        sorted_centroids.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (tag, &centroid) in sorted_tags.iter().zip(sorted_centroids.iter()) {
            self.ratios.observe(*tag, centroid / unit);
        }
        unit_history.push(unit);

        let tag_of_label: Vec<MorseSymbol> = centroids
            .iter()
            .map(|&c| self.ratios.nearest_tag(c / unit))
            .collect();

        let new_symbols: Vec<MorseSymbol> = labels[self.offset..]
            .iter()
            .map(|&label| tag_of_label[label])
            .collect();
        self.offset = labels.len();
        new_symbols
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn push_all(cw: &mut ClassWindow, xs: &[f64]) {
        for &x in xs {
            cw.append(x).unwrap();
        }
    }

    #[test]
    fn below_min_len_yields_nothing() {
        let mut cw = ClassWindow::new(2, 36, RatioTable::marks_default());
        let mut history = UnitHistory::new(36, 300.0);
        let config = MorseConfig {
            min_len: 12,
            ..MorseConfig::default()
        };
        push_all(&mut cw, &[300.0; 5]);
        assert!(cw.try_classify(&config, &mut history).is_empty());
    }

    #[test]
    fn classifies_a_ready_window_of_dots_and_dashes() {
        let mut cw = ClassWindow::new(2, 36, RatioTable::marks_default());
        let mut history = UnitHistory::new(36, 300.0);
        let config = MorseConfig::default();

        let mut xs = Vec::new();
        for i in 0..12 {
            xs.push(if i % 2 == 0 { 300.0 } else { 900.0 });
        }
        push_all(&mut cw, &xs);

        let symbols = cw.try_classify(&config, &mut history);
        assert_eq!(symbols.len(), 12);
        assert_eq!(symbols[0], MorseSymbol::Dot);
        assert_eq!(symbols[1], MorseSymbol::Dash);
        assert!(history.is_learned());
    }
}
