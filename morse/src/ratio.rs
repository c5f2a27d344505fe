//! Running mean-ratio table: for each symbol tag, the mean of
//! `centroid / unit` observed across every window this session has clustered.

use std::collections::HashMap;

use crate::symbol::MorseSymbol;

/// Accumulates `(sum, count)` per tag so the mean can be derived lazily and
/// cheaply updated one observation at a time, without rescanning history.
#[derive(Clone, Debug)]
pub struct RatioTable {
    entries: HashMap<MorseSymbol, (f64, u64)>,
}

impl RatioTable {
    /// Seed marks with the textbook 1:3 dot:dash ratio, so the classifier has
    /// something sane to assign against before the first window clusters.
    pub fn marks_default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(MorseSymbol::Dot, (1.0, 1));
        entries.insert(MorseSymbol::Dash, (3.0, 1));
        RatioTable { entries }
    }

    /// Seed gaps with the textbook 1:3:7 intra/short/medium ratio.
    pub fn gaps_default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(MorseSymbol::IntraGap, (1.0, 1));
        entries.insert(MorseSymbol::ShortGap, (3.0, 1));
        entries.insert(MorseSymbol::MediumGap, (7.0, 1));
        RatioTable { entries }
    }

    pub fn mean(&self, tag: MorseSymbol) -> f64 {
        let (sum, count) = self.entries[&tag];
        sum / count as f64
    }

    /// Tags in this table, sorted by their current mean ratio (ascending).
    pub fn tags_by_mean_ascending(&self) -> Vec<MorseSymbol> {
        let mut tags: Vec<MorseSymbol> = self.entries.keys().copied().collect();
        tags.sort_by(|a, b| self.mean(*a).partial_cmp(&self.mean(*b)).unwrap());
        tags
    }

    pub fn observe(&mut self, tag: MorseSymbol, ratio: f64) {
        let entry = self.entries.entry(tag).or_insert((0.0, 0));
        entry.0 += ratio;
        entry.1 += 1;
    }

    /// The tag whose current mean ratio is numerically closest to `ratio`.
    pub fn nearest_tag(&self, ratio: f64) -> MorseSymbol {
        self.entries
            .iter()
            .min_by(|(_, (s1, c1)), (_, (s2, c2))| {
                let m1 = s1 / *c1 as f64;
                let m2 = s2 / *c2 as f64;
                (ratio - m1).abs().partial_cmp(&(ratio - m2).abs()).unwrap()
            })
            .map(|(tag, _)| *tag)
            .expect("ratio table is never empty")
    }

    pub fn max_mean(&self) -> f64 {
        self.entries
            .keys()
            .map(|t| self.mean(*t))
            .fold(f64::MIN, f64::max)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_seed_textbook_ratios() {
        let marks = RatioTable::marks_default();
        assert_eq!(marks.mean(MorseSymbol::Dot), 1.0);
        assert_eq!(marks.mean(MorseSymbol::Dash), 3.0);

        let gaps = RatioTable::gaps_default();
        assert_eq!(gaps.max_mean(), 7.0);
    }

    #[test]
    fn observe_shifts_the_running_mean() {
        let mut marks = RatioTable::marks_default();
        marks.observe(MorseSymbol::Dash, 5.0);
        assert_eq!(marks.mean(MorseSymbol::Dash), 4.0);
    }

    #[test]
    fn nearest_tag_picks_closest_mean() {
        let gaps = RatioTable::gaps_default();
        assert_eq!(gaps.nearest_tag(1.2), MorseSymbol::IntraGap);
        assert_eq!(gaps.nearest_tag(6.5), MorseSymbol::MediumGap);
    }

    #[test]
    fn tags_sorted_ascending_by_mean() {
        let gaps = RatioTable::gaps_default();
        assert_eq!(
            gaps.tags_by_mean_ascending(),
            vec![
                MorseSymbol::IntraGap,
                MorseSymbol::ShortGap,
                MorseSymbol::MediumGap
            ]
        );
    }
}
