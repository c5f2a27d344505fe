//! Merges consecutive same-polarity samples before they ever reach a window:
//! a keying stream sampled faster than it transitions otherwise fragments a
//! single dash into several same-polarity readings.

use crate::classifier::ClassWindow;
use crate::error::Result;
use crate::symbol::Sample;

#[derive(Default)]
pub struct Coalescer {
    last: Option<Sample>,
}

impl Coalescer {
    pub fn new() -> Self {
        Coalescer { last: None }
    }

    /// Feed one sample into the window matching its polarity, merging with
    /// the previous sample in place if it shares the same polarity. A sample
    /// that flips polarity but is shorter than `noise_ratio * unit` is
    /// treated as a glitch rather than a real transition: it's folded into
    /// the *previous* sample instead, so a single spurious blip doesn't turn
    /// one long mark or gap into three short ones. Returns the (possibly
    /// merged) sample as it now stands in the window.
    pub fn feed(
        &mut self,
        sample: Sample,
        marks: &mut ClassWindow,
        gaps: &mut ClassWindow,
        unit: f64,
        noise_ratio: f64,
    ) -> Result<Sample> {
        let (is_mark, duration) = sample;

        if let Some((last_mark, last_duration)) = self.last {
            if last_mark != is_mark && duration < noise_ratio * unit {
                let window = if last_mark { marks } else { gaps };
                let total = last_duration + duration;
                if let Some(slot) = window.last_mut() {
                    *slot = total;
                }
                let merged = (last_mark, total);
                self.last = Some(merged);
                return Ok(merged);
            }
        }

        let window = if is_mark { marks } else { gaps };
        let merged = match self.last {
            Some((last_mark, last_duration)) if last_mark == is_mark => {
                let total = duration + last_duration;
                if let Some(slot) = window.last_mut() {
                    *slot = total;
                }
                (is_mark, total)
            }
            _ => {
                window.append(duration)?;
                (is_mark, duration)
            }
        };

        self.last = Some(merged);
        Ok(merged)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ratio::RatioTable;

    #[test]
    fn merges_consecutive_same_polarity_samples() {
        let mut marks = ClassWindow::new(2, 36, RatioTable::marks_default());
        let mut gaps = ClassWindow::new(3, 36, RatioTable::gaps_default());
        let mut c = Coalescer::new();

        let r1 = c.feed((true, 100.0), &mut marks, &mut gaps, 100.0, 0.1).unwrap();
        assert_eq!(r1, (true, 100.0));
        let r2 = c.feed((true, 50.0), &mut marks, &mut gaps, 100.0, 0.1).unwrap();
        assert_eq!(r2, (true, 150.0));
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn different_polarity_starts_a_new_entry() {
        let mut marks = ClassWindow::new(2, 36, RatioTable::marks_default());
        let mut gaps = ClassWindow::new(3, 36, RatioTable::gaps_default());
        let mut c = Coalescer::new();

        c.feed((true, 100.0), &mut marks, &mut gaps, 100.0, 0.1).unwrap();
        c.feed((false, 300.0), &mut marks, &mut gaps, 100.0, 0.1).unwrap();
        assert_eq!(marks.len(), 1);
        assert_eq!(gaps.len(), 1);
    }

    #[test]
    fn a_glitch_shorter_than_noise_ratio_folds_into_the_previous_sample() {
        let mut marks = ClassWindow::new(2, 36, RatioTable::marks_default());
        let mut gaps = ClassWindow::new(3, 36, RatioTable::gaps_default());
        let mut c = Coalescer::new();

        // unit = 100, noise_ratio = 0.1 -> anything under 10 is a glitch.
        c.feed((true, 100.0), &mut marks, &mut gaps, 100.0, 0.1).unwrap();
        let r = c.feed((false, 5.0), &mut marks, &mut gaps, 100.0, 0.1).unwrap();
        assert_eq!(r, (true, 105.0));
        assert_eq!(marks.len(), 1);
        assert_eq!(gaps.len(), 0);

        // A later, properly sized gap still starts its own entry.
        c.feed((false, 300.0), &mut marks, &mut gaps, 100.0, 0.1).unwrap();
        assert_eq!(gaps.len(), 1);
    }
}
