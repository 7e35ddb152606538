use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

use crate::util::stable_unit;

/// Days between 0001-01-01 (chrono's common-era origin) and 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One historical observation: rate on a given epoch day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateSample {
    pub day: f64,
    pub rate: f32,
}

/// Per-currency history, sorted ascending by day.
#[derive(Clone, Debug)]
pub struct RateHistory {
    pub currency: String,
    pub samples: Vec<RateSample>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("rate history for {0} has no samples")]
    Empty(String),
}

pub fn epoch_day(date: NaiveDate) -> f64 {
    (date.num_days_from_ce() - EPOCH_DAYS_FROM_CE) as f64
}

pub fn date_for_day(day: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32 + EPOCH_DAYS_FROM_CE)
}

impl RateHistory {
    /// Sample closest in time to `query_day`; ties go to the earlier sample.
    /// Queries outside the covered span clamp to the first/last sample.
    /// Samples must already be sorted ascending by day.
    pub fn nearest(&self, query_day: f64) -> Result<&RateSample, HistoryError> {
        if self.samples.is_empty() {
            return Err(HistoryError::Empty(self.currency.clone()));
        }

        let insertion = self
            .samples
            .partition_point(|sample| sample.day < query_day);

        if insertion == 0 {
            return Ok(&self.samples[0]);
        }
        let Some(after) = self.samples.get(insertion) else {
            return Ok(&self.samples[insertion - 1]);
        };

        let before = &self.samples[insertion - 1];
        if (query_day - before.day) <= (after.day - query_day) {
            Ok(before)
        } else {
            Ok(after)
        }
    }

    pub fn day_span(&self) -> Option<(f64, f64)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.day, last.day)),
            _ => None,
        }
    }

    pub fn max_rate(&self) -> f32 {
        self.samples
            .iter()
            .fold(0.0_f32, |max, sample| max.max(sample.rate))
    }
}

/// Deterministic stand-in for a historical rate feed: one sample per day over
/// the trailing `days`, the current rate modulated by a slow sine trend plus
/// per-day hash noise.
pub fn synthetic_history(
    currency: &str,
    anchor_rate: f32,
    end: NaiveDate,
    days: u64,
) -> RateHistory {
    let mut samples = Vec::with_capacity(days as usize + 1);
    for back in (0..=days).rev() {
        let date = end.checked_sub_days(Days::new(back)).unwrap_or(end);
        let noise = stable_unit(currency, back);
        let trend = ((back as f32) / 30.0).sin() * 0.1;
        let rate = anchor_rate * (0.85 + (noise * 0.3) + trend);
        samples.push(RateSample {
            day: epoch_day(date),
            rate,
        });
    }

    RateHistory {
        currency: currency.to_owned(),
        samples,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;

    fn history(days: &[f64]) -> RateHistory {
        RateHistory {
            currency: "EUR".to_owned(),
            samples: days
                .iter()
                .enumerate()
                .map(|(index, &day)| RateSample {
                    day,
                    rate: 10.0 * (index + 1) as f32,
                })
                .collect(),
        }
    }

    #[test]
    fn nearest_picks_closer_bracketing_sample() {
        let history = history(&[1.0, 5.0, 10.0]);
        let found = history.nearest(6.0).unwrap();
        assert_eq!(found.day, 5.0);
        assert_eq!(found.rate, 20.0);
    }

    #[test]
    fn nearest_breaks_ties_toward_earlier_sample() {
        let history = history(&[1.0, 5.0, 10.0]);
        assert_eq!(history.nearest(7.5).unwrap().day, 5.0);
        assert_eq!(history.nearest(3.0).unwrap().day, 1.0);
    }

    #[test]
    fn nearest_clamps_outside_the_span() {
        let history = history(&[1.0, 5.0, 10.0]);
        assert_eq!(history.nearest(-40.0).unwrap().day, 1.0);
        assert_eq!(history.nearest(99.0).unwrap().day, 10.0);
    }

    #[test]
    fn nearest_handles_duplicate_days() {
        let history = history(&[1.0, 5.0, 5.0, 10.0]);
        assert_eq!(history.nearest(5.0).unwrap().rate, 20.0);
    }

    #[test]
    fn empty_history_is_a_query_error() {
        let history = RateHistory {
            currency: "EUR".to_owned(),
            samples: Vec::new(),
        };
        assert!(matches!(history.nearest(3.0), Err(HistoryError::Empty(_))));
    }

    #[test]
    fn epoch_day_round_trips() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let day = epoch_day(date);
        assert_eq!(date_for_day(day), Some(date));
        assert_eq!(epoch_day(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0.0);
    }

    #[test]
    fn synthetic_history_is_sorted_positive_and_deterministic() {
        let end = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let first = synthetic_history("JPY", 157.5, end, 365);
        let second = synthetic_history("JPY", 157.5, end, 365);

        assert_eq!(first.samples.len(), 366);
        assert_eq!(first.samples, second.samples);
        assert_abs_diff_eq!(
            first.day_span().unwrap().1 - first.day_span().unwrap().0,
            365.0
        );
        for window in first.samples.windows(2) {
            assert!(window[0].day < window[1].day);
        }
        for sample in &first.samples {
            assert!(sample.rate > 0.0);
        }
    }

    proptest! {
        #[test]
        fn nearest_minimizes_absolute_distance(
            mut days in prop::collection::vec(0u32..4000, 1..40),
            query in 0u32..4000,
        ) {
            days.sort_unstable();
            let history = history(&days.iter().map(|&d| d as f64).collect::<Vec<_>>());
            let query = query as f64;
            let found = history.nearest(query).unwrap();
            for sample in &history.samples {
                prop_assert!(
                    (found.day - query).abs() <= (sample.day - query).abs()
                );
            }
        }
    }
}
