use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;

use super::history::{RateHistory, RateSample, epoch_day};
use super::model::{BASE_CURRENCY, RateTable};

#[derive(Clone, Debug, Deserialize)]
struct RawRateTable {
    #[serde(default, rename = "base_code")]
    base_code: Option<String>,
    #[serde(rename = "conversion_rates")]
    conversion_rates: BTreeMap<String, f64>,
}

pub(super) fn parse_rate_table(raw: &str) -> Result<RateTable> {
    let parsed: RawRateTable =
        serde_json::from_str(raw).context("invalid rate table JSON")?;

    let base = parsed
        .base_code
        .unwrap_or_else(|| BASE_CURRENCY.to_owned());
    let mut rates = BTreeMap::new();
    for (code, rate) in parsed.conversion_rates {
        if code == base {
            continue;
        }
        rates.insert(code, rate as f32);
    }

    RateTable::new(base, rates)
}

#[derive(Clone, Debug, Deserialize)]
struct RawHistoryPoint {
    date: String,
    rate: f64,
}

pub(super) fn parse_history(raw: &str, currency: &str) -> Result<RateHistory> {
    let points: Vec<RawHistoryPoint> =
        serde_json::from_str(raw).context("invalid rate history JSON")?;

    if points.is_empty() {
        bail!("rate history for {currency} contains no points");
    }

    let mut samples = Vec::with_capacity(points.len());
    for point in points {
        let date = NaiveDate::parse_from_str(&point.date, "%Y-%m-%d")
            .with_context(|| format!("invalid ISO-8601 date {:?}", point.date))?;
        if !point.rate.is_finite() || point.rate <= 0.0 {
            bail!(
                "rate for {currency} on {date} is not a positive finite number: {}",
                point.rate
            );
        }

        samples.push(RateSample {
            day: epoch_day(date),
            rate: point.rate as f32,
        });
    }
    samples.sort_by(|a, b| a.day.total_cmp(&b.day));

    Ok(RateHistory {
        currency: currency.to_owned(),
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_exchangerate_api_shape() {
        let raw = r#"{
            "base_code": "USD",
            "conversion_rates": {"USD": 1.0, "EUR": 0.93, "JPY": 157.5}
        }"#;

        let table = parse_rate_table(raw).unwrap();
        assert_eq!(table.base, "USD");
        assert_eq!(table.rate("EUR"), Some(0.93));
        // The base entry is implicit, not stored.
        assert_eq!(table.rate_count(), 2);
    }

    #[test]
    fn rejects_non_positive_table_rates() {
        let raw = r#"{"conversion_rates": {"EUR": -0.93}}"#;
        assert!(parse_rate_table(raw).is_err());
    }

    #[test]
    fn parses_and_sorts_history_points() {
        let raw = r#"[
            {"date": "2026-08-03", "rate": 0.95},
            {"date": "2026-08-01", "rate": 0.93},
            {"date": "2026-08-02", "rate": 0.94}
        ]"#;

        let history = parse_history(raw, "EUR").unwrap();
        assert_eq!(history.currency, "EUR");
        assert_eq!(history.samples.len(), 3);
        for window in history.samples.windows(2) {
            assert!(window[0].day < window[1].day);
        }
        assert_eq!(history.samples[0].rate, 0.93);
    }

    #[test]
    fn rejects_malformed_history() {
        assert!(parse_history("[]", "EUR").is_err());
        assert!(parse_history(r#"[{"date": "yesterday", "rate": 1.0}]"#, "EUR").is_err());
        assert!(parse_history(r#"[{"date": "2026-08-01", "rate": 0.0}]"#, "EUR").is_err());
    }
}
