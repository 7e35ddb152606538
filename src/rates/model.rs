use std::collections::BTreeMap;

use anyhow::{Result, bail};

pub const BASE_CURRENCY: &str = "USD";

pub const DEFAULT_SATELLITES: [&str; 10] = [
    "JPY", "EUR", "GBP", "CAD", "CHF", "AUD", "CNY", "INR", "BRL", "MXN",
];

/// One-base rate table: how many units of each currency one unit of `base` buys.
#[derive(Clone, Debug)]
pub struct RateTable {
    pub base: String,
    pub rates: BTreeMap<String, f32>,
}

impl RateTable {
    pub fn new(base: impl Into<String>, rates: BTreeMap<String, f32>) -> Result<Self> {
        let base = base.into();
        if base.is_empty() {
            bail!("rate table has an empty base currency code");
        }

        for (code, rate) in &rates {
            if code.is_empty() {
                bail!("rate table contains an empty currency code");
            }
            if !rate.is_finite() || *rate <= 0.0 {
                bail!("rate for {code} is not a positive finite number: {rate}");
            }
        }

        Ok(Self { base, rates })
    }

    pub fn rate(&self, code: &str) -> Option<f32> {
        if code == self.base {
            return Some(1.0);
        }
        self.rates.get(code).copied()
    }

    pub fn rate_count(&self) -> usize {
        self.rates.len()
    }

    pub fn builtin_snapshot() -> Self {
        let pairs = [
            ("JPY", 157.5),
            ("EUR", 0.93),
            ("GBP", 0.79),
            ("CAD", 1.37),
            ("CHF", 0.89),
            ("AUD", 1.5),
            ("CNY", 7.25),
            ("INR", 83.5),
            ("BRL", 5.42),
            ("MXN", 18.45),
            ("ZAR", 18.4),
            ("NZD", 1.63),
            ("SGD", 1.35),
            ("HKD", 7.81),
            ("SEK", 10.48),
            ("KRW", 1380.5),
        ];

        let rates = pairs
            .into_iter()
            .map(|(code, rate)| (code.to_owned(), rate))
            .collect::<BTreeMap<_, _>>();

        Self {
            base: BASE_CURRENCY.to_owned(),
            rates,
        }
    }
}
