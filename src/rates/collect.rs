use std::fs;

use anyhow::{Context, Result};

use super::history::RateHistory;
use super::model::RateTable;
use super::parse::{parse_history, parse_rate_table};

pub fn load_rate_table(path: Option<&str>) -> Result<RateTable> {
    let Some(path) = path else {
        log::info!("no rates file given, using the built-in snapshot");
        return Ok(RateTable::builtin_snapshot());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read rate table from {path}"))?;
    let table = parse_rate_table(&raw)
        .with_context(|| format!("failed to parse rate table from {path}"))?;

    log::info!(
        "loaded {} rates (base {}) from {path}",
        table.rate_count(),
        table.base
    );
    Ok(table)
}

pub fn load_history(path: &str, currency: &str) -> Result<RateHistory> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read rate history from {path}"))?;
    let history = parse_history(&raw, currency)
        .with_context(|| format!("failed to parse rate history from {path}"))?;

    log::info!(
        "loaded {} history samples for {currency} from {path}",
        history.samples.len()
    );
    Ok(history)
}
