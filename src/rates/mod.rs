mod collect;
mod history;
mod model;
mod parse;

pub use collect::{load_history, load_rate_table};
pub use history::{HistoryError, RateHistory, RateSample, date_for_day, synthetic_history};
pub use model::{BASE_CURRENCY, DEFAULT_SATELLITES, RateTable};
