//! PriceBar: one minute of the input series.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Close price observed at a single minute.
///
/// Only the close is carried: stop checks never look at intrabar high/low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

impl PriceBar {
    pub fn new(timestamp: NaiveDateTime, close: f64) -> Self {
        Self { timestamp, close }
    }

    /// Calendar date used to partition the series into trading days.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// Returns true if the close is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !self.close.is_finite()
    }
}
