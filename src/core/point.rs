use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{TimestampSeconds, serde_as};

use crate::quantity::rate::MegawattHourRate;

/// Hourly spot price as published by the market.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize, derive_more::Constructor)]
pub struct PricePoint {
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub timestamp: DateTime<Utc>,

    pub price: MegawattHourRate,
}
