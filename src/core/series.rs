use std::collections::BTreeMap;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::{
    core::point::PricePoint,
    error::EngineError,
    prelude::*,
    quantity::rate::MegawattHourRate,
};

/// Hourly spot prices ordered by time.
///
/// Timestamps are truncated to the top of their hour on insertion and on lookup.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceSeries(BTreeMap<DateTime<Utc>, MegawattHourRate>);

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw price of the hour containing the timestamp.
    #[must_use]
    pub fn get(&self, timestamp: DateTime<Utc>) -> Option<MegawattHourRate> {
        self.0.get(&truncate_to_hour(timestamp)?).copied()
    }

    /// Same as [`Self::get`], but a missing hour is an error.
    pub fn price_at(&self, timestamp: DateTime<Utc>) -> Result<MegawattHourRate> {
        self.get(timestamp).ok_or_else(|| EngineError::PriceNotFound(timestamp).into())
    }

    /// Last known hour, if any.
    #[must_use]
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.0.keys().next_back().copied()
    }
}

impl Extend<PricePoint> for PriceSeries {
    fn extend<T: IntoIterator<Item = PricePoint>>(&mut self, iter: T) {
        for point in iter {
            match truncate_to_hour(point.timestamp) {
                Some(timestamp) => {
                    self.0.insert(timestamp, point.price);
                }
                None => {
                    warn!(?point, "skipped the unrepresentable timestamp");
                }
            }
        }
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = PricePoint>>(iter: T) -> Self {
        let mut this = Self::default();
        this.extend(iter);
        this
    }
}

impl Extend<Self> for PriceSeries {
    fn extend<T: IntoIterator<Item = Self>>(&mut self, iter: T) {
        for series in iter {
            self.0.extend(series.0);
        }
    }
}

fn truncate_to_hour(timestamp: DateTime<Utc>) -> Option<DateTime<Utc>> {
    timestamp.duration_trunc(TimeDelta::hours(1)).ok()
}
