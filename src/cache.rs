use chrono::{DateTime, DurationRound, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::{
    api::price_source::PriceSource,
    config::PriceConfig,
    core::{interval::Interval, series::PriceSeries},
    error::EngineError,
    prelude::*,
    store::BlobStore,
};

/// Period covered by a single fetch and a single cache entry.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Market day, from local midnight to the next local midnight.
    #[default]
    Daily,

    Hourly,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeriesKey {
    /// Date in the market timezone.
    Day(NaiveDate),

    /// Start of the hour.
    Hour(DateTime<Utc>),
}

impl SeriesKey {
    /// Key of the period containing the timestamp.
    pub fn containing(
        granularity: Granularity,
        timestamp: DateTime<Utc>,
        timezone: Tz,
    ) -> Result<Self> {
        match granularity {
            Granularity::Daily => Ok(Self::Day(timestamp.with_timezone(&timezone).date_naive())),
            Granularity::Hourly => Ok(Self::Hour(timestamp.duration_trunc(TimeDelta::hours(1))?)),
        }
    }

    #[must_use]
    pub fn file_name(self) -> String {
        match self {
            Self::Day(date) => format!("nord_pool_{}.json", date.format("%Y-%m-%d")),
            Self::Hour(start) => format!("nord_pool_{}.json", start.format("%Y-%m-%dT%HZ")),
        }
    }

    pub fn interval(self, timezone: Tz) -> Result<Interval> {
        match self {
            Self::Day(date) => {
                let next_date = date.succ_opt().context("the date is out of range")?;
                Ok(Interval::new(start_of_day(date, timezone)?, start_of_day(next_date, timezone)?))
            }
            Self::Hour(start) => {
                let start = start.with_timezone(&timezone);
                Ok(Interval::new(start, start + TimeDelta::hours(1)))
            }
        }
    }

    /// Key of the following period.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Day(date) => date.succ_opt().map(Self::Day),
            Self::Hour(start) => start.checked_add_signed(TimeDelta::hours(1)).map(Self::Hour),
        }
    }
}

fn start_of_day(date: NaiveDate, timezone: Tz) -> Result<DateTime<Tz>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(timezone)
        .earliest()
        .with_context(|| format!("{date} has no midnight in {timezone}"))
}

/// Spot prices, read through the blob store.
pub struct PriceCache<'a> {
    store: &'a dyn BlobStore,
    source: &'a dyn PriceSource,
    granularity: Granularity,
    timezone: Tz,
}

impl<'a> PriceCache<'a> {
    pub const fn new(
        store: &'a dyn BlobStore,
        source: &'a dyn PriceSource,
        config: &PriceConfig,
    ) -> Self {
        Self { store, source, granularity: config.granularity, timezone: config.market_timezone }
    }

    /// Read the cached series, or fetch and cache it when there is no cache entry.
    ///
    /// Storage faults and unparseable cache entries are errors, they never cause a refetch.
    #[instrument(skip_all, fields(key = ?key))]
    pub async fn get_series(&self, key: SeriesKey) -> Result<PriceSeries> {
        let file_name = key.file_name();

        if let Some(body) =
            self.store.get(&file_name).await.context("failed to read the cached prices")?
        {
            debug!(len = body.len(), "cache hit");
            return self.source.parse(&body).map_err(|error| unavailable(&file_name, &error));
        }

        info!("cache miss");
        let body = self
            .source
            .fetch(key.interval(self.timezone)?)
            .await
            .map_err(|error| unavailable(&file_name, &error))?;
        let series = self.source.parse(&body).map_err(|error| unavailable(&file_name, &error))?;
        if series.is_empty() {
            warn!("the prices are not published yet, not caching");
        } else {
            self.store.put(&file_name, &body).await.context("failed to cache the prices")?;
        }
        Ok(series)
    }

    /// Series covering `since` and, as far as already published, the hours up to `until`.
    ///
    /// Only the period containing `since` is required.
    #[instrument(skip_all, fields(since = %since, until = %until))]
    pub async fn get_upcoming(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let mut key = SeriesKey::containing(self.granularity, since, self.timezone)?;
        let mut series = self.get_series(key).await?;

        while let Some(next_key) = key.next()
            && next_key.interval(self.timezone)?.start.to_utc() < until
        {
            match self.get_series(next_key).await {
                Ok(next_series) if next_series.is_empty() => break,
                Ok(next_series) => series.extend([next_series]),
                Err(error) => {
                    warn!(key = ?next_key, "upcoming prices are unavailable: {error:#}");
                    break;
                }
            }
            key = next_key;
        }

        info!(len = series.len(), last = ?series.last_timestamp(), "got the prices");
        Ok(series)
    }
}

fn unavailable(key: &str, error: &Error) -> Error {
    EngineError::PriceSourceUnavailable { key: key.to_owned(), reason: format!("{error:#}") }
        .into()
}
