use async_trait::async_trait;

use crate::{
    core::{interval::Interval, series::PriceSeries},
    prelude::*,
};

/// Upstream of the hourly spot prices.
#[async_trait]
pub trait PriceSource: Sync {
    /// Fetch the raw response body covering the interval.
    async fn fetch(&self, interval: Interval) -> Result<Vec<u8>>;

    /// Parse the body previously returned by [`PriceSource::fetch`].
    fn parse(&self, body: &[u8]) -> Result<PriceSeries>;
}
