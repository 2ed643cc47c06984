//! [Elering](https://dashboard.elering.ee) Nord Pool price client.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    api::price_source::PriceSource,
    core::{interval::Interval, point::PricePoint, series::PriceSeries},
    prelude::*,
};

pub const URL: &str = "https://dashboard.elering.ee/api/nps/price";

/// Market area.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Ee,
    Fi,
    Lv,

    #[default]
    Lt,
}

impl Region {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ee => "ee",
            Self::Fi => "fi",
            Self::Lv => "lv",
            Self::Lt => "lt",
        }
    }
}

pub struct Api {
    client: Client,
    url: String,
    region: Region,
}

impl Api {
    pub const fn new(client: Client, url: String, region: Region) -> Self {
        Self { client, url, region }
    }
}

#[async_trait]
impl PriceSource for Api {
    #[instrument(skip_all, fields(interval = ?interval))]
    async fn fetch(&self, interval: Interval) -> Result<Vec<u8>> {
        info!("fetching…");
        let body = self
            .client
            .get(&self.url)
            .query(&[
                ("start", interval.start.to_rfc3339_opts(SecondsFormat::Secs, false)),
                ("end", interval.end.to_rfc3339_opts(SecondsFormat::Secs, false)),
            ])
            .send()
            .await
            .context("failed to call Elering")?
            .error_for_status()
            .context("Elering request failed")?
            .bytes()
            .await
            .context("failed to read the Elering response")?;
        info!(len = body.len(), "fetched");
        Ok(body.to_vec())
    }

    fn parse(&self, body: &[u8]) -> Result<PriceSeries> {
        let mut response: Response =
            serde_json::from_slice(body).context("failed to deserialize the Elering response")?;
        ensure!(response.success, "Elering reported a failure");
        let points = response
            .data
            .remove(self.region.as_str())
            .with_context(|| format!("no `{}` region in the response", self.region.as_str()))?;
        Ok(points.into_iter().collect())
    }
}

#[derive(Deserialize)]
struct Response {
    success: bool,

    #[serde(default)]
    data: HashMap<String, Vec<PricePoint>>,
}
