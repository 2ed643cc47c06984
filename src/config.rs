use std::{fmt::Debug, fs, path::Path};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::{
    api::elering::Region,
    cache::Granularity,
    error::EngineError,
    prelude::*,
    quantity::rate::KilowattHourRate,
};

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub prices: PriceConfig,
}

impl Config {
    #[instrument(name = "reading the configuration…")]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let this = Self::from_toml(&contents)?;
        info!(
            market_timezone = %this.prices.market_timezone,
            tariff_timezone = %this.prices.tariff.timezone,
            region = ?this.prices.region,
            "loaded",
        );
        Ok(this)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let this: Self = toml::from_str(contents)
            .map_err(|error| EngineError::Configuration(error.message().to_owned()))?;
        this.prices.validate()?;
        Ok(this)
    }
}

#[derive(Clone, Deserialize, bon::Builder)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PriceConfig {
    /// Never charge above this final price.
    pub max_price: KilowattHourRate,

    /// For example, `0.21` for 21%.
    pub vat_rate: f64,

    /// Charging deadline while it is day.
    pub charge_till_hour_day: u32,

    /// Charging deadline while it is night.
    pub charge_till_hour_night: u32,

    pub market_timezone: Tz,

    #[serde(default)]
    #[builder(default)]
    pub region: Region,

    #[serde(default)]
    #[builder(default)]
    pub granularity: Granularity,

    pub tariff: TariffConfig,
}

impl PriceConfig {
    fn validate(&self) -> Result<(), EngineError> {
        check_hour("charge-till-hour-day", self.charge_till_hour_day)?;
        check_hour("charge-till-hour-night", self.charge_till_hour_night)?;
        check_hour("tariff.day-start-hour", self.tariff.day_start_hour)?;
        check_hour("tariff.night-start-hour", self.tariff.night_start_hour)?;
        Ok(())
    }
}

/// Transmission tariff.
#[derive(Clone, Deserialize, bon::Builder)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TariffConfig {
    pub day_rate: KilowattHourRate,
    pub night_rate: KilowattHourRate,

    /// Inclusive.
    pub day_start_hour: u32,

    /// Exclusive end of the day window.
    pub night_start_hour: u32,

    #[serde(rename = "tariff-timezone")]
    pub timezone: Tz,
}

fn check_hour(name: &str, hour: u32) -> Result<(), EngineError> {
    if hour < 24 {
        Ok(())
    } else {
        Err(EngineError::Configuration(format!("`{name}` must be within 0..=23, got {hour}")))
    }
}
