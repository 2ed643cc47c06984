use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::{
    config::{PriceConfig, TariffConfig},
    quantity::rate::{KilowattHourRate, MegawattHourRate},
};

impl TariffConfig {
    /// Whether the day rate applies: a workday hour within `[day_start_hour, night_start_hour)`.
    #[must_use]
    pub fn is_day(&self, timestamp: DateTime<Utc>) -> bool {
        let local = timestamp.with_timezone(&self.timezone);
        let is_workday = !matches!(local.weekday(), Weekday::Sat | Weekday::Sun);
        is_workday && (self.day_start_hour..self.night_start_hour).contains(&local.hour())
    }

    #[must_use]
    pub fn rate_at(&self, timestamp: DateTime<Utc>) -> KilowattHourRate {
        if self.is_day(timestamp) { self.day_rate } else { self.night_rate }
    }
}

/// Final price of the energy: spot price with VAT plus the transmission tariff.
#[must_use]
pub fn calculate_price(
    timestamp: DateTime<Utc>,
    raw_price: MegawattHourRate,
    config: &PriceConfig,
) -> KilowattHourRate {
    raw_price.to_kilowatt_hour_rate() * (1.0 + config.vat_rate) + config.tariff.rate_at(timestamp)
}
