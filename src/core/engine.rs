use chrono::{DateTime, TimeDelta, Utc};
use itertools::Itertools;

use crate::{
    cache::PriceCache,
    config::PriceConfig,
    core::{
        charger::ChargerControl,
        decision::{Action, DecisionState, PriceStatus},
        tariff::calculate_price,
        window::{WindowStep, find_min_price, resolve_desired_price, scan_window},
    },
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Single evaluation cycle: from the prices and the charger status to at most one action.
#[derive(bon::Builder)]
pub struct Engine<'a> {
    config: &'a PriceConfig,
    prices: &'a PriceCache<'a>,
    charger: &'a dyn ChargerControl,

    /// Decide, but do not touch the charger.
    #[builder(default)]
    scout: bool,
}

/// What the cycle saw and did.
#[must_use]
pub struct Cycle {
    pub current_price: KilowattHourRate,
    pub min_price: KilowattHourRate,
    pub desired_price: KilowattHourRate,
    pub state: DecisionState,
    pub action: Action,
    pub window: Vec<WindowStep>,
}

impl Engine<'_> {
    #[instrument(skip_all, fields(now = %now))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<Cycle> {
        let until = self
            .config
            .window_hours(now)
            .last()
            .map_or(now, |last_hour| last_hour + TimeDelta::hours(1));
        let series = self.prices.get_upcoming(now, until).await?;

        let current_price = calculate_price(now, series.price_at(now)?, self.config);
        let min_price = find_min_price(self.config, &series, now);
        let desired_price = resolve_desired_price(self.config, min_price);
        let window = scan_window(self.config, &series, now).collect_vec();
        info!(
            %current_price,
            %min_price,
            %desired_price,
            n_hours = window.len(),
            "resolved the prices",
        );

        let charger_status =
            self.charger.get_status().await.context("failed to get the charger status")?;
        let state =
            DecisionState::new(charger_status, PriceStatus::new(current_price, desired_price));
        let action = Action::from(state);
        info!(%state, ?action, "decided");

        if self.scout {
            info!("scouting, the charger is left alone");
        } else {
            action.execute(self.charger, current_price).await?;
        }

        Ok(Cycle { current_price, min_price, desired_price, state, action, window })
    }
}
