use std::fmt::{Display, Formatter};

use crate::{
    core::{charger::ChargerControl, status::ChargerStatus},
    prelude::*,
    quantity::rate::KilowattHourRate,
};

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum PriceStatus {
    PriceGood,
    PriceTooBig,
}

impl PriceStatus {
    #[must_use]
    pub fn new(current_price: KilowattHourRate, desired_price: KilowattHourRate) -> Self {
        if current_price > desired_price { Self::PriceTooBig } else { Self::PriceGood }
    }
}

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, derive_more::Constructor)]
pub struct DecisionState {
    pub charger_status: ChargerStatus,
    pub price_status: PriceStatus,
}

impl Display for DecisionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}{:?}", self.charger_status, self.price_status)
    }
}

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    SetCostThenUnlock,
    SetCostThenResume,
    Pause,
    NoOp,
}

impl From<DecisionState> for Action {
    fn from(state: DecisionState) -> Self {
        match (state.charger_status, state.price_status) {
            (ChargerStatus::LockedWaiting, PriceStatus::PriceGood) => Self::SetCostThenUnlock,
            (ChargerStatus::Paused | ChargerStatus::Scheduled, PriceStatus::PriceGood) => {
                Self::SetCostThenResume
            }
            (ChargerStatus::Charging, PriceStatus::PriceTooBig) => Self::Pause,
            _ => Self::NoOp,
        }
    }
}

impl Action {
    /// Perform the action on the charger.
    ///
    /// The unlock or resume is never attempted once the energy cost could not be set.
    #[instrument(skip_all, fields(action = ?self, energy_cost = %energy_cost))]
    pub async fn execute(
        self,
        charger: &dyn ChargerControl,
        energy_cost: KilowattHourRate,
    ) -> Result {
        match self {
            Self::SetCostThenUnlock => {
                info!("setting the energy cost and unlocking…");
                charger
                    .set_energy_cost(energy_cost)
                    .await
                    .context("failed to set the energy cost")?;
                charger.unlock().await.context("failed to unlock")
            }
            Self::SetCostThenResume => {
                info!("setting the energy cost and resuming…");
                charger
                    .set_energy_cost(energy_cost)
                    .await
                    .context("failed to set the energy cost")?;
                charger.resume().await.context("failed to resume")
            }
            Self::Pause => {
                info!("pausing…");
                charger.pause().await.context("failed to pause")
            }
            Self::NoOp => {
                info!("nothing to do");
                Ok(())
            }
        }
    }
}
