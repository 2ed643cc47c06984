use async_trait::async_trait;

use crate::{core::status::ChargerStatus, prelude::*, quantity::rate::KilowattHourRate};

/// Remote control over a single charger.
///
/// Non-success responses come back as [`crate::error::EngineError::ControlActionFailed`].
#[async_trait]
pub trait ChargerControl: Sync {
    async fn get_status(&self) -> Result<ChargerStatus>;

    /// Set the energy cost the charger reports for its sessions.
    async fn set_energy_cost(&self, cost: KilowattHourRate) -> Result;

    async fn unlock(&self) -> Result;

    async fn pause(&self) -> Result;

    async fn resume(&self) -> Result;
}
