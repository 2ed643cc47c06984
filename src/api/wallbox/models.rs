use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ChargerResponse {
    pub data: ChargerResponseData,
}

#[derive(Deserialize)]
pub struct ChargerResponseData {
    #[serde(rename = "chargerData")]
    pub charger_data: ChargerData,
}

#[derive(Deserialize)]
pub struct ChargerData {
    /// Vendor status code.
    pub status: i64,
}

#[derive(Serialize)]
pub struct LockRequest {
    pub locked: u8,
}

#[derive(Serialize)]
pub struct ChargerConfigRequest {
    #[serde(rename = "energyCost")]
    pub energy_cost: f64,
}

#[derive(Serialize)]
pub struct RemoteActionRequest {
    pub action: RemoteAction,
}

#[derive(Copy, Clone, Serialize)]
#[serde(into = "u8")]
pub enum RemoteAction {
    Resume,
    Pause,
}

impl From<RemoteAction> for u8 {
    fn from(action: RemoteAction) -> Self {
        match action {
            RemoteAction::Resume => 1,
            RemoteAction::Pause => 2,
        }
    }
}
