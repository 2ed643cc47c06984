//! [Wallbox](https://wallbox.com) cloud API client.

mod models;
mod token;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method};
use serde::Serialize;

use self::models::{
    ChargerConfigRequest,
    ChargerResponse,
    LockRequest,
    RemoteAction,
    RemoteActionRequest,
};
use crate::{
    core::{charger::ChargerControl, status::ChargerStatus},
    error::EngineError,
    prelude::*,
    quantity::rate::KilowattHourRate,
    store::BlobStore,
};

pub const BASE_URL: &str = "https://api.wall-box.com";

pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct Api {
    client: Client,
    base_url: String,
    device_id: String,
    token: String,
}

impl Api {
    /// Use the cached user token, or request a new one when it is missing or expired.
    #[instrument(skip_all, fields(device_id = %device_id))]
    pub async fn authenticate(
        client: Client,
        base_url: String,
        store: &dyn BlobStore,
        credentials: &Credentials,
        device_id: String,
    ) -> Result<Self> {
        let token = match token::read_cached(store, Utc::now()).await? {
            Some(token) => token,
            None => token::request_new(&client, &base_url, store, credentials).await?,
        };
        Ok(Self { client, base_url, device_id, token: token.jwt })
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(method = %method, path = path))]
    async fn call<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        let mut request = self
            .client
            .request(method, format!("{}/{path}", self.base_url))
            .bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.with_context(|| format!("failed to call `{path}`"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read `{path}` response"))?;
        if status.is_success() {
            debug!(%status, body = %body, "call succeeded");
            Ok(body)
        } else {
            Err(EngineError::ControlActionFailed { status, body }.into())
        }
    }

    async fn remote_action(&self, action: RemoteAction) -> Result {
        self.call(
            Method::POST,
            &format!("v3/chargers/{}/remote-action", self.device_id),
            Some(&RemoteActionRequest { action }),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ChargerControl for Api {
    #[instrument(skip_all, fields(device_id = %self.device_id))]
    async fn get_status(&self) -> Result<ChargerStatus> {
        let path = format!("v2/charger/{}", self.device_id);
        let body = self.call::<()>(Method::GET, &path, None).await?;
        let code = serde_json::from_str::<ChargerResponse>(&body)
            .context("failed to deserialize the charger data")?
            .data
            .charger_data
            .status;
        let status = ChargerStatus::from_code(code);
        info!(code, %status, "fetched");
        Ok(status)
    }

    #[instrument(skip_all, fields(device_id = %self.device_id, cost = %cost))]
    async fn set_energy_cost(&self, cost: KilowattHourRate) -> Result {
        info!("setting the energy cost…");
        self.call(
            Method::POST,
            &format!("chargers/config/{}", self.device_id),
            Some(&ChargerConfigRequest { energy_cost: cost.0 }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(device_id = %self.device_id))]
    async fn unlock(&self) -> Result {
        info!("unlocking…");
        self.call(
            Method::PUT,
            &format!("v2/charger/{}", self.device_id),
            Some(&LockRequest { locked: 0 }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(device_id = %self.device_id))]
    async fn pause(&self) -> Result {
        info!("pausing…");
        self.remote_action(RemoteAction::Pause).await
    }

    #[instrument(skip_all, fields(device_id = %self.device_id))]
    async fn resume(&self) -> Result {
        info!("resuming…");
        self.remote_action(RemoteAction::Resume).await
    }
}
