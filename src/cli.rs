use std::path::PathBuf;

use clap::Parser;
use reqwest::{Client, Url};

use crate::{
    api::{elering, heartbeat, wallbox},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Pricing configuration file.
    #[clap(long = "config", env = "CONFIG_PATH", default_value = "wallbox-spot.toml")]
    pub config_path: PathBuf,

    /// Directory for the cached prices and tokens.
    #[clap(long = "cache-dir", env = "CACHE_DIR", default_value = ".cache")]
    pub cache_dir: PathBuf,

    /// Decide, but do not control the charger (dry run).
    #[clap(long)]
    pub scout: bool,

    /// Skip TLS certificate verification.
    #[clap(long = "accept-invalid-certs", env = "ACCEPT_INVALID_CERTS")]
    pub accepts_invalid_certs: bool,

    /// Elering Nord Pool price endpoint.
    #[clap(long = "elering-url", env = "ELERING_URL", default_value = elering::URL)]
    pub elering_url: String,

    #[clap(flatten)]
    pub wallbox: WallboxArgs,

    #[clap(flatten)]
    pub heartbeat: HeartbeatArgs,
}

#[derive(Parser)]
pub struct WallboxArgs {
    #[clap(long = "wallbox-url", env = "WALLBOX_URL", default_value = wallbox::BASE_URL)]
    pub base_url: String,

    #[clap(long = "wallbox-username", env = "WALLBOX_USERNAME")]
    pub username: String,

    #[clap(long = "wallbox-password", env = "WALLBOX_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[clap(long = "wallbox-device-id", env = "WALLBOX_DEVICE_ID")]
    pub device_id: String,
}

impl WallboxArgs {
    pub fn credentials(&self) -> wallbox::Credentials {
        wallbox::Credentials { username: self.username.clone(), password: self.password.clone() }
    }
}

#[derive(Parser)]
pub struct HeartbeatArgs {
    #[clap(long = "heartbeat-url", env = "HEARTBEAT_URL")]
    pub url: Option<Url>,
}

impl HeartbeatArgs {
    pub async fn send(&self, client: &Client) {
        if let Some(url) = &self.url
            && let Err(error) = heartbeat::send(client, url.clone()).await
        {
            warn!("failed to send the heartbeat: {error:#}");
        }
    }
}
