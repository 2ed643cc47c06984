use std::time::Duration;

use reqwest::Client;

use crate::prelude::*;

/// Build the client shared by all the APIs.
///
/// Certificate verification is only relaxed when explicitly asked for.
pub fn try_new(accepts_invalid_certs: bool) -> Result<Client> {
    if accepts_invalid_certs {
        warn!("TLS certificate verification is disabled");
    }
    Ok(Client::builder()
        .user_agent(concat!("wallbox-spot/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(accepts_invalid_certs)
        .build()?)
}
