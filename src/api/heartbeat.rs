use reqwest::{Client, Url};

use crate::prelude::*;

#[instrument(skip_all, fields(url = %url))]
pub async fn send(client: &Client, url: Url) -> Result {
    info!("sending a heartbeat…");
    client.post(url).send().await?.error_for_status()?;
    Ok(())
}
