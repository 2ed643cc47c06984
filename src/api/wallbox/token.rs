use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_with::{TimestampSeconds, serde_as};

use super::Credentials;
use crate::{error::EngineError, prelude::*, store::BlobStore};

const KEY: &str = "user_token.json";

#[serde_as]
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub struct UserToken {
    pub jwt: String,

    #[serde_as(as = "TimestampSeconds<i64>")]
    pub ttl: DateTime<Utc>,
}

/// Read the cached token, expired tokens are dropped.
#[instrument(skip_all)]
pub async fn read_cached(store: &dyn BlobStore, now: DateTime<Utc>) -> Result<Option<UserToken>> {
    let Some(body) = store.get(KEY).await.context("failed to read the cached token")? else {
        info!("no cached token");
        return Ok(None);
    };
    match serde_json::from_slice::<UserToken>(&body) {
        Ok(token) if token.ttl > now => {
            debug!(ttl = %token.ttl, "using the cached token");
            Ok(Some(token))
        }
        Ok(token) => {
            info!(ttl = %token.ttl, "the cached token has expired");
            store.delete(KEY).await;
            Ok(None)
        }
        Err(error) => {
            store.delete(KEY).await;
            Err(error).context("failed to deserialize the cached token")
        }
    }
}

/// Request a new token and cache the response.
#[instrument(skip_all)]
pub async fn request_new(
    client: &Client,
    base_url: &str,
    store: &dyn BlobStore,
    credentials: &Credentials,
) -> Result<UserToken> {
    info!("requesting a new token…");
    let response = client
        .get(format!("{base_url}/auth/token/user"))
        .basic_auth(&credentials.username, Some(&credentials.password))
        .send()
        .await
        .context("failed to request a token")?;
    let status = response.status();
    let body = response.bytes().await.context("failed to read the token response")?;
    if !status.is_success() {
        let body = String::from_utf8_lossy(&body).into_owned();
        return Err(EngineError::ControlActionFailed { status, body }.into());
    }
    let token = serde_json::from_slice::<UserToken>(&body)
        .context("failed to deserialize the token response")?;
    store.put(KEY, &body).await.context("failed to cache the token")?;
    info!(ttl = %token.ttl, "got a new token");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use http::StatusCode;
    use mockito::Server;

    use super::*;
    use crate::store::tests::MemoryStore;

    fn credentials() -> Credentials {
        Credentials { username: "user".to_owned(), password: "pass".to_owned() }
    }

    // language=JSON
    const TOKEN: &[u8] = br#"{"jwt": "header.payload.signature", "user_id": 1, "ttl": 1693000000}"#;

    #[tokio::test]
    async fn test_valid_token() -> Result {
        let store = MemoryStore::with(KEY, TOKEN);
        let now = Utc.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).unwrap();
        let token = read_cached(&store, now).await?.context("no token")?;
        assert_eq!(token.jwt, "header.payload.signature");
        assert!(store.contains(KEY));
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_token_is_dropped() -> Result {
        let store = MemoryStore::with(KEY, TOKEN);
        let now = Utc.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap();
        assert!(read_cached(&store, now).await?.is_none());
        assert!(!store.contains(KEY));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_token() -> Result {
        assert!(read_cached(&MemoryStore::default(), Utc::now()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_token_is_dropped() {
        let store = MemoryStore::with(KEY, b"not json");
        assert!(read_cached(&store, Utc::now()).await.is_err());
        assert!(!store.contains(KEY));
    }

    #[tokio::test]
    async fn test_request_new_caches_raw_body() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/token/user")
            .match_header("authorization", "Basic dXNlcjpwYXNz")
            .with_status(200)
            .with_body(TOKEN)
            .create_async()
            .await;
        let store = MemoryStore::default();
        let token = request_new(&Client::new(), &server.url(), &store, &credentials()).await?;
        assert_eq!(token.jwt, "header.payload.signature");
        assert_eq!(store.blobs.lock().unwrap().get(KEY).map(Vec::as_slice), Some(TOKEN));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_request_new_unauthorized() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/token/user")
            .with_status(401)
            .with_body("bad credentials")
            .create_async()
            .await;
        let store = MemoryStore::default();
        let error =
            request_new(&Client::new(), &server.url(), &store, &credentials()).await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<EngineError>(),
            Some(EngineError::ControlActionFailed { status, body })
                if *status == StatusCode::UNAUTHORIZED && body == "bad credentials"
        ));
        assert!(!store.contains(KEY));
        mock.assert_async().await;
    }
}
