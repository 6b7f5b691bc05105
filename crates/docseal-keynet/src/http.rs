//! HTTP client for a remote key network.
//!
//! Thin JSON-over-HTTP mapping of [`KeyNetwork`]: transport failures are
//! [`KeynetError::Unreachable`], structured error bodies map onto the
//! error taxonomy by code, and anything else is a protocol error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{KeynetError, Result};
use crate::messages::{
    ChallengeId, DecryptRequest, SessionChallenge, SessionCredential, SessionRequest,
    SignInStatement,
};
use crate::network::{KeyNetwork, NetworkInfo};
use docseal_core::WalletSignature;

/// A [`KeyNetwork`] reached over HTTP.
pub struct HttpNetwork {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNetwork {
    /// Create a client for the network at the given base URL. A trailing
    /// slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| KeynetError::Unreachable(e.to_string()))?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| KeynetError::Unreachable(e.to_string()))?;
        read_json(response).await
    }
}

async fn read_json<T>(response: reqwest::Response) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| KeynetError::Protocol(e.to_string()));
    }
    match response.json::<ErrorBody>().await {
        Ok(body) => Err(body.into_error()),
        Err(_) => Err(KeynetError::Protocol(format!("unexpected status {status}"))),
    }
}

/// Structured error body returned by the network.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl ErrorBody {
    fn into_error(self) -> KeynetError {
        match self.code.as_str() {
            "auth_failure" => KeynetError::Auth(self.message),
            "authorization_denied" => KeynetError::Denied(self.message),
            "integrity_failure" => KeynetError::Integrity(self.message),
            _ => KeynetError::Protocol(format!("{}: {}", self.code, self.message)),
        }
    }
}

#[derive(Serialize)]
struct CompleteSessionBody<'a> {
    challenge_id: &'a ChallengeId,
    statement: &'a SignInStatement,
    signature: &'a WalletSignature,
}

#[derive(Deserialize)]
struct DecryptResponse {
    /// Hex-encoded plaintext.
    plaintext: String,
}

#[async_trait]
impl KeyNetwork for HttpNetwork {
    async fn fetch_network_info(&self) -> Result<NetworkInfo> {
        self.get_json("/v1/network").await
    }

    async fn begin_session(&self, request: &SessionRequest) -> Result<SessionChallenge> {
        self.post_json("/v1/session/challenge", request).await
    }

    async fn complete_session(
        &self,
        challenge_id: &ChallengeId,
        statement: &SignInStatement,
        signature: &WalletSignature,
    ) -> Result<SessionCredential> {
        let body = CompleteSessionBody {
            challenge_id,
            statement,
            signature,
        };
        self.post_json("/v1/session/credential", &body).await
    }

    async fn open_sealed(&self, request: &DecryptRequest) -> Result<Vec<u8>> {
        let response: DecryptResponse = self.post_json("/v1/decrypt", request).await?;
        hex::decode(&response.plaintext)
            .map_err(|e| KeynetError::Protocol(format!("plaintext is not valid hex: {e}")))
    }
}
