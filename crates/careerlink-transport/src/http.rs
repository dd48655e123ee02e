//! HTTP identity API implementation using `reqwest`.

use careerlink_protocol::{
    error_message, Codec, Credentials, JsonCodec, LoginResponse,
    ProtocolError, UserProfile,
};
use serde::de::DeserializeOwned;

use crate::{join_url, ApiError, IdentityApi, CURRENT_USER_PATH, LOGIN_PATH};

/// An [`IdentityApi`] that talks JSON over HTTP.
///
/// Responses are read as raw bytes and decoded through the codec, so a
/// broken 2xx body becomes [`ApiError::Malformed`] and a non-2xx body
/// becomes [`ApiError::Rejected`] with whatever message it carried.
#[derive(Debug, Clone)]
pub struct HttpIdentityApi<C: Codec = JsonCodec> {
    client: reqwest::Client,
    base_url: String,
    codec: C,
}

impl HttpIdentityApi<JsonCodec> {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:8080/api`).
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidBaseUrl`] unless `base_url` is an
    /// absolute `http` or `https` URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(reqwest::Client::new(), base_url, JsonCodec)
    }
}

impl<C: Codec> HttpIdentityApi<C> {
    /// Creates a client with a caller-supplied `reqwest::Client` and codec.
    ///
    /// # Errors
    /// See [`HttpIdentityApi::new`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        codec: C,
    ) -> Result<Self, ApiError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            codec,
        })
    }

    /// The base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reads the full body, then decodes it or turns it into a rejection.
    async fn read<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(self.codec.decode(&body)?)
    }
}

impl<C: Codec> IdentityApi for HttpIdentityApi<C> {
    async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<LoginResponse, ApiError> {
        let url = join_url(&self.base_url, LOGIN_PATH);
        let body = self.codec.encode(credentials)?;
        tracing::debug!(%url, email = %credentials.email, "sending login request");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let login: LoginResponse = self.read(response).await?;
        if login.token.is_empty() {
            return Err(ApiError::Malformed(ProtocolError::InvalidMessage(
                "login response carried an empty token".into(),
            )));
        }
        Ok(login)
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let url = join_url(&self.base_url, CURRENT_USER_PATH);
        tracing::debug!(%url, "fetching current user");

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        self.read(response).await
    }
}
