//! Authentication API.

use serde::{Deserialize, Serialize};

use crate::client::CohortClient;
use crate::error::{Error, Result};
use crate::types::AuthToken;

/// Password-grant authentication endpoint.
const AUTH_PATH: &str = "api/collections/users/auth-with-password";

/// Authentication API client.
pub struct AuthApi {
    client: CohortClient,
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

impl AuthApi {
    pub(crate) fn new(client: CohortClient) -> Self {
        Self { client }
    }

    /// Exchange the configured credentials for a short-lived bearer token.
    ///
    /// Tokens are never cached; callers needing one per request should call
    /// this once per request.
    pub async fn authenticate(&self) -> Result<AuthToken> {
        let url = self.client.url(AUTH_PATH)?;
        let credentials = self.client.credentials();
        let request = AuthRequest {
            identity: &credentials.identity,
            password: &credentials.secret,
        };

        tracing::debug!(identity = %credentials.identity, "authenticating");
        let response = self.client.post_json(url, &request, None).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = self.client.failure_message(response).await;
            return Err(Error::Authentication { status, message });
        }

        // A success body without a token is a contract violation; fail fast
        // rather than send an empty bearer header downstream.
        let auth: AuthResponse = self.client.decode(response).await?;
        Ok(AuthToken::new(auth.token))
    }
}
