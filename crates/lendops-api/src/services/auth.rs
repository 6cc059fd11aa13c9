// Authentication service endpoints
//
// The auth service issues tokens; this client only stores them. `login`
// and `refresh_session` write the access token to the injected
// `TokenStore`, `logout` clears it.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{AuthSession, UserProfile};

const BASE_PATH: &str = "auth/api/v1/auth";

impl ApiClient {
    /// Exchange credentials for a session and store its access token.
    ///
    /// `POST auth/login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<AuthSession, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            username: &'a str,
            password: &'a str,
        }

        let url = self.endpoint(BASE_PATH, &["login"])?;
        debug!(username, "logging in");
        let session: AuthSession = self
            .post(
                url,
                Some(&Body {
                    username,
                    password: password.expose_secret(),
                }),
            )
            .await
            .into_data("Login failed")?;

        self.tokens().save(session.access_token.clone())?;
        Ok(session)
    }

    /// End the session server-side and drop the stored token.
    ///
    /// The token is cleared even when the service call fails; the call's
    /// outcome is still returned.
    ///
    /// `POST auth/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.endpoint(BASE_PATH, &["logout"])?;
        debug!("logging out");
        let outcome = self
            .post::<Value, ()>(url, None)
            .await
            .into_unit("Logout failed");

        self.tokens().clear()?;
        if let Err(ref e) = outcome {
            warn!(error = %e, "logout call failed, local token cleared");
        }
        outcome
    }

    /// The profile of the user the stored token belongs to.
    ///
    /// `GET auth/me`
    pub async fn current_user(&self) -> Result<UserProfile, Error> {
        let url = self.endpoint(BASE_PATH, &["me"])?;
        self.get(url).await.into_data("Failed to fetch user profile")
    }

    /// Trade a refresh token for a new session and store its access token.
    ///
    /// `POST auth/refresh`
    pub async fn refresh_session(&self, refresh_token: &SecretString) -> Result<AuthSession, Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            refresh_token: &'a str,
        }

        let url = self.endpoint(BASE_PATH, &["refresh"])?;
        debug!("refreshing session");
        let session: AuthSession = self
            .post(
                url,
                Some(&Body {
                    refresh_token: refresh_token.expose_secret(),
                }),
            )
            .await
            .into_data("Failed to refresh session")?;

        self.tokens().save(session.access_token.clone())?;
        Ok(session)
    }
}
