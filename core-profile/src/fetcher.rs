//! Profile lookup against the Chatwoot REST API.

use std::sync::Arc;

use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::logging::mask_secret;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{ProfileError, Result};
use crate::profile::Profile;

const PROFILE_PATH: &str = "/api/v1/profile";
const TOKEN_HEADER: &str = "api_access_token";

/// Fetches the profile of the account owning an access token.
///
/// Exactly one request per call, no retry and no caching.
#[derive(Clone)]
pub struct ProfileFetcher {
    http: Arc<dyn HttpClient>,
}

impl ProfileFetcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// `GET {base_url}/api/v1/profile`.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::InvalidUrl`] if `base_url` is not an absolute URL
    /// - [`ProfileError::Transport`] if the request could not be sent
    /// - [`ProfileError::HttpStatus`] for any non-2xx response
    /// - [`ProfileError::EmptyBody`], [`ProfileError::InvalidJson`] or
    ///   [`ProfileError::NotAnObject`] when the body is unusable
    #[instrument(skip(self, access_token), fields(token = %mask_secret(access_token)))]
    pub async fn fetch(&self, base_url: &str, access_token: &str) -> Result<Profile> {
        let url = profile_url(base_url)?;
        let request = HttpRequest::get(url.as_str())
            .accept_json()
            .header(TOKEN_HEADER, access_token);

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(ProfileError::HttpStatus(response.status));
        }
        if response.body.is_empty() {
            return Err(ProfileError::EmptyBody);
        }

        let value: Value = serde_json::from_slice(&response.body)?;
        let object = value.as_object().ok_or(ProfileError::NotAnObject)?;
        let profile = Profile::from_json(object);

        debug!(name = %profile.name, has_avatar = profile.avatar_url.is_some(), "Profile fetched");
        Ok(profile)
    }

    /// Like [`fetch`](Self::fetch), but any failure yields
    /// [`Profile::fallback`] after a warning.
    pub async fn fetch_or_fallback(&self, base_url: &str, access_token: &str) -> Profile {
        match self.fetch(base_url, access_token).await {
            Ok(profile) => profile,
            Err(error) => {
                warn!(error = %error, "Profile fetch failed, using fallback");
                Profile::fallback()
            }
        }
    }
}

fn profile_url(base_url: &str) -> Result<Url> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), PROFILE_PATH);
    Url::parse(&joined).map_err(|e| ProfileError::InvalidUrl(format!("{}: {}", base_url, e)))
}
