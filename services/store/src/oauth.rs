//! OAuth provider assertion verification
//!
//! The OAuth login endpoint never trusts a caller-supplied identity. The
//! caller hands over the provider access token it obtained client-side, and
//! the server fetches the profile from the provider's own userinfo endpoint.
//! Name and email used for account lookup or creation come exclusively from
//! the provider's response.

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

/// Supported OAuth providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Facebook,
}

impl OAuthProvider {
    /// Parse a provider tag. Returns `None` for unsupported providers.
    pub fn parse(value: &str) -> Option<OAuthProvider> {
        match value {
            "google" => Some(OAuthProvider::Google),
            "facebook" => Some(OAuthProvider::Facebook),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Facebook => "facebook",
        }
    }

    fn userinfo_url(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://www.googleapis.com/oauth2/v2/userinfo",
            OAuthProvider::Facebook => "https://graph.facebook.com/me?fields=id,name,email",
        }
    }
}

/// Identity asserted by a provider for a verified access token
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    pub name: String,
    pub email: String,
}

/// Google userinfo response
#[derive(Debug, Deserialize)]
struct GoogleUser {
    email: String,
    name: Option<String>,
}

/// Facebook Graph `me` response
#[derive(Debug, Deserialize)]
struct FacebookUser {
    name: String,
    email: Option<String>,
}

/// Verifies provider access tokens by calling the provider's userinfo
/// endpoint
#[derive(Clone)]
pub struct OAuthVerifier {
    http: reqwest::Client,
}

impl OAuthVerifier {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Fetch the profile the provider asserts for this access token. Fails
    /// if the token is rejected by the provider or the profile carries no
    /// email.
    pub async fn fetch_profile(
        &self,
        provider: OAuthProvider,
        access_token: &str,
    ) -> Result<OAuthProfile> {
        info!("Verifying {} access token", provider.as_str());

        let response = self
            .http
            .get(provider.userinfo_url())
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "{} rejected the access token: {}",
                provider.as_str(),
                response.status()
            ));
        }

        match provider {
            OAuthProvider::Google => {
                let user: GoogleUser = response.json().await?;
                let name = user.name.unwrap_or_else(|| local_part(&user.email));
                Ok(OAuthProfile {
                    name,
                    email: user.email,
                })
            }
            OAuthProvider::Facebook => {
                let user: FacebookUser = response.json().await?;
                let email = user.email.ok_or_else(|| {
                    anyhow::anyhow!("facebook profile does not expose an email address")
                })?;
                Ok(OAuthProfile {
                    name: user.name,
                    email,
                })
            }
        }
    }
}

impl Default for OAuthVerifier {
    fn default() -> Self {
        Self::new()
    }
}

fn local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse_closed_set() {
        assert_eq!(OAuthProvider::parse("google"), Some(OAuthProvider::Google));
        assert_eq!(
            OAuthProvider::parse("facebook"),
            Some(OAuthProvider::Facebook)
        );
        assert_eq!(OAuthProvider::parse("github"), None);
        assert_eq!(OAuthProvider::parse(""), None);
    }

    #[test]
    fn test_local_part_fallback() {
        assert_eq!(local_part("alice@example.com"), "alice");
        assert_eq!(local_part("no-at-sign"), "no-at-sign");
    }
}
