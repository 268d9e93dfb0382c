use futures::future::BoxFuture;

use crate::errors::ListensError;
use crate::listen::MusicProvider;

pub mod mock;

pub trait MusicCatalog {
    /// Whether the provider knows a song with this ID.
    fn song_exists(
        &self,
        song_id: &str,
        provider: MusicProvider,
    ) -> BoxFuture<Result<bool, ListensError>>;
}

pub use self::spotify::*;

mod spotify {
    use std::time::{Duration, Instant};

    use futures::future::{BoxFuture, FutureExt};
    use reqwest::{Client, StatusCode};
    use serde::Deserialize;
    use tokio::sync::Mutex;
    use url::Url;

    use crate::config::get_variable;
    use crate::errors::{http_error, ListensError};
    use crate::listen::MusicProvider;

    const API_URL: &str = "https://api.spotify.com/v1/";
    const AUTH_URL: &str = "https://accounts.spotify.com/api/token";

    /// Refresh tokens this long before Spotify says they expire.
    const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

    #[derive(Deserialize)]
    struct TokenResponse {
        access_token: String,
        expires_in: u64,
    }

    struct BearerToken {
        value: String,
        expires_at: Instant,
    }

    /// Looks songs up in the Spotify Web API, authenticating with the
    /// client-credentials flow.
    pub struct SpotifyCatalog {
        client: Client,
        client_id: String,
        client_secret: String,
        api_url: Url,
        auth_url: Url,
        token: Mutex<Option<BearerToken>>,
    }

    impl SpotifyCatalog {
        pub fn new(
            client: Client,
            client_id: String,
            client_secret: String,
            api_url: Url,
            auth_url: Url,
        ) -> Result<Self, ListensError> {
            if api_url.cannot_be_a_base() {
                return Err(ListensError::InvalidEndpoint {
                    url: api_url.to_string(),
                });
            }

            Ok(Self {
                client,
                client_id,
                client_secret,
                api_url,
                auth_url,
                token: Mutex::new(None),
            })
        }

        pub fn from_env() -> Result<Self, ListensError> {
            let parse = |raw: &str| {
                Url::parse(raw).map_err(|_| ListensError::InvalidEndpoint {
                    url: raw.to_owned(),
                })
            };

            SpotifyCatalog::new(
                Client::new(),
                get_variable("SPOTIFY_CLIENT_ID"),
                get_variable("SPOTIFY_CLIENT_SECRET"),
                parse(API_URL)?,
                parse(AUTH_URL)?,
            )
        }

        fn track_url(&self, song_id: &str) -> Result<Url, ListensError> {
            let mut url = self.api_url.clone();

            url.path_segments_mut()
                .map_err(|_| ListensError::InvalidEndpoint {
                    url: self.api_url.to_string(),
                })?
                .pop_if_empty()
                .push("tracks")
                .push(song_id);

            Ok(url)
        }

        async fn bearer_token(&self) -> Result<String, ListensError> {
            let mut cached = self.token.lock().await;

            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() {
                    return Ok(token.value.clone());
                }
            }

            let response: TokenResponse = self
                .client
                .post(self.auth_url.clone())
                .basic_auth(&self.client_id, Some(&self.client_secret))
                .form(&[("grant_type", "client_credentials")])
                .send()
                .await
                .map_err(http_error)?
                .error_for_status()
                .map_err(http_error)?
                .json()
                .await
                .map_err(http_error)?;

            let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
            let value = response.access_token;

            *cached = Some(BearerToken {
                value: value.clone(),
                expires_at: Instant::now() + lifetime,
            });

            Ok(value)
        }

        async fn track_exists(&self, song_id: &str) -> Result<bool, ListensError> {
            let url = self.track_url(song_id)?;
            let token = self.bearer_token().await?;

            let response = self
                .client
                .get(url)
                .bearer_auth(token)
                .send()
                .await
                .map_err(http_error)?;

            match response.status() {
                StatusCode::OK => Ok(true),
                StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => Ok(false),
                status => {
                    let body = response.text().await.unwrap_or_default();

                    Err(ListensError::UnexpectedCatalogResponse {
                        status: status.as_u16(),
                        body,
                    })
                }
            }
        }
    }

    impl super::MusicCatalog for SpotifyCatalog {
        fn song_exists(
            &self,
            song_id: &str,
            provider: MusicProvider,
        ) -> BoxFuture<Result<bool, ListensError>> {
            let song_id = song_id.to_owned();

            async move {
                match provider {
                    MusicProvider::Spotify => self.track_exists(&song_id).await,
                }
            }
            .boxed()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn catalog(api_url: &str) -> SpotifyCatalog {
            SpotifyCatalog::new(
                Client::new(),
                "id".to_owned(),
                "secret".to_owned(),
                Url::parse(api_url).unwrap(),
                Url::parse(AUTH_URL).unwrap(),
            )
            .unwrap()
        }

        #[test]
        fn track_urls_escape_the_song_id() {
            let catalog = catalog(API_URL);

            assert_eq!(
                catalog.track_url("4rNGLh1y5Kkvr4bT28yfHU").unwrap().as_str(),
                "https://api.spotify.com/v1/tracks/4rNGLh1y5Kkvr4bT28yfHU"
            );
            assert_eq!(
                catalog.track_url("../me").unwrap().as_str(),
                "https://api.spotify.com/v1/tracks/..%2Fme"
            );
        }

        #[test]
        fn track_urls_tolerate_a_missing_trailing_slash() {
            let catalog = catalog("https://api.spotify.com/v1");

            assert_eq!(
                catalog.track_url("abc").unwrap().as_str(),
                "https://api.spotify.com/v1/tracks/abc"
            );
        }

        #[test]
        fn unusable_base_urls_are_rejected() {
            let result = SpotifyCatalog::new(
                Client::new(),
                "id".to_owned(),
                "secret".to_owned(),
                Url::parse("mailto:someone@example.com").unwrap(),
                Url::parse(AUTH_URL).unwrap(),
            );

            assert!(matches!(result, Err(ListensError::InvalidEndpoint { .. })));
        }
    }
}
