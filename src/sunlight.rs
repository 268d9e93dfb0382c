use chrono::NaiveDate;
use futures::future::BoxFuture;

use crate::errors::ListensError;
use crate::listen::SunlightWindow;

pub mod mock;

pub trait SunlightSource {
    /// Fetches when the sun rises and sets in `iana_timezone` on `on_date`.
    fn fetch_sunlight_window(
        &self,
        iana_timezone: &str,
        on_date: NaiveDate,
    ) -> BoxFuture<Result<SunlightWindow, ListensError>>;
}

pub use self::service::*;

mod service {
    use chrono::NaiveDate;
    use futures::future::{BoxFuture, FutureExt};
    use reqwest::{Client, StatusCode};
    use serde::Deserialize;
    use url::Url;

    use crate::config::{get_optional_variable, get_variable};
    use crate::errors::{http_error, ListensError};
    use crate::iso8601;
    use crate::listen::SunlightWindow;

    const DEFAULT_ENDPOINT: &str = "https://micro.morningcd.com/sunlight";
    const API_KEY_HEADER: &str = "x-api-key";

    #[derive(Deserialize)]
    struct RawSunlightWindow {
        sunrise_utc: String,
        sunset_utc: String,
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    /// Client for the sunlight microservice.
    pub struct SunlightService {
        client: Client,
        endpoint: Url,
        api_key: String,
    }

    impl SunlightService {
        pub fn new(client: Client, endpoint: Url, api_key: String) -> Self {
            Self {
                client,
                endpoint,
                api_key,
            }
        }

        pub fn from_env() -> Result<Self, ListensError> {
            let endpoint = get_optional_variable("SUNLIGHT_SERVICE_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
            let endpoint = Url::parse(&endpoint)
                .map_err(|_| ListensError::InvalidEndpoint { url: endpoint.clone() })?;

            Ok(SunlightService::new(
                Client::new(),
                endpoint,
                get_variable("SUNLIGHT_SERVICE_API_KEY"),
            ))
        }

        async fn fetch(
            &self,
            iana_timezone: &str,
            on_date: NaiveDate,
        ) -> Result<SunlightWindow, ListensError> {
            let on_date = on_date.format("%Y-%m-%d").to_string();

            let response = self
                .client
                .get(self.endpoint.clone())
                .query(&[("iana_timezone", iana_timezone), ("on_date", on_date.as_str())])
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await
                .map_err(http_error)?;

            if response.status() != StatusCode::OK {
                let message = response
                    .json::<ErrorBody>()
                    .await
                    .ok()
                    .and_then(|body| body.message)
                    .unwrap_or_default();

                return Err(ListensError::SunlightService { message });
            }

            let raw: RawSunlightWindow = response.json().await.map_err(http_error)?;

            parse_window(&raw)
        }
    }

    fn parse_window(raw: &RawSunlightWindow) -> Result<SunlightWindow, ListensError> {
        let parse = |value: &str| {
            iso8601::parse(value).ok_or_else(|| ListensError::SunlightService {
                message: format!("unparseable instant {:?}", value),
            })
        };

        SunlightWindow::new(parse(&raw.sunrise_utc)?, parse(&raw.sunset_utc)?).map_err(|e| {
            ListensError::SunlightService {
                message: e.to_string(),
            }
        })
    }

    impl super::SunlightSource for SunlightService {
        fn fetch_sunlight_window(
            &self,
            iana_timezone: &str,
            on_date: NaiveDate,
        ) -> BoxFuture<Result<SunlightWindow, ListensError>> {
            let iana_timezone = iana_timezone.to_owned();

            async move { self.fetch(&iana_timezone, on_date).await }.boxed()
        }
    }

}
