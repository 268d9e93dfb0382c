use chrono::NaiveDate;
use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Mutex;

use crate::errors::ListensError;
use crate::listen::SunlightWindow;
use crate::sunlight::SunlightSource;

/// Answers every request with the same window, or the same failure,
/// remembering what was asked.
pub struct MockSunlight {
    window: Result<SunlightWindow, String>,
    requests: Mutex<Vec<(String, NaiveDate)>>,
}

impl MockSunlight {
    pub fn new(window: SunlightWindow) -> Self {
        MockSunlight {
            window: Ok(window),
            requests: Mutex::new(vec![]),
        }
    }

    /// A source whose every request fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        MockSunlight {
            window: Err(message.into()),
            requests: Mutex::new(vec![]),
        }
    }

    /// The timezones and dates asked about so far.
    pub async fn requests(&self) -> Vec<(String, NaiveDate)> {
        self.requests.lock().await.clone()
    }
}

impl SunlightSource for MockSunlight {
    fn fetch_sunlight_window(
        &self,
        iana_timezone: &str,
        on_date: NaiveDate,
    ) -> BoxFuture<Result<SunlightWindow, ListensError>> {
        let iana_timezone = iana_timezone.to_owned();

        async move {
            self.requests.lock().await.push((iana_timezone, on_date));

            self.window
                .clone()
                .map_err(|message| ListensError::SunlightService { message })
        }
        .boxed()
    }
}
