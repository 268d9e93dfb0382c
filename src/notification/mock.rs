use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Mutex;

use crate::errors::ListensError;
use crate::listen::Listen;
use crate::notification::Notifier;

/// Records the IDs it's asked to announce. A failing notifier records
/// them and then reports an error.
#[derive(Default)]
pub struct MockNotifier {
    announced: Mutex<Vec<String>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        MockNotifier {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn announced(&self) -> Vec<String> {
        self.announced.lock().await.clone()
    }
}

impl Notifier for MockNotifier {
    fn announce_listen_added(&self, listen: &Listen) -> BoxFuture<Result<(), ListensError>> {
        let id = listen.id.clone();

        async move {
            self.announced.lock().await.push(id);

            if self.fail {
                Err(ListensError::InvalidEndpoint {
                    url: "mock://unreachable".to_owned(),
                })
            } else {
                Ok(())
            }
        }
        .boxed()
    }
}
