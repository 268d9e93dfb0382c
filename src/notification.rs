use futures::future::BoxFuture;

use crate::errors::ListensError;
use crate::listen::Listen;

pub mod mock;

pub trait Notifier {
    /// Tells other systems that `listen` was just stored.
    fn announce_listen_added(&self, listen: &Listen) -> BoxFuture<Result<(), ListensError>>;
}

pub use self::sns::*;

mod sns {
    use std::sync::Arc;

    use futures::future::{BoxFuture, FutureExt};
    use log::{info, Logger};
    use rusoto_core::request::{HttpClient, TlsError};
    use rusoto_core::Region;
    use rusoto_credential::StaticProvider;
    use rusoto_sns::{PublishInput, Sns, SnsClient};
    use serde::Serialize;

    use crate::config::get_variable;
    use crate::errors::ListensError;
    use crate::listen::Listen;

    #[derive(Serialize)]
    struct ListenAdded<'a> {
        listen_id: &'a str,
    }

    fn encode(listen: &Listen) -> Result<String, ListensError> {
        serde_json::to_string(&ListenAdded {
            listen_id: &listen.id,
        })
        .map_err(|source| ListensError::Encoding { source })
    }

    /// Publishes `{"listen_id": ...}` to an SNS topic.
    pub struct SnsNotifier {
        client: SnsClient,
        topic_arn: String,
    }

    impl SnsNotifier {
        pub fn new(client: SnsClient, topic_arn: String) -> Self {
            Self { client, topic_arn }
        }

        pub fn from_env(topic_arn: String) -> Result<Self, TlsError> {
            let access_key = get_variable("SNS_ACCESS_KEY");
            let secret_access_key = get_variable("SNS_SECRET_ACCESS_KEY");

            let region: Region = get_variable("SNS_REGION")
                .parse()
                .expect("parse SNS_REGION as an AWS region");

            let client = SnsClient::new_with(
                HttpClient::new()?,
                StaticProvider::new_minimal(access_key, secret_access_key),
                region,
            );

            Ok(SnsNotifier::new(client, topic_arn))
        }
    }

    impl super::Notifier for SnsNotifier {
        fn announce_listen_added(&self, listen: &Listen) -> BoxFuture<Result<(), ListensError>> {
            let message = encode(listen);

            async move {
                let request = PublishInput {
                    message: message?,
                    topic_arn: Some(self.topic_arn.clone()),
                    ..Default::default()
                };

                self.client
                    .publish(request)
                    .await
                    .map(|_| ())
                    .map_err(|source| ListensError::Publish { source })
            }
            .boxed()
        }
    }

    /// Writes announcements to the log instead of sending them anywhere.
    pub struct LogNotifier {
        logger: Arc<Logger>,
    }

    impl LogNotifier {
        pub fn new(logger: Arc<Logger>) -> Self {
            Self { logger }
        }
    }

    impl super::Notifier for LogNotifier {
        fn announce_listen_added(&self, listen: &Listen) -> BoxFuture<Result<(), ListensError>> {
            let message = encode(listen);

            async move {
                let message = message?;
                info!(self.logger, "Listen added"; "message" => message);

                Ok(())
            }
            .boxed()
        }
    }

}
