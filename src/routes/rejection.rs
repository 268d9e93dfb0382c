use serde::Serialize;
use warp::reject;

use crate::errors::{ListensError, Outcome};
use crate::listen::InvalidReason;

const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: ListensError,
}

impl Rejection {
    pub fn new(context: Context, error: ListensError) -> Self {
        Rejection { context, error }
    }

    /// The body the client sees. Fatal errors are reduced to a generic
    /// message.
    pub fn flatten(&self) -> FlattenedRejection {
        if self.error.outcome() == Outcome::Fatal {
            return FlattenedRejection {
                message: INTERNAL_SERVER_ERROR_MESSAGE.to_owned(),
                error_message_by_field: None,
            };
        }

        let error_message_by_field = match &self.error {
            ListensError::InvalidInput(reason) => Some(reason.clone()),
            _ => None,
        };

        FlattenedRejection {
            message: self.error.to_string(),
            error_message_by_field,
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error_message_by_field: Option<InvalidReason>,
}

/// Which request failed, for the logs.
#[derive(Clone, Debug)]
pub enum Context {
    Submit,
    List,
    Retrieve { id: String },
    Routing { method: String, path: String },
}

impl Context {
    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn routing(method: &str, path: &str) -> Context {
        Context::Routing {
            method: method.to_owned(),
            path: path.to_owned(),
        }
    }
}
