use std::sync::Arc;

use log::{debug, error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::Outcome;

pub mod admin;
mod handlers;
pub mod query;
mod rejection;
mod request;
mod response;
pub mod router;

pub use filters::*;

/// Turns our own rejections into JSON replies. Anything else is left
/// for warp.
pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let outcome = r.error.outcome();
        let status = status_code_for(outcome);

        if outcome == Outcome::Fatal {
            error!(logger, "Listens error"; "context" => ?r.context, "error" => r.error.chain(), "status" => %status);
        } else {
            debug!(logger, "Request refused"; "context" => ?r.context, "status" => %status, "message" => %r.error);
        }

        return Ok(with_status(json(&r.flatten()), status));
    }

    Err(rej)
}

fn status_code_for(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::ClientError => StatusCode::BAD_REQUEST,
        Outcome::PreconditionRequired => StatusCode::PRECONDITION_REQUIRED,
        Outcome::NotFound => StatusCode::NOT_FOUND,
        Outcome::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod filters {
    use warp::filters::BoxedFilter;
    use warp::Filter;
    use warp::Reply;

    use super::{handlers, query::ListensParams};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    /// Every request on the main port. Which use-case runs is decided
    /// by [`super::router::Route::resolve`], not by warp.
    pub fn make_listens_route(environment: Environment) -> Route {
        warp::any()
            .map(move || environment.clone())
            .and(warp::method())
            .and(warp::path::full())
            .and(warp::query::<ListensParams>())
            .and(warp::body::bytes())
            .and_then(handlers::dispatch)
            .boxed()
    }
}
