use std::time::{Duration, Instant};

use bytes::Bytes;
use log::{debug, o};
use warp::{
    http::Method,
    path::FullPath,
    reject,
    reply::{json, with_header, Reply},
};

use crate::environment::Environment;
use crate::errors::ListensError;
use crate::iso8601;
use crate::routes::{
    query::ListensParams,
    rejection::{Context, Rejection},
    request::SubmitListenRequest,
    response::SuccessResponse,
    router::Route,
};
use crate::validation::check_invalid;
use crate::workflow::{get_listen, get_listens, submit_listen};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($body:tt)*) => {{
        let start = Instant::now();

        // errors return early, so only successful replies are timed
        let result = { $($body)* };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    }};
}

/// Hands the request to whichever use-case its method and path name.
pub async fn dispatch(
    environment: Environment,
    method: Method,
    path: FullPath,
    params: ListensParams,
    body: Bytes,
) -> RouteResult {
    let route = Route::resolve(
        method.as_str(),
        path.as_str(),
        &environment.config.collection_path,
    )
    .map_err(|e: ListensError| Rejection::new(Context::routing(method.as_str(), path.as_str()), e))?;

    match route {
        Route::Submit => submit(environment, body).await,
        Route::List => list(environment, params).await,
        Route::Fetch(id) => retrieve(environment, id).await,
    }
}

async fn submit(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let error_handler = |e: ListensError| Rejection::new(Context::Submit, e);

        let request: SubmitListenRequest = serde_json::from_slice(&body)
            .map_err(|e| ListensError::MalformedRequest(e.to_string()))
            .map_err(error_handler)?;
        let input = request.into_input(iso8601::now());

        if let Some(reason) = check_invalid(&input) {
            return Err(reject::custom(error_handler(ListensError::InvalidInput(reason))));
        }

        let logger = environment.logger.new(o!(
            "route" => "submit",
            "song_id" => input.song_id.clone(),
            "listener_name" => input.listener_name.clone(),
        ));

        debug!(logger, "Submitting listen...");
        let listen = submit_listen(&environment.context(&logger), input)
            .await
            .map_err(error_handler)?;
        debug!(logger, "Listen submitted"; "id" => &listen.id);

        json(&listen)
    }
}

async fn list(environment: Environment, params: ListensParams) -> RouteResult {
    timed! {
        let error_handler = |e: ListensError| Rejection::new(Context::List, e);

        let query = params
            .into_query(environment.config.default_limit)
            .map_err(error_handler)?;

        let logger = environment.logger.new(o!("route" => "list"));
        debug!(logger, "Listing listens..."; "limit" => query.limit, "sort_order" => ?query.sort_order);

        let items = get_listens(&environment.context(&logger), query)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Listens { items: &items })
    }
}

async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: ListensError| Rejection::new(Context::retrieve(id.clone()), e);

        let logger = environment.logger.new(o!("route" => "retrieve", "id" => id.clone()));
        debug!(logger, "Retrieving listen...");

        let listen = get_listen(&environment.context(&logger), &id)
            .await
            .map_err(error_handler)?;

        json(&listen)
    }
}

fn format_server_timing(elapsed: Duration) -> String {
    format!("handler;dur={}", elapsed.as_secs_f64() * 1000.0)
}
