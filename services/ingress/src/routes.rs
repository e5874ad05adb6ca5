//! HTTP routes
//!
//! `POST /messages/{type}` builds a message from the request and delivers it
//! to the runtime. The response only reports acceptance into the mailbox;
//! the handler never waits for an actor.

use crate::constants::{errors, MESSAGES_PATH};
use crate::factory::MessageFactory;
use bytes::Bytes;
use mailbox_runtime::Runtime;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};
use warp::http::StatusCode;
use warp::path::Tail;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Serialize)]
struct Accepted<'a> {
    accepted: bool,
    message_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// All ingress routes
pub fn routes(
    runtime: Arc<dyn Runtime>,
    factory: MessageFactory,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    messages(runtime, factory).or(health())
}

/// `POST /messages/{type}` with body `{ "payload": <any> }`
pub fn messages(
    runtime: Arc<dyn Runtime>,
    factory: MessageFactory,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path(MESSAGES_PATH)
        .and(warp::post())
        .and(warp::path::tail())
        .and(warp::body::bytes())
        .and(warp::any().map(move || Arc::clone(&runtime)))
        .and(warp::any().map(move || factory.clone()))
        .and_then(handle_delivery)
}

/// `GET /health` liveness probe
pub fn health() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK))
}

async fn handle_delivery(
    tail: Tail,
    body: Bytes,
    runtime: Arc<dyn Runtime>,
    factory: MessageFactory,
) -> Result<WithStatus<Json>, Rejection> {
    let segment = match type_segment(tail.as_str()) {
        Some(segment) => segment,
        None => return Err(warp::reject::not_found()),
    };

    let message_type = match urlencoding::decode(segment) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(segment = %segment, error = %e, "Rejected delivery with undecodable message type");
            return Ok(error_reply(errors::INVALID_TYPE, StatusCode::BAD_REQUEST));
        }
    };

    Ok(accept(&message_type, &body, runtime.as_ref(), &factory))
}

/// Single path segment after `/messages/`, ignoring one trailing slash.
///
/// `None` when there is no segment (`/messages`, `/messages/`) or more than
/// one (`/messages/a/b`).
fn type_segment(tail: &str) -> Option<&str> {
    let segment = tail.strip_suffix('/').unwrap_or(tail);
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    Some(segment)
}

/// Build, deliver and acknowledge a single request
fn accept(
    message_type: &str,
    body: &[u8],
    runtime: &dyn Runtime,
    factory: &MessageFactory,
) -> WithStatus<Json> {
    if message_type.is_empty() {
        warn!("Rejected delivery without a message type");
        return error_reply(errors::MISSING_TYPE, StatusCode::BAD_REQUEST);
    }

    let payload = match extract_payload(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(message_type = %message_type, error = %e, "Rejected delivery with invalid JSON body");
            return error_reply(errors::INVALID_BODY, StatusCode::BAD_REQUEST);
        }
    };

    let message = Arc::new(factory.build(message_type, payload));
    let message_id = message.message_id.clone();

    if let Err(e) = runtime.deliver(message) {
        error!(
            message_type = %message_type,
            message_id = %message_id,
            error = %e,
            "Runtime failed to accept message"
        );
        return error_reply(errors::DELIVERY_FAILED, StatusCode::INTERNAL_SERVER_ERROR);
    }

    debug!(
        message_type = %message_type,
        message_id = %message_id,
        source = %factory.source(),
        "Message accepted"
    );
    warp::reply::with_status(
        warp::reply::json(&Accepted {
            accepted: true,
            message_id: &message_id,
        }),
        StatusCode::ACCEPTED,
    )
}

/// Pull `payload` out of the request body.
///
/// An empty body, a body without `payload`, or a JSON value that is not an
/// object all yield `null`.
fn extract_payload(body: &[u8]) -> serde_json::Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(mut fields) => Ok(fields.remove("payload").unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

fn error_reply(message: &str, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error: message }), status)
}
