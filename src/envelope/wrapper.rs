//! Response envelope for request handlers
//!
//! Every handler result leaves the system through an `Envelope`: a fixed
//! `{data, message, time}` body plus a transport status for the HTTP layer.
//! Failures are absorbed here, logged for the operator, and reported to the
//! caller as a short message; nothing re-raises past the wrapper.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::{Serialize, Serializer};

/// Success marker returned in every successful envelope
const OK_MESSAGE: &str = "200 OK";

/// Normalized result of a wrapped handler call
///
/// The serialized field names `data`, `message` and `time` are a transport
/// contract; `status_code` is consumed by the HTTP layer and never appears
/// in the body.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    /// The handler's result, or the type's default when the call failed
    pub data: T,
    /// `"200 OK"`, or `"Error "` followed by the failure description
    pub message: String,
    /// Wall-clock duration of the call, serialized as fractional seconds
    #[serde(serialize_with = "duration_as_secs")]
    pub time: Duration,
    /// Effective transport status for this result
    #[serde(skip)]
    pub status_code: StatusCode,
}

fn duration_as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl<T> Envelope<T> {
    fn success(data: T, time: Duration) -> Self {
        Self {
            data,
            message: OK_MESSAGE.to_string(),
            time,
            status_code: StatusCode::OK,
        }
    }

    fn failure(error: impl Display, time: Duration, status_code: StatusCode) -> Self
    where
        T: Default,
    {
        Self {
            data: T::default(),
            message: format!("Error {error}"),
            time,
            status_code,
        }
    }
}

/// Runs async handler work and converts the outcome into an `Envelope`
///
/// On success the envelope carries the handler's data, `"200 OK"` and
/// status 200. On failure the error is logged, `data` falls back to the
/// type's default, `message` carries the failure text and the status is
/// 500. Elapsed time is measured across the whole call on both branches.
pub async fn wrap<T, E, F, Fut>(work: F) -> Envelope<T>
where
    T: Default,
    E: Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = work().await;
    finish(result, start, StatusCode::INTERNAL_SERVER_ERROR)
}

/// Synchronous twin of [`wrap`] with an identical envelope contract
pub fn wrap_sync<T, E>(work: impl FnOnce() -> Result<T, E>) -> Envelope<T>
where
    T: Default,
    E: Display,
{
    let start = Instant::now();
    let result = work();
    finish(result, start, StatusCode::INTERNAL_SERVER_ERROR)
}

/// Acknowledgment variant of [`wrap`] for push-delivery endpoints
///
/// Reports status 200 even on failure; a non-success status would make the
/// push sender redeliver the message indefinitely. The failure is still
/// logged and recorded in `message`.
pub async fn wrap_ack<T, E, F, Fut>(work: F) -> Envelope<T>
where
    T: Default,
    E: Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = work().await;
    finish(result, start, StatusCode::OK)
}

fn finish<T, E>(result: Result<T, E>, start: Instant, failure_status: StatusCode) -> Envelope<T>
where
    T: Default,
    E: Display,
{
    let time = start.elapsed();
    match result {
        Ok(data) => Envelope::success(data, time),
        Err(error) => {
            tracing::error!(%error, "wrapped handler failed");
            Envelope::failure(error, time, failure_status)
        }
    }
}
