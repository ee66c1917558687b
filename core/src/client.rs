//! Typed JSON round trip over HTTP.
//!
//! # Design
//! Every call builds its own `ureq::Agent` configured with the request's
//! timeout, performs exactly one exchange, and drops the agent before
//! returning. No connection pool, cache or other state outlives a call, so
//! concurrent calls from separate threads are fully independent.
//!
//! Status codes are judged here rather than by the transport: anything
//! outside `200..300` becomes `FetchError::UnexpectedStatus` and the body is
//! discarded unread by the decoder. Successful bodies are buffered whole and
//! decoded with `serde_json`.

use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use ureq::http::{Request, Response};
use ureq::Body;

use crate::error::{FetchError, Result};
use crate::http::{Headers, JsonRequest};

/// Perform one GET and decode the JSON response into `T`.
///
/// ```ignore
/// #[derive(serde::Deserialize)]
/// struct Item { id: u32, name: String }
///
/// let item: Item = jsonfetch::get("https://api.example.com/item", None, Duration::from_secs(10))?;
/// ```
pub fn get<T: DeserializeOwned>(url: &str, headers: Option<&Headers>, timeout: Duration) -> Result<T> {
    execute(&prepare(JsonRequest::get(url), headers, timeout))
}

/// Perform one POST with `body` encoded as JSON and decode the response into `T`.
pub fn post<T, B>(url: &str, body: &B, headers: Option<&Headers>, timeout: Duration) -> Result<T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    execute(&prepare(JsonRequest::post(url, body)?, headers, timeout))
}

/// Like `get`, but writes the decoded value into `dest` and hands it back.
///
/// On error `dest` is left as it was; callers should still treat its
/// contents as meaningless after a failed call.
pub fn get_into<'a, T: DeserializeOwned>(
    url: &str,
    dest: &'a mut T,
    headers: Option<&Headers>,
    timeout: Duration,
) -> Result<&'a mut T> {
    *dest = get(url, headers, timeout)?;
    Ok(dest)
}

/// Like `post`, but writes the decoded value into `dest` and hands it back.
pub fn post_into<'a, T, B>(
    url: &str,
    body: &B,
    dest: &'a mut T,
    headers: Option<&Headers>,
    timeout: Duration,
) -> Result<&'a mut T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    *dest = post(url, body, headers, timeout)?;
    Ok(dest)
}

fn prepare(request: JsonRequest, headers: Option<&Headers>, timeout: Duration) -> JsonRequest {
    let request = match headers {
        Some(headers) => request.with_headers(headers),
        None => request,
    };
    request.with_timeout(timeout)
}

/// Send `request` and decode a 2xx JSON response into `T`.
pub fn execute<T: DeserializeOwned>(request: &JsonRequest) -> Result<T> {
    let agent = agent(request.timeout);

    debug!("{} {}", request.method.as_str(), request.url);
    let sent = match &request.body {
        Some(bytes) => agent.run(build(request, bytes.as_slice())?),
        None => agent.run(build(request, ())?),
    };
    let mut response = sent.map_err(transport_error)?;

    let status = response.status().as_u16();
    debug!("{} {} -> {status}", request.method.as_str(), request.url);
    if let Err(e) = check_status(status) {
        discard(response, &request.url);
        return Err(e);
    }

    let bytes = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(FetchError::ReadBody)?;

    serde_json::from_slice(&bytes).map_err(FetchError::Decode)
}

/// Accept `200..300`, reject every other status.
pub fn check_status(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(FetchError::UnexpectedStatus { status })
    }
}

/// A fresh agent for one call. Statuses, 3xx included, are left for
/// `check_status`, so redirects are never followed.
fn agent(timeout: Duration) -> ureq::Agent {
    let timeout = (!timeout.is_zero()).then_some(timeout);
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .max_redirects(0)
        .timeout_global(timeout)
        .build()
        .new_agent()
}

fn build<B>(request: &JsonRequest, body: B) -> Result<Request<B>> {
    let mut builder = Request::builder()
        .method(request.method.as_str())
        .uri(request.url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(body)
        .map_err(|e| FetchError::Construction(e.to_string()))
}

fn transport_error(e: ureq::Error) -> FetchError {
    match e {
        ureq::Error::BadUri(msg) => FetchError::Construction(msg),
        other => FetchError::Transport(other),
    }
}

/// Drain and drop a rejected response. Failing to do so is only logged.
fn discard(mut response: Response<Body>, url: &str) {
    match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
        Ok(bytes) => debug!("discarded {} byte body from {url}", bytes.len()),
        Err(e) => warn!("error draining rejected response body from {url}: {e}"),
    }
}
