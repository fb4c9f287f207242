// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Cross-cutting request middleware: correlation ids, error logging and fault recovery.
//!
//! The correlation layer is the outermost layer of the router and runs once per request.  It
//! captures the inbound `X-Request-ID` header into a `RequestId` that handlers obtain as an
//! extractor and pass by reference to `log_recover`, which wraps every endpoint invocation.

use super::RestError;
use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use futures::FutureExt;
use log::{error, warn};
use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Name of the header that carries the correlation id of a request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of a request, used to tie together all log entries emitted while serving it.
///
/// The id is whatever the client (or a proxy in front of us) sent in the `X-Request-ID` header.
/// It is never generated by the server and it is empty when the header is absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestId(String);

impl RequestId {
    /// Extracts the correlation id from the request `headers`.
    fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()).unwrap_or("");
        Self(id.to_owned())
    }

    /// Returns the correlation id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attaches the request's `RequestId` to its extensions before handing it to `next`.
///
/// Install this with `axum::middleware::from_fn` as the last (outermost) layer of the router.
pub async fn correlate(mut request: Request, next: Next) -> Response {
    if request.extensions().get::<RequestId>().is_none() {
        let request_id = RequestId::from_headers(request.headers());
        request.extensions_mut().insert(request_id);
    }
    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<RequestId>().cloned().unwrap_or_default())
    }
}

/// Extracts a printable message out of a panic `payload`.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown fault".to_owned()
    }
}

/// Runs the `endpoint` future on behalf of the request identified by `request_id`.
///
/// Errors returned by the endpoint are logged and passed through.  Panics raised while polling
/// the endpoint are caught, logged and turned into an `InternalError` carrying the panic message,
/// so the request still ends with a well-formed error response.
pub async fn log_recover<F, T, E>(request_id: &RequestId, endpoint: F) -> Result<T, RestError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<RestError>,
{
    match AssertUnwindSafe(endpoint).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            let e = e.into();
            warn!("request_id={} err={}", request_id, e);
            Err(e)
        }
        Err(payload) => {
            let msg = panic_message(&*payload);
            error!("request_id={} panic={}", request_id, msg);
            Err(RestError::InternalError(msg))
        }
    }
}
