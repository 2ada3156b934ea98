// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Call metadata types.
//!
//! The adapters treat the metadata returned by an invocation as an opaque
//! value, any type works. This module provides [CallMetadata], a
//! convenient representation for gRPC calls, used by the conversions in the
//! `grpc` feature.
//!
//! # Example
//!
//! Creating metadata for mocks
//!
//! ```
//! # use google_cloud_grpc_call::metadata::CallMetadata;
//! let mut trailers = http::HeaderMap::new();
//! trailers.insert("grpc-status", http::HeaderValue::from_static("0"));
//! let metadata = CallMetadata::new()
//!     .set_trailers(trailers)
//!     .set_elapsed(std::time::Duration::from_millis(7));
//! assert_eq!(metadata.grpc_status(), Some(0));
//! assert_eq!(metadata.elapsed(), Some(std::time::Duration::from_millis(7)));
//! ```

use std::time::Duration;

const GRPC_STATUS: &str = "grpc-status";

/// Describes how a RPC went.
///
/// The metadata of a gRPC call consists of the initial metadata (sent by the
/// service before the response), the trailing metadata (sent after the
/// response), and some information known only to the client, such as the
/// peer address and the elapsed time.
///
/// The initial and trailing metadata are represented as HTTP headers, which is
/// how they are sent over the wire.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct CallMetadata {
    /// The initial metadata converted to HTTP headers.
    pub headers: http::HeaderMap<http::HeaderValue>,
    /// The trailing metadata converted to HTTP headers.
    pub trailers: http::HeaderMap<http::HeaderValue>,
    /// The address of the peer that served the call, if known.
    pub peer: Option<String>,
    /// How long the call took, as measured by the invocation.
    pub elapsed: Option<Duration>,
}

impl CallMetadata {
    /// Create a new, empty instance.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_grpc_call::metadata::CallMetadata;
    /// let metadata = CallMetadata::new();
    /// assert!(metadata.headers().is_empty());
    /// assert!(metadata.trailers().is_empty());
    /// assert!(metadata.peer().is_none());
    /// ```
    pub fn new() -> Self {
        CallMetadata::default()
    }

    /// Set the initial metadata.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_grpc_call::metadata::CallMetadata;
    /// let mut headers = http::HeaderMap::new();
    /// headers.insert(
    ///     http::header::CONTENT_TYPE,
    ///     http::HeaderValue::from_static("application/grpc"),
    /// );
    /// let metadata = CallMetadata::new().set_headers(headers.clone());
    /// assert_eq!(metadata.headers(), &headers);
    /// ```
    pub fn set_headers<V>(mut self, v: V) -> Self
    where
        V: Into<http::HeaderMap>,
    {
        self.headers = v.into();
        self
    }

    /// Set the trailing metadata.
    pub fn set_trailers<V>(mut self, v: V) -> Self
    where
        V: Into<http::HeaderMap>,
    {
        self.trailers = v.into();
        self
    }

    /// Set the peer address.
    pub fn set_peer<V: Into<String>>(mut self, v: V) -> Self {
        self.peer = Some(v.into());
        self
    }

    /// Set the elapsed time.
    pub fn set_elapsed<V: Into<Duration>>(mut self, v: V) -> Self {
        self.elapsed = Some(v.into());
        self
    }

    /// Returns the initial metadata.
    pub fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        &self.headers
    }

    /// Returns the trailing metadata.
    pub fn trailers(&self) -> &http::HeaderMap<http::HeaderValue> {
        &self.trailers
    }

    /// Returns the peer address, if known.
    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    /// Returns the elapsed time, if known.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Returns the gRPC status code found in the trailers, if any.
    ///
    /// Some servers send "trailers-only" responses, where the status is part
    /// of the initial metadata. This function checks the trailers first, then
    /// the headers.
    pub fn grpc_status(&self) -> Option<i32> {
        self.trailers
            .get(GRPC_STATUS)
            .or_else(|| self.headers.get(GRPC_STATUS))
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i32>().ok())
    }
}
