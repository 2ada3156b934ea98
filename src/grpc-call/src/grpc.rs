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

//! Helpers to write invocations on top of [tonic] clients.
//!
//! A tonic unary call returns a `tonic::Response<T>`, which carries the
//! initial metadata next to the message. [with_call] splits that response into
//! the `(T, CallMetadata)` pair expected by the adapters. Errors are
//! `tonic::Status` values, which the adapters return unchanged.
//!
//! # Example
//! ```
//! # use google_cloud_grpc_call::adapter::AsyncCallAdapter;
//! # use google_cloud_grpc_call::grpc::with_call;
//! # use google_cloud_grpc_call::metadata::CallMetadata;
//! async fn get_topic(name: String) -> Result<(String, CallMetadata), tonic::Status> {
//!     // A generated client would make the RPC here.
//!     let response = tonic::Response::new(name);
//!     Ok(with_call(response))
//! }
//!
//! # tokio_test::block_on(async {
//! let adapter = AsyncCallAdapter::new(get_topic);
//! let topic = adapter.call("projects/p/topics/t".to_string()).await?;
//! assert_eq!(topic, "projects/p/topics/t");
//! # Ok::<(), tonic::Status>(()) });
//! ```

use crate::metadata::CallMetadata;
use std::time::Instant;

/// Splits a tonic response into the message and its call metadata.
///
/// The initial metadata becomes [CallMetadata::headers]. Unary tonic
/// responses do not expose the trailers separately, those are left empty.
pub fn with_call<T>(response: tonic::Response<T>) -> (T, CallMetadata) {
    let (metadata, message, _extensions) = response.into_parts();
    let metadata = CallMetadata::new().set_headers(metadata.into_headers());
    (message, metadata)
}

/// Like [with_call], also recording the time elapsed since `start`.
///
/// # Example
/// ```
/// # use google_cloud_grpc_call::grpc::with_call_timed;
/// let start = std::time::Instant::now();
/// // ... make the RPC ...
/// let response = tonic::Response::new(42);
/// let (message, metadata) = with_call_timed(response, start);
/// assert_eq!(message, 42);
/// assert!(metadata.elapsed().is_some());
/// ```
pub fn with_call_timed<T>(response: tonic::Response<T>, start: Instant) -> (T, CallMetadata) {
    let (message, metadata) = with_call(response);
    (message, metadata.set_elapsed(start.elapsed()))
}

/// Converts the metadata attached to a failed call.
///
/// A `tonic::Status` may carry metadata, including the trailers of a
/// "trailers-only" response. The adapters never convert errors, applications
/// use this function when they want to inspect the metadata of a failure.
pub fn status_metadata(status: &tonic::Status) -> CallMetadata {
    CallMetadata::new().set_trailers(status.metadata().clone().into_headers())
}
