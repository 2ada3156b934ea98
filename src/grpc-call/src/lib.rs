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

//! Call adapters for RPCs.
//!
//! Most applications only want the result of an RPC. A few, typically for
//! tracing or diagnostics, also want the metadata that accompanied the call:
//! the initial headers, the trailers, the peer, or how long it took. This
//! crate wraps a single invocation and offers both calling conventions over
//! it. Either way, the underlying RPC runs exactly once per call.
//!
//! # Example
//! ```
//! # use google_cloud_grpc_call::adapter::CallAdapter;
//! # use google_cloud_grpc_call::metadata::CallMetadata;
//! let invocation = |topic: &str| -> Result<(usize, CallMetadata), String> {
//!     Ok((topic.len(), CallMetadata::new().set_peer("ipv4:10.0.0.1:443")))
//! };
//! let publish = CallAdapter::new(invocation);
//!
//! let len = publish.call("topic-1")?;
//! assert_eq!(len, 7);
//!
//! let (len, metadata) = publish.call_with_metadata("topic-1")?;
//! assert_eq!(len, 7);
//! assert_eq!(metadata.peer(), Some("ipv4:10.0.0.1:443"));
//! # Ok::<(), String>(())
//! ```

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// Only the configuration functions in this crate return this type. The
/// adapters return whatever error the wrapped invocation returns.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The error type for misconfigured adapters and registries.
pub mod error;

pub mod adapter;
pub mod invocation;
pub mod metadata;
pub mod registry;

/// Conversions from [tonic] responses.
#[cfg(feature = "grpc")]
pub mod grpc;
