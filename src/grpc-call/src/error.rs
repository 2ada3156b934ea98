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

use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error returned when an adapter or registry cannot be configured.
///
/// Errors raised by a wrapped invocation never use this type. The adapters
/// return those errors exactly as the invocation produced them, so
/// applications can inspect any transport-specific detail.
///
/// # Example
/// ```
/// use google_cloud_grpc_call::adapter::CallAdapter;
/// use google_cloud_grpc_call::error::Error;
/// type Invocation = fn(u32) -> Result<(u32, ()), String>;
///
/// match CallAdapter::<Invocation>::wrap(None) {
///     Err(e) if e.is_configuration() => println!("bad configuration {e}"),
///     Err(e) => println!("some other error {e}"),
///     Ok(_) => println!("unexpected success"),
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error representing an invalid configuration.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_cloud_grpc_call::error::Error;
    /// let error = Error::configuration("missing invocation");
    /// assert!(error.is_configuration());
    /// assert!(error.source().is_some());
    /// ```
    pub fn configuration<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Configuration,
            source: Some(source.into()),
        }
    }

    /// The adapter or registry was configured with invalid or missing values.
    ///
    /// This is always a client-side generated error, detected before any RPC
    /// is attempted.
    ///
    /// # Troubleshooting
    ///
    /// The most common cause is building an adapter without an invocation, for
    /// example when the invocation is looked up dynamically and the lookup
    /// returns nothing. The error source describes the missing value.
    pub fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration)
    }

    /// Recurses through the source error chain and returns a reference to the
    /// inner value if it is of type `T`, or `None` if no such inner value is
    /// found.
    pub fn as_inner<T: StdError + Send + Sync + 'static>(&self) -> Option<&T> {
        let mut error = self.source.as_ref()?.as_ref() as &(dyn StdError + 'static);
        loop {
            if let Some(inner) = error.downcast_ref::<T>() {
                return Some(inner);
            }
            error = error.source()?;
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Configuration, Some(e)) => {
                write!(f, "the call adapter configuration is invalid: {e}")
            }
            (ErrorKind::Configuration, None) => {
                write!(f, "the call adapter configuration is invalid")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Configuration,
}
