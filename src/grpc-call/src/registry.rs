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

//! A registry of message types republished under a client library namespace.
//!
//! Client libraries often expose the messages they use, including messages
//! defined by other packages, under a single namespace. For example, a Pub/Sub
//! library may offer `google.cloud.pubsub_v1.types.Duration` for
//! `google.protobuf.Duration`. The [Registry] records these names. It starts
//! empty, and it only contains what the application explicitly registers.
//!
//! # Example
//! ```
//! # use google_cloud_grpc_call::registry::{Message, Registry};
//! struct Duration;
//! impl Message for Duration {
//!     fn typename() -> &'static str { "google.protobuf.Duration" }
//! }
//!
//! let mut registry = Registry::new("google.cloud.pubsub_v1.types");
//! registry
//!     .register::<Duration>()?
//!     .register_name("google.pubsub.v1.Topic")?;
//! assert_eq!(registry.names(), vec!["Duration", "Topic"]);
//! let entry = registry.get("Duration").expect("Duration is registered");
//! assert_eq!(entry.name(), "google.cloud.pubsub_v1.types.Duration");
//! assert_eq!(entry.source(), "google.protobuf.Duration");
//! # Ok::<(), google_cloud_grpc_call::error::Error>(())
//! ```

use crate::Result;
use crate::error::Error;
use std::collections::BTreeMap;

/// A message type that can be registered.
pub trait Message {
    /// The fully qualified name of this message, e.g. `google.protobuf.Duration`.
    fn typename() -> &'static str;
}

/// The reasons a registration may fail.
///
/// These errors are returned as the source of a configuration
/// [Error][crate::error::Error]. Use [Error::as_inner] to inspect them.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The typename is empty or has an empty component.
    #[error("invalid message typename {0:?}")]
    InvalidTypename(String),
    /// Another message is already registered with the same short name.
    #[error("cannot register {typename} as {name}, the name is already used by {existing}")]
    Conflict {
        /// The republished name.
        name: String,
        /// The typename already registered under `name`.
        existing: String,
        /// The typename that could not be registered.
        typename: String,
    },
}

/// A message republished in the registry namespace.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    name: String,
    source: String,
}

impl Entry {
    /// The republished name, i.e., `{namespace}.{short name}`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The original typename.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Maps short message names to their republished and original names.
#[derive(Clone, Debug)]
pub struct Registry {
    namespace: String,
    entries: BTreeMap<String, Entry>,
}

impl Registry {
    /// Creates an empty registry for `namespace`.
    ///
    /// With an empty namespace messages are republished under their short
    /// name, without a leading `.`.
    pub fn new<V: Into<String>>(namespace: V) -> Self {
        Self {
            namespace: namespace.into(),
            entries: BTreeMap::new(),
        }
    }

    /// The namespace where messages are republished.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registers the message type `M`.
    pub fn register<M: Message>(&mut self) -> Result<&mut Self> {
        self.register_name(M::typename())
    }

    /// Registers a message by its fully qualified typename.
    ///
    /// Registering the same typename more than once has no effect. Returns a
    /// configuration error if the typename is invalid, or if a different
    /// message already uses the same short name.
    pub fn register_name(&mut self, typename: &str) -> Result<&mut Self> {
        let short = short_name(typename)
            .ok_or_else(|| Error::configuration(RegistryError::InvalidTypename(typename.into())))?;
        if let Some(existing) = self.entries.get(short) {
            if existing.source == typename {
                return Ok(self);
            }
            return Err(Error::configuration(RegistryError::Conflict {
                name: existing.name.clone(),
                existing: existing.source.clone(),
                typename: typename.to_string(),
            }));
        }
        let name = if self.namespace.is_empty() {
            short.to_string()
        } else {
            format!("{}.{short}", self.namespace)
        };
        let entry = Entry {
            name,
            source: typename.to_string(),
        };
        tracing::debug!(name = %entry.name, source = %entry.source, "registered message");
        self.entries.insert(short.to_string(), entry);
        Ok(self)
    }

    /// Returns the entry for `short_name`, if any.
    pub fn get(&self, short_name: &str) -> Option<&Entry> {
        self.entries.get(short_name)
    }

    /// Returns the registered short names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Returns an iterator over the entries, sorted by short name.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// The number of registered messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no messages are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn short_name(typename: &str) -> Option<&str> {
    if typename.is_empty() || typename.split('.').any(str::is_empty) {
        return None;
    }
    typename.rsplit('.').next()
}
