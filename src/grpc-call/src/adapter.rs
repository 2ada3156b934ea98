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

//! Adapters offering two calling conventions over one invocation.
//!
//! A [CallAdapter] wraps a synchronous [Invocation], an [AsyncCallAdapter]
//! wraps an [AsyncInvocation]. Both offer:
//!
//! * `call()`: returns only the response, discarding the call metadata.
//! * `call_with_metadata()`: returns the response and the call metadata.
//!
//! Each call, in either convention, invokes the wrapped invocation exactly
//! once. The adapters never retry, never time out on their own, and return
//! the invocation's errors unchanged.
//!
//! # Example
//! ```
//! # use google_cloud_grpc_call::adapter::AsyncCallAdapter;
//! # use google_cloud_grpc_call::metadata::CallMetadata;
//! async fn publish(topic: String) -> Result<(u64, CallMetadata), String> {
//!     // ... details omitted ...
//! #   Ok((42, CallMetadata::new().set_elapsed(std::time::Duration::from_millis(7))))
//! }
//!
//! # tokio_test::block_on(async {
//! let adapter = AsyncCallAdapter::builder()
//!     .with_invocation(publish)
//!     .with_method("google.pubsub.v1.Publisher/Publish")
//!     .build()
//!     .expect("the builder has an invocation");
//! let id = adapter.call("topic-1".to_string()).await?;
//! assert_eq!(id, 42);
//! let (id, metadata) = adapter.call_with_metadata("topic-1".to_string()).await?;
//! assert_eq!(id, 42);
//! assert!(metadata.elapsed().is_some());
//! # Ok::<(), String>(()) });
//! ```

use crate::Result;
use crate::error::Error;
use crate::invocation::{AsyncInvocation, Invocation};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::Instrument;

/// The operations offered by a synchronous call adapter.
///
/// Application code can use this trait to accept any adapter, including
/// mocks, without depending on the concrete invocation type.
pub trait ServiceCall<Args> {
    /// The application-level response.
    type Output;
    /// The metadata describing how the call went.
    type Metadata;
    /// The error raised by the call.
    type Error;

    /// Makes the call, discarding the call metadata.
    fn call(&self, args: Args) -> std::result::Result<Self::Output, Self::Error>;

    /// Makes the call, returning the response and the call metadata.
    fn call_with_metadata(
        &self,
        args: Args,
    ) -> std::result::Result<(Self::Output, Self::Metadata), Self::Error>;
}

/// The operations offered by an asynchronous call adapter.
pub trait AsyncServiceCall<Args> {
    /// The application-level response.
    type Output;
    /// The metadata describing how the call went.
    type Metadata;
    /// The error raised by the call.
    type Error;

    /// Makes the call, discarding the call metadata.
    fn call(
        &self,
        args: Args,
    ) -> impl Future<Output = std::result::Result<Self::Output, Self::Error>> + Send;

    /// Makes the call, returning the response and the call metadata.
    fn call_with_metadata(
        &self,
        args: Args,
    ) -> impl Future<Output = std::result::Result<(Self::Output, Self::Metadata), Self::Error>> + Send;
}

/// Wraps a synchronous invocation.
///
/// The adapter holds the invocation behind an [Arc]: cloning the adapter is
/// cheap, and all clones share the same invocation. The adapter has no other
/// state, it is safe to use from multiple threads if the invocation is.
///
/// # Example
/// ```
/// # use google_cloud_grpc_call::adapter::CallAdapter;
/// let invocation = |topic: &str| -> Result<(usize, &'static str), String> {
///     Ok((topic.len(), "peer-1"))
/// };
/// let adapter = CallAdapter::new(invocation);
/// assert_eq!(adapter.call("topic-1")?, 7);
/// assert_eq!(adapter.call_with_metadata("topic-1")?, (7, "peer-1"));
/// # Ok::<(), String>(())
/// ```
pub struct CallAdapter<I> {
    invocation: Arc<I>,
    method: Option<Arc<str>>,
}

impl<I> CallAdapter<I> {
    /// Creates an adapter for `invocation`.
    pub fn new(invocation: I) -> Self {
        Self {
            invocation: Arc::new(invocation),
            method: None,
        }
    }

    /// Creates an adapter for `invocation`, which may be missing.
    ///
    /// Use this function when the invocation is discovered at runtime. Returns
    /// a configuration error if the invocation is `None`.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_grpc_call::adapter::CallAdapter;
    /// type Invocation = fn(u32) -> Result<(u32, ()), String>;
    /// let missing: Option<Invocation> = None;
    /// let err = CallAdapter::<Invocation>::wrap(missing).unwrap_err();
    /// assert!(err.is_configuration());
    /// ```
    pub fn wrap<V: Into<Option<I>>>(invocation: V) -> Result<Self> {
        Builder::<I, Self>::new().with_invocation_opt(invocation).build()
    }

    /// Returns a builder to configure the adapter.
    pub fn builder() -> Builder<I, Self> {
        Builder::new()
    }

    /// Returns the RPC method name, if one was configured.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Makes the call, discarding the call metadata.
    ///
    /// Invokes the wrapped invocation exactly once and returns its response,
    /// or its error, unchanged.
    pub fn call<Args>(&self, args: Args) -> std::result::Result<I::Output, I::Error>
    where
        I: Invocation<Args>,
    {
        self.invoke(args, false).map(|(output, _)| output)
    }

    /// Makes the call, returning the response and the call metadata.
    ///
    /// Invokes the wrapped invocation exactly once and returns its response
    /// and metadata, or its error, unchanged.
    pub fn call_with_metadata<Args>(
        &self,
        args: Args,
    ) -> std::result::Result<(I::Output, I::Metadata), I::Error>
    where
        I: Invocation<Args>,
    {
        self.invoke(args, true)
    }

    fn invoke<Args>(
        &self,
        args: Args,
        with_metadata: bool,
    ) -> std::result::Result<(I::Output, I::Metadata), I::Error>
    where
        I: Invocation<Args>,
    {
        let span = call_span(self.method(), with_metadata);
        let result = {
            let _enter = span.enter();
            Invocation::invoke(self.invocation.as_ref(), args)
        };
        record_outcome(&span, result.is_ok());
        result
    }
}

impl<I> Clone for CallAdapter<I> {
    fn clone(&self) -> Self {
        Self {
            invocation: self.invocation.clone(),
            method: self.method.clone(),
        }
    }
}

impl<I> std::fmt::Debug for CallAdapter<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallAdapter")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl<I, Args> ServiceCall<Args> for CallAdapter<I>
where
    I: Invocation<Args>,
{
    type Output = I::Output;
    type Metadata = I::Metadata;
    type Error = I::Error;

    fn call(&self, args: Args) -> std::result::Result<Self::Output, Self::Error> {
        CallAdapter::call(self, args)
    }

    fn call_with_metadata(
        &self,
        args: Args,
    ) -> std::result::Result<(Self::Output, Self::Metadata), Self::Error> {
        CallAdapter::call_with_metadata(self, args)
    }
}

/// Wraps an asynchronous invocation.
///
/// Each call returns a single future, which performs exactly one invocation
/// when polled to completion. Dropping the future drops the invocation's
/// future too. The adapter adds no deadline: configure any timeout on the
/// invocation itself.
pub struct AsyncCallAdapter<I> {
    invocation: Arc<I>,
    method: Option<Arc<str>>,
}

impl<I> AsyncCallAdapter<I> {
    /// Creates an adapter for `invocation`.
    pub fn new(invocation: I) -> Self {
        Self {
            invocation: Arc::new(invocation),
            method: None,
        }
    }

    /// Creates an adapter for `invocation`, which may be missing.
    ///
    /// Returns a configuration error if the invocation is `None`.
    pub fn wrap<V: Into<Option<I>>>(invocation: V) -> Result<Self> {
        Builder::<I, Self>::new().with_invocation_opt(invocation).build()
    }

    /// Returns a builder to configure the adapter.
    pub fn builder() -> Builder<I, Self> {
        Builder::new()
    }

    /// Returns the RPC method name, if one was configured.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Makes the call, discarding the call metadata.
    pub async fn call<Args>(&self, args: Args) -> std::result::Result<I::Output, I::Error>
    where
        I: AsyncInvocation<Args>,
    {
        self.invoke(args, false).await.map(|(output, _)| output)
    }

    /// Makes the call, returning the response and the call metadata.
    pub async fn call_with_metadata<Args>(
        &self,
        args: Args,
    ) -> std::result::Result<(I::Output, I::Metadata), I::Error>
    where
        I: AsyncInvocation<Args>,
    {
        self.invoke(args, true).await
    }

    async fn invoke<Args>(
        &self,
        args: Args,
        with_metadata: bool,
    ) -> std::result::Result<(I::Output, I::Metadata), I::Error>
    where
        I: AsyncInvocation<Args>,
    {
        let span = call_span(self.method(), with_metadata);
        let result = AsyncInvocation::invoke(self.invocation.as_ref(), args)
            .instrument(span.clone())
            .await;
        record_outcome(&span, result.is_ok());
        result
    }
}

impl<I> Clone for AsyncCallAdapter<I> {
    fn clone(&self) -> Self {
        Self {
            invocation: self.invocation.clone(),
            method: self.method.clone(),
        }
    }
}

impl<I> std::fmt::Debug for AsyncCallAdapter<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCallAdapter")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl<I, Args> AsyncServiceCall<Args> for AsyncCallAdapter<I>
where
    I: AsyncInvocation<Args> + Send + Sync,
    Args: Send,
{
    type Output = I::Output;
    type Metadata = I::Metadata;
    type Error = I::Error;

    fn call(
        &self,
        args: Args,
    ) -> impl Future<Output = std::result::Result<Self::Output, Self::Error>> + Send {
        AsyncCallAdapter::call(self, args)
    }

    fn call_with_metadata(
        &self,
        args: Args,
    ) -> impl Future<Output = std::result::Result<(Self::Output, Self::Metadata), Self::Error>> + Send
    {
        AsyncCallAdapter::call_with_metadata(self, args)
    }
}

/// Configures a [CallAdapter] or an [AsyncCallAdapter].
///
/// # Example
/// ```
/// # use google_cloud_grpc_call::adapter::CallAdapter;
/// let adapter = CallAdapter::builder()
///     .with_invocation(|n: u32| Ok::<_, String>((n + 1, ())))
///     .with_method("google.test.v1.Counter/Increment")
///     .build()?;
/// assert_eq!(adapter.method(), Some("google.test.v1.Counter/Increment"));
/// assert_eq!(adapter.call(41), Ok(42));
/// # Ok::<(), google_cloud_grpc_call::error::Error>(())
/// ```
pub struct Builder<I, A> {
    invocation: Option<I>,
    method: Option<String>,
    _adapter: PhantomData<fn() -> A>,
}

impl<I, A> Builder<I, A> {
    fn new() -> Self {
        Self {
            invocation: None,
            method: None,
            _adapter: PhantomData,
        }
    }

    /// Sets the invocation wrapped by the adapter.
    pub fn with_invocation(mut self, v: I) -> Self {
        self.invocation = Some(v);
        self
    }

    /// Sets the RPC method name.
    ///
    /// The name is only used in the `grpc_call` tracing span, for example
    /// `google.pubsub.v1.Publisher/Publish`.
    pub fn with_method<V: Into<String>>(mut self, v: V) -> Self {
        self.method = Some(v.into());
        self
    }

    fn with_invocation_opt<V: Into<Option<I>>>(mut self, v: V) -> Self {
        self.invocation = v.into();
        self
    }
}

impl<I, A> Builder<I, A>
where
    A: sealed::FromParts<I>,
{
    /// Creates the adapter.
    ///
    /// Returns a configuration error if no invocation was set, or if the
    /// method name is empty.
    pub fn build(self) -> Result<A> {
        let invocation = self
            .invocation
            .ok_or_else(|| Error::configuration("the adapter requires an invocation"))?;
        let method = match self.method {
            Some(m) if m.is_empty() => {
                return Err(Error::configuration("the method name cannot be empty"));
            }
            m => m.map(Arc::<str>::from),
        };
        Ok(A::from_parts(Arc::new(invocation), method))
    }
}

impl<I, A> std::fmt::Debug for Builder<I, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("has_invocation", &self.invocation.is_some())
            .field("method", &self.method)
            .finish()
    }
}

mod sealed {
    use std::sync::Arc;

    pub trait FromParts<I> {
        fn from_parts(invocation: Arc<I>, method: Option<Arc<str>>) -> Self;
    }
}

impl<I> sealed::FromParts<I> for CallAdapter<I> {
    fn from_parts(invocation: Arc<I>, method: Option<Arc<str>>) -> Self {
        Self { invocation, method }
    }
}

impl<I> sealed::FromParts<I> for AsyncCallAdapter<I> {
    fn from_parts(invocation: Arc<I>, method: Option<Arc<str>>) -> Self {
        Self { invocation, method }
    }
}

fn call_span(method: Option<&str>, with_metadata: bool) -> tracing::Span {
    tracing::debug_span!(
        "grpc_call",
        method = method,
        with_metadata = with_metadata,
        outcome = tracing::field::Empty,
    )
}

fn record_outcome(span: &tracing::Span, ok: bool) {
    span.record("outcome", if ok { "ok" } else { "error" });
    if !ok {
        // The error belongs to the caller, only note that it happened.
        tracing::debug!(parent: span, "the invocation returned an error");
    }
}
