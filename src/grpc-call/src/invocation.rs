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

//! Defines the invocations wrapped by the call adapters.
//!
//! An invocation performs one RPC and returns the response together with the
//! call metadata. Generated stubs, hand-written transports, and mocks in tests
//! are all invocations. Functions and closures with the right signature
//! implement these traits automatically. Use a tuple for invocations that
//! need more than one argument.

use std::future::Future;

/// A synchronous invocation of a single RPC.
///
/// # Example
/// ```
/// # use google_cloud_grpc_call::invocation::Invocation;
/// fn get_topic((project, topic): (&str, &str)) -> Result<(String, u32), String> {
///     Ok((format!("projects/{project}/topics/{topic}"), 7))
/// }
/// let (name, latency) = get_topic.invoke(("my-project", "topic-1"))?;
/// assert_eq!(name, "projects/my-project/topics/topic-1");
/// assert_eq!(latency, 7);
/// # Ok::<(), String>(())
/// ```
pub trait Invocation<Args> {
    /// The application-level response.
    type Output;
    /// The metadata describing how the call went.
    type Metadata;
    /// The error raised by the RPC, typically a transport error.
    type Error;

    /// Performs the RPC.
    fn invoke(&self, args: Args) -> Result<(Self::Output, Self::Metadata), Self::Error>;
}

impl<F, Args, T, M, E> Invocation<Args> for F
where
    F: Fn(Args) -> Result<(T, M), E>,
{
    type Output = T;
    type Metadata = M;
    type Error = E;

    fn invoke(&self, args: Args) -> Result<(T, M), E> {
        self(args)
    }
}

/// An asynchronous invocation of a single RPC.
///
/// Each call to [invoke][AsyncInvocation::invoke] returns one pending unit of
/// work. Any deadline or cancellation support belongs to the returned future.
///
/// # Example
/// ```
/// # use google_cloud_grpc_call::invocation::AsyncInvocation;
/// async fn get_topic(topic: String) -> Result<(usize, ()), String> {
///     Ok((topic.len(), ()))
/// }
/// # tokio_test::block_on(async {
/// let (len, _) = get_topic.invoke("topic-1".to_string()).await?;
/// assert_eq!(len, 7);
/// # Ok::<(), String>(()) });
/// ```
pub trait AsyncInvocation<Args> {
    /// The application-level response.
    type Output;
    /// The metadata describing how the call went.
    type Metadata;
    /// The error raised by the RPC, typically a transport error.
    type Error;

    /// Starts the RPC.
    fn invoke(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<(Self::Output, Self::Metadata), Self::Error>> + Send;
}

impl<F, Fut, Args, T, M, E> AsyncInvocation<Args> for F
where
    F: Fn(Args) -> Fut,
    Fut: Future<Output = Result<(T, M), E>> + Send,
{
    type Output = T;
    type Metadata = M;
    type Error = E;

    fn invoke(&self, args: Args) -> impl Future<Output = Result<(T, M), E>> + Send {
        self(args)
    }
}
