//! async-std runtime implementation.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use super::Spawner;

/// async-std task spawner.
pub struct AsyncStdSpawner;

impl Spawner for AsyncStdSpawner {
    type JoinHandle<T: Send + 'static> = AsyncStdJoinHandle<T>;

    fn spawn<F, T>(future: F) -> Self::JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        AsyncStdJoinHandle(async_std::task::spawn(future))
    }
}

/// Wrapper around async-std's JoinHandle.
///
/// Dropping the handle detaches the task.
pub struct AsyncStdJoinHandle<T>(async_std::task::JoinHandle<T>);

impl<T> Future for AsyncStdJoinHandle<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

/// Sleep for the specified duration using async-std.
pub async fn sleep_impl(duration: Duration) {
    async_std::task::sleep(duration).await
}

/// Spawn a task using async-std.
pub fn spawn<F, T>(future: F) -> AsyncStdJoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    AsyncStdSpawner::spawn(future)
}
