// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Bounded fan-out of asynchronous fetch tasks.
///
/// Every submitted task is spawned, but its body only starts once a semaphore
/// permit is available, so at most `limit` bodies run at the same time. The
/// executor waits for all tasks to settle and then reports either every result
/// in submission order or the first error observed.
use std::{future::Future, sync::Arc};

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, warn};

use crate::error::Error;

/// Maximum number of remote requests in flight at once.
pub const CONCURRENCY_LIMIT: usize = 6;

/// Runs batches of tasks under a fixed concurrency ceiling.
#[derive(Debug, Clone,)]
pub struct BoundedExecutor
{
    limit: usize,
}

impl Default for BoundedExecutor
{
    fn default() -> Self
    {
        Self::new(CONCURRENCY_LIMIT,)
    }
}

impl BoundedExecutor
{
    /// Creates an executor; a zero limit is raised to one.
    pub fn new(limit: usize,) -> Self
    {
        Self {
            limit: limit.max(1,),
        }
    }

    pub fn limit(&self,) -> usize
    {
        self.limit
    }

    /// Runs every task and returns their outputs in submission order.
    ///
    /// Tasks are never cancelled: when one fails the others still run to
    /// completion and their results are discarded.
    ///
    /// # Errors
    ///
    /// Returns the first task error in completion order, or
    /// [`Error::Internal`] when a task panics.
    ///
    /// # Example
    ///
    /// ```
    /// use profile_stats::{BoundedExecutor, Error};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), Error> {
    /// let executor = BoundedExecutor::new(2,);
    /// let tasks: Vec<_,> =
    ///     (1..=3u32).map(|value| move || async move { Ok::<_, Error,>(value * 10,) },).collect();
    /// let results = executor.run(tasks,).await?;
    /// assert_eq!(results, vec![10, 20, 30]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<T, F, Fut,>(&self, tasks: Vec<F,>,) -> Result<Vec<T,>, Error,>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, Error,>,> + Send + 'static,
    {
        let total = tasks.len();
        if total == 0 {
            return Ok(Vec::new(),);
        }

        debug!("Running {} tasks with concurrency limit {}", total, self.limit);

        let semaphore = Arc::new(Semaphore::new(self.limit,),);
        let mut join_set: JoinSet<(usize, Result<T, Error,>,),> = JoinSet::new();

        for (position, task,) in tasks.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore,);
            join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit,) => permit,
                    Err(_,) => {
                        return (position, Err(Error::internal("semaphore closed unexpectedly",),),);
                    }
                };
                (position, task().await,)
            },);
        }

        let mut slots: Vec<Option<T,>,> = (0..total).map(|_| None,).collect();
        let mut first_error: Option<Error,> = None;

        while let Some(joined,) = join_set.join_next().await {
            let outcome = match joined {
                Ok((position, result,),) => result.map(|value| (position, value,),),
                Err(join_error,) => Err(Error::internal(format!("fetch task failed: {join_error}"),),),
            };

            match outcome {
                Ok((position, value,),) => slots[position] = Some(value,),
                Err(error,) => {
                    if first_error.is_none() {
                        warn!("Task failed, remaining tasks will settle first: {}", error);
                        first_error = Some(error,);
                    } else {
                        debug!("Ignoring subsequent task failure: {}", error);
                    }
                }
            }
        }

        if let Some(error,) = first_error {
            return Err(error,);
        }

        slots
            .into_iter()
            .map(|slot| slot.ok_or_else(|| Error::internal("task result missing",),),)
            .collect()
    }
}
