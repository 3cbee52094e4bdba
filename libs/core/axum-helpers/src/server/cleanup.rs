use std::future::Future;
use std::pin::Pin;
use tracing::{error, info};

type CleanupTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Named shutdown tasks (closing pools, dropping clients) run concurrently.
///
/// ```ignore
/// let mut cleanup = CleanupCoordinator::new();
/// cleanup.add_task("postgres", database::postgres::close(db));
/// cleanup.add_task("redis", async move { drop(redis) });
/// create_production_app(router, &server_config, cleanup.run()).await?;
/// ```
#[derive(Default)]
pub struct CleanupCoordinator {
    tasks: Vec<(&'static str, CleanupTask)>,
}

impl CleanupCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task; nothing runs until [`run`](Self::run)
    pub fn add_task<F>(&mut self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push((name, Box::pin(task)));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Spawn every task and wait for all of them; a panicking task is logged
    /// and does not stop the others.
    pub async fn run(self) {
        info!(tasks = self.tasks.len(), "Running cleanup tasks");

        let handles: Vec<_> = self
            .tasks
            .into_iter()
            .map(|(name, task)| (name, tokio::spawn(task)))
            .collect();

        for (name, handle) in handles {
            match handle.await {
                Ok(()) => info!(task = name, "Cleanup task completed"),
                Err(e) => error!(task = name, error = %e, "Cleanup task failed"),
            }
        }
    }
}
