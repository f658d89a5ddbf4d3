//! Lazy, concurrency-safe client cells.
//!
//! Every external integration is held in a [`Lazy`] slot owned by the
//! context: construction is deferred until first access, runs at most once
//! across any number of concurrent callers, and its outcome — success or
//! failure — is permanent for the rest of the process.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Classified failure from a cell's build step. Cached and returned to every
/// subsequent caller; the cell never rebuilds.
#[derive(Debug, Clone)]
pub struct BuildError {
    pub client: &'static str,
    pub message: String,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to initialize {} client: {}", self.client, self.message)
    }
}

impl std::error::Error for BuildError {}

enum State<T> {
    Empty,
    Ready(Arc<T>),
    Failed(BuildError),
}

/// A deferred-construction slot.
///
/// The mutex is held for the whole build, so concurrent first accesses block
/// until the triggering build finishes and then observe the same instance.
pub struct Lazy<T> {
    state: Mutex<State<T>>,
}

impl<T> Lazy<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Empty),
        }
    }

    /// Returns the cached instance, building it on first access.
    ///
    /// `client` names the integration for error attribution. A build error
    /// is recorded and replayed to all later callers.
    pub async fn get_or_init<F, Fut, E>(
        &self,
        client: &'static str,
        build: F,
    ) -> Result<Arc<T>, BuildError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut state = self.state.lock().await;
        match &*state {
            State::Ready(instance) => Ok(Arc::clone(instance)),
            State::Failed(err) => Err(err.clone()),
            State::Empty => match build().await {
                Ok(instance) => {
                    let instance = Arc::new(instance);
                    *state = State::Ready(Arc::clone(&instance));
                    Ok(instance)
                }
                Err(err) => {
                    let err = BuildError {
                        client,
                        message: err.to_string(),
                    };
                    *state = State::Failed(err.clone());
                    Err(err)
                }
            },
        }
    }
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_access_builds_exactly_once() {
        let cell = Arc::new(Lazy::<u32>::new());
        let builds = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cell = Arc::clone(&cell);
            let builds = Arc::clone(&builds);
            handles.push(tokio::spawn(async move {
                cell.get_or_init("test", || async {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42)
                })
                .await
                .unwrap()
            }));
        }

        let mut instances = Vec::new();
        for handle in handles {
            instances.push(handle.await.unwrap());
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        for instance in &instances {
            assert!(Arc::ptr_eq(instance, &instances[0]));
        }
    }

    #[tokio::test]
    async fn success_is_never_rebuilt() {
        let cell = Lazy::<String>::new();
        let builds = AtomicUsize::new(0);

        let first = cell
            .get_or_init("test", || async {
                builds.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>("built".to_string())
            })
            .await
            .unwrap();
        let second = cell
            .get_or_init("test", || async {
                builds.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>("rebuilt".to_string())
            })
            .await
            .unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, "built");
    }

    #[tokio::test]
    async fn failure_is_permanent() {
        let cell = Lazy::<u32>::new();
        let builds = AtomicUsize::new(0);

        let first = cell
            .get_or_init("grafana", || async {
                builds.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>("no url configured".to_string())
            })
            .await
            .unwrap_err();
        assert_eq!(first.to_string(), "failed to initialize grafana client: no url configured");

        // A later caller with a build that would succeed still sees the
        // recorded failure.
        let second = cell
            .get_or_init("grafana", || async {
                builds.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(7)
            })
            .await
            .unwrap_err();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(second.to_string(), first.to_string());
    }
}
