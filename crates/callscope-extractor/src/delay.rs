//! Cooperative pauses between model calls

use std::future::{ready, Future};
use std::time::Duration;

/// Waits between successive model calls
///
/// The pipeline never sleeps directly; tests substitute [`NoDelay`] or a
/// recording implementation.
pub trait Delay: Send + Sync {
    /// Wait for `duration`
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn wait(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
        ready(())
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::Delay;
    use std::future::{ready, Future};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records requested waits without sleeping
    #[derive(Debug, Clone, Default)]
    pub struct RecordingDelay {
        waits: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingDelay {
        pub fn waits(&self) -> Vec<Duration> {
            self.waits.lock().unwrap().clone()
        }
    }

    impl Delay for RecordingDelay {
        fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send {
            self.waits.lock().unwrap().push(duration);
            ready(())
        }
    }
}
