// Sleeper Port - backoff delays between fetch attempts

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real delay on the tokio timer (production)
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Records requested delays and returns immediately
    #[derive(Default)]
    pub struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn delays(&self) -> Vec<Duration> {
            self.delays.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::RecordingSleeper;
    use super::*;

    #[test]
    fn test_recording_sleeper_keeps_request_order() {
        let sleeper = RecordingSleeper::new();
        tokio_test::block_on(async {
            sleeper.sleep(Duration::from_secs(2)).await;
            sleeper.sleep(Duration::from_secs(4)).await;
        });
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[test]
    fn test_recording_sleeper_completes_without_waiting() {
        let sleeper = RecordingSleeper::new();
        let mut task = tokio_test::task::spawn(sleeper.sleep(Duration::from_secs(3600)));
        tokio_test::assert_ready!(task.poll());
        drop(task);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(3600)]);
    }
}
