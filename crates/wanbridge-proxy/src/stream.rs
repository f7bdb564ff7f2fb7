//! The polling state machine for one in-flight generation task.
//!
//! A single sequential loop drives the backend's status endpoint and feeds
//! events to the caller's stream. Each iteration is decided by a biased
//! select over three event sources — caller disconnect, wall-clock ceiling,
//! interval tick — so exactly one source wins per iteration and the first
//! terminal outcome ends the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use wanbridge_core::domain::{TaskHandle, TaskObservation};
use wanbridge_core::events::StreamEvent;
use wanbridge_core::ports::ImageTaskPort;

/// Error payload for a task the backend reports as failed.
const TASK_FAILED_MESSAGE: &str = "Task failed";

/// Timing bounds for one polling run.
#[derive(Debug, Clone, Copy)]
pub struct PollTiming {
    /// Fixed delay between status polls.
    pub interval: Duration,
    /// Wall-clock ceiling on the whole run.
    pub ceiling: Duration,
}

/// Drive the backend's status endpoint until a terminal event.
///
/// Emits zero or more `Progress` events followed by exactly one terminal
/// event on `events`, then returns. When the receiving side goes away the
/// loop returns silently without emitting anything further or making
/// another backend call.
pub async fn run_poll_loop(
    backend: Arc<dyn ImageTaskPort>,
    handle: TaskHandle,
    timing: PollTiming,
    events: mpsc::Sender<StreamEvent>,
) {
    let started = Instant::now();
    let deadline = time::sleep_until(started + timing.ceiling);
    tokio::pin!(deadline);

    // First poll happens one full interval after the run starts.
    let mut ticker = time::interval_at(started + timing.interval, timing.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            () = events.closed() => {
                debug!(task_id = %handle, "Caller disconnected, stopping poll loop");
                return;
            }

            () = &mut deadline => {
                warn!(task_id = %handle, "Polling ceiling exceeded");
                let _ = events.send(StreamEvent::TimedOut).await;
                return;
            }

            _ = ticker.tick() => {
                let event = match backend.poll(&handle).await {
                    Ok(TaskObservation::Running) => StreamEvent::Progress,
                    Ok(TaskObservation::Succeeded { results }) => {
                        info!(task_id = %handle, images = results.len(), "Task succeeded");
                        StreamEvent::Success { urls: results }
                    }
                    Ok(TaskObservation::Failed) => {
                        warn!(task_id = %handle, "Task failed");
                        StreamEvent::Failure { message: TASK_FAILED_MESSAGE.to_string() }
                    }
                    Err(e) => {
                        warn!(task_id = %handle, "Status poll failed: {e}");
                        StreamEvent::Failure { message: e.to_string() }
                    }
                };

                let terminal = event.is_terminal();
                if events.send(event).await.is_err() || terminal {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use wanbridge_core::domain::GenerationRequest;
    use wanbridge_core::ports::TaskPortError;

    use super::*;

    const TIMING: PollTiming = PollTiming {
        interval: Duration::from_secs(5),
        ceiling: Duration::from_secs(300),
    };

    /// Backend that replays a scripted sequence of poll results; once the
    /// script runs out every further poll observes `Running`.
    struct ScriptedBackend {
        script: Mutex<VecDeque<Result<TaskObservation, TaskPortError>>>,
        polls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<TaskObservation, TaskPortError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                polls: AtomicUsize::new(0),
            })
        }

        fn poll_count(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageTaskPort for ScriptedBackend {
        async fn submit(
            &self,
            _model: &str,
            _request: &GenerationRequest,
        ) -> Result<TaskHandle, TaskPortError> {
            unreachable!("the poll loop never submits")
        }

        async fn poll(&self, _handle: &TaskHandle) -> Result<TaskObservation, TaskPortError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(TaskObservation::Running))
        }
    }

    fn spawn_loop(
        backend: Arc<ScriptedBackend>,
        timing: PollTiming,
    ) -> (mpsc::Receiver<StreamEvent>, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(8);
        let join = tokio::spawn(run_poll_loop(
            backend,
            TaskHandle::new("t-test"),
            timing,
            tx,
        ));
        (rx, join)
    }

    #[tokio::test(start_paused = true)]
    async fn running_then_succeeded_emits_progress_then_success() {
        let backend = ScriptedBackend::new(vec![
            Ok(TaskObservation::Running),
            Ok(TaskObservation::Running),
            Ok(TaskObservation::Succeeded {
                results: vec!["urlA".to_string(), "urlB".to_string()],
            }),
        ]);
        let (mut rx, join) = spawn_loop(backend.clone(), TIMING);

        assert_eq!(rx.recv().await, Some(StreamEvent::Progress));
        assert_eq!(rx.recv().await, Some(StreamEvent::Progress));
        assert_eq!(
            rx.recv().await,
            Some(StreamEvent::Success {
                urls: vec!["urlA".to_string(), "urlB".to_string()],
            })
        );
        // Nothing after the terminal event.
        assert_eq!(rx.recv().await, None);

        join.await.unwrap();
        assert_eq!(backend.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_task_emits_failure() {
        let backend = ScriptedBackend::new(vec![
            Ok(TaskObservation::Running),
            Ok(TaskObservation::Failed),
        ]);
        let (mut rx, join) = spawn_loop(backend, TIMING);

        assert_eq!(rx.recv().await, Some(StreamEvent::Progress));
        assert_eq!(
            rx.recv().await,
            Some(StreamEvent::Failure {
                message: "Task failed".to_string(),
            })
        );
        assert_eq!(rx.recv().await, None);
        join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_emits_failure_with_error_text() {
        let backend = ScriptedBackend::new(vec![Err(TaskPortError::Unreachable {
            message: "connection refused".to_string(),
        })]);
        let (mut rx, join) = spawn_loop(backend, TIMING);

        match rx.recv().await {
            Some(StreamEvent::Failure { message }) => {
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected failure event, got {other:?}"),
        }
        assert_eq!(rx.recv().await, None);
        join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn backend_stuck_running_times_out_at_the_ceiling() {
        let start = Instant::now();
        let backend = ScriptedBackend::new(vec![]);
        let (mut rx, join) = spawn_loop(backend.clone(), TIMING);

        let mut progress = 0;
        loop {
            match rx.recv().await {
                Some(StreamEvent::Progress) => progress += 1,
                Some(StreamEvent::TimedOut) => break,
                other => panic!("unexpected event {other:?}"),
            }
        }

        // Ticks at 5s..295s, deadline wins the 300s race.
        assert_eq!(progress, 59);
        assert_eq!(backend.poll_count(), 59);

        let elapsed = start.elapsed();
        assert!(elapsed >= TIMING.ceiling);
        assert!(elapsed < TIMING.ceiling + TIMING.interval);

        // Exactly one terminal event, nothing after it.
        assert_eq!(rx.recv().await, None);
        join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_receiver_cancels_the_loop() {
        let backend = ScriptedBackend::new(vec![]);
        let (mut rx, join) = spawn_loop(backend.clone(), TIMING);

        assert_eq!(rx.recv().await, Some(StreamEvent::Progress));
        drop(rx);

        // The loop observes the closed channel and stops without another
        // backend call.
        join.await.unwrap();
        assert_eq!(backend.poll_count(), 1);
    }
}
