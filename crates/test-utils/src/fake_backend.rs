use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use buildwatch::exec::{BuildBackend, BuildOutcome};

/// A fake backend that:
/// - records every command it was asked to run
/// - optionally sleeps to simulate a slow build
/// - tracks the highest number of builds that were in flight at once
/// - returns scripted outcomes (success once the script runs out).
#[derive(Clone, Default)]
pub struct FakeBuildBackend {
    commands: Arc<Mutex<Vec<String>>>,
    outcomes: Arc<Mutex<VecDeque<BuildOutcome>>>,
    delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FakeBuildBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue an outcome for the next build.
    pub fn push_outcome(&self, outcome: BuildOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn build_count(&self) -> usize {
        self.commands.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl BuildBackend for FakeBuildBackend {
    fn run_build<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + 'a>> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.commands.lock().unwrap().push(command.to_string());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| BuildOutcome::succeeded(Vec::new()))
        })
    }
}
