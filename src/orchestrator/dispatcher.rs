//! Dispatcher - invokes specialists with per-specialist failure isolation
//!
//! Every dispatched tag yields exactly one [`Outcome`]. A specialist that
//! errors, times out, panics or is not registered produces a failure outcome
//! and never affects its siblings. Outcomes come back in canonical tag order
//! whatever order the calls complete in.

use crate::error::{Error, Result};
use crate::orchestrator::adapter::AdaptedRequest;
use crate::orchestrator::outcome::Outcome;
use crate::specialist::{Specialist, SpecialistSet};
use crate::types::{CapabilityTag, TagSet};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// How specialists are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// One specialist at a time, in canonical order
    Sequential,
    /// Up to `max_in_flight` specialists at once
    #[default]
    Concurrent,
}

/// Default bound on concurrent specialist calls
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Invokes specialists for a classified tag set
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mode: DispatchMode,
    max_in_flight: usize,
    call_timeout: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher with the given mode and no call timeout
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            mode,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            call_timeout: None,
        }
    }

    /// Sequential dispatcher
    pub fn sequential() -> Self {
        Self::new(DispatchMode::Sequential)
    }

    /// Concurrent dispatcher with a bound on calls in flight
    pub fn concurrent(max_in_flight: usize) -> Self {
        Self::new(DispatchMode::Concurrent).with_max_in_flight(max_in_flight)
    }

    /// Set the concurrency bound (at least 1)
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Set a per-specialist call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Scheduling mode
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Dispatch every tag in `tags`.
    ///
    /// All requests are built before any specialist runs, so an adaptation
    /// failure (an internal contract violation) aborts the whole dispatch
    /// without side effects. Specialist failures never surface as `Err`.
    pub async fn dispatch<F>(
        &self,
        tags: &TagSet,
        adapt: F,
        specialists: &SpecialistSet,
    ) -> Result<Vec<Outcome>>
    where
        F: Fn(CapabilityTag) -> Result<AdaptedRequest>,
    {
        let jobs = tags
            .iter()
            .map(|tag| Ok((adapt(tag)?, specialists.get(tag))))
            .collect::<Result<Vec<_>>>()?;

        info!(tags = %tags, mode = ?self.mode, "dispatching to specialists");

        let timeout = self.call_timeout;
        let outcomes: Vec<Outcome> = match self.mode {
            DispatchMode::Sequential => {
                let mut outcomes = Vec::with_capacity(jobs.len());
                for (request, specialist) in jobs {
                    outcomes.push(invoke(specialist, request, timeout).await);
                }
                outcomes
            }
            DispatchMode::Concurrent => {
                // A permit is released as soon as its call finishes, so the next
                // waiting call starts without waiting for slower calls ahead of it.
                let permits = Arc::new(Semaphore::new(self.max_in_flight));
                let mut calls = Vec::with_capacity(jobs.len());
                for (request, specialist) in jobs {
                    let permits = Arc::clone(&permits);
                    calls.push(async move {
                        let _permit = permits.acquire_owned().await;
                        invoke(specialist, request, timeout).await
                    });
                }
                // `join_all` yields in input order, which is the canonical tag order.
                join_all(calls).await
            }
        };

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            dispatched = outcomes.len(),
            succeeded, "dispatch finished"
        );

        Ok(outcomes)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchMode::default())
    }
}

async fn invoke(
    specialist: Option<Arc<dyn Specialist>>,
    request: AdaptedRequest,
    call_timeout: Option<Duration>,
) -> Outcome {
    let tag = request.tag;
    let Some(specialist) = specialist else {
        warn!(tag = %tag, "no specialist registered");
        return Outcome::failure(
            tag,
            format!("no specialist registered for capability '{}'", tag),
        );
    };

    let start = Instant::now();
    debug!(tag = %tag, specialist = specialist.name(), request = %request.text, "invoking specialist");

    // Each call runs on its own task so a panic stays inside it.
    let task = tokio::spawn(async move {
        let call = specialist.invoke(&request.text);
        match call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(format!(
                    "{} specialist did not respond within {} ms",
                    tag,
                    limit.as_millis()
                ))),
            },
            None => call.await,
        }
    });

    let result = match task.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(Error::specialist(tag, "specialist panicked")),
        Err(_) => Err(Error::specialist(tag, "specialist task was cancelled")),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(payload) => {
            debug!(tag = %tag, elapsed_ms, "specialist succeeded");
            Outcome::success(tag, payload).with_elapsed(elapsed_ms)
        }
        Err(e) => {
            warn!(tag = %tag, elapsed_ms, error = %e, "specialist failed");
            Outcome::failure(tag, e.to_string()).with_elapsed(elapsed_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specialist::Payload;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Behavior {
        Succeed,
        Fail,
        Panic,
    }

    struct MockSpecialist {
        tag: CapabilityTag,
        delay: Duration,
        behavior: Behavior,
        calls: Arc<AtomicUsize>,
        completed: Arc<Mutex<Vec<CapabilityTag>>>,
    }

    #[async_trait]
    impl Specialist for MockSpecialist {
        fn tag(&self) -> CapabilityTag {
            self.tag
        }

        fn name(&self) -> &str {
            "mock"
        }

        async fn invoke(&self, request: &str) -> Result<Payload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.completed.lock().push(self.tag);
            match self.behavior {
                Behavior::Succeed => Ok(Payload::Opaque(serde_json::json!({ "echo": request }))),
                Behavior::Fail => Err(Error::specialist(self.tag, "source unavailable")),
                Behavior::Panic => panic!("specialist blew up"),
            }
        }
    }

    struct Fixture {
        specialists: SpecialistSet,
        calls: Arc<AtomicUsize>,
        completed: Arc<Mutex<Vec<CapabilityTag>>>,
    }

    fn fixture(setup: &[(CapabilityTag, u64, Behavior)]) -> Fixture {
        let calls = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(Mutex::new(Vec::new()));
        let mut specialists = SpecialistSet::new();
        for &(tag, delay_ms, behavior) in setup {
            specialists.insert(Arc::new(MockSpecialist {
                tag,
                delay: Duration::from_millis(delay_ms),
                behavior,
                calls: Arc::clone(&calls),
                completed: Arc::clone(&completed),
            }));
        }
        Fixture {
            specialists,
            calls,
            completed,
        }
    }

    fn adapt(tag: CapabilityTag) -> Result<AdaptedRequest> {
        Ok(AdaptedRequest {
            tag,
            text: format!("{}: query", tag),
        })
    }

    fn tags_of(outcomes: &[Outcome]) -> Vec<CapabilityTag> {
        outcomes.iter().map(|o| o.tag).collect()
    }

    #[tokio::test]
    async fn test_outcomes_follow_canonical_order_not_completion_order() {
        let f = fixture(&[
            (CapabilityTag::StructuredData, 80, Behavior::Succeed),
            (CapabilityTag::Literature, 40, Behavior::Succeed),
            (CapabilityTag::MissionPlanning, 0, Behavior::Succeed),
        ]);

        let outcomes = Dispatcher::concurrent(3)
            .dispatch(&TagSet::all(), adapt, &f.specialists)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(tags_of(&outcomes), CapabilityTag::ALL.to_vec());
        assert_eq!(
            *f.completed.lock(),
            vec![
                CapabilityTag::MissionPlanning,
                CapabilityTag::Literature,
                CapabilityTag::StructuredData
            ]
        );
    }

    #[tokio::test]
    async fn test_finished_call_frees_its_slot_for_the_next_tag() {
        let f = fixture(&[
            (CapabilityTag::StructuredData, 400, Behavior::Succeed),
            (CapabilityTag::Literature, 0, Behavior::Succeed),
            (CapabilityTag::MissionPlanning, 300, Behavior::Succeed),
        ]);

        let start = Instant::now();
        let outcomes = Dispatcher::concurrent(2)
            .dispatch(&TagSet::all(), adapt, &f.specialists)
            .await
            .unwrap();
        let elapsed = start.elapsed();

        assert_eq!(tags_of(&outcomes), CapabilityTag::ALL.to_vec());
        assert!(outcomes.iter().all(Outcome::is_success));
        // Mission planning takes the literature slot, not the structured data one.
        assert!(elapsed < Duration::from_millis(650), "took {:?}", elapsed);
        assert_eq!(
            *f.completed.lock(),
            vec![
                CapabilityTag::Literature,
                CapabilityTag::MissionPlanning,
                CapabilityTag::StructuredData
            ]
        );
    }

    #[tokio::test]
    async fn test_bound_limits_calls_in_flight() {
        struct Gauge {
            tag: CapabilityTag,
            current: Arc<AtomicUsize>,
            peak: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl Specialist for Gauge {
            fn tag(&self) -> CapabilityTag {
                self.tag
            }

            fn name(&self) -> &str {
                "gauge"
            }

            async fn invoke(&self, _request: &str) -> Result<Payload> {
                let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                self.current.fetch_sub(1, Ordering::SeqCst);
                Ok(Payload::Opaque(serde_json::Value::Null))
            }
        }

        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut specialists = SpecialistSet::new();
        for tag in CapabilityTag::ALL {
            specialists.insert(Arc::new(Gauge {
                tag,
                current: Arc::clone(&current),
                peak: Arc::clone(&peak),
            }));
        }

        let outcomes = Dispatcher::concurrent(2)
            .dispatch(&TagSet::all(), adapt, &specialists)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dispatch_future_can_be_spawned() {
        let f = fixture(&[
            (CapabilityTag::StructuredData, 5, Behavior::Succeed),
            (CapabilityTag::Literature, 0, Behavior::Fail),
        ]);
        let specialists = f.specialists.clone();

        let outcomes = tokio::spawn(async move {
            Dispatcher::concurrent(1)
                .dispatch(&TagSet::all(), adapt, &specialists)
                .await
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(tags_of(&outcomes), CapabilityTag::ALL.to_vec());
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let f = fixture(&[
            (CapabilityTag::StructuredData, 0, Behavior::Fail),
            (CapabilityTag::Literature, 10, Behavior::Succeed),
        ]);
        let tags: TagSet = [CapabilityTag::StructuredData, CapabilityTag::Literature]
            .into_iter()
            .collect();

        let outcomes = Dispatcher::default()
            .dispatch(&tags, adapt, &f.specialists)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_success());
        assert!(outcomes[0].reason().unwrap().contains("source unavailable"));
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_failed_specialist_is_not_retried() {
        let f = fixture(&[(CapabilityTag::Literature, 0, Behavior::Fail)]);
        let tags: TagSet = [CapabilityTag::Literature].into_iter().collect();

        let outcomes = Dispatcher::sequential()
            .dispatch(&tags, adapt, &f.specialists)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(f.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_becomes_failure_outcome() {
        let f = fixture(&[
            (CapabilityTag::StructuredData, 5_000, Behavior::Succeed),
            (CapabilityTag::Literature, 0, Behavior::Succeed),
        ]);
        let tags: TagSet = [CapabilityTag::StructuredData, CapabilityTag::Literature]
            .into_iter()
            .collect();

        let outcomes = Dispatcher::concurrent(2)
            .with_timeout(Duration::from_millis(50))
            .dispatch(&tags, adapt, &f.specialists)
            .await
            .unwrap();

        assert!(outcomes[0].reason().unwrap().contains("timed out"));
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let f = fixture(&[
            (CapabilityTag::Literature, 0, Behavior::Panic),
            (CapabilityTag::MissionPlanning, 0, Behavior::Succeed),
        ]);
        let tags: TagSet = [CapabilityTag::Literature, CapabilityTag::MissionPlanning]
            .into_iter()
            .collect();

        let outcomes = Dispatcher::default()
            .dispatch(&tags, adapt, &f.specialists)
            .await
            .unwrap();

        assert_eq!(outcomes[0].reason(), Some("Specialist error: literature: specialist panicked"));
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_missing_specialist_still_yields_outcome() {
        let f = fixture(&[(CapabilityTag::Literature, 0, Behavior::Succeed)]);

        let outcomes = Dispatcher::sequential()
            .dispatch(&TagSet::all(), adapt, &f.specialists)
            .await
            .unwrap();

        assert_eq!(tags_of(&outcomes), CapabilityTag::ALL.to_vec());
        assert!(outcomes[0].reason().unwrap().contains("no specialist registered"));
        assert!(outcomes[1].is_success());
        assert!(!outcomes[2].is_success());
    }

    #[tokio::test]
    async fn test_sequential_and_concurrent_agree() {
        let setup = [
            (CapabilityTag::StructuredData, 10, Behavior::Fail),
            (CapabilityTag::Literature, 0, Behavior::Succeed),
            (CapabilityTag::MissionPlanning, 5, Behavior::Succeed),
        ];
        let seq = Dispatcher::sequential()
            .dispatch(&TagSet::all(), adapt, &fixture(&setup).specialists)
            .await
            .unwrap();
        let con = Dispatcher::concurrent(1)
            .dispatch(&TagSet::all(), adapt, &fixture(&setup).specialists)
            .await
            .unwrap();

        let flags = |o: &[Outcome]| o.iter().map(|x| (x.tag, x.is_success())).collect::<Vec<_>>();
        assert_eq!(flags(&seq), flags(&con));
    }

    #[tokio::test]
    async fn test_adaptation_failure_aborts_before_invocation() {
        let f = fixture(&[(CapabilityTag::Literature, 0, Behavior::Succeed)]);

        let result = Dispatcher::default()
            .dispatch(
                &TagSet::all(),
                |tag| Err(Error::UnknownCapability(tag)),
                &f.specialists,
            )
            .await;

        assert!(matches!(result, Err(Error::UnknownCapability(_))));
        assert_eq!(f.calls.load(Ordering::SeqCst), 0);
    }
}
