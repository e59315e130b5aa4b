// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission throttle for the contact form.
//!
//! Tracks the last attempt timestamp per client key and refuses a new
//! submission inside the configured window. This is a deterrent, not a
//! security boundary: two requests from the same key racing inside the
//! window may both pass before either write lands.

use crate::config::ThrottleConfig;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Outcome of a throttle check.
#[derive(Debug, Clone)]
pub enum ThrottleDecision {
    /// The submission may proceed
    Allowed,
    /// The client submitted too recently
    Limited {
        /// Time until the window reopens
        retry_after: Duration,
    },
}

impl ThrottleDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Thread-safe per-client submission throttle.
///
/// The entry map is owned here and injected wherever a check is needed;
/// state lives in this struct, not in module globals. Entries are
/// process-local and lost on restart, which only loosens throttling.
#[derive(Clone)]
pub struct SubmissionThrottle {
    config: ThrottleConfig,
    entries: Arc<RwLock<HashMap<IpAddr, Instant>>>,
}

impl SubmissionThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check the window for `key` and record this attempt.
    ///
    /// The attempt timestamp is recorded when the check passes, before the
    /// rest of the submission pipeline runs, so a submission later rejected
    /// on content still occupies the window.
    pub async fn check_and_record(&self, key: IpAddr) -> ThrottleDecision {
        let window = self.config.window();
        let now = Instant::now();

        let mut entries = self.entries.write().await;
        if let Some(last) = entries.get(&key) {
            let elapsed = now.duration_since(*last);
            if elapsed < window {
                let retry_after = window - elapsed;
                debug!(%key, ?retry_after, "Submission window still closed");
                return ThrottleDecision::Limited { retry_after };
            }
        }

        entries.insert(key, now);
        ThrottleDecision::Allowed
    }

    /// Evict entries idle longer than the configured TTL.
    ///
    /// Returns the number of evicted entries. Public so tests and the
    /// sweeper task can run eviction deterministically.
    pub async fn sweep(&self) -> usize {
        let ttl = self.config.idle_ttl();
        let now = Instant::now();

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, last| now.duration_since(*last) < ttl);
        before - entries.len()
    }

    /// Number of client keys currently tracked.
    pub async fn tracked(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Periodic eviction task with an explicit start/stop lifecycle.
///
/// Owning the task handle keeps the sweep out of fire-and-forget land:
/// `main` starts it, and tests can skip it entirely and call
/// [`SubmissionThrottle::sweep`] directly.
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn the sweep loop on the given throttle.
    pub fn start(throttle: SubmissionThrottle, interval: Duration) -> Self {
        let (shutdown, mut rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick completes immediately; sweeping an empty map is harmless
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = throttle.sweep().await;
                        if evicted > 0 {
                            info!(evicted, "Swept idle throttle entries");
                        }
                    }
                    _ = rx.changed() => break,
                }
            }
        });

        Self { shutdown, handle }
    }

    /// Signal the loop to exit and wait for it.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn test_config(window_secs: u64) -> ThrottleConfig {
        ThrottleConfig {
            window_secs,
            idle_ttl_secs: 3600,
            sweep_interval_secs: 3600,
        }
    }

    #[tokio::test]
    async fn test_second_attempt_inside_window_is_limited() {
        let throttle = SubmissionThrottle::new(test_config(30));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

        assert!(throttle.check_and_record(ip).await.is_allowed());

        match throttle.check_and_record(ip).await {
            ThrottleDecision::Limited { retry_after } => {
                assert!(retry_after <= Duration::from_secs(30));
            }
            ThrottleDecision::Allowed => panic!("Should be limited"),
        }
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_contend() {
        let throttle = SubmissionThrottle::new(test_config(30));

        let first = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let second = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(throttle.check_and_record(first).await.is_allowed());
        assert!(throttle.check_and_record(second).await.is_allowed());
    }

    #[tokio::test]
    async fn test_window_reopens() {
        let throttle = SubmissionThrottle::new(test_config(0));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 3));

        assert!(throttle.check_and_record(ip).await.is_allowed());
        // zero-length window: the next attempt is already outside it
        assert!(throttle.check_and_record(ip).await.is_allowed());
    }

    #[tokio::test]
    async fn test_sweep_evicts_idle_entries() {
        let config = ThrottleConfig {
            window_secs: 30,
            idle_ttl_secs: 0,
            sweep_interval_secs: 3600,
        };
        let throttle = SubmissionThrottle::new(config);
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 4));

        throttle.check_and_record(ip).await;
        assert_eq!(throttle.tracked().await, 1);

        let evicted = throttle.sweep().await;
        assert_eq!(evicted, 1);
        assert_eq!(throttle.tracked().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_recent_entries() {
        let throttle = SubmissionThrottle::new(test_config(30));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5));

        throttle.check_and_record(ip).await;
        let evicted = throttle.sweep().await;
        assert_eq!(evicted, 0);
        assert_eq!(throttle.tracked().await, 1);
    }

    #[tokio::test]
    async fn test_sweeper_lifecycle() {
        let throttle = SubmissionThrottle::new(test_config(30));
        let sweeper = Sweeper::start(throttle.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(30)).await;
        sweeper.stop().await;
    }
}
