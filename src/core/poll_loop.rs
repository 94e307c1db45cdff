use crate::domain::model::{CycleReport, MatchEvent};
use crate::domain::ports::{Notifier, QueryService};
use crate::utils::error::{WatchError, Result};
use std::ops::RangeInclusive;

/// The only inbound command the watcher understands. Compared after
/// trimming, ignoring ASCII case.
pub const STATUS_COMMAND: &str = "check";

/// A cycle in which every single query failed counts toward this streak;
/// reaching it stops the loop.
const MAX_FAILED_CYCLE_STREAK: u32 = 3;

/// The control core: sweeps the identifier range once per cycle, notifies
/// on each marker match, and answers the operator's status command between
/// cycles. All state lives here; there are no ambient globals.
pub struct PollLoop<Q: QueryService, N: Notifier> {
    query_service: Q,
    notifier: N,
    id_range: RangeInclusive<u32>,
    marker: String,
    cycle_count: u64,
    last_seen_command_id: Option<i64>,
    failed_cycle_streak: u32,
}

impl<Q: QueryService, N: Notifier> PollLoop<Q, N> {
    pub fn new(
        query_service: Q,
        notifier: N,
        id_range: RangeInclusive<u32>,
        marker: String,
    ) -> Self {
        Self {
            query_service,
            notifier,
            id_range,
            marker,
            cycle_count: 0,
            last_seen_command_id: None,
            failed_cycle_streak: 0,
        }
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn last_seen_command_id(&self) -> Option<i64> {
        self.last_seen_command_id
    }

    /// One-time startup notification, sent before the first cycle.
    pub async fn announce_start(&self) {
        let message = format!(
            "🚀 Watcher started at {}. Scanning {} identifiers per cycle.",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            self.id_range.clone().count()
        );
        if let Err(e) = self.notifier.send(&message).await {
            tracing::warn!("🔶 Startup notification failed: {}", e);
        }
    }

    /// Run one full cycle: sweep the identifier range in ascending order,
    /// then handle a pending operator command. Sleeping between cycles is
    /// the caller's job, which keeps cycles testable in isolation.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        tracing::info!("🔄 Starting scan cycle {}...", self.cycle_count + 1);

        let mut matches = Vec::new();
        let mut queries_failed = 0usize;
        let mut queries_total = 0usize;

        for identifier in self.id_range.clone() {
            queries_total += 1;

            let body = match self.query_service.query(identifier).await {
                Ok(body) => body,
                Err(e) => {
                    // One bad identifier must not abort the sweep.
                    queries_failed += 1;
                    tracing::warn!("🔶 Query for identifier {} failed: {}", identifier, e);
                    continue;
                }
            };

            if body.contains(&self.marker) {
                let event = MatchEvent { identifier, body };
                tracing::info!("🎯 Match found at identifier {}", event.identifier);

                let message = format!(
                    "Match found! ID: {}\nResponse: {}",
                    event.identifier, event.body
                );
                if let Err(e) = self.notifier.send(&message).await {
                    tracing::warn!(
                        "🔶 Match notification for identifier {} failed: {}",
                        event.identifier,
                        e
                    );
                }

                matches.push(event);
            }
        }

        // A full sweep was attempted, so the cycle counts even when every
        // query failed.
        self.cycle_count += 1;

        if queries_total > 0 && queries_failed == queries_total {
            self.failed_cycle_streak += 1;
            tracing::warn!(
                "🔶 Every query in cycle {} failed ({} consecutive bad cycles)",
                self.cycle_count,
                self.failed_cycle_streak
            );
        } else {
            self.failed_cycle_streak = 0;
        }

        if self.failed_cycle_streak >= MAX_FAILED_CYCLE_STREAK {
            return Err(WatchError::ProcessingError {
                message: format!(
                    "{} consecutive cycles with every query failing; giving up",
                    self.failed_cycle_streak
                ),
            });
        }

        let status_replied = self.check_for_command().await;

        Ok(CycleReport {
            cycle: self.cycle_count,
            matches,
            queries_failed,
            status_replied,
        })
    }

    /// Answer the operator's status command, at most once per inbound
    /// message id. Returns whether a status reply was sent.
    async fn check_for_command(&mut self) -> bool {
        let inbound = match self.notifier.fetch_latest_inbound().await {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::warn!("🔶 Inbound message check failed: {}", e);
                return false;
            }
        };

        let Some(message) = inbound else {
            return false;
        };
        // Ids only move forward on the channel; an id at or below the last
        // processed one is a stale or replayed message, not a new command.
        if let Some(last_seen) = self.last_seen_command_id {
            if message.id <= last_seen {
                return false;
            }
        }
        let Some(text) = message.text.as_deref() else {
            return false;
        };
        if !text.trim().eq_ignore_ascii_case(STATUS_COMMAND) {
            return false;
        }

        let status = format!(
            "🔄 The watcher has run {} full cycles so far.",
            self.cycle_count
        );
        match self.notifier.send(&status).await {
            Ok(()) => {
                // Only a delivered reply consumes the command; a failed send
                // leaves it eligible for the next cycle.
                self.last_seen_command_id = Some(message.id);
                true
            }
            Err(e) => {
                tracing::warn!("🔶 Status reply failed: {}", e);
                false
            }
        }
    }
}
