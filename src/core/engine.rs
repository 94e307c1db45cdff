use crate::core::poll_loop::PollLoop;
use crate::domain::ports::{Notifier, QueryService};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Duration;

/// Drives the poll loop forever: startup notice, then cycle / log / sleep
/// until the process is killed or the loop escalates a systemic failure.
pub struct WatchEngine<Q: QueryService, N: Notifier> {
    poll_loop: PollLoop<Q, N>,
    cycle_sleep: Duration,
    monitor: SystemMonitor,
}

impl<Q: QueryService, N: Notifier> WatchEngine<Q, N> {
    pub fn new(poll_loop: PollLoop<Q, N>, cycle_sleep: Duration) -> Self {
        Self::new_with_monitoring(poll_loop, cycle_sleep, false)
    }

    pub fn new_with_monitoring(
        poll_loop: PollLoop<Q, N>,
        cycle_sleep: Duration,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            poll_loop,
            cycle_sleep,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.poll_loop.announce_start().await;

        loop {
            let report = self.poll_loop.run_cycle().await?;

            tracing::info!(
                "✅ Cycle {} complete: {} matches, {} failed queries{}. Waiting {:?} before re-running...",
                report.cycle,
                report.matches.len(),
                report.queries_failed,
                if report.status_replied {
                    ", status reply sent"
                } else {
                    ""
                },
                self.cycle_sleep
            );
            self.monitor.log_cycle_stats(report.cycle);

            tokio::time::sleep(self.cycle_sleep).await;
        }
    }
}
