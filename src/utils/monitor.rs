use std::time::{Duration, Instant};
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct SystemStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// Tracks process resource usage across scan cycles. The watcher runs for
/// days at a time, so peak memory is carried for the whole process life.
pub struct SystemMonitor {
    system: System,
    pid: Pid,
    start_time: Instant,
    peak_memory: u64,
    enabled: bool,
}

impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());
        let pid = sysinfo::get_current_pid().expect("Failed to get current PID");
        system.refresh_all();

        Self {
            system,
            pid,
            start_time: Instant::now(),
            peak_memory: 0,
            enabled,
        }
    }

    pub fn get_stats(&mut self) -> Option<SystemStats> {
        if !self.enabled {
            return None;
        }

        self.system.refresh_all();

        let process = self.system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        if memory_mb > self.peak_memory {
            self.peak_memory = memory_mb;
        }

        Some(SystemStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: self.peak_memory,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_cycle_stats(&mut self, cycle: u64) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 Cycle {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Uptime: {:?}",
                cycle,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
