//! Health report served by `GET /health`.
//!
//! Durations are rendered with their `Debug` form (e.g. `1.52ms`, `3.004s`).

use std::time::Duration;

use serde::Serialize;

/// Logical core count and per-core utilisation in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuStats {
    pub cores: usize,
    pub percent_used: Vec<f32>,
}

/// Memory totals in bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryStats {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub free: u64,
    pub percent_used: f64,
}

impl MemoryStats {
    /// Builds stats from raw byte counts; `percent_used` is `used / total`.
    pub fn from_bytes(total: u64, available: u64, used: u64, free: u64) -> Self {
        let percent_used = if total == 0 {
            0.0
        } else {
            used as f64 / total as f64 * 100.0
        };
        Self {
            total,
            available,
            used,
            free,
            percent_used,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub duration: String,
    pub uptime: String,
    pub cpu: CpuStats,
    pub memory: MemoryStats,
}

impl HealthReport {
    pub fn pass(duration: Duration, uptime: Duration, cpu: CpuStats, memory: MemoryStats) -> Self {
        Self {
            status: "pass",
            duration: format!("{:?}", duration),
            uptime: format!("{:?}", uptime),
            cpu,
            memory,
        }
    }
}
