//! Process telemetry for the health route.
//!
//! `MetricsProvider` is the seam; `SystemMetrics` reads the host through `sysinfo`.
//! CPU utilisation is measured between consecutive calls, so the provider keeps
//! its `System` behind a mutex and refreshes it in place.

use std::sync::Mutex;

use quote_common::Result;
use sysinfo::System;

use crate::model::{CpuStats, MemoryStats};

pub trait MetricsProvider: Send + Sync {
    fn cpu_stats(&self) -> Result<CpuStats>;
    fn memory_stats(&self) -> Result<MemoryStats>;
}

pub struct SystemMetrics {
    system: Mutex<System>,
}

impl SystemMetrics {
    pub fn new() -> Self {
        let mut system = System::new();
        // First sample; usage is reported relative to it.
        system.refresh_cpu_usage();
        Self {
            system: Mutex::new(system),
        }
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SystemMetrics {
    fn cpu_stats(&self) -> Result<CpuStats> {
        let mut system = self.system.lock()?;
        system.refresh_cpu_usage();
        let percent_used: Vec<f32> = system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect();
        Ok(CpuStats {
            cores: percent_used.len(),
            percent_used,
        })
    }

    fn memory_stats(&self) -> Result<MemoryStats> {
        let mut system = self.system.lock()?;
        system.refresh_memory();
        Ok(MemoryStats::from_bytes(
            system.total_memory(),
            system.available_memory(),
            system.used_memory(),
            system.free_memory(),
        ))
    }
}
