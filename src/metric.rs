//! Sources for the value of the single reported metric

use std::sync::Mutex;

use anyhow::anyhow;
use sysinfo::System;
use tracing::trace;

/// Produces the current value of the reported metric
pub trait MetricSource: Send + Sync {
    fn value(&self) -> anyhow::Result<f64>;
}

/// Always reports the same value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetric(pub f64);

impl Default for FixedMetric {
    fn default() -> Self {
        FixedMetric(0.42)
    }
}

impl MetricSource for FixedMetric {
    fn value(&self) -> anyhow::Result<f64> {
        Ok(self.0)
    }
}

/// Reports global CPU usage in percent
///
/// The first reading after construction is based on a single refresh and
/// may be 0.
pub struct CpuUsageMetric {
    sys: Mutex<System>,
}

impl CpuUsageMetric {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        Self {
            sys: Mutex::new(sys),
        }
    }
}

impl Default for CpuUsageMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for CpuUsageMetric {
    fn value(&self) -> anyhow::Result<f64> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|_| anyhow!("cpu sampler lock poisoned"))?;
        sys.refresh_cpu_usage();
        let usage = f64::from(sys.global_cpu_usage());
        trace!("sampled cpu usage: {usage}");
        Ok(usage.clamp(0.0, 100.0))
    }
}
