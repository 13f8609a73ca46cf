use std::thread;
use std::time::Duration;
use sysinfo::{CpuExt, System, SystemExt};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usage {
    pub cpu_percent: f64,
    pub ram_percent: f64,
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("the OS reports no CPUs")]
    NoCpus,
    #[error("CPU utilisation is not a number: {0}")]
    InvalidCpuUsage(f32),
    #[error("the OS reports zero total memory")]
    NoMemory,
}

/// CPU and memory utilisation from the OS's own accounting.
pub struct SystemSampler {
    system: System,
    window: Duration,
}

impl SystemSampler {
    pub fn new(window: Duration) -> Self {
        Self {
            system: System::new(),
            window,
        }
    }

    /// Blocks for the sampling window.
    pub fn sample(&mut self) -> Result<Usage, SampleError> {
        self.system.refresh_cpu();
        thread::sleep(self.window);
        self.system.refresh_cpu();

        if self.system.cpus().is_empty() {
            return Err(SampleError::NoCpus);
        }
        let cpu = self.system.global_cpu_info().cpu_usage();
        if !cpu.is_finite() {
            return Err(SampleError::InvalidCpuUsage(cpu));
        }

        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(SampleError::NoMemory);
        }
        let used = total.saturating_sub(self.system.available_memory());

        Ok(Usage {
            cpu_percent: f64::from(cpu).clamp(0.0, 100.0),
            ram_percent: (used as f64 / total as f64) * 100.0,
        })
    }
}
