pub mod network;
pub mod system;
pub mod temperature;
pub mod uptime;

use crate::config::{Config, NetworkConfig, TemperatureConfig, UptimeConfig};
use system::{SampleError, SystemSampler, Usage};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_IP: &str = "No IP";

/// One iteration's readings. Labels are never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSnapshot {
    pub cpu_percent: f64,
    pub cpu_temp: String,
    pub ram_percent: f64,
    pub uptime: String,
    pub ip: String,
}

/// Everything the loop reads from the host.
///
/// Only the utilisation sample can fail; the other readers fold their
/// failures into placeholder labels.
pub trait HostProbe {
    fn sample_usage(&mut self) -> Result<Usage, SampleError>;
    fn cpu_temperature(&self) -> String;
    fn uptime(&self) -> String;
    fn local_ip(&self) -> String;
}

pub fn collect_snapshot<P: HostProbe + ?Sized>(
    probe: &mut P,
) -> Result<SystemSnapshot, SampleError> {
    let usage = probe.sample_usage()?;
    Ok(SystemSnapshot {
        cpu_percent: usage.cpu_percent,
        cpu_temp: probe.cpu_temperature(),
        ram_percent: usage.ram_percent,
        uptime: probe.uptime(),
        ip: probe.local_ip(),
    })
}

pub struct Host {
    sampler: SystemSampler,
    temperature: TemperatureConfig,
    uptime: UptimeConfig,
    network: NetworkConfig,
}

impl Host {
    pub fn new(cfg: &Config) -> Self {
        Self {
            sampler: SystemSampler::new(cfg.cpu_sample_window()),
            temperature: cfg.temperature.clone(),
            uptime: cfg.uptime.clone(),
            network: cfg.network.clone(),
        }
    }
}

impl HostProbe for Host {
    fn sample_usage(&mut self) -> Result<Usage, SampleError> {
        self.sampler.sample()
    }

    fn cpu_temperature(&self) -> String {
        temperature::read_cpu_temperature(&self.temperature)
    }

    fn uptime(&self) -> String {
        uptime::read_uptime(&self.uptime.path)
    }

    fn local_ip(&self) -> String {
        network::resolve_local_ip(&self.network)
    }
}
