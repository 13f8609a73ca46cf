use std::io;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::info;

/// SIGINT and SIGTERM streams. Handlers are in place from `install` onwards,
/// so an interrupt during a blocking iteration is queued rather than killing
/// the process.
pub struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
}

impl ShutdownSignals {
    /// Must run inside the tokio runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    pub async fn recv(mut self) {
        tokio::select! {
            _ = self.sigterm.recv() => info!("received SIGTERM"),
            _ = self.sigint.recv() => info!("received SIGINT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::system::{SampleError, Usage};
    use crate::collectors::HostProbe;
    use crate::display::testing::RecordingSurface;
    use crate::monitor::{Monitor, Pacing};
    use std::process::Command;
    use std::time::Duration;

    /// Interrupts its own process during the first sample.
    struct InterruptingProbe {
        calls: usize,
    }

    impl HostProbe for InterruptingProbe {
        fn sample_usage(&mut self) -> Result<Usage, SampleError> {
            self.calls += 1;
            if self.calls == 1 {
                let status = Command::new("kill")
                    .args(["-INT", &std::process::id().to_string()])
                    .status()
                    .expect("run kill");
                assert!(status.success());
            }
            Ok(Usage {
                cpu_percent: 5.0,
                ram_percent: 40.0,
            })
        }

        fn cpu_temperature(&self) -> String {
            "45C".to_string()
        }

        fn uptime(&self) -> String {
            "1m".to_string()
        }

        fn local_ip(&self) -> String {
            "192.168.1.5".to_string()
        }
    }

    #[tokio::test]
    async fn sigint_during_first_iteration_ends_loop() {
        let signals = ShutdownSignals::install().expect("install signal handlers");
        let pacing = Pacing {
            interval: Duration::from_secs(60),
            error_cooldown: Duration::from_secs(60),
        };
        let mut monitor = Monitor::new(
            InterruptingProbe { calls: 0 },
            RecordingSurface::default(),
            pacing,
        );

        tokio::time::timeout(Duration::from_secs(10), monitor.run_until(signals.recv()))
            .await
            .expect("loop returns on SIGINT");

        assert_eq!(monitor.surface_mut().committed_frames().len(), 1);
    }
}
