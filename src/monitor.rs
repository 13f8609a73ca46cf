use crate::collectors::system::SampleError;
use crate::collectors::{collect_snapshot, HostProbe};
use crate::display::{render, DisplayError, Surface};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("sampling failed: {0}")]
    Sample(#[from] SampleError),
    #[error("rendering failed: {0}")]
    Display(#[from] DisplayError),
}

/// Outcome of one sample-and-render pass.
#[derive(Debug)]
pub enum Iteration {
    Rendered,
    Failed(MonitorError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub interval: Duration,
    pub error_cooldown: Duration,
}

impl Iteration {
    pub fn pause(&self, pacing: &Pacing) -> Duration {
        match self {
            Iteration::Rendered => pacing.interval,
            Iteration::Failed(_) => pacing.error_cooldown,
        }
    }
}

pub struct Monitor<P, S> {
    probe: P,
    surface: S,
    pacing: Pacing,
}

impl<P: HostProbe, S: Surface> Monitor<P, S> {
    pub fn new(probe: P, surface: S, pacing: Pacing) -> Self {
        Self {
            probe,
            surface,
            pacing,
        }
    }

    pub fn run_once(&mut self) -> Iteration {
        match self.sample_and_render() {
            Ok(()) => Iteration::Rendered,
            Err(err) => Iteration::Failed(err),
        }
    }

    fn sample_and_render(&mut self) -> Result<(), MonitorError> {
        let snapshot = collect_snapshot(&mut self.probe)?;
        render(&mut self.surface, &snapshot)?;
        Ok(())
    }

    /// Iterates until `shutdown` resolves. Failed iterations are logged and
    /// followed by the longer cool-down; they never end the loop.
    pub async fn run_until<F: Future>(&mut self, shutdown: F) {
        tokio::pin!(shutdown);
        loop {
            let iteration = self.run_once();
            if let Iteration::Failed(err) = &iteration {
                error!(error = %err, "error in monitor loop");
            }
            let pause = iteration.pause(&self.pacing);
            debug!(pause = %humantime::format_duration(pause), "sleeping");

            tokio::select! {
                _ = &mut shutdown => return,
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
