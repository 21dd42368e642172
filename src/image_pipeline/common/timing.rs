use std::time::{Duration, Instant};

use tracing::info;

/// Wall-clock time spent in one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Stage durations of one pipeline run, in execution order.
#[derive(Debug, Default, Clone)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, step: StepTiming) {
        self.steps.push(step);
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Summed duration of every run of `name`, `None` if it never ran.
    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.steps
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.duration)
            .reduce(|a, b| a + b)
    }

    /// Fraction of the total spent in `name`, 0 when nothing was timed.
    pub fn share(&self, name: &str) -> f64 {
        let total = self.total_duration().as_secs_f64();
        match self.get_step(name) {
            Some(d) if total > 0.0 => d.as_secs_f64() / total,
            _ => 0.0,
        }
    }

    pub fn slowest(&self) -> Option<StepTiming> {
        self.steps.iter().copied().max_by_key(|s| s.duration)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        for step in &self.steps {
            info!(
                stage = step.name,
                ms = step.duration.as_secs_f64() * 1000.0,
                percent = self.share(step.name) * 100.0,
                "stage timing"
            );
        }
        info!(ms = self.total_duration().as_secs_f64() * 1000.0, "pipeline total");
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> StepTiming {
        StepTiming {
            name: self.name,
            duration: self.start.elapsed(),
        }
    }
}
