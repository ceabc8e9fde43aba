//! Per-iteration diagnostics.
//!
//! An [`IterationObserver`] receives one [`IterationRecord`] after every step of
//! the estimator and a final notification when the run stops. Observers cannot
//! influence the iteration. Any `FnMut(&IterationRecord)` closure is an observer.

use std::io::Write;

use ndarray::ArrayView1;

use super::convergence::ConvergenceStatus;

/// Snapshot of the estimator after one step.
#[derive(Debug, Clone)]
pub struct IterationRecord<'a> {
    /// 1-based step index
    pub iteration: usize,

    /// Consecutive steps whose chi-squared change was below the stop tolerance
    pub extra_iterations: usize,

    /// Reference chi-squared after the step, used by the stop condition
    pub chi_squared: f64,

    /// Chi-squared of the retained coefficients
    pub retained_chi_squared: f64,

    /// Damping parameter after adaptation
    pub lambda: f64,

    /// Whether the trial coefficients were accepted
    pub accepted: bool,

    /// Retained coefficients after the step
    pub coefficients: ArrayView1<'a, f64>,

    /// Coefficient names, in coefficient order
    pub coefficient_names: &'a [String],
}

/// Receives diagnostics from the estimator.
pub trait IterationObserver {
    /// Called after every step.
    fn on_iteration(&mut self, record: &IterationRecord<'_>);

    /// Called once when the iteration stops.
    fn on_finish(&mut self, _status: ConvergenceStatus, _iterations: usize) {}
}

impl<F> IterationObserver for F
where
    F: FnMut(&IterationRecord<'_>),
{
    fn on_iteration(&mut self, record: &IterationRecord<'_>) {
        self(record)
    }
}

/// Forwards iteration records to the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    level: log::Level,
}

impl LogObserver {
    /// Log records at `level`.
    pub fn new(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(log::Level::Debug)
    }
}

impl IterationObserver for LogObserver {
    fn on_iteration(&mut self, record: &IterationRecord<'_>) {
        log::log!(
            self.level,
            "iteration {} ({} extra): chi-squared {:.10e}, lambda {:e}, {}, coefficients {}",
            record.iteration,
            record.extra_iterations,
            record.chi_squared,
            record.lambda,
            if record.accepted { "accepted" } else { "rejected" },
            record.coefficients
        );
    }

    fn on_finish(&mut self, status: ConvergenceStatus, iterations: usize) {
        log::log!(
            self.level,
            "stopped after {} iterations: {}",
            iterations,
            status.description()
        );
    }
}

/// Writes a human-readable trace of every iteration to a writer.
///
/// ```text
/// ## On the Golden Path.
/// Iteration: 4 (1 EXTRA) Chi-Squared: 1.2345678901e2
///   amplitude0      center0 ...
/// ```
pub struct TraceWriter<W: Write> {
    writer: W,
}

impl<W: Write> TraceWriter<W> {
    /// Trace into `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &IterationRecord<'_>) -> std::io::Result<()> {
        if record.accepted {
            writeln!(self.writer, "## On the Golden Path.")?;
        } else {
            writeln!(self.writer, "## Bad step. Trying bigger leap.")?;
        }

        write!(self.writer, "Iteration: {}", record.iteration)?;
        if record.extra_iterations > 0 {
            write!(self.writer, " ({} EXTRA)", record.extra_iterations)?;
        }
        writeln!(self.writer, " Chi-Squared: {:.10e}", record.chi_squared)?;

        for name in record.coefficient_names {
            write!(self.writer, "{:>14} ", name)?;
        }
        writeln!(self.writer)?;
        for value in record.coefficients.iter() {
            write!(self.writer, "{:>14.8} ", value)?;
        }
        writeln!(self.writer)
    }
}

impl<W: Write> IterationObserver for TraceWriter<W> {
    fn on_iteration(&mut self, record: &IterationRecord<'_>) {
        if let Err(e) = self.write_record(record) {
            log::warn!("failed to write iteration trace: {}", e);
        }
    }

    fn on_finish(&mut self, _status: ConvergenceStatus, iterations: usize) {
        let result = writeln!(self.writer, "--- Stopped after {} iterations ---", iterations)
            .and_then(|_| self.writer.flush());
        if let Err(e) = result {
            log::warn!("failed to write iteration trace: {}", e);
        }
    }
}
