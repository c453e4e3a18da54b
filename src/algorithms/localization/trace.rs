//! Particle population trace.
//!
//! Optional observer that receives the whole population after every motion
//! and measurement step, for offline plotting. Trace failures never stop
//! the filter.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::particle_filter::Particle;
use crate::error::Result;

/// Filter step that produced a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePhase {
    /// After `predict`
    Motion,
    /// After `update`
    Measurement,
}

impl TracePhase {
    /// Header line written before the population.
    pub fn label(&self) -> &'static str {
        match self {
            TracePhase::Motion => "Motion",
            TracePhase::Measurement => "Measurement",
        }
    }
}

/// Receives particle populations from the filter.
pub trait TraceSink: Send {
    /// Record the population produced by `phase`.
    fn record(&mut self, phase: TracePhase, particles: &[Particle]);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl TraceSink for NoopTrace {
    fn record(&mut self, _phase: TracePhase, _particles: &[Particle]) {}
}

/// Writes populations as text: a header line, then `x y theta` per particle.
#[derive(Debug)]
pub struct WriterTrace<W: Write> {
    writer: W,
    failed: bool,
}

impl<W: Write> WriterTrace<W> {
    /// Trace into any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    /// Consume the trace and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_population(&mut self, phase: TracePhase, particles: &[Particle]) -> std::io::Result<()> {
        writeln!(self.writer, "{}", phase.label())?;
        for p in particles {
            writeln!(self.writer, "{} {} {}", p.pose.x, p.pose.y, p.pose.theta)?;
        }
        self.writer.flush()
    }
}

impl WriterTrace<BufWriter<File>> {
    /// Append to a file, creating it if needed.
    pub fn append_to<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path.as_ref())?;
        log::info!("Tracing particles to {}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> TraceSink for WriterTrace<W> {
    fn record(&mut self, phase: TracePhase, particles: &[Particle]) {
        if let Err(e) = self.write_population(phase, particles) {
            // Warn once, then keep trying silently
            if !self.failed {
                log::warn!("Particle trace write failed: {}", e);
                self.failed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pose;

    #[test]
    fn test_writer_trace_format() {
        let mut trace = WriterTrace::new(Vec::new());
        let particles = vec![
            Particle::new(Pose::new(1.0, 3.0, 0.0)),
            Particle::new(Pose::new(2.5, 1.0, -90.0)),
        ];

        trace.record(TracePhase::Motion, &particles);
        trace.record(TracePhase::Measurement, &particles[..1]);

        let text = String::from_utf8(trace.into_inner()).unwrap();
        assert_eq!(text, "Motion\n1 3 0\n2.5 1 -90\nMeasurement\n1 3 0\n");
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_are_swallowed() {
        let mut trace = WriterTrace::new(BrokenWriter);
        let particles = vec![Particle::new(Pose::default())];
        trace.record(TracePhase::Motion, &particles);
        trace.record(TracePhase::Measurement, &particles);
        assert!(trace.failed);
    }

    #[test]
    fn test_append_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("localization.out");
        let particles = vec![Particle::new(Pose::new(1.0, 1.0, 0.0))];

        {
            let mut trace = WriterTrace::append_to(&path).unwrap();
            trace.record(TracePhase::Motion, &particles);
        }
        {
            let mut trace = WriterTrace::append_to(&path).unwrap();
            trace.record(TracePhase::Measurement, &particles);
        }

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Motion\n1 1 0\nMeasurement\n1 1 0\n");
    }
}
