use std::fmt;

use super::host::DiagnosticsSink;

/// User-facing warnings raised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    PropellantDepleted,
    SuborbitalWarpThrust,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PropellantDepleted => write!(f, "Propellant depleted"),
            Diagnostic::SuborbitalWarpThrust => {
                write!(f, "Cannot accelerate time while suborbital with thrust")
            }
        }
    }
}

/// Forwards warnings to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(?diagnostic, "{}", diagnostic);
    }
}

/// Keeps every warning in order of emission.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    pub warnings: Vec<Diagnostic>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, diagnostic: Diagnostic) -> usize {
        self.warnings.iter().filter(|&&d| d == diagnostic).count()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn warn(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }
}
