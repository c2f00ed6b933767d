//! Per-step reporting.
//!
//! A step never fails halfway. Problems that get recovered locally (a body
//! whose integration overflowed, a contact whose correction came out
//! non-finite) are recorded here instead so callers can surface them.

use crate::body::BodyHandle;
use std::fmt;

/// What was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Integration produced a non-finite state; the body held its position.
    SkippedIntegration,
    /// A contact correction was not finite; flags were set without moving.
    SkippedResolution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub body: BodyHandle,
    pub other: Option<BodyHandle>,
}

impl Diagnostic {
    pub fn skipped_integration(body: BodyHandle) -> Self {
        Self {
            kind: DiagnosticKind::SkippedIntegration,
            body,
            other: None,
        }
    }

    pub fn skipped_resolution(body: BodyHandle, other: BodyHandle) -> Self {
        Self {
            kind: DiagnosticKind::SkippedResolution,
            body,
            other: Some(other),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.other) {
            (DiagnosticKind::SkippedIntegration, _) => {
                write!(f, "body {} held in place: non-finite integration", self.body)
            }
            (DiagnosticKind::SkippedResolution, Some(other)) => write!(
                f,
                "contact {} / {} left unresolved: non-finite correction",
                self.body, other
            ),
            (DiagnosticKind::SkippedResolution, None) => {
                write!(f, "contact on {} left unresolved", self.body)
            }
        }
    }
}

/// Summary of one completed step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Sequence number of the step, starting at 1.
    pub step: u64,
    pub dt: f32,
    pub bodies: usize,
    /// Pairs emitted by the broad-phase.
    pub candidate_pairs: usize,
    /// Contacts found, touching ones included.
    pub contacts: usize,
    /// Contacts that moved at least one body.
    pub corrections: usize,
    /// Resolution passes actually run.
    pub passes: u32,
    pub diagnostics: Vec<Diagnostic>,
}

impl StepReport {
    pub(crate) fn new(step: u64, dt: f32) -> Self {
        Self {
            step,
            dt,
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
