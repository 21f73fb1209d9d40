use std::cell::Cell;
use std::fmt;

use super::CoachError;

/// The two independent kinds of coach request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Suggestions,
    Insight,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Suggestions => "habit suggestions",
            Self::Insight => "weekly insight",
        })
    }
}

/// Admits at most one in-flight request of a given kind.
#[derive(Debug)]
pub struct RequestGate {
    kind: RequestKind,
    busy: Cell<bool>,
}

impl RequestGate {
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            busy: Cell::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Claim the gate, or fail with [`CoachError::Busy`] while another
    /// request holds it. The claim is released when the guard drops.
    pub fn try_begin(&self) -> Result<InFlight<'_>, CoachError> {
        if self.busy.replace(true) {
            log::debug!("Rejecting {} request: one is already in flight", self.kind);
            return Err(CoachError::Busy(self.kind));
        }
        Ok(InFlight { gate: self })
    }
}

/// Held for the lifetime of one request.
#[derive(Debug)]
pub struct InFlight<'a> {
    gate: &'a RequestGate,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.gate.busy.set(false);
    }
}
