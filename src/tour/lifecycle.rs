use std::cell::RefCell;
use std::rc::Rc;

/// Why a tour run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitReason {
    /// Explicit exit without a more specific cause.
    Standard,
    /// The user pressed `Escape`.
    Escape,
    /// The sequence was consumed to the end.
    Finished,
    /// The run was aborted by an error.
    Error,
}

/// The value a run resolves with, produced exactly once per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExitResult {
    /// Exit cause.
    pub reason: ExitReason,
    /// Final progress (count of consumed steps).
    pub progress: usize,
}

/// One-shot completion signal for a run.
///
/// [`ExitSignal::resolve`] fills the shared slot the first time it is called;
/// the resolver is spent afterwards and later calls are no-ops. Handles keep
/// reading the first result.
#[derive(Debug, Default)]
pub struct ExitSignal {
    slot: Rc<RefCell<Option<ExitResult>>>,
    spent: bool,
}

/// Read side of an [`ExitSignal`].
#[derive(Clone, Debug)]
pub struct ExitHandle {
    slot: Rc<RefCell<Option<ExitResult>>>,
}

impl ExitSignal {
    /// Create an unresolved signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain a handle observing this signal's resolution.
    pub fn subscribe(&self) -> ExitHandle {
        ExitHandle {
            slot: Rc::clone(&self.slot),
        }
    }

    /// Resolve with `result`. Returns `true` on the first call only.
    pub fn resolve(&mut self, result: ExitResult) -> bool {
        if self.spent {
            return false;
        }
        self.spent = true;
        *self.slot.borrow_mut() = Some(result);
        true
    }

    /// Whether the signal has already fired.
    pub fn is_resolved(&self) -> bool {
        self.spent
    }

    /// Re-arm for a fresh run, detaching previous subscribers.
    pub fn rearm(&mut self) {
        self.slot = Rc::new(RefCell::new(None));
        self.spent = false;
    }
}

impl ExitHandle {
    /// The resolved result, if any.
    pub fn result(&self) -> Option<ExitResult> {
        *self.slot.borrow()
    }

    /// Whether the observed signal has resolved.
    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tour/lifecycle.rs"]
mod tests;
