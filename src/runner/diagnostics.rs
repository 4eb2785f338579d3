//! Warning sinks for non-fatal problems found while building chains.
//!
//! Nothing reported here affects chain correctness. The host decides how warnings are
//! presented by registering a sink on the [`Oloo`](crate::runner::api::Oloo) handle.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::error::OlooError;

pub trait WarningSink {
    fn warn(&self, warning: &OlooError);
}

/// Default sink: forwards every warning to `tracing` at WARN level.
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, warning: &OlooError) {
        tracing::warn!(target: "oloo", %warning, "OLOO");
    }
}

/// Keeps every warning in memory. Clones share the same buffer, so a test can hand one clone
/// to the handle and inspect the other.
#[derive(Clone, Default)]
pub struct CollectingSink {
    warnings: Rc<RefCell<Vec<OlooError>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        CollectingSink::default()
    }

    pub fn warnings(&self) -> Vec<OlooError> {
        self.warnings.borrow().clone()
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, warning: &OlooError) {
        self.warnings.borrow_mut().push(warning.clone());
    }
}
