//! Approval gate between showing an analysis and exporting it.

use serde::{Deserialize, Serialize};

use crate::flow::AnalysisFlow;

/// Review state of one analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approval {
    Pending,
    Approved,
}

/// A summary returned by the model, waiting for the user's sign-off.
///
/// The text is only handed out for export once the gate is `Approved`.
#[derive(Debug, Clone)]
pub struct ReviewedSummary {
    flow: AnalysisFlow,
    text: String,
    approval: Approval,
}

impl ReviewedSummary {
    pub fn new(flow: AnalysisFlow, text: String) -> Self {
        Self {
            flow,
            text,
            approval: Approval::Pending,
        }
    }

    pub fn flow(&self) -> AnalysisFlow {
        self.flow
    }

    /// The summary for display; available in any state.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn approval(&self) -> Approval {
        self.approval
    }

    /// Move the gate to `Approved`. Idempotent.
    pub fn approve(&mut self) {
        self.approval = Approval::Approved;
    }

    /// The summary text for export, or `None` while still pending.
    pub fn approved_text(&self) -> Option<&str> {
        match self.approval {
            Approval::Approved => Some(&self.text),
            Approval::Pending => None,
        }
    }
}
