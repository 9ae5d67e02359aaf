use serde::Serialize;

/// Terminal state of one normalized entry
///
/// A failed entry has no outcome: the error aborts the whole call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOutcome {
    Skipped,
    Built,
    Updated,
    UpdatedAndMarkedForDestruction,
}

impl EntryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryOutcome::Skipped => "skipped",
            EntryOutcome::Built => "built",
            EntryOutcome::Updated => "updated",
            EntryOutcome::UpdatedAndMarkedForDestruction => "updated_and_marked_for_destruction",
        }
    }

    pub(crate) fn after_assign(marked: bool) -> Self {
        if marked {
            EntryOutcome::UpdatedAndMarkedForDestruction
        } else {
            EntryOutcome::Updated
        }
    }
}

impl std::fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-entry outcomes of one reconciliation call, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub association: String,
    pub outcomes: Vec<EntryOutcome>,
}

impl ReconciliationReport {
    pub fn new(association: impl Into<String>) -> Self {
        Self {
            association: association.into(),
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: EntryOutcome) {
        self.outcomes.push(outcome);
    }

    fn count(&self, outcome: EntryOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }

    pub fn built(&self) -> usize {
        self.count(EntryOutcome::Built)
    }

    /// Updated entries, including those also marked for destruction
    pub fn updated(&self) -> usize {
        self.count(EntryOutcome::Updated) + self.marked_for_destruction()
    }

    pub fn marked_for_destruction(&self) -> usize {
        self.count(EntryOutcome::UpdatedAndMarkedForDestruction)
    }

    pub fn skipped(&self) -> usize {
        self.count(EntryOutcome::Skipped)
    }
}
