use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::model::{ElectionRow, ScopeContext};

/// Recoverable conditions met while extracting. None of them stop the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    UnparsedSession,
    UnrecognizedSection,
    NonNumericYear,
    UnmatchedStateHeader,
    UnmatchedTrialHeader,
    IncompleteDistrict,
    UnknownElectedCount,
    BareRunoffMarker,
    AmbiguousFragment,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticKind::UnparsedSession => "session header not parsed",
            DiagnosticKind::UnrecognizedSection => "section header not recognized",
            DiagnosticKind::NonNumericYear => "year contains letters",
            DiagnosticKind::UnmatchedStateHeader => "state header not parsed",
            DiagnosticKind::UnmatchedTrialHeader => "trial header not parsed",
            DiagnosticKind::IncompleteDistrict => "district marker left incomplete",
            DiagnosticKind::UnknownElectedCount => "elected count not understood",
            DiagnosticKind::BareRunoffMarker => "runoff marker without a name",
            DiagnosticKind::AmbiguousFragment => "fragment needs investigation",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
    pub scope: ScopeContext,
}

/// Output accumulator threaded through one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub rows: Vec<ElectionRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: ElectionRow) {
        self.rows.push(row);
    }

    pub fn report(&mut self, kind: DiagnosticKind, detail: impl Into<String>, scope: &ScopeContext) {
        let detail = detail.into();
        log::warn!(
            "{kind}: {detail:?} (session {:?}, state {:?}, district {:?})",
            scope.session,
            scope.state,
            scope.district
        );
        self.diagnostics.push(Diagnostic {
            kind,
            detail,
            scope: scope.clone(),
        });
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}
