pub mod candidates;
pub mod core;
pub mod export;
pub mod incumbency;
pub mod parser;
pub mod pipeline;
pub mod segment;

pub use crate::core::diagnostics::{Diagnostic, DiagnosticKind, Extraction};
pub use crate::core::model::{ElectionRow, LinkedRow, Outcome, ScopeContext, SectionKind, Span};
pub use incumbency::link_incumbency;
pub use segment::extract;
