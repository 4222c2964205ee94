use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of ancestor elements consulted when resolving a formatting
/// attribute for a span (parent, then grandparent).
pub const STYLE_LOOKUP_DEPTH: usize = 2;

/// Formatting attributes carried by one enclosing element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleAttrs {
    pub size: Option<String>,
    pub style: Option<String>,
}

impl StyleAttrs {
    pub fn sized(size: &str) -> Self {
        Self {
            size: Some(size.to_string()),
            style: None,
        }
    }

    pub fn with_style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }
}

/// An inline formatted text fragment as produced by the document reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    /// Text of each italic descendant, in document order.
    pub emphasized: Vec<String>,
    /// Enclosing elements, nearest first. Only the first
    /// [`STYLE_LOOKUP_DEPTH`] entries are ever consulted.
    pub ancestors: Vec<StyleAttrs>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_emphasis(mut self, text: impl Into<String>) -> Self {
        self.emphasized.push(text.into());
        self
    }

    pub fn with_ancestor(mut self, attrs: StyleAttrs) -> Self {
        self.ancestors.push(attrs);
        self
    }

    /// Nearest enclosing element (within the lookup depth) that carries a size.
    pub fn resolve_sized(&self) -> Option<&StyleAttrs> {
        self.ancestors
            .iter()
            .take(STYLE_LOOKUP_DEPTH)
            .find(|attrs| attrs.size.is_some())
    }

    pub fn first_emphasis(&self) -> Option<&str> {
        self.emphasized.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanRole {
    CongressHeader,
    SectionHeader,
    YearHeader,
    StateHeader,
    TrialHeader,
    DistrictMarker,
    BodyText,
    Unclassified,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifiedSpan<'a> {
    pub span: &'a Span,
    pub role: SpanRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    StandardElections,
    RunoffElections,
    SpecialElections,
    StatisticalSummary,
    IncompleteReturns,
    ElectionsinRestoredAreas,
    RejectedandUndeterminedElections,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::StandardElections,
        SectionKind::RunoffElections,
        SectionKind::SpecialElections,
        SectionKind::StatisticalSummary,
        SectionKind::IncompleteReturns,
        SectionKind::ElectionsinRestoredAreas,
        SectionKind::RejectedandUndeterminedElections,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SectionKind::StandardElections => "StandardElections",
            SectionKind::RunoffElections => "RunoffElections",
            SectionKind::SpecialElections => "SpecialElections",
            SectionKind::StatisticalSummary => "StatisticalSummary",
            SectionKind::IncompleteReturns => "IncompleteReturns",
            SectionKind::ElectionsinRestoredAreas => "ElectionsinRestoredAreas",
            SectionKind::RejectedandUndeterminedElections => "RejectedandUndeterminedElections",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accumulated outline position. Each nesting level derives a new context from
/// its parent; contexts are never mutated after being handed down.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeContext {
    pub session: Option<u32>,
    pub section: Option<SectionKind>,
    pub year: Option<String>,
    pub election_dates: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub trial: Option<u32>,
    pub num_elected: Option<u32>,
}

impl ScopeContext {
    pub fn with_session(&self, session: u32) -> Self {
        Self {
            session: Some(session),
            ..self.clone()
        }
    }

    pub fn with_section(&self, section: SectionKind) -> Self {
        let mut next = Self {
            section: Some(section),
            ..self.clone()
        };
        if section == SectionKind::StandardElections {
            next.trial = Some(1);
        }
        next
    }

    pub fn with_year(&self, year: String) -> Self {
        Self {
            year: Some(year),
            ..self.clone()
        }
    }

    pub fn with_state(&self, state: String, election_dates: Option<String>) -> Self {
        Self {
            state: Some(state),
            election_dates: election_dates.or_else(|| self.election_dates.clone()),
            ..self.clone()
        }
    }

    pub fn with_trial(&self, trial: TrialHeading) -> Self {
        Self {
            trial: Some(trial.trial),
            election_dates: trial.election_dates.or_else(|| self.election_dates.clone()),
            year: trial.year.or_else(|| self.year.clone()),
            ..self.clone()
        }
    }

    pub fn with_district(&self, district: &DistrictHeading) -> Self {
        Self {
            district: Some(district.district.clone()),
            num_elected: Some(district.num_elected),
            ..self.clone()
        }
    }

    /// Seats contested in the current district; never below one.
    pub fn seats(&self) -> u32 {
        self.num_elected.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialHeading {
    pub trial: u32,
    pub election_dates: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictHeading {
    pub district: String,
    pub num_elected: u32,
}

impl DistrictHeading {
    pub fn single() -> Self {
        Self {
            district: "Single".to_string(),
            num_elected: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub party: Option<String>,
    pub votes: Option<u64>,
    pub percentage: Option<f64>,
    pub runoff: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Runoff,
    Lost,
}

/// One output row: a candidate within its fully resolved scope.
///
/// Field order is the column order of the written table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionRow {
    pub session: Option<u32>,
    #[serde(rename = "type")]
    pub section: Option<SectionKind>,
    pub year: Option<String>,
    pub election_dates: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub runoff: bool,
    pub trial: Option<u32>,
    pub num_elected: u32,
    pub name: String,
    pub party: Option<String>,
    pub votes: Option<u64>,
    pub percentage: Option<f64>,
    pub result: Outcome,
}

impl ElectionRow {
    pub fn new(
        ctx: &ScopeContext,
        candidate: CandidateRecord,
        district_runoff: bool,
        result: Outcome,
    ) -> Self {
        Self {
            session: ctx.session,
            section: ctx.section,
            year: ctx.year.clone(),
            election_dates: ctx.election_dates.clone(),
            state: ctx.state.clone(),
            district: ctx.district.clone(),
            runoff: district_runoff,
            trial: ctx.trial,
            num_elected: ctx.seats(),
            name: candidate.name,
            party: candidate.party,
            votes: candidate.votes,
            percentage: candidate.percentage,
            result,
        }
    }
}

/// An [`ElectionRow`] annotated by the incumbency pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedRow {
    pub session: Option<u32>,
    #[serde(rename = "type")]
    pub section: Option<SectionKind>,
    pub year: Option<String>,
    pub election_dates: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub runoff: bool,
    pub trial: Option<u32>,
    pub num_elected: u32,
    pub name: String,
    pub party: Option<String>,
    pub votes: Option<u64>,
    pub percentage: Option<f64>,
    pub result: Outcome,
    pub incumbent: bool,
    pub old_vote_share: Option<f64>,
    pub clean_name: String,
}

impl LinkedRow {
    pub fn from_row(
        row: ElectionRow,
        incumbent: bool,
        old_vote_share: Option<f64>,
        clean_name: String,
    ) -> Self {
        Self {
            session: row.session,
            section: row.section,
            year: row.year,
            election_dates: row.election_dates,
            state: row.state,
            district: row.district,
            runoff: row.runoff,
            trial: row.trial,
            num_elected: row.num_elected,
            name: row.name,
            party: row.party,
            votes: row.votes,
            percentage: row.percentage,
            result: row.result,
            incumbent,
            old_vote_share,
            clean_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_size_from_parent_before_grandparent() {
        let span = Span::new("x")
            .with_ancestor(StyleAttrs::sized("2"))
            .with_ancestor(StyleAttrs::sized("6"));
        assert_eq!(span.resolve_sized().and_then(|a| a.size.as_deref()), Some("2"));
    }

    #[test]
    fn size_lookup_stops_at_grandparent() {
        let span = Span::new("x")
            .with_ancestor(StyleAttrs::default())
            .with_ancestor(StyleAttrs::default())
            .with_ancestor(StyleAttrs::sized("6"));
        assert!(span.resolve_sized().is_none());
    }

    #[test]
    fn standard_section_seeds_first_trial() {
        let ctx = ScopeContext::default().with_section(SectionKind::StandardElections);
        assert_eq!(ctx.trial, Some(1));
        let runoff = ScopeContext::default().with_section(SectionKind::RunoffElections);
        assert_eq!(runoff.trial, None);
    }
}
