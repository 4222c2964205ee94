//! Recursive recovery of the document outline.
//!
//! Each level scans its segment for boundary spans of one role, derives a new
//! [`ScopeContext`] per boundary and recurses into the spans between
//! boundaries. Boundaries that fail to parse are reported and treated as
//! ordinary spans; nothing after them is lost.
pub mod district;
pub mod headings;

use regex::Regex;

use crate::core::cursor::Cursor;
use crate::core::diagnostics::{DiagnosticKind, Extraction};
use crate::core::model::{ClassifiedSpan, ScopeContext, SectionKind, Span, SpanRole, TrialHeading};
use crate::core::span_classifier::classify_all;
use crate::core::text;
use headings::{parse_section, parse_session, parse_state, parse_trial, parse_year, runoff_state_name};
use headings::{STATE_RE, TRIAL_RE};

pub use district::districts;

/// Trial number assumed for a runoff state that lists no trial headers.
const DEFAULT_RUNOFF_TRIAL: u32 = 2;

/// Extracts every election row from an ordered span sequence.
pub fn extract(spans: &[Span]) -> Extraction {
    let classified = classify_all(spans);
    let mut out = Extraction::new();
    sessions(&classified, &ScopeContext::default(), &mut out);
    out
}

#[derive(Debug, Clone, PartialEq)]
struct Boundary<T> {
    value: T,
    /// Index of the boundary span.
    start: usize,
    /// Index just past the last span the boundary consumed.
    end: usize,
}

/// Whether spans before the first boundary are processed with the inherited
/// context or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Keep,
    Drop,
}

type Segment<'s, 'a, T> = (Option<T>, &'s [ClassifiedSpan<'a>]);

/// Cuts a segment at its boundaries. A segment without boundaries comes back
/// whole with no value; the trailing segment is always included.
fn partition<'s, 'a, T>(
    spans: &'s [ClassifiedSpan<'a>],
    boundaries: Vec<Boundary<T>>,
    prefix: Prefix,
) -> Vec<Segment<'s, 'a, T>> {
    let Some(first) = boundaries.first() else {
        return vec![(None, spans)];
    };
    let mut segments = Vec::with_capacity(boundaries.len() + 1);
    let head = &spans[..first.start];
    match prefix {
        Prefix::Keep => segments.push((None, head)),
        Prefix::Drop if !head.is_empty() => {
            log::debug!("dropping {} span(s) before the first boundary", head.len());
        }
        Prefix::Drop => {}
    }

    let mut iter = boundaries.into_iter().peekable();
    while let Some(boundary) = iter.next() {
        let stop = iter.peek().map_or(spans.len(), |next| next.start);
        segments.push((Some(boundary.value), &spans[boundary.end..stop]));
    }
    segments
}

/// Boundaries that are a single span of `role` whose text `parse` accepts.
fn single_span_boundaries<T>(
    spans: &[ClassifiedSpan<'_>],
    role: SpanRole,
    mut parse: impl FnMut(&Span) -> Option<T>,
) -> Vec<Boundary<T>> {
    spans
        .iter()
        .enumerate()
        .filter(|(_, item)| item.role == role)
        .filter_map(|(idx, item)| {
            parse(item.span).map(|value| Boundary {
                value,
                start: idx,
                end: idx + 1,
            })
        })
        .collect()
}

/// Boundaries whose text may continue over following spans. Text is appended
/// until `pattern` matches; an attempt that runs out of spans is reported and
/// scanning resumes right after the header span.
fn accumulated_boundaries<T>(
    spans: &[ClassifiedSpan<'_>],
    role: SpanRole,
    piece: fn(&str) -> String,
    pattern: &Regex,
    parse: impl Fn(&str) -> Option<T>,
    on_unmatched: &mut dyn FnMut(String),
) -> Vec<Boundary<T>> {
    let mut boundaries = Vec::new();
    let mut cursor = Cursor::new(spans);
    while let Some(item) = cursor.next() {
        if item.role != role {
            continue;
        }
        let start = cursor.position() - 1;
        let seed = piece(&item.span.text);
        let joined = cursor.accumulate_until(
            seed.clone(),
            |next| piece(&next.span.text),
            |text| pattern.is_match(text),
        );
        match joined.as_deref().and_then(&parse) {
            Some(value) => boundaries.push(Boundary {
                value,
                start,
                end: cursor.position(),
            }),
            None => {
                on_unmatched(joined.unwrap_or(seed));
                cursor.seek(start + 1);
            }
        }
    }
    boundaries
}

fn sessions(spans: &[ClassifiedSpan<'_>], ctx: &ScopeContext, out: &mut Extraction) {
    let boundaries = single_span_boundaries(spans, SpanRole::CongressHeader, |span| {
        let session = parse_session(&span.text);
        if session.is_none() {
            out.report(DiagnosticKind::UnparsedSession, text::spaced(&span.text), ctx);
        }
        session
    });
    for (session, segment) in partition(spans, boundaries, Prefix::Drop) {
        let ctx = session.map_or_else(|| ctx.clone(), |n| ctx.with_session(n));
        sections(segment, &ctx, out);
    }
}

fn sections(spans: &[ClassifiedSpan<'_>], ctx: &ScopeContext, out: &mut Extraction) {
    let boundaries = single_span_boundaries(spans, SpanRole::SectionHeader, |span| {
        let section = parse_section(&span.text);
        if section.is_none() {
            out.report(DiagnosticKind::UnrecognizedSection, text::spaced(&span.text), ctx);
        }
        section
    });
    for (section, segment) in partition(spans, boundaries, Prefix::Keep) {
        let section = section.unwrap_or(SectionKind::StandardElections);
        let ctx = ctx.with_section(section);
        match section {
            SectionKind::StandardElections => years(segment, &ctx, out),
            SectionKind::RunoffElections => runoff_states(segment, &ctx, out),
            other => {
                log::debug!("skipping {} span(s) of {other}", segment.len());
            }
        }
    }
}

fn years(spans: &[ClassifiedSpan<'_>], ctx: &ScopeContext, out: &mut Extraction) {
    let boundaries = single_span_boundaries(spans, SpanRole::YearHeader, |span| {
        let (year, numeric) = parse_year(&span.text);
        if !numeric {
            out.report(DiagnosticKind::NonNumericYear, year.clone(), ctx);
        }
        Some(year)
    });
    for (year, segment) in partition(spans, boundaries, Prefix::Drop) {
        let ctx = year.map_or_else(|| ctx.clone(), |year| ctx.with_year(year));
        states(segment, &ctx, out);
    }
}

fn states(spans: &[ClassifiedSpan<'_>], ctx: &ScopeContext, out: &mut Extraction) {
    let boundaries = accumulated_boundaries(
        spans,
        SpanRole::StateHeader,
        text::spaced,
        &STATE_RE,
        parse_state,
        &mut |text| out.report(DiagnosticKind::UnmatchedStateHeader, text, ctx),
    );
    for (state, segment) in partition(spans, boundaries, Prefix::Drop) {
        let ctx = state.map_or_else(
            || ctx.clone(),
            |(state, dates)| ctx.with_state(state, Some(dates)),
        );
        districts(segment, &ctx, out);
    }
}

fn runoff_states(spans: &[ClassifiedSpan<'_>], ctx: &ScopeContext, out: &mut Extraction) {
    let boundaries = single_span_boundaries(spans, SpanRole::StateHeader, |span| {
        Some(runoff_state_name(&span.text))
    });
    for (state, segment) in partition(spans, boundaries, Prefix::Drop) {
        let ctx = state.map_or_else(|| ctx.clone(), |state| ctx.with_state(state, None));
        trials(segment, &ctx, out);
    }
}

fn trials(spans: &[ClassifiedSpan<'_>], ctx: &ScopeContext, out: &mut Extraction) {
    let boundaries = accumulated_boundaries(
        spans,
        SpanRole::TrialHeader,
        text::flat,
        &TRIAL_RE,
        parse_trial,
        &mut |text| out.report(DiagnosticKind::UnmatchedTrialHeader, text, ctx),
    );
    for (trial, segment) in partition(spans, boundaries, Prefix::Drop) {
        let trial = trial.unwrap_or(TrialHeading {
            trial: DEFAULT_RUNOFF_TRIAL,
            election_dates: None,
            year: None,
        });
        districts(segment, &ctx.with_trial(trial), out);
    }
}
