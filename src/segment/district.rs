use crate::candidates::emit_district;
use crate::core::cursor::Cursor;
use crate::core::diagnostics::{DiagnosticKind, Extraction};
use crate::core::model::{ClassifiedSpan, DistrictHeading, ScopeContext, SpanRole};
use crate::core::text;
use crate::segment::headings::{elected_count, is_filler_district, parse_district_name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerResolution {
    Seat(DistrictHeading),
    /// An annotation such as "majority vote required"; its spans carry no data.
    Filler,
    /// The marker could not be completed; scanning resumes after it.
    Abandoned,
}

/// Innermost level: splits a state (or trial) segment at district markers and
/// hands each district's remaining text to the candidate grammar.
pub fn districts(spans: &[ClassifiedSpan<'_>], ctx: &ScopeContext, out: &mut Extraction) {
    let mut cursor = Cursor::new(spans);
    let mut current: Option<DistrictHeading> = None;
    let mut body: Vec<&str> = Vec::new();

    while let Some(item) = cursor.next() {
        if item.role != SpanRole::DistrictMarker {
            body.push(&item.span.text);
            continue;
        }
        let marker_at = cursor.position() - 1;
        match resolve_marker(item, &mut cursor, ctx, out) {
            MarkerResolution::Seat(heading) => {
                match current.take() {
                    Some(previous) => emit_district(&body, &ctx.with_district(&previous), out),
                    None if !body.is_empty() => {
                        log::debug!("dropping {} span(s) before the first district", body.len());
                    }
                    None => {}
                }
                body.clear();
                current = Some(heading);
            }
            MarkerResolution::Filler => {}
            MarkerResolution::Abandoned => {
                cursor.seek(marker_at + 1);
                body.push(&item.span.text);
            }
        }
    }

    let heading = current.unwrap_or_else(DistrictHeading::single);
    emit_district(&body, &ctx.with_district(&heading), out);
}

/// Completes a marker's district label, borrowing italic text from following
/// spans when the label is obviously cut short.
pub fn resolve_marker<'a>(
    item: &ClassifiedSpan<'a>,
    cursor: &mut Cursor<'_, ClassifiedSpan<'a>>,
    ctx: &ScopeContext,
    out: &mut Extraction,
) -> MarkerResolution {
    let Some(first) = item.span.first_emphasis() else {
        return MarkerResolution::Abandoned;
    };
    let mut label = first.to_string();

    if is_terse(&label) {
        merge_next(&mut label, cursor);
    }
    if !text::has_ascii_letter(&label) {
        out.report(DiagnosticKind::IncompleteDistrict, label, ctx);
        return MarkerResolution::Abandoned;
    }

    let hyphenated = text::collapse_whitespace(&label).ends_with('-');
    if hyphenated && !merge_next(&mut label, cursor) {
        out.report(DiagnosticKind::IncompleteDistrict, label, ctx);
        return MarkerResolution::Abandoned;
    }
    let open_paren = label.contains('(') && !label.contains(')');
    if open_paren && !merge_next(&mut label, cursor) {
        out.report(DiagnosticKind::IncompleteDistrict, label, ctx);
        return MarkerResolution::Abandoned;
    }

    let Some(district) = parse_district_name(&label) else {
        out.report(DiagnosticKind::IncompleteDistrict, label, ctx);
        return MarkerResolution::Abandoned;
    };
    if is_filler_district(&district) {
        log::debug!("skipping district annotation {label:?}");
        return MarkerResolution::Filler;
    }
    let num_elected = elected_count(&label).unwrap_or_else(|word| {
        out.report(DiagnosticKind::UnknownElectedCount, word, ctx);
        1
    });
    MarkerResolution::Seat(DistrictHeading {
        district,
        num_elected,
    })
}

fn merge_next(label: &mut String, cursor: &mut Cursor<'_, ClassifiedSpan<'_>>) -> bool {
    match cursor.peek().and_then(|n| n.span.first_emphasis()) {
        Some(next) => {
            label.push(' ');
            label.push_str(next);
            cursor.next();
            true
        }
        None => false,
    }
}

/// A label that neither names a district outright nor is a bare number.
fn is_terse(label: &str) -> bool {
    !label.contains("District")
        && !label.contains("At-Large")
        && label.chars().count() > 1
        && !label.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Outcome, Span};
    use crate::core::span_classifier::classify_all;
    use pretty_assertions::assert_eq;

    fn marker(label: &str) -> Span {
        Span::new(label).with_emphasis(label)
    }

    fn run(spans: &[Span]) -> Extraction {
        let classified = classify_all(spans);
        let mut out = Extraction::new();
        districts(&classified, &ScopeContext::default(), &mut out);
        out
    }

    #[test]
    fn splits_candidates_by_district() {
        let out = run(&[
            marker("First District"),
            Span::new("Fisher Ames (Fed) 818 (60.1)"),
            Span::new("Benjamin Austin (Anti) 543 (39.9)"),
            marker("Second District"),
            Span::new("Elbridge Gerry (Anti) 1,200 (100.0)"),
        ]);
        let summary: Vec<_> = out
            .rows
            .iter()
            .map(|r| (r.district.as_deref().unwrap(), r.name.as_str(), r.result))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("FirstDistrict", "Fisher Ames", Outcome::Won),
                ("FirstDistrict", "Benjamin Austin", Outcome::Lost),
                ("SecondDistrict", "Elbridge Gerry", Outcome::Won),
            ]
        );
    }

    #[test]
    fn no_marker_means_single_district() {
        let out = run(&[Span::new("Fisher Ames (Fed) 818 (60.1)")]);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].district.as_deref(), Some("Single"));
        assert_eq!(out.rows[0].num_elected, 1);
    }

    #[test]
    fn terse_label_borrows_next_italic() {
        let out = run(&[
            marker("Fifth"),
            marker("District"),
            Span::new("Fisher Ames (Fed) 818 (60.1)"),
        ]);
        assert_eq!(out.rows[0].district.as_deref(), Some("FifthDistrict"));
    }

    #[test]
    fn hyphen_and_parenthesis_merge() {
        let out = run(&[
            marker("At-Large (two"),
            marker("elected)"),
            Span::new("Fisher Ames (Fed) 818 (40.1)"),
            Span::new("Theodore Sedgwick (Fed) 700 (35.0)"),
            Span::new("Benjamin Austin (Anti) 543 (24.9)"),
        ]);
        assert_eq!(out.rows[0].district.as_deref(), Some("AtLarge"));
        assert_eq!(out.rows[0].num_elected, 2);
        let won = out.rows.iter().filter(|r| r.result == Outcome::Won).count();
        assert_eq!(won, 2);
    }

    #[test]
    fn incomplete_marker_is_abandoned_without_losing_data() {
        let out = run(&[
            marker("First District"),
            Span::new("Fisher Ames (Fed) 818 (60.1)"),
            marker("North-"),
        ]);
        assert_eq!(out.count(DiagnosticKind::IncompleteDistrict), 1);
        assert!(out.rows.iter().any(|r| r.name == "Fisher Ames"));
        assert!(out
            .rows
            .iter()
            .all(|r| r.district.as_deref() == Some("FirstDistrict")));
    }

    #[test]
    fn indented_runoff_marker_sends_district_to_runoff() {
        let out = run(&[
            marker("Second District"),
            Span::new("\n*Elbridge Gerry (Anti) 1,200 (55.0)"),
            Span::new("Jonathan Grout (Anti) 980 (45.0)"),
        ]);
        let summary: Vec<_> = out
            .rows
            .iter()
            .map(|r| (r.name.as_str(), r.runoff, r.result))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Elbridge Gerry", true, Outcome::Runoff),
                ("Jonathan Grout", true, Outcome::Runoff),
            ]
        );
    }

    #[test]
    fn filler_annotation_is_not_a_district() {
        let out = run(&[
            marker("Third District"),
            Span::new("Fisher Ames (Fed) 818 (60.1)"),
            marker("Majority vote required"),
            Span::new("Benjamin Austin (Anti) 543 (39.9)"),
        ]);
        assert_eq!(out.rows.len(), 2);
        assert!(out
            .rows
            .iter()
            .all(|r| r.district.as_deref() == Some("ThirdDistrict")));
    }
}
