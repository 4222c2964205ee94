use crate::candidates::grammar::{completeness, parse_candidate, split_candidates, Completeness};
use crate::core::cursor::Cursor;
use crate::core::diagnostics::{DiagnosticKind, Extraction};
use crate::core::model::{CandidateRecord, ScopeContext};

/// Page footers ("... 1st Congress ...") score as bare names.
const FOOTER_WORD: &str = "Congress";

/// Merges body fragments until a grammar is satisfied and returns the
/// candidate substrings found, in extraction order.
pub fn accumulate_fragments<S: AsRef<str>>(
    texts: &[S],
    ctx: &ScopeContext,
    out: &mut Extraction,
) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut cursor = Cursor::new(texts);

    while let Some(first) = cursor.next() {
        let first = first.as_ref();
        let level = completeness(first);
        let seed = (first.to_string(), level);

        let (text, level) = match level {
            Completeness::Empty | Completeness::Full => seed,
            _ => cursor.extend_while(seed, |(text, level), next| {
                if *level == Completeness::Full {
                    return None;
                }
                let extended = format!("{text} {}", next.as_ref());
                let extended_level = completeness(&extended);
                (extended_level > *level).then_some((extended, extended_level))
            }),
        };

        match level {
            Completeness::Empty => {}
            Completeness::Marker => {
                out.report(DiagnosticKind::BareRunoffMarker, text, ctx);
            }
            Completeness::Name => {
                if !text.contains(FOOTER_WORD) {
                    out.report(DiagnosticKind::AmbiguousFragment, text.clone(), ctx);
                    fragments.push(text);
                }
            }
            _ => fragments.extend(
                split_candidates(&text, level)
                    .into_iter()
                    .map(str::to_string),
            ),
        }
    }

    fragments
}

/// Accumulates, splits and parses a district's body text.
pub fn collect_candidates<S: AsRef<str>>(
    texts: &[S],
    ctx: &ScopeContext,
    out: &mut Extraction,
) -> Vec<CandidateRecord> {
    accumulate_fragments(texts, ctx, out)
        .iter()
        .filter_map(|fragment| parse_candidate(fragment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(texts: &[&str]) -> (Vec<String>, Extraction) {
        let mut out = Extraction::new();
        let fragments = accumulate_fragments(texts, &ScopeContext::default(), &mut out);
        (fragments, out)
    }

    #[test]
    fn complete_fragment_is_emitted_alone() {
        let (fragments, out) = run(&["John Smith (Fed) 1,204 (55.3)", "Jane Doe (Anti) 986 (44.7)"]);
        assert_eq!(
            fragments,
            vec!["John Smith (Fed) 1,204 (55.3)", "Jane Doe (Anti) 986 (44.7)"]
        );
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn merges_split_record_until_complete() {
        let (fragments, _) = run(&["John Smith", "(Fed)", "1,204", "(55.3)"]);
        assert_eq!(fragments, vec!["John Smith (Fed) 1,204 (55.3)"]);
    }

    #[test]
    fn stops_when_extension_does_not_help() {
        let (fragments, _) = run(&["John Smith (Fed)", "Jane Doe (Anti)"]);
        assert_eq!(fragments, vec!["John Smith (Fed)", "Jane Doe (Anti)"]);
    }

    #[test]
    fn skips_numeric_noise() {
        let (fragments, out) = run(&["1,204", "John Smith (Fed) 1,204 (55.3)"]);
        assert_eq!(fragments, vec!["John Smith (Fed) 1,204 (55.3)"]);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn bare_marker_is_reported() {
        let (fragments, out) = run(&["*"]);
        assert!(fragments.is_empty());
        assert_eq!(out.count(DiagnosticKind::BareRunoffMarker), 1);
    }

    #[test]
    fn footer_noise_is_dropped_silently() {
        let (fragments, out) = run(&["1st Congress"]);
        assert!(fragments.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn plain_name_is_kept_and_reported() {
        let (fragments, out) = run(&["Scattering"]);
        assert_eq!(fragments, vec!["Scattering"]);
        assert_eq!(out.count(DiagnosticKind::AmbiguousFragment), 1);
    }

    #[test]
    fn party_without_numbers_still_parses() {
        let mut out = Extraction::new();
        let candidates =
            collect_candidates(&["Fisher Ames (Fed)"], &ScopeContext::default(), &mut out);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].votes, None);
        assert_eq!(candidates[0].percentage, None);
    }
}
