use std::sync::LazyLock;

use regex::Regex;

use crate::core::model::{ClassifiedSpan, Span, SpanRole, StyleAttrs};
use crate::core::text;

pub const CONGRESS_SIZE: &str = "6";
pub const SECTION_SIZE: &str = "5";
pub const YEAR_SIZES: [&str; 2] = ["3", "4"];
pub const REGION_SIZE: &str = "2";
pub const SMALL_REGION_SIZE: &str = "1";
pub const SMALL_REGION_STYLES: [&str; 2] = ["font-size:8pt", "font-size:9pt"];

pub const STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "WestVirginia",
    "Wisconsin",
    "Wyoming",
];

static PARTY_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\([A-Za-z\-\s,/]+\)").expect("regex is compile-time constant")
});

pub fn classify_all(spans: &[Span]) -> Vec<ClassifiedSpan<'_>> {
    spans
        .iter()
        .map(|span| ClassifiedSpan {
            span,
            role: classify_span(span),
        })
        .collect()
}

pub fn classify_span(span: &Span) -> SpanRole {
    let Some(attrs) = span.resolve_sized() else {
        return fallback_role(span);
    };
    let size = attrs.size.as_deref().unwrap_or_default();

    if size == CONGRESS_SIZE {
        SpanRole::CongressHeader
    } else if size == SECTION_SIZE {
        SpanRole::SectionHeader
    } else if YEAR_SIZES.contains(&size) {
        SpanRole::YearHeader
    } else if is_region_sized(size, attrs) && emphasis_is_party_list(span) {
        let spaced = text::spaced(&span.text);
        if spaced.contains("Trial") {
            SpanRole::TrialHeader
        } else if contains_state_name(&spaced) {
            SpanRole::StateHeader
        } else {
            fallback_role(span)
        }
    } else {
        fallback_role(span)
    }
}

fn fallback_role(span: &Span) -> SpanRole {
    if !span.emphasized.is_empty() {
        SpanRole::DistrictMarker
    } else if span.resolve_sized().is_some() {
        SpanRole::BodyText
    } else {
        SpanRole::Unclassified
    }
}

fn is_region_sized(size: &str, attrs: &StyleAttrs) -> bool {
    if size == REGION_SIZE {
        return true;
    }
    size == SMALL_REGION_SIZE
        && attrs
            .style
            .as_deref()
            .map(normalize_style)
            .is_some_and(|style| SMALL_REGION_STYLES.contains(&style.as_str()))
}

fn normalize_style(style: &str) -> String {
    text::flat(style)
        .trim_end_matches(';')
        .to_ascii_lowercase()
}

/// Headers may italicize a party list such as `(Fed)`; any other italic text
/// means the span is a district or candidate line that merely looks like one.
fn emphasis_is_party_list(span: &Span) -> bool {
    span.emphasized.iter().all(|emphasis| {
        let trimmed = emphasis.trim();
        let ok = PARTY_LIST.is_match(trimmed);
        if !ok {
            log::debug!("header candidate rejected, italic text {trimmed:?} is not a party list");
        }
        ok
    })
}

pub fn contains_state_name(text: &str) -> bool {
    STATES.iter().any(|state| text.contains(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(text: &str, size: &str) -> Span {
        Span::new(text)
            .with_ancestor(StyleAttrs::default())
            .with_ancestor(StyleAttrs::sized(size))
    }

    #[test]
    fn classifies_headers_by_size() {
        assert_eq!(classify_span(&sized("1st Congress", "6")), SpanRole::CongressHeader);
        assert_eq!(classify_span(&sized("Runoff Elections", "5")), SpanRole::SectionHeader);
        assert_eq!(classify_span(&sized("1788", "3")), SpanRole::YearHeader);
        assert_eq!(classify_span(&sized("1790", "4")), SpanRole::YearHeader);
    }

    #[test]
    fn state_header_needs_state_name() {
        assert_eq!(
            classify_span(&sized("Georgia (Jan. 7, 1789)", "2")),
            SpanRole::StateHeader
        );
        assert_eq!(classify_span(&sized("Somewhere (Jan. 7)", "2")), SpanRole::BodyText);
    }

    #[test]
    fn small_font_needs_point_style() {
        let styled = Span::new("Maryland (Jan. 7, 1789)")
            .with_ancestor(StyleAttrs::sized("1").with_style("font-size: 9pt"));
        assert_eq!(classify_span(&styled), SpanRole::StateHeader);

        let unstyled = Span::new("Maryland (Jan. 7, 1789)").with_ancestor(StyleAttrs::sized("1"));
        assert_eq!(classify_span(&unstyled), SpanRole::BodyText);
    }

    #[test]
    fn trial_precedes_state() {
        let span = sized("2nd Trial Georgia (Jan. 5, 1791)", "2");
        assert_eq!(classify_span(&span), SpanRole::TrialHeader);
    }

    #[test]
    fn non_party_italics_reject_header() {
        let span = sized("Virginia District", "2").with_emphasis("Fifth District");
        assert_eq!(classify_span(&span), SpanRole::DistrictMarker);

        let party = sized("Virginia (Fed)", "2").with_emphasis("(Fed)");
        assert_eq!(classify_span(&party), SpanRole::StateHeader);
    }

    #[test]
    fn unsized_spans() {
        assert_eq!(classify_span(&Span::new("John Smith")), SpanRole::Unclassified);
        assert_eq!(
            classify_span(&Span::new("First District").with_emphasis("First District")),
            SpanRole::DistrictMarker
        );
    }
}
