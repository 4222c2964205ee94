//! Parsers for the text of outline boundary spans.
use std::sync::LazyLock;

use regex::Regex;
use strsim::normalized_levenshtein;

use crate::core::model::{SectionKind, TrialHeading};
use crate::core::text;

static SESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)(?:th|st|rd|nd)\s+Congress").expect("regex is compile-time constant")
});

pub static STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'?([A-Za-z\s]+)\((.+)\)").expect("regex is compile-time constant")
});

pub static TRIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)[a-z]+Trial\((.+),(1[7-9][0-9]{2})\)").expect("regex is compile-time constant")
});

static DISTRICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9\s—-]+").expect("regex is compile-time constant")
});

/// Minimum similarity for accepting a misspelled section header.
const SECTION_SIMILARITY: f64 = 0.9;

/// Normalized district labels that annotate a race rather than name a district.
const FILLER_DISTRICTS: [&str; 5] = [
    "Majorityvoterequired",
    "ofanotherparty",
    "Replacedmemberofanotherparty",
    "unop",
    "unopposeddataincomplete",
];

const NUMBER_WORDS: [&str; 20] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

pub fn parse_session(header: &str) -> Option<u32> {
    let spaced = text::spaced(header);
    SESSION_RE
        .captures(&spaced)
        .and_then(|caps| caps[1].parse().ok())
}

pub fn parse_section(header: &str) -> Option<SectionKind> {
    let flat = text::flat(header).to_ascii_lowercase();
    if flat.is_empty() {
        return None;
    }
    if let Some(kind) = SectionKind::ALL
        .iter()
        .find(|kind| kind.label().to_ascii_lowercase() == flat)
    {
        return Some(*kind);
    }

    let mut scored: Vec<(SectionKind, f64)> = SectionKind::ALL
        .iter()
        .map(|kind| (*kind, normalized_levenshtein(&kind.label().to_ascii_lowercase(), &flat)))
        .filter(|(_, score)| *score >= SECTION_SIMILARITY)
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    match scored.as_slice() {
        [(kind, score)] => {
            log::debug!("section header {header:?} read as {kind} (similarity {score:.2})");
            Some(*kind)
        }
        [(kind, best), (_, second), ..] if best > second => {
            log::debug!("section header {header:?} read as {kind} (similarity {best:.2})");
            Some(*kind)
        }
        _ => None,
    }
}

/// Year header text with whitespace removed, and whether it is purely numeric.
pub fn parse_year(header: &str) -> (String, bool) {
    let year = text::flat(header);
    let numeric = !year.is_empty() && year.chars().all(|c| c.is_ascii_digit());
    (year, numeric)
}

/// `Georgia (Jan. 7, 1789)` into state name and election dates.
pub fn parse_state(header: &str) -> Option<(String, String)> {
    let caps = STATE_RE.captures(header)?;
    Some((caps[1].trim().to_string(), caps[2].to_string()))
}

/// Runoff state headers carry no dates; fall back to the whole text.
pub fn runoff_state_name(header: &str) -> String {
    let spaced = text::spaced(header);
    parse_state(&spaced).map_or(spaced, |(state, _)| state)
}

/// `2ndTrial(Jan.5,1791)` into trial number, dates and year.
pub fn parse_trial(flat_header: &str) -> Option<TrialHeading> {
    let caps = TRIAL_RE.captures(flat_header)?;
    Some(TrialHeading {
        trial: caps[1].parse().ok()?,
        election_dates: Some(caps[2].to_string()),
        year: Some(caps[3].to_string()),
    })
}

/// Compact district label: whitespace, ASCII punctuation and dashes removed.
pub fn parse_district_name(label: &str) -> Option<String> {
    let found = DISTRICT_RE.find(label)?;
    let name: String = text::strip_punctuation_and_space(found.as_str())
        .chars()
        .filter(|c| *c != '—')
        .collect();
    (!name.is_empty()).then_some(name)
}

pub fn is_filler_district(name: &str) -> bool {
    FILLER_DISTRICTS.contains(&name)
}

/// Seats named by a trailing `(two elected)` / `(3 members)` note.
///
/// `Err` carries the word that could not be read as a number.
pub fn elected_count(label: &str) -> Result<u32, String> {
    if !label.contains('(') || !(label.contains("elected") || label.contains("members")) {
        return Ok(1);
    }
    let note = label.rsplit('(').next().unwrap_or_default();
    let word = note
        .trim_end_matches(')')
        .split_whitespace()
        .next()
        .unwrap_or_default();
    if let Ok(count) = word.parse::<u32>() {
        return Ok(count.max(1));
    }
    let lower = word.to_ascii_lowercase();
    NUMBER_WORDS
        .iter()
        .position(|w| *w == lower)
        .map(|idx| idx as u32 + 1)
        .ok_or_else(|| word.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn session_numbers() {
        assert_eq!(parse_session("1st Congress"), Some(1));
        assert_eq!(parse_session("23rd\u{a0}Congress"), Some(23));
        assert_eq!(parse_session("Congress of the Confederation"), None);
    }

    #[test]
    fn section_names_ignore_spacing_and_case() {
        assert_eq!(parse_section("Runoff Elections"), Some(SectionKind::RunoffElections));
        assert_eq!(
            parse_section("Elections in Restored Areas"),
            Some(SectionKind::ElectionsinRestoredAreas)
        );
        assert_eq!(parse_section("Runof Elections"), Some(SectionKind::RunoffElections));
        assert_eq!(parse_section("Errata"), None);
    }

    #[test]
    fn year_flags_letters() {
        assert_eq!(parse_year(" 1788 "), ("1788".to_string(), true));
        assert_eq!(parse_year("l788"), ("l788".to_string(), false));
    }

    #[test]
    fn state_and_trial_headers() {
        assert_eq!(
            parse_state("New York (Mar. 3-5, 1789)"),
            Some(("New York".to_string(), "Mar. 3-5, 1789".to_string()))
        );
        assert_eq!(runoff_state_name(" Massachusetts "), "Massachusetts");
        assert_eq!(
            parse_trial("2ndTrial(Jan.5,1791)"),
            Some(TrialHeading {
                trial: 2,
                election_dates: Some("Jan.5".to_string()),
                year: Some("1791".to_string()),
            })
        );
        assert_eq!(parse_trial("2ndTrial(Jan.5"), None);
    }

    #[test]
    fn district_labels() {
        assert_eq!(parse_district_name("First District").as_deref(), Some("FirstDistrict"));
        assert_eq!(parse_district_name("At-Large (two elected)").as_deref(), Some("AtLarge"));
        assert!(is_filler_district(&parse_district_name("Majority vote required").unwrap()));
    }

    #[test]
    fn elected_counts() {
        assert_eq!(elected_count("At-Large (two elected)"), Ok(2));
        assert_eq!(elected_count("At-Large (6 members)"), Ok(6));
        assert_eq!(elected_count("Second District"), Ok(1));
        assert_eq!(elected_count("At-Large (several elected)"), Err("several".to_string()));
    }
}
