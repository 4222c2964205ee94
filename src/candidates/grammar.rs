//! Candidate completeness grammars.
//!
//! Each grammar is tagged with the completeness level it proves. Scoring and
//! splitting search anywhere in the text; parsing anchors at the start of an
//! already split substring.
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::model::CandidateRecord;
use crate::core::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Completeness {
    Empty = 0,
    Marker = 1,
    Name = 2,
    NameParty = 3,
    NameVotes = 4,
    Full = 5,
}

impl Completeness {
    pub fn score(self) -> u8 {
        self as u8
    }
}

pub struct GrammarDef {
    pub level: Completeness,
    pub pattern: &'static str,
}

/// Richest first.
pub const GRAMMAR_DEFS: [GrammarDef; 5] = [
    GrammarDef {
        level: Completeness::Full,
        pattern: r#"[0-9"']?(?P<runoff>\*)?(?P<name>[A-Za-z\s.]+)(?:\s+\((?P<party>[A-Za-z\-\s,/]+)\))?\s+\(?(?P<votes>[0-9,]+)\)?\s+[(\[](?P<pct>[0-9.]+)[)\]]"#,
    },
    GrammarDef {
        level: Completeness::NameVotes,
        pattern: r#"[0-9"']?(?P<runoff>\*)?(?P<name>[A-Za-z\s.]+)(?:\s*\((?P<party>[A-Za-z\-\s,/]+)\))?\s+[(\[]?(?P<votes>[0-9,]+)[)\]]?"#,
    },
    GrammarDef {
        level: Completeness::NameParty,
        pattern: r#"[0-9"']?(?P<runoff>\*)?(?P<name>[A-Za-z\s.]+)\s*\((?P<party>[A-Za-z\-\s,/]+)\)"#,
    },
    GrammarDef {
        level: Completeness::Name,
        pattern: r#"[0-9"']?(?P<runoff>\*)?[A-Za-z]+"#,
    },
    GrammarDef {
        level: Completeness::Marker,
        pattern: r#"[0-9"']?"?\*"#,
    },
];

/// Name-only parse used when nothing richer applies.
const NAME_ONLY: &str = r"(?P<runoff>\*)?(?P<name>[A-Za-z\s.]+)";

pub struct Grammar {
    pub level: Completeness,
    search: Regex,
    anchored: Regex,
}

impl Grammar {
    fn compile(level: Completeness, pattern: &str) -> Self {
        Self {
            level,
            search: Regex::new(pattern).expect("regex is compile-time constant"),
            anchored: Regex::new(&format!("^(?:{pattern})")).expect("regex is compile-time constant"),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.search.is_match(text)
    }
}

static GRAMMARS: LazyLock<Vec<Grammar>> = LazyLock::new(|| {
    GRAMMAR_DEFS
        .iter()
        .map(|def| Grammar::compile(def.level, def.pattern))
        .collect()
});

static NAME_ONLY_GRAMMAR: LazyLock<Grammar> =
    LazyLock::new(|| Grammar::compile(Completeness::Name, NAME_ONLY));

pub fn grammar(level: Completeness) -> Option<&'static Grammar> {
    GRAMMARS.iter().find(|g| g.level == level)
}

pub fn completeness(text: &str) -> Completeness {
    GRAMMARS
        .iter()
        .find(|g| g.is_match(text))
        .map_or(Completeness::Empty, |g| g.level)
}

/// Splits text holding several candidates into one substring per grammar match.
///
/// Each match is searched from the end of the previous one and the emitted
/// substring runs from there to the match end, so leading separators stay
/// attached to the following candidate.
pub fn split_candidates(text: &str, level: Completeness) -> Vec<&str> {
    let Some(grammar) = grammar(level) else {
        return Vec::new();
    };
    let mut pieces = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(found) = grammar.search.find_at(text, pos) else {
            break;
        };
        if found.end() == pos {
            break;
        }
        pieces.push(&text[pos..found.end()]);
        pos = found.end();
    }
    pieces
}

/// Parses one candidate substring, richest grammar first.
///
/// Leading whitespace is ignored so that split pieces and indented spans keep
/// their runoff marker.
pub fn parse_candidate(fragment: &str) -> Option<CandidateRecord> {
    let fragment = fragment.trim_start();
    for level in [Completeness::Full, Completeness::NameVotes, Completeness::NameParty] {
        let Some(grammar) = grammar(level) else {
            continue;
        };
        if let Some(caps) = grammar.anchored.captures(fragment) {
            if let Some(record) = record_from(&caps, level) {
                return Some(record);
            }
        }
    }
    NAME_ONLY_GRAMMAR
        .anchored
        .captures(fragment)
        .and_then(|caps| record_from(&caps, Completeness::Name))
}

fn record_from(caps: &Captures<'_>, level: Completeness) -> Option<CandidateRecord> {
    let name = text::collapse_whitespace(caps.name("name")?.as_str());
    if name.is_empty() {
        return None;
    }
    let party = caps.name("party").and_then(|m| first_party(m.as_str()));
    let votes = if level >= Completeness::NameVotes {
        Some(parse_votes(caps.name("votes")?.as_str())?)
    } else {
        None
    };
    let percentage = if level == Completeness::Full {
        Some(caps.name("pct")?.as_str().parse::<f64>().ok()?)
    } else {
        None
    };
    Some(CandidateRecord {
        name,
        party,
        votes,
        percentage,
        runoff: caps.name("runoff").is_some(),
    })
}

/// `Dem, Lib` and `Dem/Lib` both yield `Dem`.
fn first_party(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split([',', '/'])
        .next()
        .filter(|party| !party.is_empty())
        .map(str::to_string)
}

fn parse_votes(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scores_each_level() {
        assert_eq!(completeness("12,401"), Completeness::Empty);
        assert_eq!(completeness("*"), Completeness::Marker);
        assert_eq!(completeness("Smith"), Completeness::Name);
        assert_eq!(completeness("John Smith (Fed)"), Completeness::NameParty);
        assert_eq!(completeness("John Smith (Fed) 1,204"), Completeness::NameVotes);
        assert_eq!(completeness("John Smith (Fed) 1,204 (55.3)"), Completeness::Full);
    }

    #[test]
    fn parses_full_record_with_marker() {
        let record = parse_candidate("*John Smith (Dem) 10,532 (55.3)").unwrap();
        assert_eq!(
            record,
            CandidateRecord {
                name: "John Smith".to_string(),
                party: Some("Dem".to_string()),
                votes: Some(10532),
                percentage: Some(55.3),
                runoff: true,
            }
        );
    }

    #[test]
    fn party_takes_first_token() {
        let comma = parse_candidate("John Smith (Dem, Lib) 100 (50.0)").unwrap();
        assert_eq!(comma.party.as_deref(), Some("Dem"));
        let slash = parse_candidate("John Smith (Dem/Lib) 100 (50.0)").unwrap();
        assert_eq!(slash.party.as_deref(), Some("Dem"));
    }

    #[test]
    fn name_and_party_without_numbers() {
        let record = parse_candidate("John Smith (Fed)").unwrap();
        assert_eq!(record.name, "John Smith");
        assert_eq!(record.party.as_deref(), Some("Fed"));
        assert_eq!(record.votes, None);
        assert_eq!(record.percentage, None);
    }

    #[test]
    fn votes_without_percentage() {
        let record = parse_candidate("Elias Boudinot 1,204").unwrap();
        assert_eq!(record.name, "Elias Boudinot");
        assert_eq!(record.party, None);
        assert_eq!(record.votes, Some(1204));
        assert_eq!(record.percentage, None);
    }

    #[test]
    fn malformed_votes_fall_back_to_poorer_grammar() {
        let record = parse_candidate("James Madison (Rep) , (12.5)").unwrap();
        assert_eq!(record.name, "James Madison");
        assert_eq!(record.party.as_deref(), Some("Rep"));
        assert_eq!(record.votes, None);
    }

    #[test]
    fn splits_concatenated_candidates() {
        let text = "John Smith (Dem) 10,532 (55.3)Jane Doe (Rep) 8,500 (44.7)";
        let pieces = split_candidates(text, Completeness::Full);
        assert_eq!(pieces, vec!["John Smith (Dem) 10,532 (55.3)", "Jane Doe (Rep) 8,500 (44.7)"]);
        let names: Vec<_> = pieces
            .iter()
            .filter_map(|p| parse_candidate(p))
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["John Smith", "Jane Doe"]);
    }

    #[test]
    fn leading_whitespace_keeps_marker() {
        let record = parse_candidate(" *John Smith (Dem) 10,532 (55.3)").unwrap();
        assert_eq!(record.name, "John Smith");
        assert!(record.runoff);
        assert_eq!(record.votes, Some(10532));
        let indented = parse_candidate("\n 2*Jane Doe (Rep) 8,500 (44.7)").unwrap();
        assert_eq!(indented.name, "Jane Doe");
        assert!(indented.runoff);
    }

    #[test]
    fn marked_candidate_after_space_separated_split() {
        let text = "John Smith (Dem) 10,532 (55.3) *Jane Doe (Rep) 8,500 (44.7)";
        let parsed: Vec<_> = split_candidates(text, Completeness::Full)
            .iter()
            .map(|p| parse_candidate(p).map(|c| (c.name, c.runoff)))
            .collect();
        assert_eq!(
            parsed,
            vec![
                Some(("John Smith".to_string(), false)),
                Some(("Jane Doe".to_string(), true)),
            ]
        );
    }

    #[test]
    fn name_only_fallback() {
        let record = parse_candidate("Scattering").unwrap();
        assert_eq!(record.name, "Scattering");
        assert_eq!(record.votes, None);
        assert!(parse_candidate("12 ").is_none());
    }

    #[test]
    fn each_grammar_is_tagged_once() {
        for def in GRAMMAR_DEFS.iter() {
            assert!(grammar(def.level).is_some());
        }
        assert_eq!(Completeness::Full.score(), 5);
    }
}
