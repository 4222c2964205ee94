//! Second pass: links each candidate to the previous session's winners.
use std::collections::{BTreeMap, HashMap};

use crate::core::model::{ElectionRow, LinkedRow, Outcome};
use crate::core::text;

/// Identity of a candidate across sessions. Used for lookups only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncumbencyKey {
    pub state: String,
    pub district: String,
    pub clean_name: String,
}

impl IncumbencyKey {
    pub fn of(row: &ElectionRow) -> Self {
        Self {
            state: row.state.clone().unwrap_or_default(),
            district: row.district.clone().unwrap_or_default(),
            clean_name: clean_name(&row.name),
        }
    }
}

/// Name with punctuation and whitespace removed, case preserved.
pub fn clean_name(name: &str) -> String {
    text::strip_punctuation_and_space(name)
}

/// Winners of exactly one session, keyed to their vote share.
#[derive(Debug, Clone, Default)]
pub struct IncumbencyMap {
    session: Option<u32>,
    winners: HashMap<IncumbencyKey, Option<f64>>,
}

impl IncumbencyMap {
    pub fn from_session(session: u32, rows: &[ElectionRow]) -> Self {
        let winners = rows
            .iter()
            .filter(|row| row.result == Outcome::Won)
            .map(|row| (IncumbencyKey::of(row), row.percentage))
            .collect();
        Self {
            session: Some(session),
            winners,
        }
    }

    /// Winners to consult for `session`; empty unless built from the session
    /// immediately before it.
    pub fn for_session(&self, session: u32) -> Option<&HashMap<IncumbencyKey, Option<f64>>> {
        match self.session {
            Some(prior) if prior.checked_add(1) == Some(session) => Some(&self.winners),
            _ => None,
        }
    }
}

/// Annotates every row with incumbency against the prior session.
///
/// Rows are grouped by session in ascending order; rows without a session
/// come first and are never incumbents.
pub fn link_incumbency(rows: Vec<ElectionRow>) -> Vec<LinkedRow> {
    let mut unsessioned = Vec::new();
    let mut by_session: BTreeMap<u32, Vec<ElectionRow>> = BTreeMap::new();
    for row in rows {
        match row.session {
            Some(session) => by_session.entry(session).or_default().push(row),
            None => unsessioned.push(row),
        }
    }

    let mut linked: Vec<LinkedRow> = unsessioned
        .into_iter()
        .map(|row| {
            let name = clean_name(&row.name);
            LinkedRow::from_row(row, false, None, name)
        })
        .collect();

    let mut previous = IncumbencyMap::default();
    for (session, rows) in by_session {
        let current = IncumbencyMap::from_session(session, &rows);
        let winners = previous.for_session(session);
        let mut incumbents = 0;
        for row in rows {
            let key = IncumbencyKey::of(&row);
            let prior = winners.and_then(|w| w.get(&key));
            if prior.is_some() {
                incumbents += 1;
            }
            linked.push(LinkedRow::from_row(
                row,
                prior.is_some(),
                prior.copied().flatten(),
                key.clean_name,
            ));
        }
        log::debug!("session {session}: {incumbents} incumbent row(s), {} winner(s)", current.winners.len());
        previous = current;
    }
    linked
}
