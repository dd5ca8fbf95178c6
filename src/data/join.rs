use crate::data::store::Store;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// How [`join`] pairs left records with right records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Every matching pair, left records without a match are dropped
    Inner,
    /// One output per left record, merged with the first match only
    Left,
}

impl FromStr for JoinMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inner" => Ok(JoinMode::Inner),
            "left" => Ok(JoinMode::Left),
            other => Err(format!("unsupported join mode '{}'", other)),
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinMode::Inner => write!(f, "inner"),
            JoinMode::Left => write!(f, "left"),
        }
    }
}

/// Merge two stores on textual equality of `on`.
///
/// Merged records are the left record's fields followed by the right
/// record's new fields; on a collision the right value wins.
///
/// NOTE: the two modes are deliberately asymmetric. `Inner` emits one record
/// per matching right record (a full cross product on the key) while `Left`
/// only ever takes the first match, so a left record with three matches
/// produces three rows under `Inner` and one under `Left`.
pub fn join(left: &Store, right: &Store, on: &str, mode: JoinMode) -> Store {
    let mut records = Vec::with_capacity(left.len());

    for row in &left.records {
        let key = row.get(on);
        let mut matches = right.records.iter().filter(|r| r.get(on) == key);

        match mode {
            JoinMode::Inner => records.extend(matches.map(|m| row.merged_with(m))),
            JoinMode::Left => records.push(match matches.next() {
                Some(m) => row.merged_with(m),
                None => row.clone(),
            }),
        }
    }

    debug!(
        "{} join of '{}' ({} rows) with '{}' ({} rows) on '{}': {} rows",
        mode,
        left.name,
        left.len(),
        right.name,
        right.len(),
        on,
        records.len()
    );

    let mut merged = left.derive(records);
    merged.header = left.header.union(&right.header);
    merged
}

/// Textual-mode entry point.
///
/// An unrecognised `how` returns the left store unchanged instead of failing;
/// callers relying on an error for bad modes should parse [`JoinMode`] first.
pub fn merge(left: &Store, right: &Store, on: &str, how: &str) -> Store {
    match how.parse::<JoinMode>() {
        Ok(mode) => join(left, right, on, mode),
        Err(e) => {
            warn!("{}; returning '{}' unchanged", e, left.name);
            left.clone()
        }
    }
}
