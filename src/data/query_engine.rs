use crate::data::column_stats::try_parse_number;
use crate::data::record::Record;
use crate::data::store::Store;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Records for which `predicate` holds, in their original order
pub fn filter<F>(store: &Store, predicate: F) -> Store
where
    F: Fn(&Record) -> bool,
{
    let records: Vec<Record> = store
        .records
        .iter()
        .filter(|record| predicate(*record))
        .cloned()
        .collect();
    debug!(
        "filter: {} of {} rows of '{}' kept",
        records.len(),
        store.len(),
        store.name
    );
    store.derive(records)
}

/// Stable sort on the raw text of `column`; missing values sort as "".
///
/// Equal keys keep their original relative order in both directions.
pub fn sort(store: &Store, column: &str, descending: bool) -> Store {
    sort_with(store, descending, |a, b| {
        a.get(column).unwrap_or("").cmp(b.get(column).unwrap_or(""))
    })
}

/// Stable sort comparing `column` as numbers.
///
/// Values that parse as numbers come first (in numeric order); values that do
/// not, including missing ones, follow in their original order. `descending`
/// reverses the numeric part only.
pub fn sort_numeric(store: &Store, column: &str, descending: bool) -> Store {
    let key = |record: &Record| record.get(column).and_then(try_parse_number);
    let mut records = store.records.clone();
    records.sort_by(|a, b| match (key(a), key(b)) {
        (Some(x), Some(y)) => {
            let ord = x.total_cmp(&y);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    store.derive(records)
}

fn sort_with<F>(store: &Store, descending: bool, compare: F) -> Store
where
    F: Fn(&Record, &Record) -> Ordering,
{
    let mut records = store.records.clone();
    // Reverse the comparator rather than the output so ties stay in input order
    if descending {
        records.sort_by(|a, b| compare(b, a));
    } else {
        records.sort_by(|a, b| compare(a, b));
    }
    store.derive(records)
}

/// One group produced by [`group`]
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// `None` collects the records that lack the grouping column
    pub key: Option<String>,
    pub records: Vec<Record>,
}

/// Groups in order of first key occurrence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Groups {
    groups: Vec<Group>,
}

impl Groups {
    pub fn get(&self, key: &str) -> Option<&[Record]> {
        self.groups
            .iter()
            .find(|g| g.key.as_deref() == Some(key))
            .map(|g| g.records.as_slice())
    }

    /// Records that did not have the grouping column
    pub fn missing(&self) -> Option<&[Record]> {
        self.groups
            .iter()
            .find(|g| g.key.is_none())
            .map(|g| g.records.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = Option<&str>> {
        self.groups.iter().map(|g| g.key.as_deref())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn into_vec(self) -> Vec<Group> {
        self.groups
    }
}

impl IntoIterator for Groups {
    type Item = Group;
    type IntoIter = std::vec::IntoIter<Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition records by the text of `column`
pub fn group(store: &Store, column: &str) -> Groups {
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for record in &store.records {
        let key = record.get(column);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Group {
                key: key.map(str::to_string),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record.clone());
    }

    debug!(
        "group: '{}' by '{}' produced {} groups",
        store.name,
        column,
        groups.len()
    );
    Groups { groups }
}
