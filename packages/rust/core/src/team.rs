//! "Team" ordering: same-named sections ride together.
//!
//! Records are grouped by exact course name. Members of a group are ordered
//! by their own code, and groups are ordered by their smallest code, so that
//! a lecture and its lab sections end up adjacent in the output.
//!
//! Codes are compared numerically through [`CodeKey`]. A code that does not
//! parse as an integer sorts before every numeric code; such codes compare
//! lexicographically among themselves.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::warn;

use coursecatalog_shared::CourseRecord;

/// Sort key derived from a course code.
///
/// Variant order matters: `Unparsed` < `Numeric`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CodeKey {
    Unparsed(String),
    Numeric(u64),
}

impl CodeKey {
    pub fn parse(code: &str) -> Self {
        let trimmed = code.trim();
        match trimmed.parse::<u64>() {
            Ok(n) => CodeKey::Numeric(n),
            Err(_) => CodeKey::Unparsed(trimmed.to_string()),
        }
    }
}

/// Sort-stage grouping of records sharing a name.
#[derive(Debug)]
struct CourseGroup {
    name: String,
    min_key: CodeKey,
    members: Vec<(CodeKey, CourseRecord)>,
}

impl CourseGroup {
    fn cmp_order(&self, other: &Self) -> Ordering {
        self.min_key
            .cmp(&other.min_key)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Reorder records into team order. Input order only matters for ties.
pub fn sort_as_team(records: Vec<CourseRecord>) -> Vec<CourseRecord> {
    let total = records.len();
    let mut groups: HashMap<String, CourseGroup> = HashMap::new();

    for record in records {
        let key = CodeKey::parse(&record.code);
        if let CodeKey::Unparsed(code) = &key {
            warn!(code = %code, name = %record.name, "non-numeric course code, sorting it first");
        }

        match groups.get_mut(&record.name) {
            Some(group) => {
                if key < group.min_key {
                    group.min_key = key.clone();
                }
                group.members.push((key, record));
            }
            None => {
                groups.insert(
                    record.name.clone(),
                    CourseGroup {
                        name: record.name.clone(),
                        min_key: key.clone(),
                        members: vec![(key, record)],
                    },
                );
            }
        }
    }

    let mut ordered: Vec<CourseGroup> = groups.into_values().collect();
    for group in &mut ordered {
        // Stable: equal keys keep source order
        group.members.sort_by(|a, b| a.0.cmp(&b.0));
    }
    ordered.sort_by(CourseGroup::cmp_order);

    let mut sorted = Vec::with_capacity(total);
    for group in ordered {
        sorted.extend(group.members.into_iter().map(|(_, record)| record));
    }
    sorted
}
