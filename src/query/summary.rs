// query/summary.rs
use crate::domain::MergedRecord;
use serde::Serialize;
use std::collections::HashSet;

/// The three counts shown above the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub owners: usize,
    pub with_measurement: usize,
}

pub fn summarize<'a, I>(rows: I) -> Summary
where
    I: IntoIterator<Item = &'a MergedRecord>,
{
    let mut owners = HashSet::new();
    let mut summary = Summary::default();

    for row in rows {
        summary.total += 1;
        if row.has_measurement() {
            summary.with_measurement += 1;
        }
        if let Some(owner) = row.equipment.owner.as_deref() {
            owners.insert(owner);
        }
    }

    summary.owners = owners.len();
    summary
}
