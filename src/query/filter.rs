// query/filter.rs
use crate::domain::{MergedRecord, NORMAL_LABEL};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown filter field '{0}'")]
    UnknownField(String),
}

/// Columns a caller can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Branch,
    Series,
    Brand,
    Model,
    Type,
    Plate,
    Situation,
    Group,
    Subgroup,
    Owner,
    MeasurementStatus,
    IgnitionStatus,
    Quality,
}

impl FromStr for FilterField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim().to_ascii_lowercase().as_str() {
            "branch" => FilterField::Branch,
            "series" => FilterField::Series,
            "brand" => FilterField::Brand,
            "model" => FilterField::Model,
            "type" => FilterField::Type,
            "plate" => FilterField::Plate,
            "situation" => FilterField::Situation,
            "group" => FilterField::Group,
            "subgroup" => FilterField::Subgroup,
            "owner" => FilterField::Owner,
            "measurement_status" => FilterField::MeasurementStatus,
            "ignition_status" => FilterField::IgnitionStatus,
            "quality" => FilterField::Quality,
            _ => return Err(FilterError::UnknownField(s.to_string())),
        };
        Ok(field)
    }
}

impl FilterField {
    /// Values a row offers for this field. Status fields answer to both their
    /// code ("HAS_MEASUREMENT") and their display label ("COM MEDIÇÃO").
    fn values<'r>(&self, row: &'r MergedRecord) -> Vec<Cow<'r, str>> {
        let e = &row.equipment;
        let text = |v: &'r Option<String>| -> Vec<Cow<'r, str>> {
            v.as_deref().map(Cow::Borrowed).into_iter().collect()
        };

        match self {
            FilterField::Branch => text(&e.branch),
            FilterField::Series => text(&e.series),
            FilterField::Brand => text(&e.brand),
            FilterField::Model => text(&e.model),
            FilterField::Type => text(&e.equipment_type),
            FilterField::Plate => text(&e.plate),
            FilterField::Situation => text(&e.situation),
            FilterField::Group => text(&e.group),
            FilterField::Subgroup => text(&e.subgroup),
            FilterField::Owner => text(&e.owner),
            FilterField::MeasurementStatus => {
                let s = row.measurement_status;
                vec![Cow::Borrowed(s.code()), Cow::Borrowed(s.label())]
            }
            FilterField::IgnitionStatus => row
                .ignition_status
                .map(|s| vec![Cow::Borrowed(s.code()), Cow::Borrowed(s.label())])
                .unwrap_or_default(),
            FilterField::Quality if row.flags.is_empty() => vec![Cow::Borrowed(NORMAL_LABEL)],
            FilterField::Quality => row
                .flags
                .iter()
                .flat_map(|f| [Cow::Borrowed(f.code()), Cow::Borrowed(f.label())])
                .collect(),
        }
    }
}

/// Field → accepted values. AND across fields, OR within a field.
/// A field with no values places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicates {
    fields: BTreeMap<FilterField, BTreeSet<String>>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: FilterField, value: impl Into<String>) {
        self.fields.entry(field).or_default().insert(value.into());
    }

    /// Builds predicates from `name=value` pairs such as a query string.
    /// Blank values are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut predicates = Self::new();
        for (name, value) in pairs {
            let field: FilterField = name.as_ref().parse()?;
            let value = value.as_ref().trim();
            if !value.is_empty() {
                predicates.insert(field, value);
            }
        }
        Ok(predicates)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(BTreeSet::is_empty)
    }

    pub fn matches(&self, row: &MergedRecord) -> bool {
        self.fields
            .iter()
            .filter(|(_, allowed)| !allowed.is_empty())
            .all(|(field, allowed)| {
                field
                    .values(row)
                    .iter()
                    .any(|v| allowed.contains(&**v))
            })
    }
}

/// Rows passing every predicate, in their original order. `rows` is untouched.
pub fn filter<'a>(rows: &'a [MergedRecord], predicates: &Predicates) -> Vec<&'a MergedRecord> {
    rows.iter().filter(|row| predicates.matches(row)).collect()
}
