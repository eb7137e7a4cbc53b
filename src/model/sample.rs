use std::collections::BTreeMap;
use std::fmt;

/// Display form of [`AttrValue::Missing`].
pub const MISSING_LABEL: &str = "undefined";

/// One annotation cell. Absent, null and empty values all collapse into
/// `Missing`, which groups as a single bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrValue {
    Value(String),
    Missing,
}

/// Distinct value of the grouping attribute.
pub type GroupKey = AttrValue;

impl AttrValue {
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            AttrValue::Missing
        } else {
            AttrValue::Value(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, AttrValue::Missing)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Value(v) => write!(f, "{v}"),
            AttrValue::Missing => write!(f, "{MISSING_LABEL}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub sample_id: String,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl SampleRecord {
    pub fn new(sample_id: impl Into<String>) -> Self {
        SampleRecord {
            sample_id: sample_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// `None` when the record does not carry the attribute at all.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct AttributeSummary {
    pub name: String,
    pub n_records: usize,
    pub n_distinct: usize,
    pub n_missing: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    pub id_column: String,
    /// Attribute names in first-seen order.
    pub columns: Vec<String>,
    pub records: Vec<SampleRecord>,
}

impl SampleTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn attribute_summaries(&self) -> Vec<AttributeSummary> {
        let mut out = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            let mut distinct = std::collections::BTreeSet::new();
            let mut n_records = 0usize;
            let mut n_missing = 0usize;
            for rec in &self.records {
                let Some(value) = rec.attribute(name) else {
                    continue;
                };
                n_records += 1;
                if value.is_missing() {
                    n_missing += 1;
                }
                distinct.insert(value);
            }
            out.push(AttributeSummary {
                name: name.clone(),
                n_records,
                n_distinct: distinct.len(),
                n_missing,
            });
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/sample.rs"]
mod tests;
