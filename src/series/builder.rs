use std::collections::{HashMap, HashSet};

use crate::model::coords::CoordinatePoint;
use crate::model::sample::{AttrValue, GroupKey, SampleRecord};
use crate::model::series::Series;
use crate::series::index::{CoordinateIndex, Lookup};
use crate::series::{JoinDiagnostics, JoinPolicy, SeriesBuild, SeriesError};

/// Groups samples by one attribute and joins each member to its coordinate.
pub fn build_series(
    samples: &[SampleRecord],
    coordinates: &[CoordinatePoint],
    group_attribute: &str,
    policy: JoinPolicy,
) -> Result<SeriesBuild, SeriesError> {
    SeriesBuilder::new(samples, coordinates, policy).build(group_attribute)
}

/// Holds the coordinate index so the same inputs can be regrouped by
/// different attributes without reindexing.
#[derive(Debug, Clone)]
pub struct SeriesBuilder<'a> {
    samples: &'a [SampleRecord],
    index: CoordinateIndex<'a>,
    policy: JoinPolicy,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(
        samples: &'a [SampleRecord],
        coordinates: &'a [CoordinatePoint],
        policy: JoinPolicy,
    ) -> Self {
        SeriesBuilder {
            samples,
            index: CoordinateIndex::new(coordinates),
            policy,
        }
    }

    pub fn build(&self, group_attribute: &str) -> Result<SeriesBuild, SeriesError> {
        if self.samples.is_empty() {
            return Ok(SeriesBuild {
                attribute: group_attribute.to_string(),
                series: Vec::new(),
                diagnostics: JoinDiagnostics {
                    unused_coordinates: self.index.n_ids(),
                    ..JoinDiagnostics::default()
                },
            });
        }
        if !self
            .samples
            .iter()
            .any(|s| s.attribute(group_attribute).is_some())
        {
            return Err(SeriesError::InvalidGroupAttribute {
                attribute: group_attribute.to_string(),
            });
        }

        let buckets = partition(self.samples, group_attribute);

        let mut diagnostics = JoinDiagnostics::default();
        let mut referenced: HashSet<&str> = HashSet::with_capacity(self.samples.len());
        let mut series = Vec::with_capacity(buckets.len());
        for (key, members) in buckets {
            let mut out = Series::empty(key);
            for sample in members {
                let id = sample.sample_id.as_str();
                referenced.insert(id);
                match self.index.lookup(id) {
                    Lookup::Found(point) => out.push(id, point.x, point.y, &point.label),
                    Lookup::Missing => match self.policy {
                        JoinPolicy::Reject => {
                            return Err(SeriesError::UnresolvedJoin {
                                sample_id: id.to_string(),
                            });
                        }
                        JoinPolicy::Skip => diagnostics.unmatched.push(id.to_string()),
                    },
                    Lookup::Duplicate(matches) => match self.policy {
                        JoinPolicy::Reject => {
                            return Err(SeriesError::DuplicateCoordinate {
                                sample_id: id.to_string(),
                                matches,
                            });
                        }
                        JoinPolicy::Skip => diagnostics.ambiguous.push(id.to_string()),
                    },
                }
            }
            series.push(out);
        }
        diagnostics.unused_coordinates = self.index.n_ids().saturating_sub(
            referenced
                .iter()
                .filter(|id| !matches!(self.index.lookup(id), Lookup::Missing))
                .count(),
        );

        Ok(SeriesBuild {
            attribute: group_attribute.to_string(),
            series,
            diagnostics,
        })
    }
}

/// Stable single-pass bucketing: first-seen key order, insertion order
/// within each bucket. Records without the attribute land in `Missing`.
fn partition<'s>(
    samples: &'s [SampleRecord],
    attribute: &str,
) -> Vec<(GroupKey, Vec<&'s SampleRecord>)> {
    let mut slot_by_key: HashMap<&'s AttrValue, usize> = HashMap::new();
    let mut buckets: Vec<(GroupKey, Vec<&'s SampleRecord>)> = Vec::new();
    static MISSING: AttrValue = AttrValue::Missing;
    for sample in samples {
        let key = sample.attribute(attribute).unwrap_or(&MISSING);
        let slot = *slot_by_key.entry(key).or_insert_with(|| {
            buckets.push((key.clone(), Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(sample);
    }
    buckets
}

#[cfg(test)]
#[path = "../../tests/src_inline/series/builder.rs"]
mod tests;
