use std::collections::HashMap;

use crate::model::coords::CoordinatePoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a CoordinatePoint),
    Missing,
    Duplicate(usize),
}

/// Coordinates keyed by sample id. Duplicates are kept as a count so the
/// join can report them instead of picking one arbitrarily.
#[derive(Debug, Clone)]
pub struct CoordinateIndex<'a> {
    by_id: HashMap<&'a str, Slot<'a>>,
}

#[derive(Debug, Clone, Copy)]
enum Slot<'a> {
    One(&'a CoordinatePoint),
    Many(usize),
}

impl<'a> CoordinateIndex<'a> {
    pub fn new(points: &'a [CoordinatePoint]) -> Self {
        let mut by_id: HashMap<&'a str, Slot<'a>> = HashMap::with_capacity(points.len());
        for point in points {
            by_id
                .entry(point.sample_id.as_str())
                .and_modify(|slot| {
                    *slot = match *slot {
                        Slot::One(_) => Slot::Many(2),
                        Slot::Many(n) => Slot::Many(n + 1),
                    }
                })
                .or_insert(Slot::One(point));
        }
        CoordinateIndex { by_id }
    }

    pub fn lookup(&self, sample_id: &str) -> Lookup<'a> {
        match self.by_id.get(sample_id) {
            Some(Slot::One(p)) => Lookup::Found(*p),
            Some(Slot::Many(n)) => Lookup::Duplicate(*n),
            None => Lookup::Missing,
        }
    }

    pub fn n_ids(&self) -> usize {
        self.by_id.len()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/series/index.rs"]
mod tests;
