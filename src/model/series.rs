use crate::model::sample::GroupKey;

/// One renderable group. `sample_ids`, `x`, `y` and `label` are parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: GroupKey,
    pub sample_ids: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub label: Vec<String>,
}

impl Series {
    pub fn empty(name: GroupKey) -> Self {
        Series {
            name,
            sample_ids: Vec::new(),
            x: Vec::new(),
            y: Vec::new(),
            label: Vec::new(),
        }
    }

    pub fn push(&mut self, sample_id: &str, x: f64, y: f64, label: &str) {
        self.sample_ids.push(sample_id.to_string());
        self.x.push(x);
        self.y.push(y);
        self.label.push(label.to_string());
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
