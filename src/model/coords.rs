#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatePoint {
    pub sample_id: String,
    pub x: f64,
    pub y: f64,
    pub label: String,
}

impl CoordinatePoint {
    pub fn new(sample_id: impl Into<String>, x: f64, y: f64) -> Self {
        let sample_id = sample_id.into();
        CoordinatePoint {
            label: sample_id.clone(),
            sample_id,
            x,
            y,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Component names projected onto the x and y axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection {
    pub x: String,
    pub y: String,
}

impl AxisSelection {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        AxisSelection {
            x: x.into(),
            y: y.into(),
        }
    }
}
