use crate::flow::Primitive;

/// Running inverse-square-distance weighted sum of primitive states.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedSum {
    /// Unnormalized sum of `weight * value`.
    pub sum: Primitive,
    /// Sum of weights.
    pub weight: f64,
    /// Number of contributions.
    pub tally: usize,
}

impl WeightedSum {
    /// Adds `value` sampled at squared distance `dist2` from the target.
    ///
    /// Distances below `tiny` are clamped so coincident samples get a large
    /// but finite weight.
    pub fn add(&mut self, value: &Primitive, dist2: f64, tiny: f64) {
        let weight = dist2.max(tiny).recip();
        self.sum += *value * weight;
        self.weight += weight;
        self.tally += 1;
    }

    /// Weighted average of the contributions.
    #[must_use]
    pub fn normalized(&self) -> Primitive {
        self.sum.normalized(self.weight)
    }

    /// Whether nothing has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tally == 0
    }
}
