/// The observed range of a set of keys.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Extent {
    /// Minimum observed key
    pub min: f64,
    /// Maximum observed key
    pub max: f64,
    /// Count of observations
    pub count: usize,
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entry(&"min", &self.min)
            .entry(&"max", &self.max)
            .entry(&"count", &self.count)
            .finish()
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }
}

impl FromIterator<f64> for Extent {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut extent = Self::default();
        for value in iter {
            extent.accumulate(value);
        }
        extent
    }
}

impl Extent {
    /// Fold one key into the range.
    pub fn accumulate(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
    }

    /// Nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Every observed key is the same value.
    pub fn is_degenerate(&self) -> bool {
        !self.is_empty() && self.min == self.max
    }

    /// `max - min`, or 0 when empty.
    pub fn span(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }
}
