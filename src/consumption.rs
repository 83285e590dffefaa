/// Running total of the cuts placed on one bar.
///
/// Both the combination search and the result report go through
/// [`Tally::consumption`], so they agree on how much material a bar uses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    total: f64,
    count: usize,
}

impl Tally {
    pub fn with(self, length: f64) -> Self {
        Self {
            total: self.total + length,
            count: self.count + 1,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Cut lengths plus one kerf between each adjacent pair.
    pub fn consumption(&self, blade_kerf: f64) -> f64 {
        self.total + blade_kerf * self.count.saturating_sub(1) as f64
    }
}

/// Material consumed on one bar by `cuts`, including blade kerf.
pub fn consumption(cuts: &[f64], blade_kerf: f64) -> f64 {
    cuts.iter()
        .fold(Tally::default(), |tally, &cut| tally.with(cut))
        .consumption(blade_kerf)
}
