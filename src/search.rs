use crate::consumption::Tally;

/// Fixed inputs of the search for one profile group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchContext {
    pub stock_length: f64,
    pub blade_kerf: f64,
    pub min_acceptable_waste: f64,
    /// A bar whose waste is at or below this is treated as full.
    pub fire_tolerance: f64,
}

impl SearchContext {
    fn waste(&self, tally: Tally) -> f64 {
        self.stock_length - tally.consumption(self.blade_kerf)
    }

    fn fits(&self, tally: Tally) -> bool {
        tally.consumption(self.blade_kerf) <= self.stock_length
    }
}

/// Pieces picked for one bar, as indices into the remaining list in the
/// order they were cut.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub indices: Vec<usize>,
    pub waste: f64,
}

impl Selection {
    fn none() -> Self {
        Self {
            indices: Vec::new(),
            waste: f64::INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn cuts(&self, remaining: &[f64]) -> Vec<f64> {
        self.indices.iter().map(|&i| remaining[i]).collect()
    }
}

/// Chooses the cuts for the next bar from `remaining` (longest first).
///
/// Every piece is tried as an anchor. Starting from the anchor, the other
/// pieces are added in list order whenever they still fit, until the bar is
/// within `fire_tolerance` of full. While filling, the search remembers the
/// fullest state whose waste still respects `min_acceptable_waste`.
///
/// For each anchor, in order:
/// - a bar that ends inside the reserved margin is replaced by that
///   remembered state, if there is one;
/// - otherwise a bar within tolerance is taken at once;
/// - otherwise the least wasteful bar so far is kept as a fallback.
///
/// Returns an empty selection only when no remaining piece fits on a bar.
pub fn select_next_bar(remaining: &[f64], ctx: &SearchContext) -> Selection {
    let mut best = Selection::none();

    for anchor in 0..remaining.len() {
        let seed = Tally::default().with(remaining[anchor]);
        if !ctx.fits(seed) {
            continue;
        }

        let mut combo = vec![anchor];
        let mut tally = seed;

        let seed_waste = ctx.waste(seed);
        let mut last_acceptable = if seed_waste >= ctx.min_acceptable_waste {
            Selection {
                indices: combo.clone(),
                waste: seed_waste,
            }
        } else {
            Selection::none()
        };

        for (j, &piece) in remaining.iter().enumerate() {
            if j == anchor {
                continue;
            }

            let candidate = tally.with(piece);
            if ctx.fits(candidate) {
                tally = candidate;
                combo.push(j);

                let interim = ctx.waste(tally);
                if interim >= ctx.min_acceptable_waste && interim < last_acceptable.waste {
                    last_acceptable = Selection {
                        indices: combo.clone(),
                        waste: interim,
                    };
                }
            }

            if ctx.waste(tally) <= ctx.fire_tolerance {
                break;
            }
        }

        let waste = ctx.waste(tally);
        if waste < ctx.min_acceptable_waste && !last_acceptable.is_empty() {
            return last_acceptable;
        }
        if waste <= ctx.fire_tolerance {
            return Selection {
                indices: combo,
                waste,
            };
        }
        if waste < best.waste {
            best = Selection {
                indices: combo,
                waste,
            };
        }
    }

    best
}
