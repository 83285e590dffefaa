use serde::{Deserialize, Deserializer, Serialize};

/// Largest quantity accepted on a single requirement line. Lines above it are
/// treated as bad upstream data and skipped.
pub const MAX_QUANTITY_PER_LINE: f64 = 100_000.0;

/// One line of an order's cut list: `quantity` pieces of `cut_length` to be cut
/// from bars of `stock_length` of the given profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRequirement {
    #[serde(deserialize_with = "deserialize_profile_id")]
    pub profile_id: String,
    #[serde(default)]
    pub profile_name: String,
    #[serde(default = "missing_number", deserialize_with = "deserialize_lenient_f64")]
    pub stock_length: f64,
    #[serde(default = "missing_number", deserialize_with = "deserialize_lenient_f64")]
    pub cut_length: f64,
    #[serde(default = "missing_number", deserialize_with = "deserialize_lenient_f64")]
    pub quantity: f64,
}

impl CutRequirement {
    pub fn new(
        profile_id: impl Into<String>,
        profile_name: impl Into<String>,
        stock_length: f64,
        cut_length: f64,
        quantity: f64,
    ) -> Self {
        Self {
            profile_id: profile_id.into(),
            profile_name: profile_name.into(),
            stock_length,
            cut_length,
            quantity,
        }
    }

    /// Whether the line carries enough numeric data to be packed.
    pub fn is_usable(&self) -> bool {
        self.stock_length.is_finite()
            && self.stock_length > 0.0
            && self.cut_length.is_finite()
            && self.cut_length > 0.0
            && self.quantity.is_finite()
            && self.quantity <= MAX_QUANTITY_PER_LINE
    }

    /// Number of individual pieces this line explodes into. Fractional
    /// quantities round up, negative ones yield nothing.
    pub fn piece_count(&self) -> usize {
        if self.quantity > 0.0 {
            self.quantity.ceil() as usize
        } else {
            0
        }
    }
}

/// Working state for one profile: the pieces still waiting for a bar,
/// longest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceGroup {
    pub profile_id: String,
    pub profile_name: String,
    pub stock_length: f64,
    pub remaining: Vec<f64>,
}

impl PieceGroup {
    pub fn new(profile_id: String, profile_name: String, stock_length: f64) -> Self {
        Self {
            profile_id,
            profile_name,
            stock_length,
            remaining: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizeParams {
    /// Material lost between two adjacent cuts on the same bar (mm).
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub blade_kerf: f64,
    /// Waste below this (but above zero) is reserved finishing margin and
    /// is avoided whenever the search has an alternative (mm).
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub min_acceptable_waste: f64,
}

impl OptimizeParams {
    pub fn new(blade_kerf: f64, min_acceptable_waste: f64) -> Self {
        Self {
            blade_kerf,
            min_acceptable_waste,
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            blade_kerf: clamp_non_negative(self.blade_kerf),
            min_acceptable_waste: clamp_non_negative(self.min_acceptable_waste),
        }
    }
}

pub fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// A full optimization request: the order's cut list plus cutting parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderInput {
    pub requirements: Vec<CutRequirement>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub blade_kerf: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub min_acceptable_waste: f64,
}

impl OrderInput {
    pub fn params(&self) -> OptimizeParams {
        OptimizeParams::new(self.blade_kerf, self.min_acceptable_waste)
    }
}

/// One stock bar ("boy") and the cuts assigned to it, in cutting order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub cuts: Vec<f64>,
    pub waste: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub profile_id: String,
    pub profile_name: String,
    pub stock_length: f64,
    /// Same as `bars.len()`; kept in the serialized result for report consumers.
    pub bar_count: usize,
    pub bars: Vec<Bar>,
    /// Pieces that could not be placed on any bar (longer than the stock).
    pub unplaced: Vec<f64>,
    /// `None` when the profile produced no bars.
    pub last_bar_consumption: Option<f64>,
    pub last_bar_consumption_plus_50: Option<f64>,
}

impl OptimizationResult {
    pub fn total_waste(&self) -> f64 {
        self.bars.iter().map(|b| b.waste).sum()
    }

    pub fn waste_percent(&self) -> f64 {
        let total_stock = self.stock_length * self.bars.len() as f64;
        if total_stock <= 0.0 {
            return 0.0;
        }
        self.total_waste() / total_stock * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Solution {
    pub results: Vec<OptimizationResult>,
}

impl Solution {
    pub fn bar_count(&self) -> usize {
        self.results.iter().map(|r| r.bars.len()).sum()
    }

    pub fn total_waste_percent(&self) -> f64 {
        let total_stock: f64 = self
            .results
            .iter()
            .map(|r| r.stock_length * r.bars.len() as f64)
            .sum();
        if total_stock <= 0.0 {
            return 0.0;
        }
        let total_waste: f64 = self.results.iter().map(|r| r.total_waste()).sum();
        total_waste / total_stock * 100.0
    }

    pub fn unplaced_count(&self) -> usize {
        self.results.iter().map(|r| r.unplaced.len()).sum()
    }
}

fn missing_number() -> f64 {
    f64::NAN
}

/// Accepts a JSON number, a numeric string, or null. Anything that does not
/// parse becomes NaN so that line validation can reject it later.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    })
}

pub fn deserialize_profile_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_numbers() {
        let req: CutRequirement = serde_json::from_str(
            r#"{"profile_id": 12, "profile_name": "Frame", "stock_length": "6000",
                "cut_length": 1250.5, "quantity": null}"#,
        )
        .unwrap();
        assert_eq!(req.profile_id, "12");
        assert_eq!(req.stock_length, 6000.0);
        assert_eq!(req.cut_length, 1250.5);
        assert!(req.quantity.is_nan());
        assert!(!req.is_usable());
    }

    #[test]
    fn test_missing_and_garbage_fields_become_nan() {
        let req: CutRequirement =
            serde_json::from_str(r#"{"profile_id": "P1", "cut_length": "abc"}"#).unwrap();
        assert_eq!(req.profile_name, "");
        assert!(req.stock_length.is_nan());
        assert!(req.cut_length.is_nan());
        assert!(req.quantity.is_nan());
    }

    #[test]
    fn test_piece_count() {
        let mut req = CutRequirement::new("P1", "Frame", 6000.0, 1000.0, 3.0);
        assert_eq!(req.piece_count(), 3);
        req.quantity = 2.5;
        assert_eq!(req.piece_count(), 3);
        req.quantity = 0.0;
        assert_eq!(req.piece_count(), 0);
        req.quantity = -4.0;
        assert_eq!(req.piece_count(), 0);
        assert!(req.is_usable());
    }

    #[test]
    fn test_usable_rejects_bad_lengths() {
        let ok = CutRequirement::new("P1", "Frame", 6000.0, 1000.0, 1.0);
        assert!(ok.is_usable());
        assert!(!CutRequirement { stock_length: 0.0, ..ok.clone() }.is_usable());
        assert!(!CutRequirement { stock_length: -5.0, ..ok.clone() }.is_usable());
        assert!(!CutRequirement { stock_length: f64::INFINITY, ..ok.clone() }.is_usable());
        assert!(!CutRequirement { cut_length: f64::NAN, ..ok.clone() }.is_usable());
        assert!(!CutRequirement { cut_length: 0.0, ..ok.clone() }.is_usable());
        assert!(!CutRequirement { quantity: f64::INFINITY, ..ok.clone() }.is_usable());
        assert!(!CutRequirement { quantity: 1e18, ..ok.clone() }.is_usable());
        assert!(CutRequirement { quantity: MAX_QUANTITY_PER_LINE, ..ok }.is_usable());
    }

    #[test]
    fn test_params_clamped() {
        let p = OptimizeParams::new(-3.0, f64::NAN);
        assert_eq!(p, OptimizeParams::default());

        let p = OptimizeParams::new(4.0, f64::INFINITY);
        assert_eq!(p.blade_kerf, 4.0);
        assert_eq!(p.min_acceptable_waste, 0.0);
    }

    #[test]
    fn test_order_input_defaults() {
        let order: OrderInput = serde_json::from_str(r#"{"requirements": []}"#).unwrap();
        assert_eq!(order.params(), OptimizeParams::default());

        let order: OrderInput = serde_json::from_str(
            r#"{"requirements": [], "blade_kerf": "3.5", "min_acceptable_waste": -1}"#,
        )
        .unwrap();
        assert_eq!(order.params(), OptimizeParams::new(3.5, 0.0));
    }

    #[test]
    fn test_solution_totals() {
        let result = OptimizationResult {
            profile_id: "P1".into(),
            profile_name: "Frame".into(),
            stock_length: 1000.0,
            bar_count: 2,
            bars: vec![
                Bar { cuts: vec![900.0], waste: 100.0, label: String::new() },
                Bar { cuts: vec![700.0], waste: 300.0, label: String::new() },
            ],
            unplaced: vec![1200.0],
            last_bar_consumption: Some(700.0),
            last_bar_consumption_plus_50: Some(750.0),
        };
        assert_eq!(result.total_waste(), 400.0);
        assert!((result.waste_percent() - 20.0).abs() < 1e-9);

        let solution = Solution { results: vec![result] };
        assert_eq!(solution.bar_count(), 2);
        assert_eq!(solution.unplaced_count(), 1);
        assert!((solution.total_waste_percent() - 20.0).abs() < 1e-9);
        assert_eq!(Solution::default().total_waste_percent(), 0.0);
    }
}
