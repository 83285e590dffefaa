use crate::aggregate::aggregate;
use crate::consumption::consumption;
use crate::render::bar_label;
use crate::search::{SearchContext, select_next_bar};
use crate::types::{Bar, CutRequirement, OptimizationResult, OptimizeParams, PieceGroup, Solution};

/// Fixed allowance added to the last bar of every profile run.
pub const END_OF_RUN_SURCHARGE: f64 = 50.0;

pub struct Solver {
    requirements: Vec<CutRequirement>,
    params: OptimizeParams,
}

/// One bar's cuts and waste, before labelling.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedBar {
    pub cuts: Vec<f64>,
    pub waste: f64,
}

/// Bars packed for one profile, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedGroup {
    pub group: PieceGroup,
    pub bars: Vec<PackedBar>,
}

impl Solver {
    pub fn new(requirements: Vec<CutRequirement>, params: OptimizeParams) -> Self {
        Self {
            requirements,
            params: params.clamped(),
        }
    }

    /// Packs every profile in the order independently. Each call starts from
    /// the unmodified requirements, so repeated calls give identical results.
    pub fn solve(&self) -> Solution {
        let results = aggregate(&self.requirements)
            .into_iter()
            .map(|group| assemble(pack_group(group, &self.params), &self.params))
            .collect();

        Solution { results }
    }
}

/// Smallest initial piece of the group. Computed once and kept for every bar.
pub fn fire_tolerance(remaining: &[f64]) -> f64 {
    remaining.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Takes bars off the group until it is empty or nothing left fits. Pieces
/// that never fit stay in `group.remaining`.
pub fn pack_group(mut group: PieceGroup, params: &OptimizeParams) -> PackedGroup {
    let ctx = SearchContext {
        stock_length: group.stock_length,
        blade_kerf: params.blade_kerf,
        min_acceptable_waste: params.min_acceptable_waste,
        fire_tolerance: fire_tolerance(&group.remaining),
    };

    let mut bars = Vec::new();
    while !group.remaining.is_empty() {
        let selection = select_next_bar(&group.remaining, &ctx);
        if selection.is_empty() {
            break;
        }

        let cuts = selection.cuts(&group.remaining);
        let mut taken = selection.indices;
        taken.sort_unstable_by(|a, b| b.cmp(a));
        for i in taken {
            group.remaining.remove(i);
        }

        tracing::debug!(
            profile_id = %group.profile_id,
            bar = bars.len() + 1,
            cuts = ?cuts,
            waste = selection.waste,
            "packed bar"
        );
        bars.push(PackedBar {
            cuts,
            waste: selection.waste,
        });
    }

    if !group.remaining.is_empty() {
        tracing::warn!(
            profile_id = %group.profile_id,
            stock_length = group.stock_length,
            unplaced = ?group.remaining,
            "pieces do not fit on any bar"
        );
    }

    PackedGroup { group, bars }
}

fn assemble(packed: PackedGroup, params: &OptimizeParams) -> OptimizationResult {
    let PackedGroup { group, bars } = packed;

    let bars: Vec<Bar> = bars
        .into_iter()
        .enumerate()
        .map(|(i, PackedBar { cuts, waste })| Bar {
            label: bar_label(i + 1, &cuts, waste),
            cuts,
            waste,
        })
        .collect();

    let last_bar_consumption = bars.last().map(|b| consumption(&b.cuts, params.blade_kerf));

    OptimizationResult {
        profile_id: group.profile_id,
        profile_name: group.profile_name,
        stock_length: group.stock_length,
        bar_count: bars.len(),
        bars,
        unplaced: group.remaining,
        last_bar_consumption,
        last_bar_consumption_plus_50: last_bar_consumption.map(|c| c + END_OF_RUN_SURCHARGE),
    }
}
