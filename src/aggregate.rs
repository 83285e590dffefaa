use std::collections::HashMap;

use crate::types::{CutRequirement, PieceGroup};

/// Groups requirement lines by profile and explodes quantities into single
/// pieces. Groups come back in order of first appearance, each with its
/// pieces sorted longest first.
///
/// Lines without a usable stock length, cut length or quantity are skipped.
/// The stock length and name of a profile are taken from its first usable line.
pub fn aggregate(requirements: &[CutRequirement]) -> Vec<PieceGroup> {
    let mut groups: Vec<PieceGroup> = Vec::new();
    let mut by_profile: HashMap<&str, usize> = HashMap::new();

    for (line, req) in requirements.iter().enumerate() {
        if !req.is_usable() {
            tracing::warn!(
                line,
                profile_id = %req.profile_id,
                stock_length = req.stock_length,
                cut_length = req.cut_length,
                quantity = req.quantity,
                "skipping unusable cut requirement"
            );
            continue;
        }

        let idx = *by_profile.entry(req.profile_id.as_str()).or_insert_with(|| {
            groups.push(PieceGroup::new(
                req.profile_id.clone(),
                req.profile_name.clone(),
                req.stock_length,
            ));
            groups.len() - 1
        });

        groups[idx]
            .remaining
            .extend(std::iter::repeat_n(req.cut_length, req.piece_count()));
    }

    // Longest first: the packing loop relies on first-fit-decreasing order.
    for group in &mut groups {
        group.remaining.sort_by(|a, b| b.total_cmp(a));
    }

    groups
}
