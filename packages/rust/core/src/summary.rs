//! Summary projection: matched owners to flat display rows.

use keypeople_shared::{MatchedOwner, OwnerSummaryRow};

/// Reduce one matched owner to a display row, taking the API's
/// first-ranked candidate as-is. No local scoring or re-sorting; an
/// owner with no candidates gets null match fields and an empty
/// dataset list.
pub fn summarize(matched: &MatchedOwner) -> OwnerSummaryRow {
    let best = matched.best_match();

    OwnerSummaryRow {
        owner_name: matched.owner.name.clone(),
        ownership_percentage: matched.owner.ownership_percentage,
        degree_of_separation: matched.owner.degree_of_separation,
        matched_name: best.map(|m| m.name.clone()),
        match_confidence: best.map(|m| m.score),
        datasets: best.map(|m| m.datasets.clone()).unwrap_or_default(),
    }
}

/// Project the whole matched-owner list, preserving order.
pub fn summarize_all(matched: &[MatchedOwner]) -> Vec<OwnerSummaryRow> {
    matched.iter().map(summarize).collect()
}
