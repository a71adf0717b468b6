//! Individual-owner filter.

use keypeople_shared::BeneficialOwner;

/// Beneficiary type label that marks a natural person.
const INDIVIDUAL: &str = "Individual";

/// Retain owners who are individual persons holding more than
/// `threshold` percent ownership.
///
/// Stable and order-preserving; surviving records are not mutated.
/// The default threshold is 0.0, meaning "has any recorded stake".
pub fn individual_owners(owners: Vec<BeneficialOwner>, threshold: f64) -> Vec<BeneficialOwner> {
    owners
        .into_iter()
        .filter(|o| o.beneficiary_type_description == INDIVIDUAL && o.ownership_percentage > threshold)
        .collect()
}
