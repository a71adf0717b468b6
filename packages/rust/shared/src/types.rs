//! Canonical domain types for the screening pipeline.
//!
//! One definition per entity; the API clients deserialize into raw wire
//! structs and convert into these at the boundary.

use serde::{Deserialize, Serialize};

/// Sentinel used when an upstream record omits a nested field.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

/// Identity profile of the subject company, fetched once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Upstream company identifier.
    pub id: i64,
    /// Display name for the report header.
    pub display_name: String,
    /// One-line company description.
    pub short_description: String,
    /// URL-safe company slug.
    pub slug: String,
    /// Link back to the upstream company profile.
    pub craft_url: String,
    /// Company logo URL, flattened from the upstream `logo { url }` object.
    pub logo_url: String,
    /// Company type label (e.g., "Private", "Public").
    pub company_type: String,
}

// ---------------------------------------------------------------------------
// BeneficialOwner
// ---------------------------------------------------------------------------

/// One entry of the company's ultimate-beneficial-ownership structure.
///
/// Missing nested objects in the source data default to [`UNKNOWN`] and
/// missing numerics default to 0; see the UBO fetcher for the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeneficialOwner {
    /// Owner name as recorded upstream.
    pub name: String,
    /// Beneficiary type label ("Individual", "Entity", ...).
    pub beneficiary_type_description: String,
    /// Country of the owner's recorded address.
    pub country: String,
    /// Ownership percentage in `[0, 100]`; 0 when unrecorded.
    pub ownership_percentage: f64,
    /// Corporate layers between the subject company and this owner.
    pub degree_of_separation: u32,
}

// ---------------------------------------------------------------------------
// MatchCandidate
// ---------------------------------------------------------------------------

/// One candidate from a watchlist search response, in API ranking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Matched profile name.
    pub name: String,
    /// Stable identifier of the watchlist profile.
    pub resource_id: String,
    /// Match confidence score in `[0, 100]`.
    pub score: u32,
    /// Countries associated with the profile.
    pub countries: Vec<String>,
    /// Watchlist datasets the profile appears in.
    pub datasets: Vec<String>,
    /// Recorded dates of birth (often just a year).
    pub dates_of_birth: Vec<String>,
    /// Gender label; "Unknown" when unrecorded.
    pub gender: String,
    /// Profile image URL; "Not Available" when absent.
    pub profile_image: String,
}

// ---------------------------------------------------------------------------
// MatchedOwner
// ---------------------------------------------------------------------------

/// A beneficial owner joined with their watchlist search results.
///
/// `matches` preserves API response order; the best match is index 0 by
/// the API's own ranking and is never re-sorted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedOwner {
    /// The screened owner.
    pub owner: BeneficialOwner,
    /// Zero or more candidates, best first.
    pub matches: Vec<MatchCandidate>,
}

impl MatchedOwner {
    /// The API's first-ranked candidate, if any.
    pub fn best_match(&self) -> Option<&MatchCandidate> {
        self.matches.first()
    }
}

// ---------------------------------------------------------------------------
// OwnerSummaryRow
// ---------------------------------------------------------------------------

/// Flat display row: one owner joined with their best match.
/// Constructed once at the end of the pipeline; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummaryRow {
    /// Owner name.
    pub owner_name: String,
    /// Ownership percentage carried over from the owner record.
    pub ownership_percentage: f64,
    /// Degrees of separation carried over from the owner record.
    pub degree_of_separation: u32,
    /// Best-match profile name, if any candidate was returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_name: Option<String>,
    /// Best-match confidence score, if any candidate was returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_confidence: Option<u32>,
    /// Best-match watchlist datasets; empty when unmatched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<String>,
}
