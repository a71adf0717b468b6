//! Beneficial-ownership sub-graph parsing.
//!
//! Walks `data.company.dnb.beneficialOwnershipStructure.beneficialOwners`
//! and converts each raw record into a canonical [`BeneficialOwner`].
//! Defaulting happens here, at the deserialization boundary, not in
//! business logic: a missing `name` is a schema error, while missing
//! sub-objects and numerics fall back to "Unknown"/0.

use serde::Deserialize;

use keypeople_shared::{BeneficialOwner, KeyPeopleError, Result, UNKNOWN};

const OWNERS_PATH: &str = "data.company.dnb.beneficialOwnershipStructure.beneficialOwners";

/// Wire shape of the `data.company` node for the ubo fragment.
/// Every level is optional so that contract drift surfaces as a schema
/// error with a path instead of a bare deserialization failure.
#[derive(Debug, Deserialize)]
struct RawUboCompany {
    dnb: Option<RawDnb>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDnb {
    beneficial_ownership_structure: Option<RawOwnershipStructure>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOwnershipStructure {
    beneficial_owners: Option<Vec<RawOwner>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawOwner {
    name: Option<String>,
    beneficiary_type: Option<RawBeneficiaryType>,
    address: Option<RawAddress>,
    beneficial_ownership_percentage: Option<f64>,
    degree_of_separation: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBeneficiaryType {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAddress {
    country: Option<String>,
}

/// Parse a full response body into the flat owner list, preserving
/// upstream order.
pub(crate) fn parse_beneficial_owners(body: serde_json::Value) -> Result<Vec<BeneficialOwner>> {
    let node = super::company_node(body)?;

    let raw: RawUboCompany = serde_json::from_value(node)
        .map_err(|e| KeyPeopleError::schema("data.company", e.to_string()))?;

    let owners = raw
        .dnb
        .ok_or_else(|| KeyPeopleError::schema("data.company.dnb", "field is missing"))?
        .beneficial_ownership_structure
        .ok_or_else(|| {
            KeyPeopleError::schema(
                "data.company.dnb.beneficialOwnershipStructure",
                "field is missing",
            )
        })?
        .beneficial_owners
        .ok_or_else(|| KeyPeopleError::schema(OWNERS_PATH, "field is missing"))?;

    owners
        .into_iter()
        .enumerate()
        .map(|(i, raw)| convert_owner(raw, i))
        .collect()
}

/// Apply the per-record defaulting rules.
fn convert_owner(raw: RawOwner, index: usize) -> Result<BeneficialOwner> {
    let name = raw.name.ok_or_else(|| {
        KeyPeopleError::schema(format!("{OWNERS_PATH}[{index}].name"), "field is missing")
    })?;

    let beneficiary_type_description = raw
        .beneficiary_type
        .and_then(|t| t.description)
        .unwrap_or_else(|| UNKNOWN.into());

    let country = raw
        .address
        .and_then(|a| a.country)
        .unwrap_or_else(|| UNKNOWN.into());

    Ok(BeneficialOwner {
        name,
        beneficiary_type_description,
        country,
        ownership_percentage: raw.beneficial_ownership_percentage.unwrap_or(0.0),
        degree_of_separation: raw.degree_of_separation.unwrap_or(0),
    })
}
