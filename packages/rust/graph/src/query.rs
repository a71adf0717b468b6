//! GraphQL query assembly.
//!
//! Queries are built from named fragments: the selection set varies per
//! fetcher (company identity vs. ownership sub-graph) while the outer
//! `company(id: $id)` query shape stays fixed.

/// A named, reusable GraphQL selection set.
///
/// `fields` is caller-trusted GraphQL syntax; no validation is performed.
/// Fragments are static and created once at startup.
#[derive(Debug, Clone)]
pub struct QueryFragment {
    /// Fragment name, spread into the query as `...name`.
    pub name: &'static str,
    /// The GraphQL type the fragment applies to.
    pub on_type: &'static str,
    /// Selection set body.
    pub fields: &'static str,
}

/// Build the full query string for a fragment.
///
/// Output shape, exactly:
/// `query company($id: ID) { company(id: $id) { ...<name> } }
///  fragment <name> on <on_type> { <fields> }`
///
/// Pure and deterministic.
pub fn build_query(fragment: &QueryFragment) -> String {
    format!(
        "query company($id: ID) {{ company(id: $id) {{ ...{name} }} }} fragment {name} on {on_type} {{ {fields} }}",
        name = fragment.name,
        on_type = fragment.on_type,
        fields = fragment.fields,
    )
}

/// Selection set for the company identity profile.
pub fn company_fragment() -> QueryFragment {
    QueryFragment {
        name: "company",
        on_type: "Company",
        fields: "id slug displayName shortDescription craftUrl logo { url } companyType",
    }
}

/// Selection set for the beneficial-ownership sub-graph.
pub fn ubo_fragment() -> QueryFragment {
    QueryFragment {
        name: "ubo",
        on_type: "Company",
        fields: "id displayName shortDescription dnb { beneficialOwnershipStructure { beneficialOwners { name beneficiaryType { description } address { country } beneficialOwnershipPercentage degreeOfSeparation } } }",
    }
}
