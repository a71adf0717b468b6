//! Company identity profile parsing.
//!
//! Maps the `data.company` node of a company-fragment response to the
//! canonical [`Company`] entity, flattening `logo { url }` to a string.

use serde::Deserialize;

use keypeople_shared::{Company, KeyPeopleError, Result};

/// Wire shape of the `data.company` node for the company fragment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompany {
    id: i64,
    slug: String,
    display_name: String,
    short_description: String,
    craft_url: String,
    logo: RawLogo,
    company_type: String,
}

#[derive(Debug, Deserialize)]
struct RawLogo {
    url: String,
}

/// Parse a full response body into a [`Company`].
pub(crate) fn parse_company(body: serde_json::Value) -> Result<Company> {
    let node = super::company_node(body)?;

    let raw: RawCompany = serde_json::from_value(node)
        .map_err(|e| KeyPeopleError::schema("data.company", e.to_string()))?;

    Ok(Company {
        id: raw.id,
        display_name: raw.display_name,
        short_description: raw.short_description,
        slug: raw.slug,
        craft_url: raw.craft_url,
        logo_url: raw.logo.url,
        company_type: raw.company_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> serde_json::Value {
        let raw = std::fs::read_to_string("../../../fixtures/json/company-response.fixture.json")
            .expect("read company fixture");
        serde_json::from_str(&raw).expect("parse company fixture")
    }

    #[test]
    fn parses_company_and_flattens_logo() {
        let company = parse_company(fixture()).expect("parse company");
        assert_eq!(company.id, 60903);
        assert_eq!(company.display_name, "JFrog");
        assert_eq!(company.slug, "jfrog");
        assert_eq!(company.company_type, "Public");
        assert_eq!(
            company.logo_url,
            "https://images.craft.co/images/jfrog-logo.png"
        );
    }

    #[test]
    fn missing_field_is_schema_error() {
        let mut body = fixture();
        body["data"]["company"]
            .as_object_mut()
            .unwrap()
            .remove("slug");

        let err = parse_company(body).unwrap_err();
        match err {
            KeyPeopleError::Schema { path, message } => {
                assert_eq!(path, "data.company");
                assert!(message.contains("slug"));
            }
            other => panic!("expected Schema error, got: {other}"),
        }
    }

    #[test]
    fn missing_company_node_is_schema_error() {
        let body = serde_json::json!({ "data": {} });
        let err = parse_company(body).unwrap_err();
        assert!(matches!(err, KeyPeopleError::Schema { .. }));
    }
}
