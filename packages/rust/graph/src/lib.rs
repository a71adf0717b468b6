//! Corporate-intelligence GraphQL client.
//!
//! Fetches the subject company's identity profile and its
//! beneficial-ownership sub-graph. Both fetchers share one transport:
//! a POST of `{query, variables: {id}}` with an `X-Craft-Api-Key`
//! header, expecting a `{data: {company: {...}}}` body.

mod company;
mod query;
mod ubo;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};

use keypeople_shared::{BeneficialOwner, Company, KeyPeopleError, Result};

pub use query::{QueryFragment, build_query, company_fragment, ubo_fragment};

/// Header carrying the graph API key.
const API_KEY_HEADER: &str = "X-Craft-Api-Key";

/// User-Agent string for graph requests.
const USER_AGENT: &str = concat!("keypeople/", env!("CARGO_PKG_VERSION"));

/// Wire shape of the POST body.
#[derive(Debug, Serialize)]
struct GraphPayload {
    query: String,
    variables: Variables,
}

#[derive(Debug, Serialize)]
struct Variables {
    id: i64,
}

// ---------------------------------------------------------------------------
// GraphClient
// ---------------------------------------------------------------------------

/// HTTP client for the corporate-intelligence GraphQL API.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GraphClient {
    /// Build a client for the given endpoint with a fixed request timeout.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| KeyPeopleError::Upstream(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetch the company identity profile for a company id.
    #[instrument(skip(self))]
    pub async fn fetch_company(&self, id: i64) -> Result<Company> {
        let body = self.post_query(&query::company_fragment(), id).await?;
        let company = company::parse_company(body)?;

        info!(id, name = %company.display_name, "company profile fetched");
        Ok(company)
    }

    /// Fetch the flat beneficial-owner list for a company id,
    /// preserving upstream order.
    #[instrument(skip(self))]
    pub async fn fetch_beneficial_owners(&self, id: i64) -> Result<Vec<BeneficialOwner>> {
        let body = self.post_query(&query::ubo_fragment(), id).await?;
        let owners = ubo::parse_beneficial_owners(body)?;

        info!(id, owners = owners.len(), "beneficial owners fetched");
        Ok(owners)
    }

    /// Issue a query built from a fragment and return the parsed body.
    async fn post_query(&self, fragment: &QueryFragment, id: i64) -> Result<serde_json::Value> {
        let payload = GraphPayload {
            query: query::build_query(fragment),
            variables: Variables { id },
        };

        debug!(fragment = fragment.name, id, "posting graph query");

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| KeyPeopleError::Upstream(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyPeopleError::Upstream(format!(
                "{}: HTTP {status}",
                self.endpoint
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| KeyPeopleError::schema("$", format!("response body is not JSON: {e}")))
    }
}

/// Extract the `data.company` node from a response body, surfacing
/// contract drift as a schema error with the offending path.
fn company_node(mut body: serde_json::Value) -> Result<serde_json::Value> {
    let data = body
        .get_mut("data")
        .map(serde_json::Value::take)
        .ok_or_else(|| KeyPeopleError::schema("data", "field is missing"))?;

    match data {
        serde_json::Value::Object(mut map) => match map.remove("company") {
            Some(node) if !node.is_null() => Ok(node),
            _ => Err(KeyPeopleError::schema("data.company", "field is missing or null")),
        },
        _ => Err(KeyPeopleError::schema("data", "expected an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture(name: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(format!("../../../fixtures/json/{name}"))
            .expect("read fixture");
        serde_json::from_str(&raw).expect("parse fixture")
    }

    #[tokio::test]
    async fn fetch_company_sends_key_header_and_query() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("X-Craft-Api-Key", "test-graph-key"))
            .and(body_partial_json(serde_json::json!({
                "variables": { "id": 60903 }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixture("company-response.fixture.json")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GraphClient::new(server.uri(), "test-graph-key", 30).unwrap();
        let company = client.fetch_company(60903).await.unwrap();

        assert_eq!(company.display_name, "JFrog");
        assert_eq!(
            company.logo_url,
            "https://images.craft.co/images/jfrog-logo.png"
        );
    }

    #[tokio::test]
    async fn fetch_owners_parses_fixture_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixture("ubo-response.fixture.json")),
            )
            .mount(&server)
            .await;

        let client = GraphClient::new(server.uri(), "test-graph-key", 30).unwrap();
        let owners = client.fetch_beneficial_owners(60903).await.unwrap();

        assert_eq!(owners.len(), 5);
        assert_eq!(owners[0].name, "Yaochu Yang");
        assert_eq!(owners[4].name, "Simo He");
    }

    #[tokio::test]
    async fn non_2xx_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = GraphClient::new(server.uri(), "test-graph-key", 30).unwrap();
        let err = client.fetch_company(60903).await.unwrap_err();

        match err {
            KeyPeopleError::Upstream(msg) => assert!(msg.contains("502"), "msg: {msg}"),
            other => panic!("expected Upstream error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_data_node_is_schema_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "errors": [] })),
            )
            .mount(&server)
            .await;

        let client = GraphClient::new(server.uri(), "test-graph-key", 30).unwrap();
        let err = client.fetch_company(60903).await.unwrap_err();

        match err {
            KeyPeopleError::Schema { path, .. } => assert_eq!(path, "data"),
            other => panic!("expected Schema error, got: {other}"),
        }
    }
}
