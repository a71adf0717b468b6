//! Watchlist/person-screening search client.
//!
//! For each individual owner, POSTs a name-search payload to the
//! screening API (`X-Api-Key` header) and attaches the returned match
//! candidates to the owner record. Candidates keep the API's own
//! relevance order; the best match is index 0 and is never re-ranked
//! locally.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use keypeople_shared::{
    BeneficialOwner, KeyPeopleError, MatchCandidate, MatchedOwner, Result, UNKNOWN,
};

/// Header carrying the screening API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// User-Agent string for screening requests.
const USER_AGENT: &str = concat!("keypeople/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Search payload
// ---------------------------------------------------------------------------

/// Payload defaults applied to every search, from config.
#[derive(Debug, Clone)]
pub struct SearchDefaults {
    /// Minimum match score requested from the API.
    pub threshold: u32,
    /// Country codes to search within.
    pub countries: Vec<String>,
    /// Watchlist datasets to search.
    pub datasets: Vec<String>,
}

/// Wire shape of the POST body.
#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    name: &'a str,
    threshold: u32,
    countries: &'a [String],
    datasets: &'a [String],
}

// ---------------------------------------------------------------------------
// Response wire types
// ---------------------------------------------------------------------------

/// Wire shape of the search response: `{results: {matchCount, matches}}`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: RawResults,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResults {
    match_count: u32,
    matches: Vec<RawMatch>,
}

/// One raw candidate. The API omits `gender` and `profileImage` on some
/// records; those default at this boundary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatch {
    name: String,
    resource_id: String,
    score: u32,
    #[serde(default)]
    countries: Vec<String>,
    #[serde(default)]
    datasets: Vec<String>,
    #[serde(default)]
    dates_of_birth: Vec<String>,
    #[serde(default = "default_gender")]
    gender: String,
    #[serde(default = "default_profile_image")]
    profile_image: String,
}

fn default_gender() -> String {
    UNKNOWN.into()
}
fn default_profile_image() -> String {
    "Not Available".into()
}

impl From<RawMatch> for MatchCandidate {
    fn from(raw: RawMatch) -> Self {
        Self {
            name: raw.name,
            resource_id: raw.resource_id,
            score: raw.score,
            countries: raw.countries,
            datasets: raw.datasets,
            dates_of_birth: raw.dates_of_birth,
            gender: raw.gender,
            profile_image: raw.profile_image,
        }
    }
}

// ---------------------------------------------------------------------------
// ScreeningClient
// ---------------------------------------------------------------------------

/// HTTP client for the person-screening search API.
#[derive(Debug, Clone)]
pub struct ScreeningClient {
    client: Client,
    endpoint: String,
    api_key: String,
    defaults: SearchDefaults,
}

impl ScreeningClient {
    /// Build a client for the given endpoint with a fixed request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
        defaults: SearchDefaults,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| KeyPeopleError::Upstream(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            defaults,
        })
    }

    /// Search the watchlist for one name, returning candidates in API
    /// ranking order.
    #[instrument(skip(self))]
    pub async fn search(&self, name: &str) -> Result<Vec<MatchCandidate>> {
        let payload = SearchPayload {
            name,
            threshold: self.defaults.threshold,
            countries: &self.defaults.countries,
            datasets: &self.defaults.datasets,
        };

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

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| KeyPeopleError::schema("results", e.to_string()))?;

        debug!(
            name,
            match_count = parsed.results.match_count,
            "watchlist search complete"
        );

        Ok(parsed.results.matches.into_iter().map(Into::into).collect())
    }

    /// Search for one owner and attach the results.
    pub async fn match_owner(&self, owner: &BeneficialOwner) -> Result<MatchedOwner> {
        let matches = self.search(&owner.name).await?;
        Ok(MatchedOwner {
            owner: owner.clone(),
            matches,
        })
    }

    /// Screen a list of owners, one call at a time, in list order.
    ///
    /// A failed call aborts the remaining owners and surfaces the error;
    /// there is no partial-result recovery.
    #[instrument(skip_all, fields(owners = owners.len()))]
    pub async fn match_owners(&self, owners: &[BeneficialOwner]) -> Result<Vec<MatchedOwner>> {
        let mut matched = Vec::with_capacity(owners.len());

        for owner in owners {
            matched.push(self.match_owner(owner).await?);
        }

        info!(screened = matched.len(), "all owners screened");
        Ok(matched)
    }

    /// Fetch the raw compliance profile for a matched individual by
    /// resource id: GET `<endpoint>/<resource_id>`.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self, resource_id: &str) -> Result<serde_json::Value> {
        let url = format!("{}/{resource_id}", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| KeyPeopleError::Upstream(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyPeopleError::Upstream(format!("{url}: HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| KeyPeopleError::schema("$", format!("profile body is not JSON: {e}")))
    }
}
