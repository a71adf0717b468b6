//! End-to-end screening pipeline:
//! company id → profile + UBO fetch → individual filter → watchlist match → summary rows.

use std::time::Instant;

use tracing::{info, instrument};

use keypeople_graph::GraphClient;
use keypeople_screening::ScreeningClient;
use keypeople_shared::{Company, OwnerSummaryRow, Result};

use crate::{filter, summary};

/// Configuration for one screening run, scoped to a single company id.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Upstream company identifier.
    pub company_id: i64,
    /// Minimum ownership percentage an individual must exceed.
    pub ownership_threshold: f64,
}

/// Result of a screening run.
#[derive(Debug)]
pub struct ScreeningReport {
    /// The subject company's identity profile.
    pub company: Company,
    /// One row per screened owner, in upstream order.
    pub rows: Vec<OwnerSummaryRow>,
    /// Owners returned by the UBO fetch before filtering.
    pub owners_total: usize,
    /// Owners that passed the individual filter and were screened.
    pub owners_screened: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each owner's watchlist call.
    fn owner_screened(&self, name: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &ScreeningReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn owner_screened(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &ScreeningReport) {}
}

/// Run the full screening pipeline.
///
/// 1. Fetch the company profile and the UBO structure (independent,
///    issued concurrently)
/// 2. Filter to individuals with ownership above the threshold
/// 3. Watchlist-search each survivor, one call at a time, in order
/// 4. Project each matched owner to a summary row
///
/// The first error halts the run; nothing is retried.
#[instrument(skip_all, fields(company_id = config.company_id))]
pub async fn run_screening(
    config: &RunConfig,
    graph: &GraphClient,
    screening: &ScreeningClient,
    progress: &dyn ProgressReporter,
) -> Result<ScreeningReport> {
    let start = Instant::now();

    info!(company_id = config.company_id, "starting screening run");

    // --- Phase 1: company profile + ownership structure ---
    progress.phase("Fetching company data");
    let (company, owners) = tokio::try_join!(
        graph.fetch_company(config.company_id),
        graph.fetch_beneficial_owners(config.company_id),
    )?;

    let owners_total = owners.len();

    // --- Phase 2: filter to screenable individuals ---
    progress.phase("Filtering individual owners");
    let individuals = filter::individual_owners(owners, config.ownership_threshold);
    let owners_screened = individuals.len();

    info!(
        owners_total,
        owners_screened,
        threshold = config.ownership_threshold,
        "individual filter applied"
    );

    // --- Phase 3: watchlist screening, one owner at a time ---
    progress.phase("Screening owners against watchlists");
    let mut matched = Vec::with_capacity(individuals.len());
    for (i, owner) in individuals.iter().enumerate() {
        progress.owner_screened(&owner.name, i + 1, individuals.len());
        matched.push(screening.match_owner(owner).await?);
    }

    // --- Phase 4: summary projection ---
    progress.phase("Building summary rows");
    let rows = summary::summarize_all(&matched);

    let report = ScreeningReport {
        company,
        rows,
        owners_total,
        owners_screened,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        company = %report.company.display_name,
        rows = report.rows.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "screening run complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keypeople_screening::SearchDefaults;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture(name: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(format!("../../../fixtures/json/{name}"))
            .expect("read fixture");
        serde_json::from_str(&raw).expect("parse fixture")
    }

    async fn graph_server() -> MockServer {
        let server = MockServer::start().await;

        // The two fetchers share one endpoint; route on the fragment
        // name embedded in the posted query string.
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "variables": { "id": 60903 } })))
            .and(wiremock::matchers::body_string_contains("...company"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixture("company-response.fixture.json")),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(wiremock::matchers::body_string_contains("...ubo"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixture("ubo-response.fixture.json")),
            )
            .mount(&server)
            .await;

        server
    }

    fn test_defaults() -> SearchDefaults {
        SearchDefaults {
            threshold: 95,
            countries: ["CN", "US", "TW", "HK"].map(String::from).to_vec(),
            datasets: ["PEP-CURRENT", "SAN-CURRENT", "RRE"].map(String::from).to_vec(),
        }
    }

    #[tokio::test]
    async fn end_to_end_fixture_run() {
        let graph_srv = graph_server().await;
        let screening_srv = MockServer::start().await;

        // One watchlist call per filtered owner.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("matches.fixture.json")))
            .expect(3)
            .mount(&screening_srv)
            .await;

        let graph = GraphClient::new(graph_srv.uri(), "graph-key", 30).unwrap();
        let screening =
            ScreeningClient::new(screening_srv.uri(), "wl-key", 30, test_defaults()).unwrap();

        let config = RunConfig {
            company_id: 60903,
            ownership_threshold: 0.0,
        };

        let report = run_screening(&config, &graph, &screening, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(report.company.display_name, "JFrog");
        assert_eq!(report.owners_total, 5);
        assert_eq!(report.owners_screened, 3);
        assert_eq!(report.rows.len(), 3);

        let names: Vec<&str> = report.rows.iter().map(|r| r.owner_name.as_str()).collect();
        assert_eq!(names, ["Yaochu Yang", "Shaoteng Duan", "Simo He"]);

        // Every row takes its match fields from the fixture's
        // first-ranked candidate.
        for row in &report.rows {
            assert_eq!(row.matched_name.as_deref(), Some("Shlomi Ben Haim"));
            assert_eq!(row.match_confidence, Some(100));
            assert_eq!(row.datasets, vec!["RRE"]);
        }
    }

    #[tokio::test]
    async fn watchlist_failure_halts_run() {
        let graph_srv = graph_server().await;
        let screening_srv = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&screening_srv)
            .await;

        let graph = GraphClient::new(graph_srv.uri(), "graph-key", 30).unwrap();
        let screening =
            ScreeningClient::new(screening_srv.uri(), "wl-key", 30, test_defaults()).unwrap();

        let config = RunConfig {
            company_id: 60903,
            ownership_threshold: 0.0,
        };

        let err = run_screening(&config, &graph, &screening, &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, keypeople_shared::KeyPeopleError::Upstream(_)));
    }

    #[tokio::test]
    async fn higher_threshold_screens_fewer_owners() {
        let graph_srv = graph_server().await;
        let screening_srv = MockServer::start().await;

        // Only Yaochu Yang (0.35) exceeds 0.3.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("matches.fixture.json")))
            .expect(1)
            .mount(&screening_srv)
            .await;

        let graph = GraphClient::new(graph_srv.uri(), "graph-key", 30).unwrap();
        let screening =
            ScreeningClient::new(screening_srv.uri(), "wl-key", 30, test_defaults()).unwrap();

        let config = RunConfig {
            company_id: 60903,
            ownership_threshold: 0.3,
        };

        let report = run_screening(&config, &graph, &screening, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(report.owners_screened, 1);
        assert_eq!(report.rows[0].owner_name, "Yaochu Yang");
    }
}
