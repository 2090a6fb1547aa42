//! HTTP client for the department course listing.
//!
//! One request per year/term. No retries: a transport or status failure is
//! returned to the caller, which decides whether the unit of work is lost.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use coursecatalog_shared::{AcademicTerm, CatalogConfig, CatalogError, Result};

use crate::listing::{RawRow, parse_listing};

// ---------------------------------------------------------------------------
// ListingSource
// ---------------------------------------------------------------------------

/// Anything that can produce the raw rows of a term's course listing.
///
/// [`CatalogClient`] is the production implementation; tests substitute an
/// in-memory source.
pub trait ListingSource {
    /// Fetch and split the listing for `term` into raw rows.
    fn fetch_rows(&self, term: &AcademicTerm) -> impl Future<Output = Result<Vec<RawRow>>>;
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

/// Fetches listing pages from the catalog site.
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    department: String,
}

impl CatalogClient {
    /// Create a new client with the given catalog configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            CatalogError::config(format!("invalid catalog base_url '{}': {e}", config.base_url))
        })?;

        if config.department.trim().is_empty() {
            return Err(CatalogError::config("catalog department must not be empty"));
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            department: config.department.trim().to_string(),
        })
    }

    /// URL of the listing page, `{base}/view-dept/{year}/{term}/{department}/`.
    pub fn listing_url(&self, term: &AcademicTerm) -> Result<Url> {
        let path = format!(
            "view-dept/{}/{}/{}/",
            term.year,
            term.term.selector(),
            self.department
        );
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(&path)
            .map_err(|e| CatalogError::config(format!("cannot build listing URL: {e}")))
    }

    /// Fetch the raw listing page body.
    #[instrument(skip_all, fields(term = %term))]
    pub async fn fetch_listing(&self, term: &AcademicTerm) -> Result<String> {
        let url = self.listing_url(term)?;
        info!(%url, "fetching course listing");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "catalog returned an error status");
            return Err(CatalogError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: body read failed: {e}")))?;

        debug!(%url, bytes = body.len(), "listing fetched");
        Ok(body)
    }
}

impl ListingSource for CatalogClient {
    async fn fetch_rows(&self, term: &AcademicTerm) -> Result<Vec<RawRow>> {
        let body = self.fetch_listing(term).await?;
        parse_listing(&body)
    }
}

#[cfg(test)]
mod client_tests {
    use super::*;
    use coursecatalog_shared::Term;

    fn config_for(base_url: &str) -> CatalogConfig {
        CatalogConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..CatalogConfig::default()
        }
    }

    #[test]
    fn test_listing_url() {
        let client = CatalogClient::new(&CatalogConfig::default()).unwrap();
        let url = client
            .listing_url(&AcademicTerm::new(112, Term::First))
            .unwrap();
        assert_eq!(url.as_str(), "https://course.thu.edu.tw/view-dept/112/1/350/");
    }

    #[test]
    fn test_listing_url_keeps_base_path() {
        let client = CatalogClient::new(&config_for("https://example.edu/catalog")).unwrap();
        let url = client
            .listing_url(&AcademicTerm::new(113, Term::Second))
            .unwrap();
        assert_eq!(url.as_str(), "https://example.edu/catalog/view-dept/113/2/350/");
    }

    #[test]
    fn test_rejects_bad_config() {
        let err = CatalogClient::new(&config_for("not a url")).err().unwrap();
        assert!(matches!(err, CatalogError::Config { .. }));

        let mut config = CatalogConfig::default();
        config.department = "  ".into();
        assert!(CatalogClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_fetch_rows_from_mock_server() {
        let server = wiremock::MockServer::start().await;
        let page = include_str!("../../../../fixtures/html/listing.html");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/view-dept/112/1/350/"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let client = CatalogClient::new(&config_for(&server.uri())).unwrap();
        let rows = client
            .fetch_rows(&AcademicTerm::new(112, Term::First))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "28019");
    }

    #[tokio::test]
    async fn test_http_error_carries_status() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CatalogClient::new(&config_for(&server.uri())).unwrap();
        let err = client
            .fetch_listing(&AcademicTerm::new(99, Term::Second))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(404));
        assert!(err.to_string().contains("/view-dept/99/2/350/"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Nothing listens on port 9 on the loopback interface
        let client = CatalogClient::new(&config_for("http://127.0.0.1:9")).unwrap();
        let err = client
            .fetch_listing(&AcademicTerm::new(112, Term::First))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
    }
}
