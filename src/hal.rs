//! HAL open-archive retrieval.
//!
//! Builds the per-year bibliography query and fetches it over HTTP, with an
//! on-disk cache so repeated runs do not hammer the archive. Fetching is
//! synchronous: the report is a sequential batch job, one year at a time.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::Result;

/// Production HAL search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.archives-ouvertes.fr/search";

const DEFAULT_PORTAL: &str = "imt-atlantique";
const DEFAULT_COLLECTION_CODE: &str = "IMT-ATLANTIQUE";

/// Client for the HAL search API.
///
/// # Examples
///
/// ```
/// use confrep::hal::HalClient;
///
/// let client = HalClient::new();
/// let url = client.query_url("SUBATECH-PLASMA", 2020);
/// assert!(url.contains("2020"));
/// ```
#[derive(Debug, Clone)]
pub struct HalClient {
    base_url: String,
    portal: String,
    collection_code: String,
}

impl Default for HalClient {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            portal: DEFAULT_PORTAL.to_string(),
            collection_code: DEFAULT_COLLECTION_CODE.to_string(),
        }
    }
}

impl HalClient {
    /// Creates a client pointing at the production HAL endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the search endpoint, e.g. for a local test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Builds the TEI bibliography query for one group collection and year.
    #[must_use]
    pub fn query_url(&self, group: &str, year: i32) -> String {
        format!(
            "{}/{}/?omitHeader=true&wt=xml-tei\
             &q=collName_t%3A%28{}%29+AND++conferenceStartDateY_i%3A%28{}%29\
             &fq=collCode_s%3A{}&fq=NOT+status_i%3A111&defType=edismax&rows=1000",
            self.base_url, self.portal, group, year, self.collection_code
        )
    }

    /// Fetches a URL and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Fetch`] on network failure or a non-success
    /// HTTP status.
    pub fn fetch(&self, url: &str) -> Result<String> {
        let response = reqwest::blocking::get(url)?.error_for_status()?;
        Ok(response.text()?)
    }

    /// Fetches the bibliography for one group and year, reusing the cached
    /// copy at `<cache_dir>/hal_<group>_<year>.xml` when present.
    ///
    /// `force_refresh` ignores the cache and overwrites it with a fresh
    /// download.
    pub fn fetch_cached(
        &self,
        group: &str,
        year: i32,
        cache_dir: &Path,
        force_refresh: bool,
    ) -> Result<String> {
        let path = cache_dir.join(format!("hal_{}_{}.xml", group, year));
        if path.exists() && !force_refresh {
            info!(path = %path.display(), "using cached bibliography");
            return Ok(fs::read_to_string(&path)?);
        }

        let url = self.query_url(group, year);
        info!(%url, "querying HAL");
        let body = self.fetch(&url)?;

        fs::create_dir_all(cache_dir)?;
        fs::write(&path, &body)?;
        Ok(body)
    }
}
