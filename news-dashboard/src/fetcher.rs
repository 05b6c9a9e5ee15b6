use crate::types::{Article, ArticleSource, DashboardError, FetchConfig, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use url::Url;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the news API `everything` endpoint. One request per call, no retry.
pub struct NewsApiFetcher {
    client: Client,
    config: FetchConfig,
}

impl NewsApiFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn request_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint)?;
        url.query_pairs_mut()
            .append_pair("q", &self.config.query)
            .append_pair("apiKey", &self.config.api_key);
        Ok(url)
    }

    pub async fn fetch(&self) -> Result<Vec<Article>> {
        let start_time = Instant::now();
        let url = self.request_url()?;
        debug!("Fetching articles for query {:?} from {}", self.config.query, self.config.endpoint);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let articles = parse_response(status, &body)?;

        info!(
            "Fetched {} articles in {}ms",
            articles.len(),
            start_time.elapsed().as_millis()
        );
        Ok(articles)
    }
}

/// Maps one HTTP exchange to articles. A non-2xx status or an API-level
/// `status != "ok"` is `FetchFailed`; an unreadable 2xx body is `Serialization`.
pub fn parse_response(status: StatusCode, body: &str) -> Result<Vec<Article>> {
    let parsed: Option<NewsApiResponse> = serde_json::from_str(body).ok();

    if !status.is_success() {
        let detail = parsed
            .and_then(|r| r.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
        error!("News API answered HTTP {}: {}", status, detail);
        return Err(DashboardError::FetchFailed(format!("HTTP {}: {}", status, detail)));
    }

    let parsed = match parsed {
        Some(parsed) => parsed,
        None => serde_json::from_str::<NewsApiResponse>(body)?,
    };

    if parsed.status != "ok" {
        let message = format!(
            "{}: {}",
            parsed.code.as_deref().unwrap_or("error"),
            parsed.message.as_deref().unwrap_or("no message")
        );
        error!("News API reported an error: {}", message);
        return Err(DashboardError::FetchFailed(message));
    }

    debug!(
        "Decoded {} articles ({} total results)",
        parsed.articles.len(),
        parsed.total_results.unwrap_or(0)
    );
    Ok(parsed.articles)
}

impl ArticleSource for NewsApiFetcher {
    async fn fetch_articles(&self) -> anyhow::Result<Vec<Article>> {
        Ok(self.fetch().await?)
    }
}
