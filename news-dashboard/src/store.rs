use crate::types::{published_at, Article, DashboardError, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Last-known-good article list plus the message of the most recent failed fetch.
#[derive(Debug, Default)]
pub struct ArticleStore {
    articles: Vec<Article>,
    last_error: Option<String>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Terminal transition for one fetch. Success replaces the contents; failure
    /// keeps them and is handed back as `FetchFailed`.
    pub fn apply_fetch(&mut self, result: anyhow::Result<Vec<Article>>) -> Result<usize> {
        match result {
            Ok(articles) => {
                self.articles = deduplicate_by_url(articles);
                self.last_error = None;
                info!("Article store now holds {} articles", self.articles.len());
                Ok(self.articles.len())
            }
            Err(e) => {
                let message = format!("{e:#}");
                warn!("Fetch failed, keeping {} previous articles: {}", self.articles.len(), message);
                self.last_error = Some(message.clone());
                Err(DashboardError::FetchFailed(message))
            }
        }
    }

    /// Every article whose publish date cannot be parsed.
    pub fn unparsable_dates(&self) -> Vec<DashboardError> {
        self.articles
            .iter()
            .filter_map(|article| published_at(article).err())
            .collect()
    }
}

fn deduplicate_by_url(articles: Vec<Article>) -> Vec<Article> {
    let total = articles.len();
    let mut seen_urls = HashSet::new();
    let mut unique = Vec::with_capacity(total);

    for article in articles {
        if seen_urls.insert(article.url.clone()) {
            unique.push(article);
        } else {
            debug!("Removing duplicate article: {} ({})", article.title, article.url);
        }
    }

    let removed = total - unique.len();
    if removed > 0 {
        info!("Removed {} duplicate articles", removed);
    }
    unique
}
