#![allow(dead_code)]

use news_dashboard::{Article, ArticleSource, ArticleSourceRef};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn article(title: &str, author: Option<&str>, published_at: &str, content: Option<&str>) -> Article {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    Article {
        title: title.to_string(),
        author: author.map(str::to_string),
        source: ArticleSourceRef {
            id: None,
            name: "Test Wire".to_string(),
        },
        published_at: published_at.to_string(),
        url: format!("https://news.example.com/{slug}"),
        content: content.map(str::to_string),
    }
}

pub fn titles<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<&'a str> {
    articles.into_iter().map(|a| a.title.as_str()).collect()
}

/// Hands out queued responses in order, optionally after a delay.
pub struct MockSource {
    responses: Mutex<VecDeque<anyhow::Result<Vec<Article>>>>,
    delay_ms: u64,
}

impl MockSource {
    pub fn new(responses: Vec<anyhow::Result<Vec<Article>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

impl ArticleSource for MockSource {
    async fn fetch_articles(&self) -> anyhow::Result<Vec<Article>> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no more mock responses")))
    }
}
