use crate::types::{parse_timestamp, Article, AuthorAggregate, UNKNOWN_AUTHOR};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Category keywords in match priority order. Content text doubles as a
/// category signal here; this is a containment heuristic, not a classifier.
pub const CATEGORY_KEYWORDS: [&str; 5] = ["business", "tech", "startup", "india", "international"];
pub const OTHER_CATEGORY: &str = "other";
pub const BLOG_KEYWORD: &str = "blog";
pub const TOP_AUTHOR_LIMIT: usize = 5;

/// Trimmed author name, or `"Unknown"` when absent or blank.
pub fn normalize_author(author: Option<&str>) -> &str {
    match author.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => UNKNOWN_AUTHOR,
    }
}

/// One aggregate per normalized author, in order of first appearance.
pub fn author_stats(articles: &[Article]) -> Vec<AuthorAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<AuthorAggregate> = Vec::new();

    for article in articles {
        let name = normalize_author(article.author.as_deref());
        match index.get(name).copied() {
            Some(position) => stats[position].article_count += 1,
            None => {
                index.insert(name, stats.len());
                stats.push(AuthorAggregate {
                    name: name.to_string(),
                    article_count: 1,
                });
            }
        }
    }

    stats
}

/// Highest counts first; ties keep their incoming order.
pub fn top_authors(aggregates: &[AuthorAggregate], n: usize) -> Vec<AuthorAggregate> {
    let mut ranked = aggregates.to_vec();
    ranked.sort_by(|a, b| b.article_count.cmp(&a.article_count));
    ranked.truncate(n);
    ranked
}

/// First keyword (in list order) contained in the lowercased content, else `"other"`.
pub fn classify(content: Option<&str>) -> &'static str {
    let content = content.unwrap_or("").to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|keyword| content.contains(*keyword))
        .copied()
        .unwrap_or(OTHER_CATEGORY)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeDistribution {
    buckets: Vec<(&'static str, usize)>,
}

impl TypeDistribution {
    fn increment(&mut self, category: &'static str) {
        match self.buckets.iter_mut().find(|(name, _)| *name == category) {
            Some((_, count)) => *count += 1,
            None => self.buckets.push((category, 1)),
        }
    }

    pub fn get(&self, category: &str) -> usize {
        self.buckets
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Non-empty buckets in order of first appearance.
    pub fn buckets(&self) -> &[(&'static str, usize)] {
        &self.buckets
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, count)| count).sum()
    }
}

pub fn type_distribution(articles: &[Article]) -> TypeDistribution {
    let mut distribution = TypeDistribution::default();
    for article in articles {
        distribution.increment(classify(article.content.as_deref()));
    }
    distribution
}

/// Articles per UTC calendar day, ascending. Articles without a parsable date are skipped.
pub fn daily_counts(articles: &[Article]) -> Vec<(NaiveDate, usize)> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for article in articles {
        match parse_timestamp(&article.published_at) {
            Some(published) => *days.entry(published.date_naive()).or_insert(0) += 1,
            None => debug!(
                "Skipping {} in daily counts: unparsable date {:?}",
                article.url, article.published_at
            ),
        }
    }

    days.into_iter().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_articles: usize,
    pub unique_authors: usize,
    pub blog_articles: usize,
    pub news_articles: usize,
}

pub fn overview(articles: &[Article]) -> Overview {
    let blog_articles = articles
        .iter()
        .filter(|article| {
            article
                .content
                .as_deref()
                .map(|content| content.to_lowercase().contains(BLOG_KEYWORD))
                .unwrap_or(false)
        })
        .count();

    Overview {
        total_articles: articles.len(),
        unique_authors: author_stats(articles).len(),
        blog_articles,
        news_articles: articles.len() - blog_articles,
    }
}

/// Everything the analytics screen renders, computed from the full article list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub overview: Overview,
    pub top_authors: Vec<AuthorAggregate>,
    pub type_distribution: TypeDistribution,
    pub daily_counts: Vec<(NaiveDate, usize)>,
}

pub fn analytics_report(articles: &[Article], top_n: usize) -> AnalyticsReport {
    AnalyticsReport {
        overview: overview(articles),
        top_authors: top_authors(&author_stats(articles), top_n),
        type_distribution: type_distribution(articles),
        daily_counts: daily_counts(articles),
    }
}
