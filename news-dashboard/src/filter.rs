use crate::types::{
    parse_timestamp, Article, Category, FilterCriteria, SortCriteria, SortDirection, SortField,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;

/// Filtered and ordered view over `articles`. Pure; callers may re-run it on every change.
pub fn view<'a>(
    articles: &'a [Article],
    filters: &FilterCriteria,
    sort: &SortCriteria,
) -> Vec<&'a Article> {
    let filtered: Vec<&Article> = articles
        .iter()
        .filter(|article| matches(article, filters))
        .collect();

    debug!("{} of {} articles pass the filters", filtered.len(), articles.len());

    match sort.field {
        Some(field) => sort_articles(filtered, field, sort.direction),
        None => filtered,
    }
}

/// All active predicates, AND-combined.
pub fn matches(article: &Article, filters: &FilterCriteria) -> bool {
    matches_author(article, &filters.author)
        && matches_category(article, &filters.category)
        && matches_dates(article, filters)
}

fn matches_author(article: &Article, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    article
        .author
        .as_deref()
        .map(|author| author.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

fn matches_category(article: &Article, category: &Category) -> bool {
    match category {
        Category::All => true,
        Category::Keyword(keyword) => article
            .content
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(&keyword.to_lowercase()),
    }
}

// An unparsable publish date fails any active bound.
fn matches_dates(article: &Article, filters: &FilterCriteria) -> bool {
    if !filters.has_date_bounds() {
        return true;
    }
    let Some(published) = parse_timestamp(&article.published_at) else {
        return false;
    };
    filters.start.map_or(true, |start| published >= start)
        && filters.end.map_or(true, |end| published <= end)
}

// Vec::sort_by is stable, so equal keys keep their filtered order.
fn sort_articles(
    articles: Vec<&Article>,
    field: SortField,
    direction: SortDirection,
) -> Vec<&Article> {
    match field {
        SortField::PublishedAt => sort_keyed(
            articles,
            |article| parse_timestamp(&article.published_at),
            |a, b| compare_instants(a, b, direction),
        ),
        SortField::Title => sort_keyed(
            articles,
            |article| article.title.to_lowercase(),
            |a: &String, b: &String| direction.apply(a.cmp(b)),
        ),
        SortField::Author => sort_keyed(
            articles,
            |article| article.author.as_deref().unwrap_or("").to_lowercase(),
            |a: &String, b: &String| direction.apply(a.cmp(b)),
        ),
    }
}

fn sort_keyed<'a, K>(
    articles: Vec<&'a Article>,
    key: impl Fn(&Article) -> K,
    compare: impl Fn(&K, &K) -> Ordering,
) -> Vec<&'a Article> {
    let mut keyed: Vec<(K, &Article)> = articles
        .into_iter()
        .map(|article| (key(article), article))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare(a, b));
    keyed.into_iter().map(|(_, article)| article).collect()
}

// Unparsable dates go last whichever the direction.
fn compare_instants(
    a: &Option<DateTime<Utc>>,
    b: &Option<DateTime<Utc>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(b)),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
