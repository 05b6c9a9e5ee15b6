use crate::analytics::{self, AnalyticsReport};
use crate::export;
use crate::filter;
use crate::payout::{self, PayoutReport};
use crate::rates::RateTable;
use crate::settings;
use crate::store::ArticleStore;
use crate::types::{
    Article, ArticleSource, AuthorAggregate, Category, DashboardError, FilterCriteria,
    KeyValueStore, Result, Role, SortCriteria, SortDirection, SortField,
};
use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::{info, warn};

/// Payout figures and rate editing are for admins only.
pub fn require_admin(role: Option<Role>) -> Result<()> {
    match role {
        Some(role) if role.is_admin() => Ok(()),
        _ => {
            warn!("Refusing payout access for role {:?}", role);
            Err(DashboardError::AccessDenied)
        }
    }
}

/// Application state, built once by the entry point and passed around by reference.
pub struct NewsDashboard<S, K> {
    source: S,
    settings: K,
    store: ArticleStore,
    rates: RateTable,
    filters: FilterCriteria,
    sort: SortCriteria,
}

impl<S: ArticleSource, K: KeyValueStore> NewsDashboard<S, K> {
    /// Hydrates the rate table from `settings`. Does not fetch.
    pub async fn init(source: S, settings: K) -> Result<Self> {
        let rates = settings::load_rate_table(&settings).await?;
        Ok(Self {
            source,
            settings,
            store: ArticleStore::new(),
            rates,
            filters: FilterCriteria::default(),
            sort: SortCriteria::default(),
        })
    }

    pub async fn refresh(&mut self) -> Result<usize> {
        let result = self.source.fetch_articles().await;
        self.store.apply_fetch(result)
    }

    /// Like `refresh`, but if `cancel` completes first the fetched result is
    /// dropped and the store is left as it was.
    pub async fn refresh_until<F>(&mut self, cancel: F) -> Result<usize>
    where
        F: Future<Output = ()>,
    {
        let result = tokio::select! {
            result = self.source.fetch_articles() => result,
            _ = cancel => {
                info!("Article refresh cancelled");
                return Err(DashboardError::Cancelled);
            }
        };
        self.store.apply_fetch(result)
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub fn articles(&self) -> &[Article] {
        self.store.articles()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.store.last_error()
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn sort(&self) -> &SortCriteria {
        &self.sort
    }

    pub fn set_filters(&mut self, filters: FilterCriteria) {
        self.filters = filters;
    }

    pub fn set_author_filter(&mut self, author: &str) {
        self.filters.author = author.to_string();
    }

    pub fn set_category_filter(&mut self, category: Category) {
        self.filters.category = category;
    }

    pub fn set_start_date(&mut self, start: Option<DateTime<Utc>>) {
        self.filters.start = start;
    }

    pub fn set_end_date(&mut self, end: Option<DateTime<Utc>>) {
        self.filters.end = end;
    }

    pub fn set_sort_field(&mut self, field: Option<SortField>) {
        self.sort.field = field;
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort.direction = direction;
    }

    pub fn visible_articles(&self) -> Vec<&Article> {
        filter::view(self.store.articles(), &self.filters, &self.sort)
    }

    pub fn author_stats(&self) -> Vec<AuthorAggregate> {
        analytics::author_stats(self.store.articles())
    }

    pub fn analytics(&self, top_n: usize) -> AnalyticsReport {
        analytics::analytics_report(self.store.articles(), top_n)
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// `None` for anyone who is not an admin.
    pub fn estimated_payout(&self, role: Option<Role>) -> Option<f64> {
        role.filter(|role| role.is_admin())
            .map(|_| payout::total_payout(&self.author_stats(), &self.rates))
    }

    pub fn payout_report(&self, role: Option<Role>) -> Result<PayoutReport> {
        require_admin(role)?;
        Ok(payout::payout_report(&self.author_stats(), &self.rates))
    }

    pub fn export_csv(&self, role: Option<Role>) -> Result<String> {
        let report = self.payout_report(role)?;
        Ok(export::to_csv(&report.lines))
    }

    /// Validated, persisted, then applied. A rejected rate or a failed write
    /// leaves the visible table unchanged.
    pub async fn update_rate(&mut self, role: Option<Role>, author: &str, rate: f64) -> Result<()> {
        require_admin(role)?;
        let mut next = self.rates.clone();
        next.update_rate(author, rate)?;
        self.commit_rates(next).await
    }

    pub async fn set_default_rate(&mut self, role: Option<Role>, rate: f64) -> Result<()> {
        require_admin(role)?;
        let mut next = self.rates.clone();
        next.set_default_rate(rate)?;
        self.commit_rates(next).await
    }

    async fn commit_rates(&mut self, next: RateTable) -> Result<()> {
        settings::save_rate_table(&self.settings, &next).await?;
        self.rates = next;
        Ok(())
    }

    pub fn into_parts(self) -> (S, K) {
        (self.source, self.settings)
    }
}
