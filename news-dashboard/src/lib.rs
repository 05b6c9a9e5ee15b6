pub mod types;
pub mod store;
pub mod rates;
pub mod filter;
pub mod analytics;
pub mod payout;
pub mod settings;
pub mod fetcher;
pub mod export;
pub mod dashboard;

pub use types::*;
pub use store::ArticleStore;
pub use rates::{parse_rate, RateTable, FALLBACK_RATE};
pub use filter::view;
pub use analytics::{author_stats, daily_counts, top_authors, type_distribution, AnalyticsReport, TypeDistribution};
pub use payout::{payout, payout_lines, rate_for, total_payout, PayoutReport};
pub use fetcher::{parse_response, NewsApiFetcher};
pub use export::{parse_csv, to_csv, PayoutRecord};
pub use dashboard::{require_admin, NewsDashboard};
