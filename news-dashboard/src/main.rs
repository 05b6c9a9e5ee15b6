use anyhow::Context;
use clap::{Parser, Subcommand};
use interfaces::SqliteStore;
use news_dashboard::analytics::TOP_AUTHOR_LIMIT;
use news_dashboard::{
    export, parse_date_bound, parse_rate, Category, FetchConfig, FilterCriteria, NewsApiFetcher,
    NewsDashboard, Role, SortCriteria,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "News dashboard: articles, author analytics and payouts", long_about = None)]
struct Cli {
    /// News API endpoint
    #[arg(long, env = "NEWS_API_ENDPOINT", default_value = "https://newsapi.org/v2/everything")]
    endpoint: String,

    #[arg(long, env = "NEWS_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "NEWS_API_QUERY", default_value = "pakistan")]
    query: String,

    /// SQLite file holding persisted rates
    #[arg(long, env = "DASHBOARD_SETTINGS_DB", default_value = "dashboard.db")]
    settings_db: PathBuf,

    /// Role supplied by the login collaborator: admin or user
    #[arg(long, env = "DASHBOARD_ROLE")]
    role: Option<Role>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List articles after filtering and sorting
    Articles {
        #[arg(long, default_value = "")]
        author: String,
        /// "all" or a keyword looked up in the article content
        #[arg(long, default_value = "all")]
        category: String,
        /// Inclusive lower bound, YYYY-MM-DD or RFC 3339
        #[arg(long, default_value = "")]
        from: String,
        /// Inclusive upper bound, YYYY-MM-DD or RFC 3339
        #[arg(long, default_value = "")]
        to: String,
        /// publishedAt, title or author
        #[arg(long, default_value = "publishedAt")]
        sort: String,
        /// asc or desc
        #[arg(long, default_value = "desc")]
        direction: String,
    },
    /// Overview, top authors, type distribution and daily counts
    Analytics {
        #[arg(long, default_value_t = TOP_AUTHOR_LIMIT)]
        top: usize,
    },
    /// Per-author payouts (admin only)
    Payouts {
        /// Also write the table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Override the per-article rate for one author (admin only)
    SetRate { author: String, rate: String },
    /// Change the default per-article rate (admin only)
    SetDefaultRate { rate: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    info!("Starting news dashboard");

    let fetch_config = FetchConfig {
        endpoint: cli.endpoint.clone(),
        api_key: cli.api_key.clone(),
        query: cli.query.clone(),
        ..FetchConfig::default()
    };
    if fetch_config.api_key.is_empty() {
        warn!("No API key configured; set NEWS_API_KEY or pass --api-key");
    }

    let fetcher = NewsApiFetcher::new(fetch_config)?;
    let settings = SqliteStore::open(&cli.settings_db).await?;
    let mut dashboard = NewsDashboard::init(fetcher, settings).await?;

    match cli.command {
        Command::Articles {
            author,
            category,
            from,
            to,
            sort,
            direction,
        } => {
            dashboard.set_filters(FilterCriteria {
                author,
                category: Category::parse(&category),
                start: parse_date_bound(&from)?,
                end: parse_date_bound(&to)?,
            });
            let sort = SortCriteria::parse(&sort, &direction);
            if sort.field.is_none() {
                warn!("Unrecognized sort field, keeping fetch order");
            }
            dashboard.set_sort_field(sort.field);
            dashboard.set_sort_direction(sort.direction);

            refresh(&mut dashboard).await?;
            let visible = dashboard.visible_articles();
            for article in &visible {
                println!(
                    "{} | {} | {} | {}\n    {}",
                    article.published_at,
                    article.author.as_deref().unwrap_or("N/A"),
                    article.source_name(),
                    article.title,
                    article.url
                );
            }
            println!("{} of {} articles", visible.len(), dashboard.articles().len());
        }
        Command::Analytics { top } => {
            refresh(&mut dashboard).await?;
            let report = dashboard.analytics(top);
            let overview = report.overview;
            println!("Total articles: {}", overview.total_articles);
            println!("Unique authors: {}", overview.unique_authors);
            println!("News / blog: {} / {}", overview.news_articles, overview.blog_articles);
            if let Some(total) = dashboard.estimated_payout(cli.role) {
                println!("Estimated payouts: ${:.2}", total);
            }

            println!("\nTop authors:");
            for author in &report.top_authors {
                println!("  {:<30} {}", author.name, author.article_count);
            }
            println!("\nArticle types:");
            for (category, count) in report.type_distribution.buckets() {
                println!("  {:<30} {}", category, count);
            }
            println!("\nArticles per day:");
            for (date, count) in &report.daily_counts {
                println!("  {}  {}", date, count);
            }
        }
        Command::Payouts { csv } => {
            refresh(&mut dashboard).await?;
            let report = dashboard.payout_report(cli.role)?;
            println!("{:<30} {:>8} {:>10} {:>12}", "Author", "Articles", "Rate", "Payout");
            for line in &report.lines {
                println!(
                    "{:<30} {:>8} {:>10.2} {:>12.2}",
                    line.author, line.article_count, line.rate, line.amount
                );
            }
            println!("Total payout: ${:.2}", report.total);

            if let Some(path) = csv {
                export::write_csv(&path, &report.lines)
                    .with_context(|| format!("failed to export {}", path.display()))?;
            }
        }
        Command::SetRate { author, rate } => {
            let rate = parse_rate(&rate)?;
            dashboard.update_rate(cli.role, &author, rate).await?;
            println!("Rate for {} is now {:.2}", author, dashboard.rates().rate_for(&author));
        }
        Command::SetDefaultRate { rate } => {
            let rate = parse_rate(&rate)?;
            dashboard.set_default_rate(cli.role, rate).await?;
            println!("Default rate is now {:.2}", dashboard.rates().default_rate());
        }
    }

    let (_, settings) = dashboard.into_parts();
    settings.close().await;
    info!("News dashboard finished");
    Ok(())
}

async fn refresh(dashboard: &mut NewsDashboard<NewsApiFetcher, SqliteStore>) -> anyhow::Result<()> {
    match dashboard.refresh().await {
        Ok(count) => {
            info!("Loaded {} articles", count);
            Ok(())
        }
        Err(e) => {
            error!("Could not load articles: {}", e);
            Err(e.into())
        }
    }
}
