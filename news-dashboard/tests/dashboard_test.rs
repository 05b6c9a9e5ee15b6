mod common;

use common::{article, init_tracing, titles, MockSource};
use interfaces::{KeyValueStore, MemoryStore};
use news_dashboard::settings::{AUTHOR_RATES_KEY, DEFAULT_RATE_KEY};
use news_dashboard::{
    require_admin, Article, Category, DashboardError, NewsDashboard, Result, Role, SortDirection,
    SortField,
};
use tracing::info;

fn first_batch() -> Vec<Article> {
    vec![
        article("Jane one", Some("Jane"), "2024-01-02T10:00:00Z", Some("tech")),
        article("Jane two", Some("Jane"), "2024-01-02T11:00:00Z", Some("business")),
        article("Jane three", Some("Jane"), "2024-01-03T09:00:00Z", None),
        article("Jane four", Some(" Jane "), "2024-01-04T09:00:00Z", Some("a blog post")),
        article("Anon one", None, "2024-01-01T09:00:00Z", None),
        article("Anon two", Some(""), "2024-01-01T10:00:00Z", Some("startup")),
        article("Anon three", Some("   "), "garbage", None),
    ]
}

#[tokio::test]
async fn test_refresh_populates_store_and_deduplicates_urls() -> Result<()> {
    init_tracing();
    let mut batch = first_batch();
    batch.push(batch[0].clone());
    let source = MockSource::new(vec![Ok(batch)]);
    let mut dashboard = NewsDashboard::init(source, MemoryStore::new()).await?;
    assert!(dashboard.articles().is_empty());

    let count = dashboard.refresh().await?;

    assert_eq!(count, 7);
    assert_eq!(dashboard.articles().len(), 7);
    assert!(dashboard.last_error().is_none());
    assert_eq!(dashboard.store().unparsable_dates().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_keeps_last_known_good_articles() -> Result<()> {
    init_tracing();
    let source = MockSource::new(vec![
        Ok(first_batch()),
        Err(anyhow::anyhow!("connection reset")),
    ]);
    let mut dashboard = NewsDashboard::init(source, MemoryStore::new()).await?;
    dashboard.refresh().await?;

    let result = dashboard.refresh().await;

    match result {
        Err(DashboardError::FetchFailed(message)) => assert!(message.contains("connection reset")),
        other => panic!("expected FetchFailed, got {other:?}"),
    }
    assert_eq!(dashboard.articles().len(), 7);
    assert_eq!(dashboard.last_error(), Some("connection reset"));
    Ok(())
}

#[tokio::test]
async fn test_cancelled_refresh_leaves_store_untouched() -> Result<()> {
    init_tracing();
    let source = MockSource::new(vec![Ok(first_batch())]).with_delay(500);
    let mut dashboard = NewsDashboard::init(source, MemoryStore::new()).await?;

    let result = dashboard.refresh_until(async {}).await;

    assert!(matches!(result, Err(DashboardError::Cancelled)));
    assert!(dashboard.articles().is_empty());
    assert!(dashboard.last_error().is_none());
    Ok(())
}

#[tokio::test]
async fn test_filters_and_sort_drive_visible_articles() -> Result<()> {
    init_tracing();
    let source = MockSource::new(vec![Ok(first_batch())]);
    let mut dashboard = NewsDashboard::init(source, MemoryStore::new()).await?;
    dashboard.refresh().await?;

    let newest_first = dashboard.visible_articles();
    assert_eq!(newest_first.first().map(|a| a.title.as_str()), Some("Jane four"));
    assert_eq!(newest_first.last().map(|a| a.title.as_str()), Some("Anon three"));

    dashboard.set_author_filter("jane");
    dashboard.set_sort_field(Some(SortField::Title));
    dashboard.set_sort_direction(SortDirection::Asc);
    assert_eq!(
        titles(dashboard.visible_articles()),
        vec!["Jane four", "Jane one", "Jane three", "Jane two"]
    );

    dashboard.set_category_filter(Category::parse("business"));
    assert_eq!(titles(dashboard.visible_articles()), vec!["Jane two"]);

    dashboard.set_sort_field(None);
    dashboard.set_category_filter(Category::All);
    dashboard.set_author_filter("");
    dashboard.set_start_date(news_dashboard::parse_date_bound("2024-01-02")?);
    dashboard.set_end_date(news_dashboard::parse_date_bound("2024-01-03")?);
    assert_eq!(titles(dashboard.visible_articles()), vec!["Jane one", "Jane two"]);
    Ok(())
}

#[tokio::test]
async fn test_payouts_are_admin_only() -> Result<()> {
    init_tracing();
    let source = MockSource::new(vec![Ok(first_batch())]);
    let mut dashboard = NewsDashboard::init(source, MemoryStore::new()).await?;
    dashboard.refresh().await?;

    for role in [None, Some(Role::User)] {
        assert!(matches!(require_admin(role), Err(DashboardError::AccessDenied)));
        assert!(matches!(dashboard.payout_report(role), Err(DashboardError::AccessDenied)));
        assert!(matches!(dashboard.export_csv(role), Err(DashboardError::AccessDenied)));
        assert!(matches!(
            dashboard.update_rate(role, "Jane", 25.0).await,
            Err(DashboardError::AccessDenied)
        ));
        assert!(matches!(
            dashboard.set_default_rate(role, 1.0).await,
            Err(DashboardError::AccessDenied)
        ));
        assert_eq!(dashboard.estimated_payout(role), None);
    }
    assert_eq!(dashboard.rates().rate_for("Jane"), 20.0);

    let report = dashboard.payout_report(Some(Role::Admin))?;
    info!("Payout report: {:?}", report);
    assert_eq!(report.total, 140.0);
    assert_eq!(dashboard.estimated_payout(Some(Role::Admin)), Some(140.0));
    Ok(())
}

#[tokio::test]
async fn test_admin_rate_updates_are_persisted_and_rehydrated() -> Result<()> {
    init_tracing();
    let source = MockSource::new(vec![Ok(first_batch()), Ok(first_batch())]);
    let mut dashboard = NewsDashboard::init(source, MemoryStore::new()).await?;
    dashboard.refresh().await?;
    let admin = Some(Role::Admin);

    dashboard.update_rate(admin, "Jane", 25.0).await?;

    let report = dashboard.payout_report(admin)?;
    assert_eq!(report.total, 4.0 * 25.0 + 3.0 * 20.0);
    let jane = report.lines.iter().find(|line| line.author == "Jane").unwrap();
    assert_eq!(jane.amount, 100.0);

    let csv = dashboard.export_csv(admin)?;
    assert!(csv.contains("Jane,4,25.00,100.00\n"));
    assert!(csv.contains("Unknown,3,20.00,60.00\n"));

    let (source, settings) = dashboard.into_parts();
    let mut rehydrated = NewsDashboard::init(source, settings).await?;
    rehydrated.refresh().await?;
    assert_eq!(rehydrated.rates().rate_for("Jane"), 25.0);
    assert_eq!(rehydrated.payout_report(admin)?.total, 160.0);
    Ok(())
}

#[tokio::test]
async fn test_rejected_rate_is_never_stored() -> anyhow::Result<()> {
    init_tracing();
    let source = MockSource::new(vec![]);
    let mut dashboard = NewsDashboard::init(source, MemoryStore::new()).await?;
    let admin = Some(Role::Admin);

    let result = dashboard.update_rate(admin, "Jane", f64::NAN).await;
    assert!(matches!(result, Err(DashboardError::InvalidRateInput { .. })));
    let result = dashboard.set_default_rate(admin, -4.0).await;
    assert!(matches!(result, Err(DashboardError::InvalidRateInput { .. })));

    assert_eq!(dashboard.rates().override_for("Jane"), None);
    assert_eq!(dashboard.rates().default_rate(), 20.0);

    let (_, settings) = dashboard.into_parts();
    assert_eq!(settings.get(AUTHOR_RATES_KEY).await?, None);
    assert_eq!(settings.get(DEFAULT_RATE_KEY).await?, None);
    Ok(())
}
