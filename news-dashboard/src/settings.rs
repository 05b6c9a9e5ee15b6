use crate::rates::{validate_rate, RateTable, FALLBACK_RATE};
use crate::types::{DashboardError, KeyValueStore, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const DEFAULT_RATE_KEY: &str = "articleRate";
pub const AUTHOR_RATES_KEY: &str = "authorRates";

// Persisted shape: { "<author>": { "articleRate": 25 } }
#[derive(Debug, Serialize, Deserialize)]
struct AuthorRateEntry {
    #[serde(rename = "articleRate")]
    article_rate: Option<f64>,
}

/// Hydrate a rate table. Missing or corrupt values fall back instead of failing startup.
pub async fn load_rate_table<K: KeyValueStore>(store: &K) -> Result<RateTable> {
    let default_rate = match read(store, DEFAULT_RATE_KEY).await? {
        Some(raw) => match raw.trim().parse::<f64>().ok().and_then(|r| validate_rate(r).ok()) {
            Some(rate) => rate,
            None => {
                warn!("Ignoring persisted default rate {:?}, using {}", raw, FALLBACK_RATE);
                FALLBACK_RATE
            }
        },
        None => FALLBACK_RATE,
    };

    let mut table = RateTable::new(default_rate)?;

    if let Some(raw) = read(store, AUTHOR_RATES_KEY).await? {
        match serde_json::from_str::<BTreeMap<String, AuthorRateEntry>>(&raw) {
            Ok(entries) => {
                for (author, entry) in entries {
                    let applied = entry
                        .article_rate
                        .map(|rate| table.update_rate(&author, rate).is_ok())
                        .unwrap_or(false);
                    if !applied {
                        warn!("Skipping persisted rate for {}: {:?}", author, entry.article_rate);
                    }
                }
            }
            Err(e) => warn!("Ignoring corrupt author rates: {}", e),
        }
    }

    info!(
        "Loaded rate table: default {:.2}, {} overrides",
        table.default_rate(),
        table.overrides().len()
    );
    Ok(table)
}

pub async fn save_rate_table<K: KeyValueStore>(store: &K, table: &RateTable) -> Result<()> {
    let entries: BTreeMap<&str, AuthorRateEntry> = table
        .overrides()
        .iter()
        .map(|(author, rate)| {
            (
                author.as_str(),
                AuthorRateEntry {
                    article_rate: Some(*rate),
                },
            )
        })
        .collect();

    write(store, DEFAULT_RATE_KEY, &table.default_rate().to_string()).await?;
    write(store, AUTHOR_RATES_KEY, &serde_json::to_string(&entries)?).await?;
    debug!("Persisted rate table with {} overrides", entries.len());
    Ok(())
}

async fn read<K: KeyValueStore>(store: &K, key: &str) -> Result<Option<String>> {
    store
        .get(key)
        .await
        .map_err(|e| DashboardError::Storage(format!("{e:#}")))
}

async fn write<K: KeyValueStore>(store: &K, key: &str, value: &str) -> Result<()> {
    store
        .set(key, value)
        .await
        .map_err(|e| DashboardError::Storage(format!("{e:#}")))
}
