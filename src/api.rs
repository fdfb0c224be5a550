use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;

use crate::state::{CatalogEntry, DetailRecord, StatRow};

pub const CATALOG_URL: &str = "https://pokeapi.co/api/v2/pokemon";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    name: String,
    #[serde(default)]
    sprites: serde_json::Value,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

/// Waits `delay_ms` before polling `load`. Cancelling the task during the wait skips the load.
pub async fn deferred<T>(delay_ms: u64, load: impl Future<Output = T>) -> T {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    load.await
}

pub async fn fetch_catalog(url: &str) -> Result<Vec<CatalogEntry>, FetchError> {
    let bytes = fetch_bytes(url).await?;
    parse_catalog(&bytes)
}

pub async fn fetch_detail(url: &str) -> Result<DetailRecord, FetchError> {
    let bytes = fetch_bytes(url).await?;
    parse_detail(&bytes)
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let response = http_client().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    Ok(response.bytes().await?.to_vec())
}

/// Parses the list endpoint, keeping server order.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<CatalogEntry>, FetchError> {
    let response: ListResponse = serde_json::from_slice(bytes)?;
    Ok(response
        .results
        .into_iter()
        .map(|item| CatalogEntry {
            name: item.name,
            detail_url: item.url,
        })
        .collect())
}

/// Projects a detail response down to name, front image and stats.
pub fn parse_detail(bytes: &[u8]) -> Result<DetailRecord, FetchError> {
    let response: PokemonResponse = serde_json::from_slice(bytes)?;
    let stats = response
        .stats
        .into_iter()
        .enumerate()
        .map(|(key, slot)| StatRow {
            key,
            stat_name: slot.stat.name,
            base_value: slot.base_stat,
        })
        .collect();

    Ok(DetailRecord {
        image_url: pointer_string(&response.sprites, "/front_default"),
        name: response.name,
        stats,
    })
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
