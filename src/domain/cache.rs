//! Cache metadata recovered from query execution logs.
//!
//! Read procedures may be served from a secondary cache tier. The engine
//! reports this out of band as JSON fragments inside the free-form execution
//! log. Extraction is best effort: lines that are not JSON are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{EthAddress, StreamId};

/// Per-query cache information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub cache_hit: bool,
    pub cache_disabled: bool,
    /// Block height at which the cached data was produced.
    pub cache_height: Option<i64>,
    pub rows_served: usize,
    pub stream_id: Option<StreamId>,
    pub data_provider: Option<EthAddress>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub frozen_at: Option<i64>,
}

impl CacheMetadata {
    /// Parse cache fields out of execution log lines.
    ///
    /// Lines not starting with `{` or `[` are skipped, as are lines that fail
    /// to decode. Recognised keys from later lines overwrite earlier ones.
    pub fn from_logs<I, S>(logs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut meta = Self::default();
        for line in logs {
            let line = line.as_ref().trim_start();
            if !(line.starts_with('{') || line.starts_with('[')) {
                continue;
            }
            let Ok(value) = serde_json::from_str::<Value>(line) else {
                continue;
            };
            match value {
                Value::Object(map) => meta.merge(&map),
                Value::Array(items) => {
                    for item in items {
                        if let Value::Object(map) = item {
                            meta.merge(&map);
                        }
                    }
                }
                _ => {}
            }
        }
        meta
    }

    fn merge(&mut self, map: &Map<String, Value>) {
        if let Some(hit) = map.get("cache_hit").and_then(Value::as_bool) {
            self.cache_hit = hit;
        }
        if let Some(disabled) = map.get("cache_disabled").and_then(Value::as_bool) {
            self.cache_disabled = disabled;
        }
        if let Some(height) = map.get("cache_height").and_then(json_i64) {
            self.cache_height = Some(height);
        }
    }

    /// Blocks elapsed since the cached data was produced, if known.
    #[must_use]
    pub fn data_age(&self, current_height: i64) -> Option<i64> {
        self.cache_height
            .map(|h| current_height.saturating_sub(h).max(0))
    }

    /// Whether cached data is older than `max_age_blocks`.
    ///
    /// Results not served from cache are never stale. A hit without a
    /// reported height is treated as stale.
    #[must_use]
    pub fn is_stale(&self, current_height: i64, max_age_blocks: i64) -> bool {
        if !self.cache_hit {
            return false;
        }
        self.data_age(current_height)
            .map_or(true, |age| age > max_age_blocks)
    }
}

// Heights may arrive as floats (`1000.0`) from some encoders. Values outside
// the i64 range are skipped.
fn json_i64(value: &Value) -> Option<i64> {
    if value.is_u64() {
        return value.as_i64();
    }
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Summary over many queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheAggregate {
    pub total_queries: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// `cache_hits / total_queries`, or 0 with no queries.
    pub cache_hit_rate: f64,
    pub total_rows_served: usize,
}

/// Aggregate cache metadata over a batch of queries.
#[must_use]
pub fn aggregate_cache_metadata(entries: &[CacheMetadata]) -> CacheAggregate {
    let total_queries = entries.len();
    let cache_hits = entries.iter().filter(|m| m.cache_hit).count();
    let total_rows_served = entries.iter().map(|m| m.rows_served).sum();
    let cache_hit_rate = if total_queries == 0 {
        0.0
    } else {
        cache_hits as f64 / total_queries as f64
    };

    CacheAggregate {
        total_queries,
        cache_hits,
        cache_misses: total_queries - cache_hits,
        cache_hit_rate,
        total_rows_served,
    }
}
