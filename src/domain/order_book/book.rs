//! Order book read models decoded from query rows.

use serde::Serialize;

use super::bridge::Bridge;
use super::input::CancelOrderInput;
use super::price::BookPosition;
use crate::domain::id::{EthAddress, QueryHash};
use crate::domain::result::{DecodeError, Row};

fn decode_position(row: &Row<'_>, column: &str) -> Result<BookPosition, DecodeError> {
    let wire = row.i64(column)?;
    let wire = i32::try_from(wire).map_err(|_| row.error(column, format!("{wire} out of range")))?;
    BookPosition::from_wire(wire).map_err(|e| row.error(column, e.constraint()))
}

/// A resting order or holding on one outcome of a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookEntry {
    pub wallet: EthAddress,
    pub outcome: bool,
    pub position: BookPosition,
    pub amount: i64,
    /// Unix timestamp of the last change, used for time priority.
    pub last_updated: i64,
}

impl OrderBookEntry {
    /// Decode from a `get_order_book` row. The outcome is not a column; it
    /// is the outcome the book was requested for.
    pub fn from_row(row: &Row<'_>, outcome: bool) -> Result<Self, DecodeError> {
        let wallet = EthAddress::parse(row.str("wallet_address")?)
            .map_err(|e| row.error("wallet_address", e.constraint()))?;
        Ok(Self {
            wallet,
            outcome,
            position: decode_position(row, "price")?,
            amount: row.i64("amount")?,
            last_updated: row.i64("last_updated")?,
        })
    }

    /// Whether `cancel` would remove this entry.
    #[must_use]
    pub fn is_cancelled_by(&self, cancel: &CancelOrderInput) -> bool {
        cancel.targets(self.outcome, self.position)
    }
}

/// A caller's position in a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPosition {
    pub query_id: i64,
    pub outcome: bool,
    pub position: BookPosition,
    pub amount: i64,
}

impl UserPosition {
    pub fn from_row(row: &Row<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            query_id: row.i64("query_id")?,
            outcome: row.bool("outcome")?,
            position: decode_position(row, "price")?,
            amount: row.i64("amount")?,
        })
    }
}

/// Market metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketInfo {
    pub id: i64,
    #[serde(skip)]
    pub hash: QueryHash,
    pub bridge: Bridge,
    pub settle_time: i64,
    pub settled: bool,
    pub winning_outcome: Option<bool>,
    pub max_spread: i32,
    pub min_order_size: i64,
    pub created_at: i64,
}

impl MarketInfo {
    pub fn from_row(row: &Row<'_>) -> Result<Self, DecodeError> {
        let hash = QueryHash::from_slice(&row.bytes("hash")?)
            .map_err(|e| row.error("hash", e.constraint()))?;
        let bridge = Bridge::parse(row.str("bridge")?).map_err(|e| row.error("bridge", e.constraint()))?;
        let max_spread = row.i64("max_spread")?;
        let winning_outcome = if row.is_null("winning_outcome")? {
            None
        } else {
            Some(row.bool("winning_outcome")?)
        };
        Ok(Self {
            id: row.i64("id")?,
            hash,
            bridge,
            settle_time: row.i64("settle_time")?,
            settled: row.bool("settled")?,
            winning_outcome,
            max_spread: i32::try_from(max_spread)
                .map_err(|_| row.error("max_spread", format!("{max_spread} out of range")))?,
            min_order_size: row.i64("min_order_size")?,
            created_at: row.i64("created_at")?,
        })
    }
}
