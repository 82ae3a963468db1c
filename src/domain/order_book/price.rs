//! Limit prices and the signed wire encoding.
//!
//! On the wire a single signed integer carries both side and price: negative
//! is a bid (buy), positive an ask (sell), and `0` marks a holding rather than
//! an order. Inside the crate prices are an explicit side plus a magnitude in
//! cents; conversion happens only when reading or writing wire values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{ValidationError, ValidationResult};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bid: pays up to the price for outcome shares.
    Buy,
    /// Ask: sells held shares at no less than the price.
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A validated limit price: side plus magnitude in `1..=99` cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LimitPrice {
    side: Side,
    cents: u8,
}

impl LimitPrice {
    pub const MIN_CENTS: u8 = 1;
    pub const MAX_CENTS: u8 = 99;

    /// Build a price, checking the magnitude.
    pub fn new(side: Side, cents: u8) -> ValidationResult<Self> {
        if !(Self::MIN_CENTS..=Self::MAX_CENTS).contains(&cents) {
            return Err(ValidationError::new(
                "price",
                format!(
                    "magnitude must be between {} and {}, got {cents}",
                    Self::MIN_CENTS,
                    Self::MAX_CENTS
                ),
            ));
        }
        Ok(Self { side, cents })
    }

    pub fn bid(cents: u8) -> ValidationResult<Self> {
        Self::new(Side::Buy, cents)
    }

    pub fn ask(cents: u8) -> ValidationResult<Self> {
        Self::new(Side::Sell, cents)
    }

    /// Decode a signed wire price, attributing failures to `field`.
    pub fn from_wire(field: &'static str, price: i32) -> ValidationResult<Self> {
        if price == 0 {
            return Err(ValidationError::new(
                field,
                "must not be 0 (reserved for holdings)",
            ));
        }
        let side = if price < 0 { Side::Buy } else { Side::Sell };
        let magnitude = price.unsigned_abs();
        if magnitude > u32::from(Self::MAX_CENTS) {
            return Err(ValidationError::new(
                field,
                format!(
                    "magnitude must be between {} and {}, got {magnitude}",
                    Self::MIN_CENTS,
                    Self::MAX_CENTS
                ),
            ));
        }
        // magnitude is within 1..=99 here
        Ok(Self {
            side,
            cents: magnitude as u8,
        })
    }

    /// Decode a wire price that must be on `side`.
    pub fn from_wire_on(field: &'static str, price: i32, side: Side) -> ValidationResult<Self> {
        let parsed = Self::from_wire(field, price)?;
        if parsed.side != side {
            let range = match side {
                Side::Buy => "-99..=-1",
                Side::Sell => "1..=99",
            };
            return Err(ValidationError::new(
                field,
                format!("{side} price must be in {range}, got {price}"),
            ));
        }
        Ok(parsed)
    }

    /// Signed wire form: negative for bids, positive for asks.
    #[must_use]
    pub fn to_wire(self) -> i32 {
        let cents = i32::from(self.cents);
        match self.side {
            Side::Buy => -cents,
            Side::Sell => cents,
        }
    }

    #[must_use]
    pub const fn side(self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn cents(self) -> u8 {
        self.cents
    }
}

impl fmt::Display for LimitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}c", self.side, self.cents)
    }
}

/// What a row on the book represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookPosition {
    /// Shares held, not offered.
    Holding,
    /// A resting order.
    Order(LimitPrice),
}

impl BookPosition {
    /// Decode a wire price where `0` denotes a holding.
    pub fn from_wire(price: i32) -> ValidationResult<Self> {
        if price == 0 {
            return Ok(Self::Holding);
        }
        LimitPrice::from_wire("price", price).map(Self::Order)
    }

    #[must_use]
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Holding => 0,
            Self::Order(p) => p.to_wire(),
        }
    }

    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Holding => None,
            Self::Order(p) => Some(p.side()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_selects_side() {
        assert_eq!(LimitPrice::from_wire("price", -50).unwrap(), LimitPrice::bid(50).unwrap());
        assert_eq!(LimitPrice::from_wire("price", 50).unwrap(), LimitPrice::ask(50).unwrap());
    }

    #[test]
    fn zero_is_reserved() {
        let err = LimitPrice::from_wire("price", 0).unwrap_err();
        assert!(err.constraint().contains("holdings"));
        assert_eq!(BookPosition::from_wire(0).unwrap(), BookPosition::Holding);
    }

    #[test]
    fn magnitude_bounds() {
        assert!(LimitPrice::from_wire("price", 99).is_ok());
        assert!(LimitPrice::from_wire("price", -99).is_ok());
        assert!(LimitPrice::from_wire("price", 100).is_err());
        assert!(LimitPrice::from_wire("price", -100).is_err());
        assert!(LimitPrice::from_wire("price", i32::MIN).is_err());
        assert!(LimitPrice::new(Side::Buy, 0).is_err());
    }

    #[test]
    fn wire_round_trip_keeps_sign() {
        let bid = LimitPrice::bid(1).unwrap();
        assert_eq!(bid.to_wire(), -1);
        let ask = LimitPrice::ask(99).unwrap();
        assert_eq!(ask.to_wire(), 99);
    }

    #[test]
    fn side_constrained_decode() {
        assert!(LimitPrice::from_wire_on("old_price", -10, Side::Buy).is_ok());
        let err = LimitPrice::from_wire_on("old_price", 10, Side::Buy).unwrap_err();
        assert_eq!(err.field(), "old_price");
    }
}
