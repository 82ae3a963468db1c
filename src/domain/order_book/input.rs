//! Order book inputs and their offline validation.
//!
//! Inputs mirror the engine's procedures and carry signed wire prices. Each
//! `validate()` runs without I/O and reports the first offending field. Typed
//! constructors build inputs from [`LimitPrice`] so callers never have to
//! think about the sign convention.

use chrono::Utc;

use super::bridge::Bridge;
use super::price::{BookPosition, LimitPrice, Side};
use crate::domain::error::{ensure_positive, ensure_range, ValidationError, ValidationResult};
use crate::domain::id::{EthAddress, QueryHash};
use crate::marshal_args;

/// Upper bound on any order amount.
pub const MAX_ORDER_AMOUNT: i64 = 1_000_000_000;
/// Inclusive bounds on a market's maximum spread, in cents.
pub const MIN_SPREAD: i32 = 1;
pub const MAX_SPREAD: i32 = 50;

fn validate_query_id(query_id: i64) -> ValidationResult {
    if query_id < 1 {
        return Err(ValidationError::new(
            "query_id",
            format!("must be at least 1, got {query_id}"),
        ));
    }
    Ok(())
}

fn validate_amount(field: &'static str, amount: i64) -> ValidationResult {
    ensure_positive(field, amount)?;
    if amount > MAX_ORDER_AMOUNT {
        return Err(ValidationError::new(
            field,
            format!("must not exceed {MAX_ORDER_AMOUNT}, got {amount}"),
        ));
    }
    Ok(())
}

/// Create a binary market on a data query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMarketInput {
    /// Settlement bridge name; see [`Bridge`].
    pub bridge: String,
    /// ABI-encoded query components identifying the settled query.
    pub query_components: Vec<u8>,
    /// Unix timestamp (seconds) after which the market may settle.
    pub settle_time: i64,
    pub max_spread: i32,
    pub min_order_size: i64,
}

marshal_args!(CreateMarketInput {
    required bridge,
    required query_components,
    required settle_time,
    required max_spread,
    required min_order_size,
});

impl CreateMarketInput {
    /// Validate against the current wall clock.
    pub fn validate(&self) -> ValidationResult {
        self.validate_at(Utc::now().timestamp())
    }

    /// Validate with `now` as the reference time for `settle_time`.
    pub fn validate_at(&self, now: i64) -> ValidationResult {
        Bridge::parse(&self.bridge)?;
        if self.query_components.is_empty() {
            return Err(ValidationError::new(
                "query_components",
                "must not be empty",
            ));
        }
        if self.settle_time <= now {
            return Err(ValidationError::new(
                "settle_time",
                format!("must be in the future (now {now}), got {}", self.settle_time),
            ));
        }
        ensure_range("max_spread", self.max_spread, MIN_SPREAD, MAX_SPREAD)?;
        validate_amount("min_order_size", self.min_order_size)
    }
}

/// Place a bid. `price` is the signed wire price and must be in `-99..=-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceBuyOrderInput {
    pub query_id: i64,
    pub outcome: bool,
    pub price: i32,
    pub amount: i64,
}

marshal_args!(PlaceBuyOrderInput {
    literal query_id,
    literal outcome,
    literal price,
    literal amount,
});

impl PlaceBuyOrderInput {
    /// Build from a typed price. Fails if `price` is not a bid.
    pub fn new(query_id: i64, outcome: bool, price: LimitPrice, amount: i64) -> ValidationResult<Self> {
        let input = Self {
            query_id,
            outcome,
            price: price.to_wire(),
            amount,
        };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> ValidationResult {
        self.limit_price().map(|_| ())
    }

    /// Validate and return the typed price.
    pub fn limit_price(&self) -> ValidationResult<LimitPrice> {
        validate_query_id(self.query_id)?;
        let price = LimitPrice::from_wire_on("price", self.price, Side::Buy)?;
        validate_amount("amount", self.amount)?;
        Ok(price)
    }
}

/// Place an ask. `price` is the signed wire price and must be in `1..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceSellOrderInput {
    pub query_id: i64,
    pub outcome: bool,
    pub price: i32,
    pub amount: i64,
}

marshal_args!(PlaceSellOrderInput {
    literal query_id,
    literal outcome,
    literal price,
    literal amount,
});

impl PlaceSellOrderInput {
    /// Build from a typed price. Fails if `price` is not an ask.
    pub fn new(query_id: i64, outcome: bool, price: LimitPrice, amount: i64) -> ValidationResult<Self> {
        let input = Self {
            query_id,
            outcome,
            price: price.to_wire(),
            amount,
        };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> ValidationResult {
        self.limit_price().map(|_| ())
    }

    pub fn limit_price(&self) -> ValidationResult<LimitPrice> {
        validate_query_id(self.query_id)?;
        let price = LimitPrice::from_wire_on("price", self.price, Side::Sell)?;
        validate_amount("amount", self.amount)?;
        Ok(price)
    }
}

/// Mint a YES/NO pair and offer the NO side at `100 - true_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceSplitLimitOrderInput {
    pub query_id: i64,
    /// YES price in cents, `1..=99`.
    pub true_price: i32,
    pub amount: i64,
}

marshal_args!(PlaceSplitLimitOrderInput {
    literal query_id,
    literal true_price,
    literal amount,
});

impl PlaceSplitLimitOrderInput {
    pub fn validate(&self) -> ValidationResult {
        validate_query_id(self.query_id)?;
        ensure_range(
            "true_price",
            self.true_price,
            i32::from(LimitPrice::MIN_CENTS),
            i32::from(LimitPrice::MAX_CENTS),
        )?;
        validate_amount("amount", self.amount)
    }

    /// Price at which the NO leg is offered.
    #[must_use]
    pub const fn false_price(&self) -> i32 {
        100_i32.saturating_sub(self.true_price)
    }
}

/// Cancel a resting order identified by outcome and signed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelOrderInput {
    pub query_id: i64,
    pub outcome: bool,
    pub price: i32,
}

marshal_args!(CancelOrderInput {
    literal query_id,
    literal outcome,
    literal price,
});

impl CancelOrderInput {
    #[must_use]
    pub fn new(query_id: i64, outcome: bool, price: LimitPrice) -> Self {
        Self {
            query_id,
            outcome,
            price: price.to_wire(),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        self.limit_price().map(|_| ())
    }

    pub fn limit_price(&self) -> ValidationResult<LimitPrice> {
        validate_query_id(self.query_id)?;
        LimitPrice::from_wire("price", self.price)
    }

    /// Whether this cancel targets an order resting at `position` on
    /// `outcome`. Side and magnitude must both match; holdings never match.
    #[must_use]
    pub fn targets(&self, outcome: bool, position: BookPosition) -> bool {
        match (self.limit_price(), position) {
            (Ok(price), BookPosition::Order(resting)) => outcome == self.outcome && price == resting,
            _ => false,
        }
    }
}

/// Shared rules for amending a resting order on one side.
fn validate_change(
    query_id: i64,
    old_price: i32,
    new_price: i32,
    new_amount: i64,
    side: Side,
) -> ValidationResult<(LimitPrice, LimitPrice)> {
    validate_query_id(query_id)?;
    let old = LimitPrice::from_wire_on("old_price", old_price, side)?;
    let new = LimitPrice::from_wire_on("new_price", new_price, side)?;
    if old == new {
        return Err(ValidationError::new(
            "new_price",
            format!("must differ from old_price ({old_price})"),
        ));
    }
    validate_amount("new_amount", new_amount)?;
    Ok((old, new))
}

/// Move a bid to a new price and amount. Both prices in `-99..=-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeBidInput {
    pub query_id: i64,
    pub outcome: bool,
    pub old_price: i32,
    pub new_price: i32,
    pub new_amount: i64,
}

marshal_args!(ChangeBidInput {
    literal query_id,
    literal outcome,
    literal old_price,
    literal new_price,
    literal new_amount,
});

impl ChangeBidInput {
    pub fn validate(&self) -> ValidationResult {
        validate_change(
            self.query_id,
            self.old_price,
            self.new_price,
            self.new_amount,
            Side::Buy,
        )
        .map(|_| ())
    }
}

/// Move an ask to a new price and amount. Both prices in `1..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeAskInput {
    pub query_id: i64,
    pub outcome: bool,
    pub old_price: i32,
    pub new_price: i32,
    pub new_amount: i64,
}

marshal_args!(ChangeAskInput {
    literal query_id,
    literal outcome,
    literal old_price,
    literal new_price,
    literal new_amount,
});

impl ChangeAskInput {
    pub fn validate(&self) -> ValidationResult {
        validate_change(
            self.query_id,
            self.old_price,
            self.new_price,
            self.new_amount,
            Side::Sell,
        )
        .map(|_| ())
    }
}

/// Settle a market once its settle time has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleMarketInput {
    pub query_id: i64,
}

marshal_args!(SettleMarketInput { literal query_id });

impl SettleMarketInput {
    pub fn validate(&self) -> ValidationResult {
        validate_query_id(self.query_id)
    }
}

/// Look up a market by the hash of its query components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMarketByHashInput {
    pub query_hash: Vec<u8>,
}

marshal_args!(GetMarketByHashInput { required query_hash });

impl GetMarketByHashInput {
    pub fn validate(&self) -> ValidationResult {
        QueryHash::from_slice(&self.query_hash).map(|_| ())
    }
}

/// Market metadata by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetMarketInfoInput {
    pub query_id: i64,
}

marshal_args!(GetMarketInfoInput { literal query_id });

impl GetMarketInfoInput {
    pub fn validate(&self) -> ValidationResult {
        validate_query_id(self.query_id)
    }
}

/// Resting orders and holdings for one outcome of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOrderBookInput {
    pub query_id: i64,
    pub outcome: bool,
}

marshal_args!(GetOrderBookInput {
    literal query_id,
    literal outcome,
});

impl GetOrderBookInput {
    pub fn validate(&self) -> ValidationResult {
        validate_query_id(self.query_id)
    }
}

/// Positions held by a wallet, across all markets or in one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserPositionsInput {
    pub wallet: EthAddress,
    /// `0` lists positions in every market.
    pub query_id: i64,
}

marshal_args!(GetUserPositionsInput {
    required wallet,
    optional query_id,
});

impl GetUserPositionsInput {
    pub fn validate(&self) -> ValidationResult {
        if self.query_id < 0 {
            return Err(ValidationError::new(
                "query_id",
                format!("must not be negative, got {}", self.query_id),
            ));
        }
        Ok(())
    }
}

/// Page through markets, optionally filtering by settlement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListMarketsInput {
    /// `None` lists all markets.
    pub settled: Option<bool>,
    /// `0` uses the engine default.
    pub limit: i64,
    pub offset: i64,
}

marshal_args!(ListMarketsInput {
    literal settled,
    optional limit,
    literal offset,
});

impl ListMarketsInput {
    pub const MAX_LIMIT: i64 = 100;

    pub fn validate(&self) -> ValidationResult {
        ensure_range("limit", self.limit, 0, Self::MAX_LIMIT)?;
        if self.offset < 0 {
            return Err(ValidationError::new(
                "offset",
                format!("must not be negative, got {}", self.offset),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::args::MarshalArgs;
    use crate::domain::value::ArgValue;

    const NOW: i64 = 1_700_000_000;

    fn market() -> CreateMarketInput {
        CreateMarketInput {
            bridge: "hoodi_tt2".into(),
            query_components: vec![0u8; 128],
            settle_time: NOW + 3600,
            max_spread: 5,
            min_order_size: 100,
        }
    }

    #[test]
    fn create_market_accepts_valid_input() {
        assert!(market().validate_at(NOW).is_ok());
    }

    #[test]
    fn create_market_rejects_past_settle_time() {
        let input = CreateMarketInput {
            settle_time: NOW - 3600,
            ..market()
        };
        let err = input.validate_at(NOW).unwrap_err();
        assert_eq!(err.field(), "settle_time");
        assert!(err.to_string().contains("settle_time"));
    }

    #[test]
    fn create_market_settle_time_now_is_not_future() {
        let input = CreateMarketInput {
            settle_time: NOW,
            ..market()
        };
        assert!(input.validate_at(NOW).is_err());
    }

    #[test]
    fn create_market_field_rules() {
        let cases: Vec<(CreateMarketInput, &str)> = vec![
            (CreateMarketInput { bridge: "unknown".into(), ..market() }, "bridge"),
            (CreateMarketInput { query_components: vec![], ..market() }, "query_components"),
            (CreateMarketInput { max_spread: 0, ..market() }, "max_spread"),
            (CreateMarketInput { max_spread: 51, ..market() }, "max_spread"),
            (CreateMarketInput { min_order_size: 0, ..market() }, "min_order_size"),
        ];
        for (input, field) in cases {
            assert_eq!(input.validate_at(NOW).unwrap_err().field(), field);
        }
        assert!(CreateMarketInput { max_spread: 50, ..market() }.validate_at(NOW).is_ok());
        assert!(CreateMarketInput { max_spread: 1, ..market() }.validate_at(NOW).is_ok());
    }

    #[test]
    fn buy_requires_negative_price() {
        let order = |price| PlaceBuyOrderInput {
            query_id: 1,
            outcome: true,
            price,
            amount: 10,
        };
        assert!(order(-1).validate().is_ok());
        assert!(order(-99).validate().is_ok());
        assert!(order(0).validate().is_err());
        assert!(order(50).validate().is_err());
        assert!(order(-100).validate().is_err());
    }

    #[test]
    fn sell_requires_positive_price() {
        let order = |price| PlaceSellOrderInput {
            query_id: 1,
            outcome: false,
            price,
            amount: 10,
        };
        assert!(order(1).validate().is_ok());
        assert!(order(99).validate().is_ok());
        assert!(order(-50).validate().is_err());
        assert!(order(0).validate().is_err());
    }

    #[test]
    fn amount_bounds() {
        let order = |amount| PlaceSellOrderInput {
            query_id: 1,
            outcome: true,
            price: 10,
            amount,
        };
        assert!(order(MAX_ORDER_AMOUNT).validate().is_ok());
        assert_eq!(order(MAX_ORDER_AMOUNT + 1).validate().unwrap_err().field(), "amount");
        assert_eq!(order(0).validate().unwrap_err().field(), "amount");
    }

    #[test]
    fn query_id_must_be_positive() {
        let err = SettleMarketInput { query_id: 0 }.validate().unwrap_err();
        assert_eq!(err.field(), "query_id");
    }

    #[test]
    fn typed_constructor_checks_side() {
        let bid = LimitPrice::bid(40).unwrap();
        assert_eq!(PlaceBuyOrderInput::new(3, true, bid, 5).unwrap().price, -40);
        assert!(PlaceSellOrderInput::new(3, true, bid, 5).is_err());
    }

    #[test]
    fn change_bid_rules() {
        let change = |old_price, new_price| ChangeBidInput {
            query_id: 1,
            outcome: true,
            old_price,
            new_price,
            new_amount: 10,
        };
        assert!(change(-50, -40).validate().is_ok());
        assert_eq!(change(-50, -50).validate().unwrap_err().field(), "new_price");
        assert_eq!(change(50, -40).validate().unwrap_err().field(), "old_price");
        assert_eq!(change(-50, 40).validate().unwrap_err().field(), "new_price");
    }

    #[test]
    fn change_ask_rules() {
        let change = |old_price, new_price| ChangeAskInput {
            query_id: 1,
            outcome: false,
            old_price,
            new_price,
            new_amount: 10,
        };
        assert!(change(60, 55).validate().is_ok());
        assert!(change(60, 60).validate().is_err());
        assert!(change(-60, 55).validate().is_err());
        assert!(change(60, 0).validate().is_err());
    }

    #[test]
    fn split_limit_price_range() {
        let split = |true_price| PlaceSplitLimitOrderInput {
            query_id: 1,
            true_price,
            amount: 10,
        };
        assert!(split(1).validate().is_ok());
        assert_eq!(split(60).false_price(), 40);
        assert_eq!(split(0).validate().unwrap_err().field(), "true_price");
        assert!(split(100).validate().is_err());
        assert!(split(-5).validate().is_err());
    }

    #[test]
    fn false_price_of_unvalidated_input_does_not_overflow() {
        let split = |true_price| PlaceSplitLimitOrderInput {
            query_id: 1,
            true_price,
            amount: 10,
        };
        assert_eq!(split(i32::MIN).false_price(), i32::MAX);
        assert_eq!(split(i32::MAX).false_price(), 100 - i32::MAX);
    }

    #[test]
    fn cancel_matches_same_side_only() {
        let bid = BookPosition::Order(LimitPrice::bid(50).unwrap());
        let cancel_bid = CancelOrderInput {
            query_id: 1,
            outcome: true,
            price: -50,
        };
        let cancel_ask = CancelOrderInput { price: 50, ..cancel_bid };
        assert!(cancel_bid.targets(true, bid));
        assert!(!cancel_ask.targets(true, bid));
        assert!(!cancel_bid.targets(false, bid));
        assert!(!cancel_bid.targets(true, BookPosition::Holding));
    }

    #[test]
    fn market_hash_must_be_32_bytes() {
        assert!(GetMarketByHashInput { query_hash: vec![1; 32] }.validate().is_ok());
        let err = GetMarketByHashInput { query_hash: vec![1; 20] }.validate().unwrap_err();
        assert_eq!(err.field(), "query_hash");
    }

    #[test]
    fn order_args_keep_false_outcome() {
        let args = PlaceBuyOrderInput {
            query_id: 7,
            outcome: false,
            price: -25,
            amount: 3,
        }
        .marshal_args()
        .unwrap();
        assert_eq!(
            args,
            vec![
                ArgValue::int(7),
                ArgValue::bool(false),
                ArgValue::int(-25),
                ArgValue::int(3)
            ]
        );
    }

    #[test]
    fn list_markets_args() {
        let args = ListMarketsInput {
            settled: Some(false),
            limit: 0,
            offset: 0,
        }
        .marshal_args()
        .unwrap();
        assert_eq!(args, vec![ArgValue::bool(false), ArgValue::Null, ArgValue::int(0)]);

        let args = ListMarketsInput::default().marshal_args().unwrap();
        assert_eq!(args[0], ArgValue::Null);
    }
}
