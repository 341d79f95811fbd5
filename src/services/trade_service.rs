use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use crate::db;
use crate::errors::AppError;
use crate::models::{
    CreateHolding, CreateTrade, ExecuteTrade, PortfolioHolding, Trade, TradeExecution, TradeType,
    UpdateHolding,
};
use crate::services::profile_service;

/// Decimal places for currency amounts (balance, total value, profit).
pub const CURRENCY_SCALE: i64 = 2;
/// Decimal places for crypto quantities and unit prices.
pub const QUANTITY_SCALE: i64 = 8;
const MAX_SYMBOL_LEN: usize = 10;

pub(crate) fn normalize_symbol(raw: &str) -> Result<String, AppError> {
    let symbol = raw.trim().to_lowercase();
    if symbol.is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(AppError::Validation(format!(
            "Symbol cannot be longer than {} characters",
            MAX_SYMBOL_LEN
        )));
    }
    Ok(symbol)
}

// NUMERIC(18, 8) columns hold magnitudes below 10^10, NUMERIC(18, 2) below 10^16.
fn quantity_limit() -> BigDecimal {
    BigDecimal::from(10_000_000_000i64)
}

fn currency_limit() -> BigDecimal {
    BigDecimal::from(10_000_000_000_000_000i64)
}

fn check_column(field: &str, value: &BigDecimal, scale: i64, limit: BigDecimal) -> Result<(), AppError> {
    if value.round(scale) != *value {
        return Err(AppError::Validation(format!(
            "{} cannot have more than {} decimal places",
            field, scale
        )));
    }
    if value.abs() >= limit {
        return Err(AppError::Validation(format!("{} must be below {}", field, limit)));
    }
    Ok(())
}

/// Quantities and unit prices must be storable without rounding.
pub(crate) fn check_quantity(field: &str, value: &BigDecimal) -> Result<(), AppError> {
    check_column(field, value, QUANTITY_SCALE, quantity_limit())
}

pub(crate) fn check_currency(field: &str, value: &BigDecimal) -> Result<(), AppError> {
    check_column(field, value, CURRENCY_SCALE, currency_limit())
}

fn validate_amounts(quantity: &BigDecimal, price_per_unit: &BigDecimal) -> Result<(), AppError> {
    let zero = BigDecimal::from(0);
    if *quantity <= zero {
        return Err(AppError::Validation("Quantity must be > 0".into()));
    }
    if *price_per_unit < zero {
        return Err(AppError::Validation("Price per unit cannot be negative".into()));
    }
    check_quantity("Quantity", quantity)?;
    check_quantity("Price per unit", price_per_unit)?;
    Ok(())
}

pub(crate) fn total_value(quantity: &BigDecimal, price_per_unit: &BigDecimal) -> BigDecimal {
    (quantity * price_per_unit).round(CURRENCY_SCALE)
}

pub(crate) fn weighted_average_price(
    held_quantity: &BigDecimal,
    held_average: &BigDecimal,
    bought_quantity: &BigDecimal,
    bought_price: &BigDecimal,
) -> BigDecimal {
    let cost = held_quantity * held_average + bought_quantity * bought_price;
    let quantity = held_quantity + bought_quantity;
    (cost / quantity).round(QUANTITY_SCALE)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HoldingChange {
    Open { quantity: BigDecimal, average_buy_price: BigDecimal },
    Increase { id: Uuid, quantity: BigDecimal, average_buy_price: BigDecimal },
    Reduce { id: Uuid, quantity: BigDecimal },
    Close { id: Uuid },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TradePlan {
    pub total_value: BigDecimal,
    pub virtual_funds: BigDecimal,
    pub realized_profit: BigDecimal,
    pub holding: HoldingChange,
}

/// Works out the effect of a paper trade without touching storage.
pub(crate) fn plan_trade(
    virtual_funds: &BigDecimal,
    holding: Option<&PortfolioHolding>,
    input: &ExecuteTrade,
) -> Result<TradePlan, AppError> {
    validate_amounts(&input.quantity, &input.price_per_unit)?;
    let total = total_value(&input.quantity, &input.price_per_unit);
    check_currency("Total value", &total)?;

    match input.trade_type {
        TradeType::Buy => {
            if total > *virtual_funds {
                return Err(AppError::InsufficientFunds(format!(
                    "Trade costs {} but only {} is available",
                    total, virtual_funds
                )));
            }
            if let Some(h) = holding {
                check_quantity("Resulting holding quantity", &(&h.quantity + &input.quantity))?;
            }
            let holding = match holding {
                None => HoldingChange::Open {
                    quantity: input.quantity.clone(),
                    average_buy_price: input.price_per_unit.round(QUANTITY_SCALE),
                },
                Some(h) => HoldingChange::Increase {
                    id: h.id,
                    quantity: &h.quantity + &input.quantity,
                    average_buy_price: weighted_average_price(
                        &h.quantity,
                        &h.average_buy_price,
                        &input.quantity,
                        &input.price_per_unit,
                    ),
                },
            };
            Ok(TradePlan {
                virtual_funds: virtual_funds - &total,
                total_value: total,
                realized_profit: BigDecimal::from(0),
                holding,
            })
        }
        TradeType::Sell => {
            let Some(h) = holding.filter(|h| h.quantity >= input.quantity) else {
                let held = holding.map(|h| h.quantity.clone()).unwrap_or_else(|| BigDecimal::from(0));
                return Err(AppError::InsufficientHoldings(format!(
                    "Cannot sell {} {}; holding {}",
                    input.quantity, input.crypto_symbol, held
                )));
            };
            let realized_profit =
                ((&input.price_per_unit - &h.average_buy_price) * &input.quantity).round(CURRENCY_SCALE);
            let remaining = &h.quantity - &input.quantity;
            let holding = if remaining == BigDecimal::from(0) {
                HoldingChange::Close { id: h.id }
            } else {
                HoldingChange::Reduce { id: h.id, quantity: remaining }
            };
            let virtual_funds = virtual_funds + &total;
            check_currency("Resulting balance", &virtual_funds)?;
            Ok(TradePlan {
                virtual_funds,
                total_value: total,
                realized_profit,
                holding,
            })
        }
    }
}

/// Appends a trade row exactly as given. Balance and holdings are untouched.
pub async fn record(pool: &PgPool, profile_id: Uuid, mut input: CreateTrade) -> Result<Trade, AppError> {
    input.crypto_symbol = normalize_symbol(&input.crypto_symbol)?;
    validate_amounts(&input.quantity, &input.price_per_unit)?;
    check_currency("Total value", &input.total_value)?;
    profile_service::ensure_exists(pool, profile_id).await?;
    Ok(db::trade_queries::insert(pool, profile_id, input).await?)
}

/// Executes a paper trade atomically: balance, holding, trade log and profile stats.
pub async fn execute(pool: &PgPool, profile_id: Uuid, mut input: ExecuteTrade) -> Result<TradeExecution, AppError> {
    input.crypto_symbol = normalize_symbol(&input.crypto_symbol)?;

    let mut tx = pool.begin().await?;
    let profile = db::profile_queries::fetch_for_update(&mut *tx, profile_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", profile_id)))?;
    let holding =
        db::holding_queries::fetch_by_profile_and_symbol(&mut *tx, profile_id, &input.crypto_symbol).await?;

    let plan = plan_trade(&profile.virtual_funds, holding.as_ref(), &input).map_err(|e| {
        warn!("Rejected {:?} of {} for profile {}: {}", input.trade_type, input.crypto_symbol, profile_id, e);
        e
    })?;

    let holding = match plan.holding.clone() {
        HoldingChange::Open { quantity, average_buy_price } => {
            let created = db::holding_queries::insert(
                &mut *tx,
                profile_id,
                CreateHolding {
                    crypto_symbol: input.crypto_symbol.clone(),
                    quantity,
                    average_buy_price,
                },
            )
            .await?;
            Some(created)
        }
        HoldingChange::Increase { id, quantity, average_buy_price } => {
            db::holding_queries::update(&mut *tx, id, UpdateHolding { quantity, average_buy_price }).await?
        }
        HoldingChange::Reduce { id, quantity } => {
            Some(db::holding_queries::set_quantity(&mut *tx, id, &quantity).await?)
        }
        HoldingChange::Close { id } => {
            db::holding_queries::delete(&mut *tx, id).await?;
            None
        }
    };

    let trade = db::trade_queries::insert(
        &mut *tx,
        profile_id,
        CreateTrade {
            crypto_symbol: input.crypto_symbol.clone(),
            trade_type: input.trade_type,
            quantity: input.quantity.clone(),
            price_per_unit: input.price_per_unit.clone(),
            total_value: plan.total_value.clone(),
            quest_id: input.quest_id,
        },
    )
    .await?;

    let profile =
        db::profile_queries::apply_trade(&mut *tx, profile_id, &plan.virtual_funds, &plan.realized_profit).await?;
    tx.commit().await?;

    info!(
        "Executed {:?} {} {} @ {} for profile {} (total {})",
        trade.trade_type, trade.quantity, trade.crypto_symbol, trade.price_per_unit, profile_id, trade.total_value
    );

    Ok(TradeExecution {
        trade,
        virtual_funds: profile.virtual_funds,
        realized_profit: plan.realized_profit,
        holding,
    })
}

pub async fn list(pool: &PgPool, profile_id: Uuid) -> Result<Vec<Trade>, AppError> {
    profile_service::ensure_exists(pool, profile_id).await?;
    Ok(db::trade_queries::fetch_by_profile(pool, profile_id).await?)
}

pub async fn list_for_quest(pool: &PgPool, quest_id: Uuid) -> Result<Vec<Trade>, AppError> {
    Ok(db::trade_queries::fetch_by_quest(pool, quest_id).await?)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Trade, AppError> {
    db::trade_queries::fetch_one(pool, id).await?
        .ok_or_else(|| AppError::NotFound(format!("Trade {} not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn order(trade_type: TradeType, quantity: &str, price: &str) -> ExecuteTrade {
        ExecuteTrade {
            crypto_symbol: "btc".to_string(),
            trade_type,
            quantity: dec(quantity),
            price_per_unit: dec(price),
            quest_id: None,
        }
    }

    fn holding(quantity: &str, average: &str) -> PortfolioHolding {
        PortfolioHolding {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            crypto_symbol: "btc".to_string(),
            quantity: dec(quantity),
            average_buy_price: dec(average),
        }
    }

    #[test]
    fn test_total_value_rounds_to_cents() {
        assert_eq!(total_value(&dec("1.5"), &dec("100.00")), dec("150.00"));
        assert_eq!(total_value(&dec("0.3"), &dec("33333.33")), dec("10000.00"));
        assert_eq!(total_value(&dec("0.01"), &dec("67012.34")), dec("670.12"));
    }

    #[test]
    fn test_buy_opens_holding_and_debits_funds() {
        let plan = plan_trade(&dec("10000"), None, &order(TradeType::Buy, "0.5", "2000")).unwrap();

        assert_eq!(plan.total_value, dec("1000"));
        assert_eq!(plan.virtual_funds, dec("9000"));
        assert_eq!(plan.realized_profit, dec("0"));
        assert_eq!(
            plan.holding,
            HoldingChange::Open { quantity: dec("0.5"), average_buy_price: dec("2000") }
        );
    }

    #[test]
    fn test_second_buy_uses_weighted_average() {
        let existing = holding("1", "100");
        let plan = plan_trade(&dec("10000"), Some(&existing), &order(TradeType::Buy, "3", "200")).unwrap();

        match plan.holding {
            HoldingChange::Increase { id, quantity, average_buy_price } => {
                assert_eq!(id, existing.id);
                assert_eq!(quantity, dec("4"));
                assert_eq!(average_buy_price, dec("175"));
            }
            other => panic!("expected Increase, got {:?}", other),
        }
        assert_eq!(plan.virtual_funds, dec("9400"));
    }

    #[test]
    fn test_buy_beyond_balance_is_rejected() {
        let err = plan_trade(&dec("100"), None, &order(TradeType::Buy, "1", "100.01")).unwrap_err();
        assert!(matches!(err, AppError::InsufficientFunds(_)));
    }

    #[test]
    fn test_buy_spending_exact_balance_is_allowed() {
        let plan = plan_trade(&dec("100"), None, &order(TradeType::Buy, "1", "100")).unwrap();
        assert_eq!(plan.virtual_funds, dec("0"));
    }

    #[test]
    fn test_sell_realizes_profit_and_reduces_holding() {
        let existing = holding("2", "100");
        let plan = plan_trade(&dec("500"), Some(&existing), &order(TradeType::Sell, "0.5", "140")).unwrap();

        assert_eq!(plan.total_value, dec("70"));
        assert_eq!(plan.virtual_funds, dec("570"));
        assert_eq!(plan.realized_profit, dec("20"));
        assert_eq!(plan.holding, HoldingChange::Reduce { id: existing.id, quantity: dec("1.5") });
    }

    #[test]
    fn test_selling_everything_closes_holding() {
        let existing = holding("0.25", "4000");
        let plan = plan_trade(&dec("0"), Some(&existing), &order(TradeType::Sell, "0.25", "3000")).unwrap();

        assert_eq!(plan.realized_profit, dec("-250"));
        assert_eq!(plan.holding, HoldingChange::Close { id: existing.id });
    }

    #[test]
    fn test_sell_more_than_held_is_rejected() {
        let existing = holding("0.1", "100");
        let err = plan_trade(&dec("0"), Some(&existing), &order(TradeType::Sell, "0.2", "100")).unwrap_err();
        assert!(matches!(err, AppError::InsufficientHoldings(_)));

        let err = plan_trade(&dec("0"), None, &order(TradeType::Sell, "0.2", "100")).unwrap_err();
        assert!(matches!(err, AppError::InsufficientHoldings(_)));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let err = plan_trade(&dec("100"), None, &order(TradeType::Buy, "0", "10")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_quantity_finer_than_eight_places_is_rejected() {
        let existing = holding("0.12345679", "100");
        let err = plan_trade(&dec("0"), Some(&existing), &order(TradeType::Sell, "0.123456789", "100")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Would cost 0.00 and leave a zero-quantity holding once stored.
        let err = plan_trade(&dec("10000"), None, &order(TradeType::Buy, "0.000000001", "100")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_exact_eight_place_sell_closes_holding() {
        let existing = holding("0.12345679", "100");
        let plan = plan_trade(&dec("0"), Some(&existing), &order(TradeType::Sell, "0.12345679", "100")).unwrap();
        assert_eq!(plan.holding, HoldingChange::Close { id: existing.id });
    }

    #[test]
    fn test_price_finer_than_eight_places_is_rejected() {
        let err = plan_trade(&dec("10000"), None, &order(TradeType::Buy, "1", "0.000000001")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(plan_trade(&dec("10000"), None, &order(TradeType::Buy, "1", "0.00000001")).is_ok());
    }

    #[test]
    fn test_amounts_beyond_column_range_are_rejected() {
        let err = plan_trade(&dec("10000"), None, &order(TradeType::Buy, "10000000000", "0")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = plan_trade(&dec("10000"), None, &order(TradeType::Buy, "1", "10000000000")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // 9999999999 * 9999999999 overflows NUMERIC(18, 2).
        let existing = holding("9999999999", "1");
        let err = plan_trade(&dec("0"), Some(&existing), &order(TradeType::Sell, "9999999999", "9999999999")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_check_currency() {
        assert!(check_currency("Total value", &dec("149.99")).is_ok());
        assert!(check_currency("Total value", &dec("149.999")).is_err());
        assert!(check_currency("Total value", &dec("10000000000000000")).is_err());
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("  BTC ").unwrap(), "btc");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("waytoolongsymbol").is_err());
    }
}
