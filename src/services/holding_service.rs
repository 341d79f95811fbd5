use bigdecimal::BigDecimal;
use sqlx::PgPool;
use uuid::Uuid;
use crate::db;
use crate::errors::AppError;
use crate::models::{CreateHolding, PortfolioHolding, UpdateHolding};
use crate::services::profile_service;
use crate::services::trade_service::{check_quantity, normalize_symbol};

fn validate_amounts(quantity: &BigDecimal, average_buy_price: &BigDecimal) -> Result<(), AppError> {
    let zero = BigDecimal::from(0);
    if *quantity < zero {
        return Err(AppError::Validation("Quantity cannot be negative".into()));
    }
    if *average_buy_price < zero {
        return Err(AppError::Validation("Average buy price cannot be negative".into()));
    }
    check_quantity("Quantity", quantity)?;
    check_quantity("Average buy price", average_buy_price)?;
    Ok(())
}

pub async fn create(pool: &PgPool, profile_id: Uuid, mut input: CreateHolding) -> Result<PortfolioHolding, AppError> {
    input.crypto_symbol = normalize_symbol(&input.crypto_symbol)?;
    validate_amounts(&input.quantity, &input.average_buy_price)?;
    profile_service::ensure_exists(pool, profile_id).await?;
    Ok(db::holding_queries::insert(pool, profile_id, input).await?)
}

pub async fn list(pool: &PgPool, profile_id: Uuid) -> Result<Vec<PortfolioHolding>, AppError> {
    profile_service::ensure_exists(pool, profile_id).await?;
    Ok(db::holding_queries::fetch_by_profile(pool, profile_id).await?)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<PortfolioHolding, AppError> {
    db::holding_queries::fetch_one(pool, id).await?
        .ok_or_else(|| AppError::NotFound(format!("Holding {} not found", id)))
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateHolding) -> Result<PortfolioHolding, AppError> {
    validate_amounts(&input.quantity, &input.average_buy_price)?;
    db::holding_queries::update(pool, id, input).await?
        .ok_or_else(|| AppError::NotFound(format!("Holding {} not found", id)))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::holding_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound(format!("Holding {} not found", id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amounts_rejected() {
        let one = BigDecimal::from(1);
        let minus = BigDecimal::from(-1);
        assert!(validate_amounts(&minus, &one).is_err());
        assert!(validate_amounts(&one, &minus).is_err());
        assert!(validate_amounts(&BigDecimal::from(0), &one).is_ok());
    }

    #[test]
    fn test_amounts_must_fit_numeric_columns() {
        let one = BigDecimal::from(1);
        let fine: BigDecimal = "0.000000001".parse().unwrap();
        assert!(matches!(validate_amounts(&fine, &one), Err(AppError::Validation(_))));
        assert!(validate_amounts(&one, &fine).is_err());
        assert!(validate_amounts(&BigDecimal::from(10_000_000_000i64), &one).is_err());
    }
}
