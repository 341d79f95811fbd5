pub mod account_service;
pub mod profile_service;
pub mod quest_service;
pub mod trade_service;
pub mod holding_service;
pub mod achievement_service;
pub mod leaderboard_service;
pub mod market_service;

use crate::errors::AppError;

/// Rejects text longer than the `VARCHAR(max)` column it is stored in.
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} cannot be longer than {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len_counts_characters() {
        assert!(check_len("Title", "ééé", 3).is_ok());
        assert!(check_len("Title", "éééé", 3).is_err());
    }
}
