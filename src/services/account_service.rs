use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use crate::db;
use crate::errors::AppError;
use crate::models::{Account, CreateAccount, RegisteredAccount};
use crate::services::check_len;

const MAX_USERNAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PICTURE_LEN: usize = 255;

pub(crate) fn validate_registration(input: &CreateAccount) -> Result<(), AppError> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username cannot be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username cannot be longer than {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    check_len("Email", input.email.trim(), MAX_EMAIL_LEN)?;
    if let Some(picture) = &input.profile_picture {
        check_len("Profile picture", picture.trim(), MAX_PICTURE_LEN)?;
    }
    Ok(())
}

pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| AppError::Validation(format!("Could not generate salt: {}", e)))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Validation(format!("Could not hash password: {}", e)))
}

/// Creates the account together with its gamification profile.
pub async fn register(pool: &PgPool, input: CreateAccount) -> Result<RegisteredAccount, AppError> {
    validate_registration(&input)?;

    let username = input.username.trim().to_string();
    if db::account_queries::fetch_by_username(pool, &username).await?.is_some() {
        return Err(AppError::Conflict(format!("Username {} is already taken", username)));
    }

    let password_hash = hash_password(&input.password)?;
    let account = Account::new(username, input.email.trim().to_string(), password_hash, input.profile_picture);
    let (account, profile) = db::account_queries::create_with_profile(pool, account).await?;
    info!("Registered account {} with profile {}", account.id, profile.id);

    Ok(RegisteredAccount { account, profile })
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Account, AppError> {
    db::account_queries::fetch_one(pool, id).await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))
}

pub async fn update_profile_picture(
    pool: &PgPool,
    id: Uuid,
    profile_picture: Option<String>,
) -> Result<Account, AppError> {
    let profile_picture = profile_picture
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    if let Some(picture) = &profile_picture {
        check_len("Profile picture", picture, MAX_PICTURE_LEN)?;
    }
    db::account_queries::update_profile_picture(pool, id, profile_picture).await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))
}

// Cascades to the profile and everything it owns.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::account_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound(format!("Account {} not found", id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    fn registration(username: &str, password: &str) -> CreateAccount {
        CreateAccount {
            username: username.to_string(),
            password: password.to_string(),
            email: String::new(),
            profile_picture: None,
        }
    }

    #[test]
    fn test_rejects_blank_username() {
        let err = validate_registration(&registration("   ", "hunter2hunter2")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_overlong_username() {
        let name = "a".repeat(151);
        assert!(validate_registration(&registration(&name, "hunter2hunter2")).is_err());
        let name = "a".repeat(150);
        assert!(validate_registration(&registration(&name, "hunter2hunter2")).is_ok());
    }

    #[test]
    fn test_rejects_email_and_picture_longer_than_columns() {
        let mut input = registration("satoshi", "hunter2hunter2");
        input.email = format!("{}@example.com", "e".repeat(250));
        assert!(matches!(validate_registration(&input), Err(AppError::Validation(_))));

        let mut input = registration("satoshi", "hunter2hunter2");
        input.profile_picture = Some(format!("https://cdn.example.com/{}", "p".repeat(255)));
        assert!(matches!(validate_registration(&input), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_short_password() {
        assert!(validate_registration(&registration("satoshi", "short")).is_err());
    }

    #[test]
    fn test_hash_password_verifies() {
        let hash = hash_password("correct horse battery").unwrap();
        assert_ne!(hash, "correct horse battery");

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"correct horse battery", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }
}
