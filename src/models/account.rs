use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Profile;

// Login identity; the gamification state lives on the 1:1 Profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccount {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfilePicture {
    pub profile_picture: Option<String>,
}

/// Returned from registration: the account and the profile created with it.
#[derive(Debug, Serialize)]
pub struct RegisteredAccount {
    pub account: Account,
    pub profile: Profile,
}

impl Account {
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        profile_picture: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            username,
            email,
            password_hash,
            profile_picture,
            created_at: chrono::Utc::now(),
        }
    }
}
