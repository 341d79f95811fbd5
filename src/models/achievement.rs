use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub criteria_description: String,
    pub badge_icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAchievement {
    pub name: String,
    pub description: String,
    pub criteria_description: String,
    pub badge_icon: String,
}

pub type UpdateAchievement = CreateAchievement;

// Earned badge. Duplicate awards are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAchievement {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub achievement_id: Uuid,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AwardAchievement {
    pub achievement_id: Uuid,
}
