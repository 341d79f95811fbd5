use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Daily,
    Investment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub quest_type: QuestType,
    pub goal_description: String,
    pub reward_points: i32,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuest {
    pub title: String,
    pub description: String,
    pub quest_type: QuestType,
    pub goal_description: String,
    pub reward_points: i32,
    pub expires_at: Option<DateTime<Utc>>,
}

pub type UpdateQuest = CreateQuest;

#[derive(Debug, Deserialize)]
pub struct QuestFilter {
    pub quest_type: Option<QuestType>,
}

// A profile's progress on one quest.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserQuest {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub quest_id: Uuid,
    pub status: QuestStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartQuest {
    pub quest_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateQuestStatus {
    pub status: QuestStatus,
}

impl Quest {
    pub fn new(input: CreateQuest) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            quest_type: input.quest_type,
            goal_description: input.goal_description,
            reward_points: input.reward_points,
            expires_at: input.expires_at,
        }
    }
}

impl UserQuest {
    pub fn start(profile_id: Uuid, quest_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile_id,
            quest_id,
            status: QuestStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
        }
    }
}

impl QuestStatus {
    /// `completed_at` is only meaningful for completed quests.
    pub fn completed_at(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            QuestStatus::Completed => Some(now),
            QuestStatus::InProgress | QuestStatus::Failed => None,
        }
    }
}
