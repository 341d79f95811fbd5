pub mod account_queries;
pub mod profile_queries;
pub mod quest_queries;
pub mod user_quest_queries;
pub mod trade_queries;
pub mod holding_queries;
pub mod achievement_queries;
pub mod leaderboard_queries;
