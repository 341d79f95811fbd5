pub mod extract;
pub mod health;
pub mod trading;
pub mod accounts;
pub mod profiles;
pub mod trades;
pub mod holdings;
pub mod quests;
pub mod achievements;
pub mod leaderboards;
