mod account;
mod profile;
mod quest;
mod trade;
mod holding;
mod achievement;
mod leaderboard;
mod market;

pub use account::{Account, CreateAccount, RegisteredAccount, UpdateProfilePicture};
pub use profile::{Profile, UpdateProfile, STARTING_FUNDS};
pub use quest::{CreateQuest, Quest, QuestFilter, QuestStatus, QuestType, StartQuest, UpdateQuest, UpdateQuestStatus, UserQuest};
pub use trade::{CreateTrade, ExecuteTrade, Trade, TradeExecution, TradeType};
pub use holding::{CreateHolding, PortfolioHolding, UpdateHolding};
pub use achievement::{Achievement, AwardAchievement, CreateAchievement, UpdateAchievement, UserAchievement};
pub use leaderboard::{CreateLeaderboard, Leaderboard, LeaderboardEntry, LeaderboardType, SubmitEntry};
pub use market::{ChartPoint, ChartQuery, CoinList, CoinSummary};
