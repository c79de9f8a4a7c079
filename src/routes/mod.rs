pub mod leaderboard;
pub mod standings;
pub mod util;
