mod actions;
pub mod castle;
pub mod constants;
pub mod events;
pub mod leaderboard;
pub mod player;
pub mod siege;
pub mod state;
mod tick;

pub use castle::CastleState;
pub use events::{AttackOutcome, GameEvent, TickAdvanced, WeatherChanged};
pub use leaderboard::Leaderboard;
pub use player::PlayerState;
pub use siege::{Collaborators, Siege};
pub use state::GameState;
