mod alien;
mod bullet;
mod fleet;
mod game_state;
mod game_stats;
mod hitbox;
mod ship;

// Re-export all public types
pub use alien::Alien;
pub use bullet::Bullet;
pub use fleet::{Fleet, FleetLayout};
pub use game_state::GameState;
pub use game_stats::GameStats;
pub use hitbox::{Body, Hitbox};
pub use ship::Ship;
