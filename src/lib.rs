// Library exports for testing
pub use app::App;
pub use entities::{Alien, Body, Bullet, Fleet, FleetLayout, GameState, GameStats, Hitbox, Ship};
pub use input::{InputAction, InputManager};
pub use settings::{FleetDirection, Settings};
pub use sprites::{Sprite, SpriteSheet};

pub mod app;
pub mod canvas;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sprites;
pub mod tui;
