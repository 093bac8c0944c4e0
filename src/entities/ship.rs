use super::hitbox::{Body, Hitbox};
use crate::settings::Settings;

/// The player's ship, pinned to the bottom of the screen
#[derive(Debug, Clone)]
pub struct Ship {
    /// Exact horizontal position; the hitbox truncates it
    pub x: f32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Ship {
    /// Creates a ship of the sprite's size, centered at the bottom
    pub fn new(width: u32, height: u32, settings: &Settings) -> Self {
        let mut ship = Self {
            x: 0.0,
            y: 0,
            width,
            height,
            moving_left: false,
            moving_right: false,
        };
        ship.center(settings);
        ship
    }

    pub fn set_moving_left(&mut self, moving: bool) {
        self.moving_left = moving;
    }

    pub fn set_moving_right(&mut self, moving: bool) {
        self.moving_right = moving;
    }

    pub fn update(&mut self, settings: &Settings) {
        let max_x = settings.screen_width.saturating_sub(self.width) as f32;

        if self.moving_right {
            self.x += settings.ship_speed;
        }
        if self.moving_left {
            self.x -= settings.ship_speed;
        }

        self.x = self.x.clamp(0.0, max_x);
    }

    /// Horizontal center, bottom aligned. Movement flags are left alone.
    pub fn center(&mut self, settings: &Settings) {
        self.x = (settings.screen_width.saturating_sub(self.width) / 2) as f32;
        self.y = settings.screen_height as i32 - self.height as i32;
    }
}

impl Body for Ship {
    fn rect(&self) -> Hitbox {
        Hitbox::new(self.x as i32, self.y, self.width, self.height)
    }
}
