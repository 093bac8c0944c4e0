use super::hitbox::{Body, Hitbox};
use crate::settings::{FleetDirection, Settings};

/// A single member of the fleet
#[derive(Debug, Clone)]
pub struct Alien {
    /// Exact horizontal position; the hitbox truncates it
    pub x: f32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Alien {
    pub fn new(x: f32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn update(&mut self, settings: &Settings, direction: FleetDirection) {
        self.x += settings.alien_speed * direction.sign();
    }

    pub fn drop_by(&mut self, distance: i32) {
        self.y += distance;
    }

    pub fn at_edge(&self, screen_width: u32) -> bool {
        let rect = self.rect();
        rect.right() >= screen_width as i32 || rect.left() <= 0
    }
}

impl Body for Alien {
    fn rect(&self) -> Hitbox {
        Hitbox::new(self.x as i32, self.y, self.width, self.height)
    }
}
