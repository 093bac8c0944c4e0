use color_eyre::{
    Result,
    eyre::{WrapErr, bail},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Horizontal travel direction of the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FleetDirection {
    Left,
    Right,
}

impl FleetDirection {
    /// -1.0 for left, +1.0 for right
    pub fn sign(self) -> f32 {
        match self {
            FleetDirection::Left => -1.0,
            FleetDirection::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            FleetDirection::Left => FleetDirection::Right,
            FleetDirection::Right => FleetDirection::Left,
        }
    }
}

/// Session configuration, fixed once the game starts.
///
/// World coordinates are "pixels" of a virtual screen of
/// `screen_width` x `screen_height`; the renderer scales them to the terminal.
/// Speeds are in pixels per tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub screen_width: u32,
    pub screen_height: u32,
    pub bg_color: [u8; 3],

    pub ship_speed: f32,
    pub ship_limit: u32,

    pub bullet_speed: f32,
    pub bullet_width: u32,
    pub bullet_height: u32,
    pub bullet_color: [u8; 3],
    pub bullets_allowed: usize,

    pub alien_speed: f32,
    pub fleet_drop_speed: i32,
    /// Direction of the very first fleet
    pub fleet_direction: FleetDirection,

    /// Ticks per second of the game loop
    pub tick_rate: u32,
    /// Pause after losing a ship
    pub hit_pause_ms: u64,

    pub assets_dir: PathBuf,
    pub ship_image: PathBuf,
    pub alien_image: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 1200,
            screen_height: 800,
            bg_color: [10, 10, 28],
            ship_speed: 9.0,
            ship_limit: 3,
            bullet_speed: 14.0,
            bullet_width: 6,
            bullet_height: 30,
            bullet_color: [255, 220, 60],
            bullets_allowed: 3,
            alien_speed: 2.0,
            fleet_drop_speed: 20,
            fleet_direction: FleetDirection::Right,
            tick_rate: 60,
            hit_pause_ms: 500,
            assets_dir: PathBuf::from("assets"),
            ship_image: PathBuf::from("ship.png"),
            alien_image: PathBuf::from("alien.png"),
        }
    }
}

impl Settings {
    /// Loads settings from an optional TOML file, falling back to defaults
    /// for anything the file leaves out.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
                Self::from_toml_str(&raw)
                    .wrap_err_with(|| format!("invalid config {}", path.display()))?
            }
            None => Self::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(raw).wrap_err("failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            bail!(
                "screen size must be non-zero, got {}x{}",
                self.screen_width,
                self.screen_height
            );
        }
        for (name, value) in [
            ("ship_speed", self.ship_speed),
            ("bullet_speed", self.bullet_speed),
            ("alien_speed", self.alien_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be a finite, non-negative number, got {value}");
            }
        }
        if self.bullet_width == 0 || self.bullet_height == 0 {
            bail!("bullet_width and bullet_height must be non-zero");
        }
        if self.fleet_drop_speed < 0 {
            bail!("fleet_drop_speed must not be negative");
        }
        if self.ship_limit == 0 {
            bail!("ship_limit must be at least 1");
        }
        if self.tick_rate == 0 {
            bail!("tick_rate must be at least 1");
        }
        Ok(())
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    /// Number of whole ticks covering `millis`, rounded up
    pub fn ticks_for(&self, millis: u64) -> u32 {
        let ticks = millis.saturating_mul(u64::from(self.tick_rate)).div_ceil(1000);
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }

    pub fn hit_pause_ticks(&self) -> u32 {
        self.ticks_for(self.hit_pause_ms)
    }

    pub fn ship_image_path(&self) -> PathBuf {
        self.assets_dir.join(&self.ship_image)
    }

    pub fn alien_image_path(&self) -> PathBuf {
        self.assets_dir.join(&self.alien_image)
    }
}
