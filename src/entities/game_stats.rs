use crate::settings::Settings;

/// Counters that live for the whole session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    pub ships_left: u32,
    /// Cleared for good once the last ship is lost
    pub game_active: bool,
}

impl GameStats {
    pub fn new(settings: &Settings) -> Self {
        let mut stats = Self {
            ships_left: 0,
            game_active: true,
        };
        stats.reset_stats(settings);
        stats
    }

    pub fn reset_stats(&mut self, settings: &Settings) {
        self.ships_left = settings.ship_limit;
    }

    /// Spends one ship. Returns true while the game can go on.
    pub fn lose_ship(&mut self) -> bool {
        self.ships_left = self.ships_left.saturating_sub(1);
        if self.ships_left == 0 {
            self.game_active = false;
        }
        self.game_active
    }
}
