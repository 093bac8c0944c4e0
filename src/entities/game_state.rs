#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    /// Frozen after losing a ship, resumes when the countdown runs out
    Respawning { ticks_left: u32 },
    GameOver,
}

impl GameState {
    /// States in which held movement keys are tracked
    pub fn accepts_movement(&self) -> bool {
        matches!(self, GameState::Playing | GameState::Respawning { .. })
    }
}
