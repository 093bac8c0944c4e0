use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::Instant;
use tracing::{debug, info};

use crate::entities::{Bullet, Fleet, GameState, GameStats, Ship};
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::settings::Settings;
use crate::sprites::SpriteSheet;

/// The main application which holds the state and logic of the game.
pub struct App {
    running: bool,
    game_state: GameState,
    settings: Settings,
    stats: GameStats,
    ship: Ship,
    bullets: Vec<Bullet>,
    fleet: Fleet,
    sprites: SpriteSheet,
    /// Fleets seen so far, starting at 1
    wave: u32,
    /// Frames info
    frame_count: u64,
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// Construct a new instance of [`App`] with the first fleet in place.
    /// Entity sizes come from the sprites.
    pub fn new(settings: Settings, sprites: SpriteSheet) -> Self {
        let ship = Ship::new(sprites.ship.width(), sprites.ship.height(), &settings);
        let fleet = Fleet::new(
            sprites.alien.width(),
            sprites.alien.height(),
            settings.fleet_direction,
        );

        let mut app = Self {
            running: true,
            game_state: GameState::Playing,
            stats: GameStats::new(&settings),
            settings,
            ship,
            bullets: Vec::new(),
            fleet,
            sprites,
            wave: 1,
            frame_count: 0,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
        };

        app.spawn_fleet();

        app
    }

    /// Replaces the default input manager
    pub fn with_input(mut self, input_manager: InputManager) -> Self {
        self.input_manager = input_manager;
        self
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        let tick = self.settings.tick_duration();

        while self.running {
            let frame_start = Instant::now();

            // Calculate FPS
            let frame_time = frame_start.duration_since(self.last_frame_time);
            self.last_frame_time = frame_start;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            // Render the frame
            terminal.draw(|frame| {
                let view = RenderView {
                    game_state: self.game_state,
                    settings: &self.settings,
                    sprites: &self.sprites,
                    ship: &self.ship,
                    bullets: &self.bullets,
                    aliens: self.fleet.aliens(),
                    stats: &self.stats,
                    wave: self.wave,
                    frame_count: self.frame_count,
                    fps: self.fps,
                    area: frame.area(),
                };
                self.renderer.render(frame, &view);
            })?;

            // Poll input events and get actions
            self.input_manager.poll_events(&self.game_state)?;
            let actions = self.input_manager.get_actions(&self.game_state);

            self.tick(&actions);

            // Sleep out the rest of the tick
            if let Some(rest) = tick.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        info!(
            wave = self.wave,
            ships_left = self.stats.ships_left,
            "leaving game loop"
        );
        Ok(())
    }

    /// Advances the game by one tick with this tick's input
    pub fn tick(&mut self, actions: &[InputAction]) {
        self.frame_count += 1;
        self.process_actions(actions);
        if !self.running {
            return;
        }

        match self.game_state {
            GameState::Playing => self.update_game(),
            GameState::Respawning { ticks_left } => {
                self.game_state = if ticks_left <= 1 {
                    debug!("respawn pause over");
                    GameState::Playing
                } else {
                    GameState::Respawning {
                        ticks_left: ticks_left - 1,
                    }
                };
            }
            GameState::Paused | GameState::GameOver => {}
        }
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        // Held keys arrive every tick; no movement action means no key held
        self.ship
            .set_moving_left(actions.contains(&InputAction::MoveLeft));
        self.ship
            .set_moving_right(actions.contains(&InputAction::MoveRight));

        for action in actions {
            match action {
                InputAction::Quit => {
                    info!("quit requested");
                    self.running = false;
                    return;
                }
                InputAction::Pause => {
                    if self.game_state == GameState::Playing {
                        info!("paused");
                        self.game_state = GameState::Paused;
                    }
                }
                InputAction::Resume => {
                    if self.game_state == GameState::Paused {
                        info!("resumed");
                        self.game_state = GameState::Playing;
                    }
                }
                InputAction::Fire => {
                    if self.game_state == GameState::Playing {
                        self.fire_bullet();
                    }
                }
                InputAction::MoveLeft | InputAction::MoveRight => {}
            }
        }
    }

    /// Adds a bullet at the ship's nose unless the cap is reached.
    /// Returns whether a bullet was fired.
    fn fire_bullet(&mut self) -> bool {
        if self.bullets.len() >= self.settings.bullets_allowed {
            return false;
        }
        self.bullets.push(Bullet::new(&self.ship, &self.settings));
        true
    }

    /// One tick of play
    fn update_game(&mut self) {
        self.ship.update(&self.settings);
        self.update_bullets();
        self.update_aliens();
    }

    fn update_bullets(&mut self) {
        for bullet in &mut self.bullets {
            bullet.update(&self.settings);
        }
        self.bullets.retain(|bullet| !bullet.is_off_screen());

        let destroyed = self.fleet.resolve_bullet_hits(&mut self.bullets);
        if destroyed > 0 {
            debug!(destroyed, remaining = self.fleet.len(), "aliens destroyed");
        }

        if self.fleet.is_empty() {
            self.bullets.clear();
            if destroyed > 0 {
                info!(wave = self.wave, "wave cleared");
                self.wave += 1;
            }
            self.spawn_fleet();
        }
    }

    fn update_aliens(&mut self) {
        if self.fleet.advance(&self.settings) {
            debug!(direction = ?self.fleet.direction, "fleet bounced");
        }

        if self.fleet.any_collides_with(&self.ship) {
            debug!("alien hit the ship");
            self.ship_hit();
        }

        // A hit above already reset the field
        if self.game_state == GameState::Playing
            && self.fleet.reached_bottom(self.settings.screen_height)
        {
            debug!("alien reached the bottom");
            self.ship_hit();
        }
    }

    fn spawn_fleet(&mut self) {
        let layout = self.fleet.create_fleet(&self.settings, self.ship.height);
        info!(
            wave = self.wave,
            rows = layout.rows,
            columns = layout.columns,
            "fleet created"
        );
    }

    /// Spends a ship. With ships left the field is reset and play pauses
    /// briefly; losing the last one ends the game with the field untouched.
    pub fn ship_hit(&mut self) {
        if self.stats.lose_ship() {
            info!(ships_left = self.stats.ships_left, "ship hit");

            self.bullets.clear();
            self.spawn_fleet();
            self.ship.center(&self.settings);

            let pause = self.settings.hit_pause_ticks();
            self.game_state = if pause == 0 {
                GameState::Playing
            } else {
                GameState::Respawning { ticks_left: pause }
            };
        } else {
            info!(wave = self.wave, "game over");
            self.game_state = GameState::GameOver;
        }
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Alien;
    use crate::sprites::Sprite;

    fn test_app() -> App {
        let settings = Settings {
            screen_width: 800,
            screen_height: 600,
            hit_pause_ms: 50,
            tick_rate: 60,
            ..Settings::default()
        };
        let sprites = SpriteSheet::new(
            Sprite::solid(40, 30, [0, 255, 0]),
            Sprite::solid(40, 30, [255, 0, 0]),
        );
        App::new(settings, sprites)
    }

    #[test]
    fn test_new_app_has_full_fleet() {
        let app = test_app();
        // 9 columns, rows = (600 - 90 - 30) / 60 = 8
        assert_eq!(app.fleet.len(), 72);
        assert_eq!(app.wave, 1);
        assert_eq!(app.game_state, GameState::Playing);
        assert_eq!(app.stats.ships_left, 3);
    }

    #[test]
    fn test_destroying_last_alien_repopulates_same_tick() {
        let mut app = test_app();
        let grid: Vec<(f32, i32)> = app.fleet.aliens.iter().map(|a| (a.x, a.y)).collect();

        // Leave one alien right above the ship's nose
        app.fleet.aliens.truncate(1);
        app.fleet.aliens[0] = Alien::new(380.0, 400, 40, 30);
        app.ship.x = 380.0;
        app.fire_bullet();
        app.bullets[0].y = 420.0;
        app.fire_bullet();

        app.tick(&[]);

        assert_eq!(app.wave, 2);
        assert!(app.bullets.is_empty());
        assert_eq!(app.fleet.len(), grid.len());

        // Same grid, moved by exactly one advance
        let step = app.settings.alien_speed * app.fleet.direction.sign();
        for (alien, (x, y)) in app.fleet.aliens.iter().zip(&grid) {
            assert_eq!(alien.x, x + step);
            assert_eq!(alien.y, *y);
        }
    }

    #[test]
    fn test_alien_touching_ship_costs_a_life() {
        let mut app = test_app();
        let ship_rect = (app.ship.x, app.ship.y);
        app.fleet.aliens[0] = Alien::new(ship_rect.0, ship_rect.1 - 20, 40, 30);

        app.tick(&[]);

        assert_eq!(app.stats.ships_left, 2);
        assert!(matches!(app.game_state, GameState::Respawning { .. }));
        assert_eq!(app.fleet.len(), 72);
    }

    #[test]
    fn test_alien_reaching_bottom_costs_a_life() {
        let mut app = test_app();
        app.fleet.aliens[0] = Alien::new(0.0, 580, 40, 30);
        app.ship.x = 700.0;

        app.tick(&[]);

        assert_eq!(app.stats.ships_left, 2);
        assert!(app.bullets.is_empty());
        assert_eq!(app.ship.x, 380.0);
    }

    #[test]
    fn test_only_one_life_lost_per_tick() {
        let mut app = test_app();
        // Touching the ship and past the bottom at once
        app.fleet.aliens[0] = Alien::new(app.ship.x, 590, 40, 30);

        app.tick(&[]);

        assert_eq!(app.stats.ships_left, 2);
    }

    #[test]
    fn test_respawn_countdown_freezes_field() {
        let mut app = test_app();
        app.ship_hit();

        // 50ms at 60 ticks per second
        assert_eq!(app.game_state, GameState::Respawning { ticks_left: 3 });
        let aliens_before: Vec<f32> = app.fleet.aliens.iter().map(|a| a.x).collect();

        app.tick(&[InputAction::MoveRight]);
        app.tick(&[]);
        assert_eq!(app.game_state, GameState::Respawning { ticks_left: 1 });
        let aliens_after: Vec<f32> = app.fleet.aliens.iter().map(|a| a.x).collect();
        assert_eq!(aliens_before, aliens_after);
        assert_eq!(app.ship.x, 380.0);

        app.tick(&[]);
        assert_eq!(app.game_state, GameState::Playing);
    }

    #[test]
    fn test_last_ship_ends_game_without_reset() {
        let mut app = test_app();
        app.stats.ships_left = 1;
        app.fleet.aliens.truncate(5);
        app.fire_bullet();

        app.ship_hit();

        assert_eq!(app.game_state, GameState::GameOver);
        assert!(!app.stats.game_active);
        assert_eq!(app.fleet.len(), 5);
        assert_eq!(app.bullets.len(), 1);
    }

    #[test]
    fn test_game_over_freezes_everything() {
        let mut app = test_app();
        app.stats.ships_left = 1;
        app.ship_hit();

        let aliens_before: Vec<f32> = app.fleet.aliens.iter().map(|a| a.x).collect();
        app.tick(&[InputAction::Fire, InputAction::MoveLeft]);
        app.tick(&[InputAction::Pause]);

        assert_eq!(app.game_state, GameState::GameOver);
        assert!(app.bullets.is_empty());
        let aliens_after: Vec<f32> = app.fleet.aliens.iter().map(|a| a.x).collect();
        assert_eq!(aliens_before, aliens_after);
        assert!(app.is_running());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut app = test_app();
        app.tick(&[InputAction::Pause]);
        assert_eq!(app.game_state, GameState::Paused);

        let x_before = app.fleet.aliens[0].x;
        app.tick(&[InputAction::Fire]);
        assert!(app.bullets.is_empty());
        assert_eq!(app.fleet.aliens[0].x, x_before);

        app.tick(&[InputAction::Resume]);
        assert_eq!(app.game_state, GameState::Playing);
        assert_ne!(app.fleet.aliens[0].x, x_before);
    }

    #[test]
    fn test_quit_stops_running() {
        let mut app = test_app();
        assert!(app.is_running());
        app.tick(&[InputAction::Quit]);
        assert!(!app.is_running());
    }

    #[test]
    fn test_quit_skips_the_rest_of_the_tick() {
        let mut app = test_app();
        let ship_x = app.ship.x;
        let alien_x = app.fleet.aliens[0].x;

        app.tick(&[
            InputAction::MoveRight,
            InputAction::Quit,
            InputAction::Fire,
        ]);

        assert!(!app.is_running());
        assert!(app.bullets.is_empty());
        assert_eq!(app.ship.x, ship_x);
        assert_eq!(app.fleet.aliens[0].x, alien_x);
    }

    #[test]
    fn test_huge_hit_pause_does_not_overflow() {
        let mut app = test_app();
        app.settings.hit_pause_ms = u64::MAX;

        app.ship_hit();

        assert_eq!(
            app.game_state,
            GameState::Respawning {
                ticks_left: u32::MAX
            }
        );
    }

    #[test]
    fn test_fire_respects_bullet_cap() {
        let mut app = test_app();
        for _ in 0..app.settings.bullets_allowed {
            assert!(app.fire_bullet());
        }
        assert!(!app.fire_bullet());
        assert_eq!(app.bullets.len(), app.settings.bullets_allowed);
    }

    #[test]
    fn test_movement_follows_held_keys() {
        let mut app = test_app();
        let start = app.ship.x;

        app.tick(&[InputAction::MoveRight]);
        assert_eq!(app.ship.x, start + app.settings.ship_speed);

        // Nothing held, nothing moves
        app.tick(&[]);
        assert_eq!(app.ship.x, start + app.settings.ship_speed);
    }
}
