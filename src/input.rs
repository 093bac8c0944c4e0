use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::entities::GameState;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Fire,
    Pause,
    Resume,
    Quit,
}

/// A key that can be held down. Without release events from the terminal,
/// `ticks_left` counts down to an implied release.
#[derive(Debug, Default, Clone, Copy)]
struct Hold {
    pressed: bool,
    ticks_left: u16,
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    left: Hold,
    right: Hold,
}

/// Manages input polling and translates raw key events into game actions
#[derive(Debug, Default)]
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    /// Set when the terminal cannot report key releases
    release_timeout: Option<u16>,
}

impl InputManager {
    /// For terminals that report key releases
    pub fn new() -> Self {
        Self::default()
    }

    /// For terminals that only report presses: a held key counts as released
    /// after `ticks` ticks without another press or auto-repeat.
    pub fn with_release_timeout(ticks: u16) -> Self {
        Self {
            release_timeout: Some(ticks.max(1)),
            ..Self::default()
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, game_state: &GameState) -> color_eyre::Result<()> {
        self.begin_frame();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, game_state);
            }
        }

        Ok(())
    }

    /// Clears last frame's one-shot actions and ages timed holds
    pub fn begin_frame(&mut self) {
        self.oneshot_actions.clear();

        if self.release_timeout.is_some() {
            for hold in [&mut self.key_state.left, &mut self.key_state.right] {
                if hold.pressed {
                    if hold.ticks_left == 0 {
                        hold.pressed = false;
                    } else {
                        hold.ticks_left -= 1;
                    }
                }
            }
        }
    }

    /// Processes a key event and updates key state and one-shot actions
    pub fn handle_key_event(&mut self, key_event: KeyEvent, game_state: &GameState) {
        match key_event.kind {
            KeyEventKind::Release => self.handle_key_release(key_event.code),
            KeyEventKind::Repeat => self.handle_key_press(key_event, game_state, false),
            _ => self.handle_key_press(key_event, game_state, true),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: &GameState, first: bool) {
        // Check for quit keys first (works in any state)
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        if first && matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P')) {
            match game_state {
                GameState::Playing => self.oneshot_actions.push(InputAction::Pause),
                GameState::Paused => self.oneshot_actions.push(InputAction::Resume),
                _ => {}
            }
            return;
        }

        if *game_state == GameState::Playing && key_event.code == KeyCode::Char(' ') {
            // Terminals without release events auto-repeat presses, which
            // keeps firing while space is held
            if first {
                self.oneshot_actions.push(InputAction::Fire);
            }
            return;
        }

        if game_state.accepts_movement() {
            let timeout = self.release_timeout.unwrap_or(0);
            match key_event.code {
                KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                    self.key_state.left = Hold {
                        pressed: true,
                        ticks_left: timeout,
                    };
                    self.key_state.right.pressed = false;
                }
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                    self.key_state.right = Hold {
                        pressed: true,
                        ticks_left: timeout,
                    };
                    self.key_state.left.pressed = false;
                }
                _ => {}
            }
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left.pressed = false;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right.pressed = false;
            }
            _ => {}
        }
    }

    /// Returns all actions for this frame (both continuous and one-shot)
    /// Must be called after poll_events()
    pub fn get_actions(&self, game_state: &GameState) -> Vec<InputAction> {
        let mut actions = Vec::new();

        actions.extend_from_slice(&self.oneshot_actions);

        if game_state.accepts_movement() {
            if self.key_state.left.pressed {
                actions.push(InputAction::MoveLeft);
            }
            if self.key_state.right.pressed {
                actions.push(InputAction::MoveRight);
            }
        }

        actions
    }
}
