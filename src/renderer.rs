use rand::Rng;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::canvas::{PixelCanvas, fit_viewport};
use crate::entities::{Alien, Body, Bullet, GameState, GameStats, Ship};
use crate::settings::Settings;
use crate::sprites::SpriteSheet;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub settings: &'a Settings,
    pub sprites: &'a SpriteSheet,
    pub ship: &'a Ship,
    pub bullets: &'a [Bullet],
    pub aliens: &'a [Alien],
    pub stats: &'a GameStats,
    pub wave: u32,
    pub frame_count: u64,
    pub fps: u32,
    pub area: Rect,
}

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draws the playfield, HUD and any state overlay
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let playfield = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };

        self.render_playfield(frame, view, playfield);
        self.render_hud(frame, view);
        self.render_controls(frame, area);

        match view.game_state {
            GameState::Playing => {}
            GameState::Paused => self.render_paused(frame, playfield),
            GameState::Respawning { .. } => self.render_respawning(frame, view, playfield),
            GameState::GameOver => self.render_game_over(frame, view, playfield),
        }
    }

    fn render_playfield(&self, frame: &mut Frame, view: &RenderView, playfield: Rect) {
        let settings = view.settings;
        let viewport = fit_viewport(playfield, settings.screen_width, settings.screen_height);
        if viewport.width == 0 || viewport.height == 0 {
            return;
        }

        let [r, g, b] = settings.bg_color;
        let mut canvas = PixelCanvas::new(
            settings.screen_width,
            settings.screen_height,
            viewport.width,
            viewport.height,
            Color::Rgb(r, g, b),
        );

        // Twinkling stars (simple background)
        if view.frame_count % 10 < 5 {
            let mut rng = rand::rng();
            let star_count = (u32::from(canvas.width()) * u32::from(canvas.height())) / 200;
            for _ in 0..star_count {
                let x = rng.random_range(0..i32::from(canvas.width()));
                let y = rng.random_range(0..i32::from(canvas.height()));
                canvas.plot(x, y, Color::Rgb(70, 70, 90));
            }
        }

        for alien in view.aliens {
            canvas.draw_sprite(&view.sprites.alien, alien.rect());
        }

        for bullet in view.bullets {
            let [r, g, b] = bullet.color;
            canvas.fill_rect(bullet.rect(), Color::Rgb(r, g, b));
        }

        canvas.draw_sprite(&view.sprites.ship, view.ship.rect());

        canvas.present(frame.buffer_mut(), viewport);
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let label = Style::default().fg(Color::DarkGray);
        let ships = "▲ ".repeat(view.stats.ships_left as usize);

        let stats_left = Line::from(vec![
            Span::styled("Ships: ", label),
            Span::styled(
                ships.trim_end().to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Wave: ", label),
            Span::styled(
                format!("{}", view.wave),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Aliens: ", label),
            Span::styled(
                format!("{}", view.aliens.len()),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Bullets: ", label),
            Span::styled(
                format!("{}/{}", view.bullets.len(), view.settings.bullets_allowed),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  FPS: ", label),
            Span::styled(
                format!("{}", view.fps),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1.min(area.height),
        };

        frame.render_widget(Paragraph::new(stats_left), stats_area);
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect) {
        if area.height < 2 {
            return;
        }

        let controls = Line::from(vec![Span::styled(
            "[←/→ A/D: Move] [Space: Fire] [P: Pause] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);

        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height - 1,
            width: area.width.saturating_sub(2),
            height: 1,
        };

        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_paused(&self, frame: &mut Frame, playfield: Rect) {
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        self.render_overlay(frame, playfield, pause_text, 30, Color::Yellow);
    }

    fn render_respawning(&self, frame: &mut Frame, view: &RenderView, playfield: Rect) {
        let remaining = view.stats.ships_left;
        let text = vec![
            Line::from(""),
            Line::from("SHIP DOWN").centered().bold().red(),
            Line::from(format!(
                "{remaining} {} left",
                if remaining == 1 { "ship" } else { "ships" }
            ))
            .centered()
            .white(),
        ];

        self.render_overlay(frame, playfield, text, 30, Color::Red);
    }

    fn render_game_over(&self, frame: &mut Frame, view: &RenderView, playfield: Rect) {
        let waves_cleared = view.wave.saturating_sub(1);
        let game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║        GAME OVER!         ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from(format!("Waves cleared: {waves_cleared}"))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Press Q to quit").centered().white(),
        ];

        self.render_overlay(frame, playfield, game_over_text, 40, Color::Red);
    }

    /// Draws a bordered box of `lines` centered on `area`
    fn render_overlay(
        &self,
        frame: &mut Frame,
        area: Rect,
        lines: Vec<Line>,
        width: u16,
        border: Color,
    ) {
        let width = width.min(area.width);
        let height = (lines.len() as u16 + 3).min(area.height);
        let overlay = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, overlay);
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                )
                .alignment(Alignment::Center),
            overlay,
        );
    }
}
