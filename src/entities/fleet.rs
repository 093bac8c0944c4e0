use super::alien::Alien;
use super::bullet::Bullet;
use super::hitbox::Body;
use crate::settings::{FleetDirection, Settings};

/// Rows and columns of a freshly spawned fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetLayout {
    pub columns: u32,
    pub rows: u32,
}

impl FleetLayout {
    /// Grid that fits the screen with one alien of spacing between cells,
    /// leaving room above the ship. Non-positive counts collapse to zero.
    pub fn compute(
        settings: &Settings,
        alien_width: u32,
        alien_height: u32,
        ship_height: u32,
    ) -> Self {
        if alien_width == 0 || alien_height == 0 {
            return Self {
                columns: 0,
                rows: 0,
            };
        }

        let aw = i64::from(alien_width);
        let ah = i64::from(alien_height);

        let available_x = i64::from(settings.screen_width) - 2 * aw;
        let available_y = i64::from(settings.screen_height) - 3 * ah - i64::from(ship_height);

        let columns = available_x.div_euclid(2 * aw).max(0);
        let rows = available_y.div_euclid(2 * ah).max(0);

        Self {
            columns: u32::try_from(columns).unwrap_or(0),
            rows: u32::try_from(rows).unwrap_or(0),
        }
    }

    pub fn len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The grid of aliens, moved as one rigid unit
#[derive(Debug, Clone)]
pub struct Fleet {
    pub aliens: Vec<Alien>,
    /// Current travel direction, flipped on every edge-bounce
    pub direction: FleetDirection,
    pub alien_width: u32,
    pub alien_height: u32,
}

impl Fleet {
    /// An empty fleet whose aliens will have the given sprite size
    pub fn new(alien_width: u32, alien_height: u32, direction: FleetDirection) -> Self {
        Self {
            aliens: Vec::new(),
            direction,
            alien_width,
            alien_height,
        }
    }

    /// Replaces any current aliens with a full grid.
    pub fn create_fleet(&mut self, settings: &Settings, ship_height: u32) -> FleetLayout {
        let layout =
            FleetLayout::compute(settings, self.alien_width, self.alien_height, ship_height);

        let aw = self.alien_width as i32;
        let ah = self.alien_height as i32;

        self.aliens.clear();
        self.aliens.reserve(layout.len());
        for row in 0..layout.rows as i32 {
            for col in 0..layout.columns as i32 {
                let x = aw + 2 * aw * col;
                let y = ah + 2 * ah * row;
                self.aliens
                    .push(Alien::new(x as f32, y, self.alien_width, self.alien_height));
            }
        }

        layout
    }

    /// Moves the fleet one tick. If any alien is touching an edge, the whole
    /// fleet first drops and reverses. Returns whether it bounced.
    pub fn advance(&mut self, settings: &Settings) -> bool {
        let bounced = self
            .aliens
            .iter()
            .any(|alien| alien.at_edge(settings.screen_width));

        if bounced {
            for alien in &mut self.aliens {
                alien.drop_by(settings.fleet_drop_speed);
            }
            self.direction = self.direction.reversed();
        }

        for alien in &mut self.aliens {
            alien.update(settings, self.direction);
        }

        bounced
    }

    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.aliens.len()
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    pub fn clear(&mut self) {
        self.aliens.clear();
    }

    pub fn any_collides_with<B: Body>(&self, body: &B) -> bool {
        self.aliens.iter().any(|alien| alien.collides_with(body))
    }

    /// True if any alien has reached the bottom of the screen
    pub fn reached_bottom(&self, screen_height: u32) -> bool {
        self.aliens
            .iter()
            .any(|alien| alien.rect().bottom() >= screen_height as i32)
    }

    /// Removes every bullet and every alien involved in an overlap.
    ///
    /// All pairs are found before anything is removed, so two bullets
    /// striking the same alien are both consumed and the outcome does not
    /// depend on iteration order. Returns the number of aliens destroyed.
    pub fn resolve_bullet_hits(&mut self, bullets: &mut Vec<Bullet>) -> usize {
        let mut bullet_hit = vec![false; bullets.len()];
        let mut alien_hit = vec![false; self.aliens.len()];

        for (b_idx, bullet) in bullets.iter().enumerate() {
            let bullet_rect = bullet.rect();
            for (a_idx, alien) in self.aliens.iter().enumerate() {
                if bullet_rect.intersects(&alien.rect()) {
                    bullet_hit[b_idx] = true;
                    alien_hit[a_idx] = true;
                }
            }
        }

        let destroyed = alien_hit.iter().filter(|&&hit| hit).count();
        if destroyed == 0 {
            return 0;
        }

        let mut idx = 0;
        bullets.retain(|_| {
            let keep = !bullet_hit[idx];
            idx += 1;
            keep
        });

        let mut idx = 0;
        self.aliens.retain(|_| {
            let keep = !alien_hit[idx];
            idx += 1;
            keep
        });

        destroyed
    }
}
