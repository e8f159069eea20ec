//! Run lifecycle transitions
//!
//! Every state change caused by a ring completion, a miss, a restart or a
//! continue goes through these functions.

use rand::Rng;

use super::palette::pick_distinct_palette;
use super::pickups::spawn_pickup;
use super::ring::generate_next_ring;
use super::scoring::{compute_gained_points, ring_base_points};
use super::state::{FadingRing, GameEvent, GameState, Mode, PickupKind};
use crate::bearing;

impl GameState {
    /// Ball entered the next ring
    pub fn complete_ring(&mut self, perfect: bool) {
        // Score, streak, combo
        self.streak += 1;
        let points = compute_gained_points(ring_base_points(perfect), self.streak);
        self.score = self.score.saturating_add(points);
        self.combo = if perfect { self.combo + 1 } else { 0 };
        self.rings_completed += 1;

        // Orbs left behind on the old ring are forfeited
        self.clear_pickup_flags();

        // Palettes shift forward; the left ring keeps its colour while fading
        let left_palette = self.current_palette;
        self.current_palette = self.next_palette;
        self.next_palette = pick_distinct_palette(&mut self.rng, self.current_palette);

        self.fading = Some(FadingRing {
            ring: self.current,
            palette: left_palette,
            scale: 1.0,
            opacity: 1.0,
            started_ms: self.now_ms,
        });

        // Arrival angle must be taken before the rings move
        let arrival = if self.ball.distance_squared(self.next.center) > 1e-6 {
            bearing(self.next.center, self.ball)
        } else {
            bearing(self.next.center, self.current.center)
        };

        // Promote next -> current and roll a new next ring
        self.current = self.next;
        let world = self.world();
        let base_radius = self.tuning.base_radius();
        self.next = generate_next_ring(&mut self.rng, world, &self.current, base_radius);

        // Difficulty ramps
        self.speed = (self.speed + self.tuning.speed_inc_per_ring).min(self.tuning.speed_cap);
        self.gate_width =
            (self.gate_width - self.tuning.shrink_per_ring).max(self.tuning.min_gate_width);
        self.gate_angle = bearing(self.current.center, self.next.center);

        // Back to orbiting on the new ring
        self.angle = arrival;
        self.place_ball_on_ring();
        self.mode = Mode::Orbit;
        self.dash_start_ms = 0.0;
        self.dash_elapsed_ms = 0.0;

        self.emit(GameEvent::RingCompleted { perfect, points });

        // Streak doubles as progress toward a free life; paying out resets it
        if self.streak >= self.tuning.streak_for_life && self.lives < self.tuning.lives_max {
            spawn_pickup(self, PickupKind::Life);
            log::info!("Streak {} earned a life orb", self.streak);
            self.streak = 0;
        }

        let autoplay_chance = self.tuning.autoplay_spawn_chance;
        if !self.current_has_auto_play && self.rng.random_bool(autoplay_chance) {
            spawn_pickup(self, PickupKind::AutoPlay);
        }
        let shield_chance = self.tuning.shield_spawn_chance;
        if !self.current_has_shield
            && self.shield_charges_left < self.tuning.max_shield_charges
            && self.rng.random_bool(shield_chance)
        {
            spawn_pickup(self, PickupKind::Shield);
        }
        let coin_chance = self.tuning.coin_spawn_chance;
        if !self.current_has_coin && self.rng.random_bool(coin_chance) {
            spawn_pickup(self, PickupKind::Coin);
        }

        self.next_has_life = self.streak + 1 >= self.tuning.streak_for_life
            && self.lives < self.tuning.lives_max;

        if self.rings_completed.is_multiple_of(10) {
            log::info!(
                "Ring {}: score={} speed={:.2} gate={:.3}",
                self.rings_completed,
                self.score,
                self.speed,
                self.gate_width
            );
        }
    }

    /// A miss that gets past the shield
    pub fn lose_life(&mut self) {
        self.streak = 0;
        self.combo = 0;
        self.clear_pickup_flags();

        self.mode = Mode::Orbit;
        self.dash_start_ms = 0.0;
        self.dash_elapsed_ms = 0.0;
        self.place_ball_on_ring();

        if self.lives <= 1 {
            self.lives = 0;
            self.alive = false;
            log::info!(
                "Game over: score={} rings={} coins={}",
                self.score,
                self.rings_completed,
                self.coins
            );
            self.emit(GameEvent::GameOver { score: self.score });
        } else {
            self.lives -= 1;
            log::info!("Life lost, {} left", self.lives);
            self.emit(GameEvent::LifeLost {
                lives_left: self.lives,
            });
        }
    }

    /// Route a miss through the shield first
    ///
    /// An armed shield eats the miss for one charge and stays armed while
    /// charges remain.
    pub fn register_miss(&mut self) {
        if !self.alive {
            return;
        }

        if self.shield_armed && self.shield_charges_left > 0 {
            self.shield_charges_left -= 1;
            if self.shield_charges_left == 0 {
                self.shield_armed = false;
                self.shield_available = false;
            }
            self.mode = Mode::Orbit;
            self.dash_start_ms = 0.0;
            self.dash_elapsed_ms = 0.0;
            self.place_ball_on_ring();
            log::debug!("Shield absorbed a miss, {} charges left", self.shield_charges_left);
            self.emit(GameEvent::ShieldAbsorbed {
                charges_left: self.shield_charges_left,
            });
        } else {
            self.lose_life();
        }
    }

    /// Start a brand new run in place
    pub fn restart(&mut self) {
        self.cancel_flights();
        self.reset_run();
        log::info!("Run restarted");
        self.emit(GameEvent::Restarted);
    }

    /// One-time revive after the last life is lost
    ///
    /// Score, streak, rings and gate difficulty carry over untouched. Returns
    /// false (and changes nothing) if the run is still alive or the continue
    /// was already spent.
    pub fn continue_run(&mut self) -> bool {
        if !self.can_continue() {
            return false;
        }

        self.cancel_flights();
        self.clear_pickup_flags();
        self.lives = 1;
        self.alive = true;
        self.has_used_continue = true;
        self.mode = Mode::Orbit;
        self.dash_start_ms = 0.0;
        self.dash_elapsed_ms = 0.0;
        self.last_frame_ms = None;
        self.place_ball_on_ring();

        log::info!("Continue used at score {}", self.score);
        self.emit(GameEvent::Continued);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pickups::{FrameSnapshot, run_pickup_systems};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn quiet_tuning() -> Tuning {
        Tuning {
            autoplay_spawn_chance: 0.0,
            shield_spawn_chance: 0.0,
            coin_spawn_chance: 0.0,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_perfect_run_scoring() {
        let mut state = GameState::new(quiet_tuning(), 1);
        assert_eq!(state.speed, 1.2);
        for _ in 0..5 {
            state.complete_ring(true);
        }
        // 2 + 2 + 2 + 2 + (2 x2 at streak 5)
        assert_eq!(state.score, 12);
        assert_eq!(state.combo, 5);
        assert_eq!(state.streak, 5);
    }

    #[test]
    fn test_non_perfect_resets_combo_only() {
        let mut state = GameState::new(quiet_tuning(), 1);
        state.complete_ring(true);
        state.complete_ring(true);
        state.complete_ring(false);
        assert_eq!(state.combo, 0);
        assert_eq!(state.streak, 3);
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_complete_ring_promotes_next() {
        let mut state = GameState::new(quiet_tuning(), 3);
        let old_current = state.current;
        let old_next = state.next;
        let old_next_palette = state.next_palette;
        state.ball = old_next.center + glam::Vec2::new(old_next.radius * 0.5, 0.0);
        state.mode = Mode::Dash;
        state.dash_start_ms = 10.0;

        state.complete_ring(false);

        assert_eq!(state.current, old_next);
        assert_eq!(state.current_palette, old_next_palette);
        assert_ne!(state.next_palette, state.current_palette);
        assert_eq!(state.mode, Mode::Orbit);
        assert_eq!(state.dash_start_ms, 0.0);
        // Arrived from the +x side, so the orbit resumes at angle ~0
        assert!(state.angle.abs() < 1e-4);
        let fading = state.fading.expect("left ring should fade");
        assert_eq!(fading.ring, old_current);
        let gate = crate::bearing(state.current.center, state.next.center);
        assert_eq!(state.gate_angle, gate);
    }

    #[test]
    fn test_complete_ring_clears_stale_pickups() {
        let mut state = GameState::new(quiet_tuning(), 3);
        state.current_has_coin = true;
        state.current_has_shield = true;
        state.complete_ring(false);
        assert!(!state.current_has_coin);
        assert!(!state.current_has_shield);
    }

    #[test]
    fn test_streak_spawns_life_orb_and_resets() {
        let mut state = GameState::new(quiet_tuning(), 9);
        state.lives = 1;
        let need = state.tuning.streak_for_life;
        for _ in 0..need - 1 {
            state.complete_ring(false);
        }
        assert!(state.next_has_life);
        assert!(!state.current_has_life);
        state.complete_ring(false);
        assert!(state.current_has_life);
        assert_eq!(state.streak, 0);
    }

    #[test]
    fn test_no_life_orb_at_full_lives() {
        let mut state = GameState::new(quiet_tuning(), 9);
        for _ in 0..state.tuning.streak_for_life {
            state.complete_ring(false);
        }
        assert!(!state.current_has_life);
        assert_eq!(state.streak, state.tuning.streak_for_life);
    }

    #[test]
    fn test_last_life_lost() {
        let mut state = GameState::new(quiet_tuning(), 2);
        state.lives = 1;
        state.lose_life();
        assert_eq!(state.lives, 0);
        assert!(!state.alive);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_lose_life_resets_streak_and_flags() {
        let mut state = GameState::new(quiet_tuning(), 2);
        state.streak = 4;
        state.combo = 2;
        state.current_has_life = true;
        state.next_has_life = true;
        state.lose_life();
        assert_eq!(state.lives, 2);
        assert!(state.alive);
        assert_eq!((state.streak, state.combo), (0, 0));
        assert!(!state.current_has_life && !state.next_has_life);
    }

    #[test]
    fn test_shield_absorbs_miss() {
        let mut state = GameState::new(quiet_tuning(), 2);
        state.shield_charges_left = 2;
        state.shield_armed = true;
        state.streak = 3;
        state.register_miss();
        assert_eq!(state.lives, 3);
        assert_eq!(state.streak, 3);
        assert_eq!(state.shield_charges_left, 1);
        assert!(state.shield_armed);

        state.register_miss();
        assert_eq!(state.shield_charges_left, 0);
        assert!(!state.shield_armed);

        state.register_miss();
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_continue_once() {
        let mut state = GameState::new(quiet_tuning(), 4);
        assert!(!state.continue_run(), "continue while alive must be a no-op");

        state.score = 42;
        state.lives = 1;
        state.lose_life();
        let gate_width = state.gate_width;

        assert!(state.continue_run());
        assert_eq!(state.lives, 1);
        assert!(state.alive);
        assert_eq!(state.score, 42);
        assert_eq!(state.gate_width, gate_width);

        state.lose_life();
        assert!(!state.continue_run());
        assert_eq!(state.lives, 0);
        assert!(!state.alive);
    }

    #[test]
    fn test_restart_resets_in_place() {
        let mut state = GameState::new(quiet_tuning(), 8);
        for _ in 0..6 {
            state.complete_ring(true);
        }
        state.coins = 3;
        state.shield_charges_left = 2;
        state.lives = 1;
        state.lose_life();

        state.restart();
        assert!(state.alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.coins, 0);
        assert_eq!(state.lives, state.tuning.lives_max);
        assert_eq!(state.speed, state.tuning.start_orbit_speed);
        assert_eq!(state.gate_width, state.tuning.start_gate_width);
        assert_eq!(state.shield_charges_left, 0);
        assert!(!state.has_used_continue);
        assert!(state.fading.is_none());
    }

    /// Collect an auto-play orb at `now_ms` so its flight is in the air
    fn auto_play_in_flight(state: &mut GameState, now_ms: f64) {
        spawn_pickup(state, PickupKind::AutoPlay);
        let snapshot = FrameSnapshot {
            ball: state.pickup_anchor(PickupKind::AutoPlay),
            now_ms,
            alive: true,
            paused: false,
        };
        run_pickup_systems(state, &snapshot);
        assert!(state.flight(PickupKind::AutoPlay).is_some());
    }

    /// Run the pickup systems long after every flight should have landed
    fn settle_flights(state: &mut GameState, now_ms: f64) {
        let snapshot = FrameSnapshot {
            ball: Vec2::ZERO,
            now_ms,
            alive: state.alive,
            paused: false,
        };
        run_pickup_systems(state, &snapshot);
    }

    #[test]
    fn test_restart_cancels_flights() {
        let mut state = GameState::new(quiet_tuning(), 21);
        auto_play_in_flight(&mut state, 0.0);

        state.restart();
        assert!(state.flights.iter().all(Option::is_none));

        let later = state.tuning.fly_ms.auto_play * 2.0;
        settle_flights(&mut state, later);
        assert!(!state.auto_play_in_inventory);
    }

    #[test]
    fn test_continue_cancels_flights() {
        let mut state = GameState::new(quiet_tuning(), 22);
        auto_play_in_flight(&mut state, 0.0);

        state.lives = 1;
        state.lose_life();
        assert!(state.flight(PickupKind::AutoPlay).is_some());

        assert!(state.continue_run());
        assert!(state.flights.iter().all(Option::is_none));

        let later = state.tuning.fly_ms.auto_play * 2.0;
        settle_flights(&mut state, later);
        assert!(!state.auto_play_in_inventory);
    }
}
