//! Game state and core simulation types
//!
//! All state that must survive a Continue (or be replayed deterministically)
//! lives here. The session owns exactly one `GameState`; restart resets it
//! in place.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::flight::Flight;
use super::palette::{Rgb, palette_color, pick_distinct_palette, random_palette};
use super::ring::generate_next_ring;
use crate::consts::BALL_RADIUS;
use crate::tuning::Tuning;
use crate::{bearing, polar_to_cartesian};

/// Ball kinematics phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Circling the current ring at constant angular speed
    #[default]
    Orbit,
    /// Flying straight at the next ring's center
    Dash,
}

/// A ring: the circle the ball orbits or dashes into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub center: Vec2,
    pub radius: f32,
}

impl Ring {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Point on the ring's circle at `angle`
    #[inline]
    pub fn point_at(&self, angle: f32) -> Vec2 {
        polar_to_cartesian(self.center, self.radius, angle)
    }
}

/// The ring just left, growing and fading out (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadingRing {
    pub ring: Ring,
    pub palette: usize,
    pub scale: f32,
    pub opacity: f32,
    pub started_ms: f64,
}

/// Collectible orb kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Life,
    Shield,
    AutoPlay,
    Coin,
}

impl PickupKind {
    /// Fixed system order used every frame
    pub const ALL: [PickupKind; 4] = [
        PickupKind::Life,
        PickupKind::Shield,
        PickupKind::AutoPlay,
        PickupKind::Coin,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PickupKind::Life => 0,
            PickupKind::Shield => 1,
            PickupKind::AutoPlay => 2,
            PickupKind::Coin => 3,
        }
    }

    /// Angular offset from the gate where the orb sits on the ring
    pub fn gate_offset(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            PickupKind::Life => FRAC_PI_2,
            PickupKind::Shield => -FRAC_PI_2,
            PickupKind::AutoPlay => PI,
            PickupKind::Coin => 0.75 * PI,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PickupKind::Life => "life",
            PickupKind::Shield => "shield",
            PickupKind::AutoPlay => "auto-play",
            PickupKind::Coin => "coin",
        }
    }
}

/// Things that happened during a frame (audio/haptics/UI hooks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    DashStarted,
    RingCompleted { perfect: bool, points: u32 },
    TapIgnored,
    TapMissed,
    DashTimedOut,
    ShieldAbsorbed { charges_left: u8 },
    LifeLost { lives_left: u8 },
    GameOver { score: u32 },
    PickupSpawned(PickupKind),
    PickupCollected(PickupKind),
    PickupLanded(PickupKind),
    ShieldArmed,
    AutoPlayStarted,
    AutoPlayEnded,
    Continued,
    Restarted,
}

/// Events are cleared every frame; this covers a busy frame without growing
pub const EVENT_CAPACITY: usize = 16;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance constants for this session
    pub tuning: Tuning,
    /// Session seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,

    // === Run status ===
    pub alive: bool,
    pub lives: u8,
    pub score: u32,
    pub mode: Mode,
    pub is_paused: bool,
    /// Consecutive rings without a miss
    pub streak: u32,
    /// Consecutive perfect taps
    pub combo: u32,
    /// Run-local coins, banked to the profile at game over
    pub coins: u32,
    pub rings_completed: u32,
    pub has_used_continue: bool,

    // === Ball ===
    /// Orbit angle on the current ring (frozen during a dash)
    pub angle: f32,
    /// Angular speed (radians/sec)
    pub speed: f32,
    pub ball: Vec2,

    // === Rings ===
    pub current: Ring,
    pub next: Ring,
    pub fading: Option<FadingRing>,
    pub current_palette: usize,
    pub next_palette: usize,

    // === Gate ===
    /// Bearing from the current ring's center to the next ring's center
    pub gate_angle: f32,
    pub gate_width: f32,
    /// Frame time the dash began, 0 when not dashing
    pub dash_start_ms: f64,
    /// Simulated time spent dashing (ms); pauses and clamped frames don't count
    pub dash_elapsed_ms: f64,

    // === Pickups attached to rings ===
    pub current_has_life: bool,
    /// The next completion will spawn a life orb
    pub next_has_life: bool,
    pub current_has_auto_play: bool,
    pub current_has_shield: bool,
    pub current_has_coin: bool,
    /// In-flight fly-to-HUD tweens, indexed by `PickupKind::index`
    pub flights: [Option<Flight>; 4],

    // === Power-up inventories ===
    pub auto_play_in_inventory: bool,
    pub auto_play_active: bool,
    /// Seconds of auto-play remaining
    pub auto_play_time_left: f32,
    pub shield_charges_left: u8,
    pub shield_available: bool,
    pub shield_armed: bool,

    // === Frame clock ===
    /// Timestamp of the frame being processed (ms)
    pub now_ms: f64,
    /// Timestamp of the previous processed frame
    pub last_frame_ms: Option<f64>,

    /// Events raised during the current frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given balance and seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.validated();
        let center = tuning.world_center();
        let base_radius = tuning.base_radius();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            alive: true,
            lives: tuning.lives_max,
            score: 0,
            mode: Mode::Orbit,
            is_paused: false,
            streak: 0,
            combo: 0,
            coins: 0,
            rings_completed: 0,
            has_used_continue: false,
            angle: 0.0,
            speed: tuning.start_orbit_speed,
            ball: center,
            current: Ring::new(center, base_radius),
            next: Ring::new(center, base_radius),
            fading: None,
            current_palette: 0,
            next_palette: 0,
            gate_angle: 0.0,
            gate_width: tuning.start_gate_width,
            dash_start_ms: 0.0,
            dash_elapsed_ms: 0.0,
            current_has_life: false,
            next_has_life: false,
            current_has_auto_play: false,
            current_has_shield: false,
            current_has_coin: false,
            flights: [None; 4],
            auto_play_in_inventory: false,
            auto_play_active: false,
            auto_play_time_left: 0.0,
            shield_charges_left: 0,
            shield_available: false,
            shield_armed: false,
            now_ms: 0.0,
            last_frame_ms: None,
            events: Vec::with_capacity(EVENT_CAPACITY),
            tuning,
        };

        state.reset_run();
        state
    }

    /// Put every run field back to its starting value, in place
    ///
    /// The RNG keeps its stream, so each run gets fresh rings and palettes.
    pub(crate) fn reset_run(&mut self) {
        let tuning = &self.tuning;
        let center = tuning.world_center();
        let base_radius = tuning.base_radius();

        self.alive = true;
        self.lives = tuning.lives_max;
        self.score = 0;
        self.mode = Mode::Orbit;
        self.is_paused = false;
        self.streak = 0;
        self.combo = 0;
        self.coins = 0;
        self.rings_completed = 0;
        self.has_used_continue = false;

        self.speed = tuning.start_orbit_speed;
        self.gate_width = tuning.start_gate_width;
        self.dash_start_ms = 0.0;
        self.dash_elapsed_ms = 0.0;

        self.current = Ring::new(center, base_radius);
        let world = Vec2::new(tuning.world_width, tuning.world_height);
        self.next = generate_next_ring(&mut self.rng, world, &self.current, base_radius);
        self.fading = None;
        self.current_palette = random_palette(&mut self.rng);
        self.next_palette = pick_distinct_palette(&mut self.rng, self.current_palette);

        self.gate_angle = bearing(self.current.center, self.next.center);
        // Start on the far side so the first tap isn't free
        self.angle = self.gate_angle + std::f32::consts::PI;
        self.ball = self.current.point_at(self.angle);

        self.clear_pickup_flags();
        self.cancel_flights();
        self.auto_play_in_inventory = false;
        self.auto_play_active = false;
        self.auto_play_time_left = 0.0;
        self.shield_charges_left = 0;
        self.shield_available = false;
        self.shield_armed = false;

        self.last_frame_ms = None;
    }

    /// World size as a vector
    #[inline]
    pub fn world(&self) -> Vec2 {
        Vec2::new(self.tuning.world_width, self.tuning.world_height)
    }

    /// Record an event for this frame
    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Snap the ball onto the current ring at its orbit angle
    #[inline]
    pub fn place_ball_on_ring(&mut self) {
        self.ball = self.current.point_at(self.angle);
    }

    /// Whether a pickup of `kind` is attached to the current ring
    pub fn has_pickup(&self, kind: PickupKind) -> bool {
        match kind {
            PickupKind::Life => self.current_has_life,
            PickupKind::Shield => self.current_has_shield,
            PickupKind::AutoPlay => self.current_has_auto_play,
            PickupKind::Coin => self.current_has_coin,
        }
    }

    pub fn set_pickup(&mut self, kind: PickupKind, attached: bool) {
        match kind {
            PickupKind::Life => self.current_has_life = attached,
            PickupKind::Shield => self.current_has_shield = attached,
            PickupKind::AutoPlay => self.current_has_auto_play = attached,
            PickupKind::Coin => self.current_has_coin = attached,
        }
    }

    /// Where an attached pickup of `kind` sits on the current ring
    pub fn pickup_anchor(&self, kind: PickupKind) -> Vec2 {
        self.current.point_at(self.gate_angle + kind.gate_offset())
    }

    pub fn flight(&self, kind: PickupKind) -> Option<&Flight> {
        self.flights[kind.index()].as_ref()
    }

    /// Drop every attached pickup (ring left or life lost)
    pub fn clear_pickup_flags(&mut self) {
        self.current_has_life = false;
        self.next_has_life = false;
        self.current_has_auto_play = false;
        self.current_has_shield = false;
        self.current_has_coin = false;
    }

    /// Abort every fly-to-HUD tween without applying deferred effects
    pub fn cancel_flights(&mut self) {
        self.flights = [None; 4];
    }

    /// Whether the one-time continue can still be used
    pub fn can_continue(&self) -> bool {
        !self.alive && self.lives == 0 && !self.has_used_continue
    }

    /// Read-only snapshot for renderers and HUDs
    pub fn view(&self) -> RenderView {
        let pickups = PickupKind::ALL.map(|kind| {
            let flight = self.flight(kind);
            let attached = self.has_pickup(kind);
            let pos = match flight {
                Some(flight) => flight.position(self.now_ms),
                None => self.pickup_anchor(kind),
            };
            PickupView {
                kind,
                visible: u8::from(attached || flight.is_some()),
                flying: u8::from(flight.is_some()),
                x: pos.x,
                y: pos.y,
            }
        });

        RenderView {
            alive: u8::from(self.alive),
            paused: u8::from(self.is_paused),
            dashing: u8::from(self.mode == Mode::Dash),
            ball_x: self.ball.x,
            ball_y: self.ball.y,
            ball_r: BALL_RADIUS,
            current_x: self.current.center.x,
            current_y: self.current.center.y,
            current_r: self.current.radius,
            current_color: palette_color(self.current_palette),
            next_x: self.next.center.x,
            next_y: self.next.center.y,
            next_r: self.next.radius,
            next_color: palette_color(self.next_palette),
            fading: self.fading.map(|f| FadingView {
                x: f.ring.center.x,
                y: f.ring.center.y,
                r: f.ring.radius,
                scale: f.scale,
                opacity: f.opacity,
                color: palette_color(f.palette),
            }),
            gate_angle: self.gate_angle,
            gate_width: self.gate_width,
            score: self.score,
            lives: self.lives,
            streak: self.streak,
            combo: self.combo,
            coins: self.coins,
            shield_charges: self.shield_charges_left,
            shield_armed: u8::from(self.shield_armed),
            shield_available: u8::from(self.shield_available),
            auto_play_ready: u8::from(self.auto_play_in_inventory),
            auto_play_active: u8::from(self.auto_play_active),
            auto_play_time_left: self.auto_play_time_left,
            next_has_life: u8::from(self.next_has_life),
            pickups,
        }
    }
}

/// Render/HUD view of one pickup kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupView {
    pub kind: PickupKind,
    pub visible: u8,
    pub flying: u8,
    pub x: f32,
    pub y: f32,
}

/// Render view of the fading ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadingView {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub scale: f32,
    pub opacity: f32,
    pub color: Rgb,
}

/// Flat numeric snapshot sampled once per frame by rendering and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    pub alive: u8,
    pub paused: u8,
    pub dashing: u8,
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_r: f32,
    pub current_x: f32,
    pub current_y: f32,
    pub current_r: f32,
    pub current_color: Rgb,
    pub next_x: f32,
    pub next_y: f32,
    pub next_r: f32,
    pub next_color: Rgb,
    pub fading: Option<FadingView>,
    pub gate_angle: f32,
    pub gate_width: f32,
    pub score: u32,
    pub lives: u8,
    pub streak: u32,
    pub combo: u32,
    pub coins: u32,
    pub shield_charges: u8,
    pub shield_armed: u8,
    pub shield_available: u8,
    pub auto_play_ready: u8,
    pub auto_play_active: u8,
    pub auto_play_time_left: f32,
    pub next_has_life: u8,
    pub pickups: [PickupView; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_fresh() {
        let state = GameState::new(Tuning::default(), 12345);
        assert!(state.alive);
        assert_eq!(state.lives, state.tuning.lives_max);
        assert_eq!(state.mode, Mode::Orbit);
        assert_eq!(state.speed, state.tuning.start_orbit_speed);
        assert_eq!(state.gate_width, state.tuning.start_gate_width);
        assert_ne!(state.current_palette, state.next_palette);
        // Ball sits on the current ring
        let r = state.ball.distance(state.current.center);
        assert!((r - state.current.radius).abs() < 1e-3);
    }

    #[test]
    fn test_new_sanitizes_tuning() {
        let tuning = Tuning {
            autoplay_spawn_chance: -1.0,
            shield_spawn_chance: 2.5,
            coin_spawn_chance: 5.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 4);
        assert_eq!(state.tuning.autoplay_spawn_chance, 0.0);
        assert_eq!(state.tuning.shield_spawn_chance, 1.0);
        assert_eq!(state.tuning.coin_spawn_chance, 1.0);

        // Out-of-range chances would panic inside random_bool
        state.complete_ring(false);
        assert!(state.current_has_coin);
        assert!(state.current_has_shield);
        assert!(!state.current_has_auto_play);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(Tuning::default(), 99);
        let b = GameState::new(Tuning::default(), 99);
        assert_eq!(a.next, b.next);
        assert_eq!(a.current_palette, b.current_palette);
        assert_eq!(a.gate_angle, b.gate_angle);
    }

    #[test]
    fn test_pickup_anchors_are_distinct() {
        let state = GameState::new(Tuning::default(), 5);
        for (i, a) in PickupKind::ALL.iter().enumerate() {
            for b in &PickupKind::ALL[i + 1..] {
                let d = state.pickup_anchor(*a).distance(state.pickup_anchor(*b));
                assert!(d > 10.0, "{:?} and {:?} overlap", a, b);
            }
        }
    }

    #[test]
    fn test_view_reports_flags_as_bits() {
        let mut state = GameState::new(Tuning::default(), 5);
        state.current_has_coin = true;
        let view = state.view();
        let coin = view.pickups[PickupKind::Coin.index()];
        assert_eq!(coin.visible, 1);
        assert_eq!(coin.flying, 0);
        let anchor = state.pickup_anchor(PickupKind::Coin);
        assert_eq!((coin.x, coin.y), (anchor.x, anchor.y));
        assert_eq!(view.pickups[PickupKind::Life.index()].visible, 0);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(Tuning::default(), 77);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.next, state.next);
        assert_eq!(back.lives, state.lives);
    }
}
