//! One mounted game session
//!
//! Owns the game state, the game-over bridge and the profile store, and is
//! driven once per rendered frame by the host (browser loop, headless runner,
//! tests).

use crate::meta::{GameOverBridge, ShareSink, share_text};
use crate::profile::{Profile, ProfileStore};
use crate::sim::{FrameInput, GameEvent, GameState, RenderView, tick};
use crate::tuning::Tuning;

pub struct GameSession<S: ProfileStore> {
    state: GameState,
    bridge: GameOverBridge,
    store: S,
}

impl<S: ProfileStore> GameSession<S> {
    /// Start a session, loading the profile (defaults if unreadable)
    pub fn new(tuning: Tuning, seed: u64, mut store: S) -> Self {
        let profile = store.load_profile().unwrap_or_else(|e| {
            log::warn!("Failed to load profile, using defaults: {e:#}");
            Profile::default()
        });
        log::info!(
            "Session started: seed={} best={} coins={}",
            seed,
            profile.best_score,
            profile.total_coins
        );

        Self {
            state: GameState::new(tuning, seed),
            bridge: GameOverBridge::new(profile),
            store,
        }
    }

    /// Advance one frame; returns the events it raised
    pub fn frame(&mut self, input: &FrameInput) -> &[GameEvent] {
        tick(&mut self.state, input);
        self.bridge.observe(&self.state, &mut self.store);
        &self.state.events
    }

    /// New run, committing a held game over first
    pub fn restart(&mut self) {
        self.bridge.on_restart(&mut self.store);
        self.state.restart();
    }

    /// Spend the one-time continue; false if unavailable
    pub fn continue_run(&mut self) -> bool {
        let continued = self.state.continue_run();
        if continued {
            self.bridge.observe(&self.state, &mut self.store);
        }
        continued
    }

    /// Leaving the game screen: commit anything still held
    pub fn leave(&mut self) {
        self.bridge.flush(&mut self.store);
    }

    /// Score shown on the game-over screen (live score while playing)
    pub fn display_score(&self) -> u32 {
        if self.state.alive {
            self.state.score
        } else {
            self.bridge.final_score()
        }
    }

    pub fn share_text(&self) -> String {
        let score = self.display_score();
        share_text(score, self.bridge.best_score().max(score))
    }

    /// Hand the share text to a sink; failures are logged and dropped
    pub fn share(&self, sink: &mut dyn ShareSink) {
        if let Err(e) = sink.share(&self.share_text()) {
            log::warn!("Share failed: {e:#}");
        }
    }

    pub fn view(&self) -> RenderView {
        self.state.view()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn profile(&self) -> Profile {
        self.bridge.profile()
    }

    pub fn bridge(&self) -> &GameOverBridge {
        &self.bridge
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
