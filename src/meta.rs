//! Game-over bridge between a run and the player profile
//!
//! Watches `alive` frame to frame. On the alive -> dead edge it captures the
//! run's score and coins and commits them to the profile store, unless the
//! one-time continue is still on offer; then the commit waits for the final
//! game over, or for a restart from the game-over screen. Each run commits at
//! most once.

use anyhow::Result;

use crate::profile::{Profile, ProfileStore, RunResult};
use crate::sim::GameState;

/// Tracks game-over edges and commits each run to the profile once
#[derive(Debug, Clone)]
pub struct GameOverBridge {
    was_alive: bool,
    final_score: u32,
    final_coins: u32,
    /// Game over seen but commit deferred (continue still available)
    pending: bool,
    /// This run has already been committed (or tried to)
    committed: bool,
    profile: Profile,
}

impl GameOverBridge {
    pub fn new(profile: Profile) -> Self {
        Self {
            was_alive: true,
            final_score: 0,
            final_coins: 0,
            pending: false,
            committed: false,
            profile,
        }
    }

    /// Check for alive edges after a frame
    pub fn observe<S: ProfileStore + ?Sized>(&mut self, state: &GameState, store: &mut S) {
        match (self.was_alive, state.alive) {
            (true, false) => {
                self.final_score = state.score;
                self.final_coins = state.coins;
                if state.can_continue() {
                    log::info!("Game over at {}, commit held for continue", state.score);
                    self.pending = true;
                } else {
                    self.commit(store);
                }
            }
            // Revived by continue: the run goes on, commit waits for the next game over
            (false, true) => self.pending = false,
            _ => {}
        }
        self.was_alive = state.alive;
    }

    /// Player asked for a new run; call before the state is reset
    pub fn on_restart<S: ProfileStore + ?Sized>(&mut self, store: &mut S) {
        self.flush(store);
        self.was_alive = true;
        self.pending = false;
        self.committed = false;
        self.final_score = 0;
        self.final_coins = 0;
    }

    /// Commit a held game over (leaving the game screen)
    pub fn flush<S: ProfileStore + ?Sized>(&mut self, store: &mut S) {
        if self.pending {
            self.commit(store);
        }
    }

    fn commit<S: ProfileStore + ?Sized>(&mut self, store: &mut S) {
        self.pending = false;
        if self.committed {
            return;
        }
        // At most one attempt per run, even if it fails
        self.committed = true;

        let run = RunResult {
            score: self.final_score,
            coins_earned: self.final_coins,
        };
        match store.commit_run(run) {
            Ok(profile) => {
                log::info!(
                    "Run committed: score={} coins={} best={}",
                    run.score,
                    run.coins_earned,
                    profile.best_score
                );
                self.profile = profile;
            }
            Err(e) => log::warn!("Failed to commit run: {e:#}"),
        }
    }

    /// Score captured at the last game over
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    /// Coins captured at the last game over
    pub fn final_coins(&self) -> u32 {
        self.final_coins
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Last known profile (stale if a commit failed)
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Best score including a run not yet committed
    pub fn best_score(&self) -> u32 {
        if self.pending {
            self.profile.best_score.max(self.final_score)
        } else {
            self.profile.best_score
        }
    }
}

/// Share collaborator (OS share sheet, clipboard, ...)
pub trait ShareSink {
    fn share(&mut self, text: &str) -> Result<()>;
}

/// Share sink that only logs the text
#[derive(Debug, Default, Clone, Copy)]
pub struct LogShareSink;

impl ShareSink for LogShareSink {
    fn share(&mut self, text: &str) -> Result<()> {
        log::info!("Share: {text}");
        Ok(())
    }
}

/// Text handed to the share collaborator
pub fn share_text(score: u32, best: u32) -> String {
    format!("I scored {score} in Orbit Dash! Best: {best}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MemoryProfileStore;
    use crate::tuning::Tuning;

    fn dead_state(score: u32, coins: u32, used_continue: bool) -> GameState {
        let mut state = GameState::new(Tuning::default(), 1);
        state.score = score;
        state.coins = coins;
        state.has_used_continue = used_continue;
        state.lives = 1;
        state.lose_life();
        state
    }

    #[test]
    fn test_final_game_over_commits_once() {
        let mut store = MemoryProfileStore::new();
        let mut bridge = GameOverBridge::new(Profile::default());
        let state = dead_state(30, 4, true);

        bridge.observe(&state, &mut store);
        bridge.observe(&state, &mut store);
        bridge.flush(&mut store);

        assert_eq!(store.commit_count(), 1);
        assert_eq!(bridge.final_score(), 30);
        assert_eq!(bridge.profile().best_score, 30);
        assert_eq!(bridge.profile().total_coins, 4);
    }

    #[test]
    fn test_commit_held_while_continue_available() {
        let mut store = MemoryProfileStore::new();
        let mut bridge = GameOverBridge::new(Profile::default());
        let mut state = dead_state(10, 2, false);

        bridge.observe(&state, &mut store);
        assert!(bridge.is_pending());
        assert_eq!(store.commit_count(), 0);
        assert_eq!(bridge.best_score(), 10);

        assert!(state.continue_run());
        bridge.observe(&state, &mut store);
        assert!(!bridge.is_pending());

        state.score = 15;
        state.lose_life();
        bridge.observe(&state, &mut store);
        assert_eq!(store.commit_count(), 1);
        assert_eq!(store.profile.best_score, 15);
    }

    #[test]
    fn test_restart_from_game_over_commits_held_run() {
        let mut store = MemoryProfileStore::new();
        let mut bridge = GameOverBridge::new(Profile::default());
        let mut state = dead_state(8, 1, false);

        bridge.observe(&state, &mut store);
        bridge.on_restart(&mut store);
        state.restart();
        bridge.observe(&state, &mut store);

        assert_eq!(store.commit_count(), 1);
        assert_eq!(store.profile.best_score, 8);
        assert!(!bridge.is_committed(), "fresh run starts uncommitted");
    }

    #[test]
    fn test_failed_commit_is_not_retried() {
        let mut store = MemoryProfileStore::failing();
        let stale = Profile {
            total_coins: 5,
            best_score: 99,
        };
        let mut bridge = GameOverBridge::new(stale);
        let state = dead_state(10, 1, true);

        bridge.observe(&state, &mut store);
        bridge.flush(&mut store);
        bridge.on_restart(&mut store);

        assert_eq!(store.commit_count(), 1);
        assert_eq!(bridge.profile(), stale);
    }

    #[test]
    fn test_share_text() {
        assert_eq!(share_text(12, 40), "I scored 12 in Orbit Dash! Best: 40");
    }
}
