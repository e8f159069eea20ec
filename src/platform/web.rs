//! Browser host facade
//!
//! JS drives the session from its `requestAnimationFrame` loop and renders
//! from the JSON view returned by each frame.

use wasm_bindgen::prelude::*;

use crate::profile::LocalStorageProfileStore;
use crate::session::GameSession;
use crate::sim::FrameInput;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logger already initialized"));
    }
    log::info!("Orbit Dash core loaded");
}

/// One game screen mounted in the page
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession<LocalStorageProfileStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` overrides the shipped balance; a bad value is ignored
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> WebGame {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning override: {e:#}");
                Tuning::default()
            }),
            None => Tuning::default(),
        };
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;

        WebGame {
            session: GameSession::new(tuning, seed, LocalStorageProfileStore::new()),
        }
    }

    /// Advance one frame and return the render view as JSON
    pub fn frame(
        &mut self,
        now_ms: f64,
        tap: bool,
        toggle_pause: bool,
        activate_shield: bool,
        activate_auto_play: bool,
    ) -> Result<String, JsValue> {
        let input = FrameInput {
            now_ms,
            tap,
            toggle_pause,
            activate_shield,
            activate_auto_play,
        };
        self.session.frame(&input);
        self.view_json()
    }

    /// Current render view as JSON
    pub fn view_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.view()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events raised by the last frame as JSON (audio/haptics hooks)
    pub fn events_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.state().events)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    pub fn continue_run(&mut self) -> bool {
        self.session.continue_run()
    }

    pub fn can_continue(&self) -> bool {
        self.session.state().can_continue()
    }

    pub fn leave(&mut self) {
        self.session.leave();
    }

    pub fn final_score(&self) -> u32 {
        self.session.display_score()
    }

    pub fn best_score(&self) -> u32 {
        self.session.bridge().best_score()
    }

    pub fn total_coins(&self) -> f64 {
        self.session.profile().total_coins as f64
    }

    pub fn share_text(&self) -> String {
        self.session.share_text()
    }
}
