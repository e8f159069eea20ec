//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame clock
//! - Hosting the session in a browser (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Monotonic milliseconds since the first call
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// `performance.now()`, or 0 without a window
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}
