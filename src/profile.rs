//! Player profile persistence
//!
//! The profile survives across runs: best score and banked coins. Storage
//! sits behind `ProfileStore` so the session never cares where it lives
//! (a JSON file natively, LocalStorage in the browser, memory in tests).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Persistent player profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Coins banked over every run
    pub total_coins: u64,
    /// Highest score ever reached
    pub best_score: u32,
}

/// Outcome of one finished run, committed at game over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub score: u32,
    pub coins_earned: u32,
}

impl Profile {
    /// Fold a finished run into the profile
    pub fn apply(self, run: RunResult) -> Self {
        Self {
            total_coins: self.total_coins.saturating_add(u64::from(run.coins_earned)),
            best_score: self.best_score.max(run.score),
        }
    }
}

/// Persistence collaborator for the player profile
pub trait ProfileStore {
    /// Read the stored profile (default if nothing stored yet)
    fn load_profile(&mut self) -> Result<Profile>;

    /// Apply a run to the stored profile and return the updated profile
    fn commit_run(&mut self, run: RunResult) -> Result<Profile>;
}

impl<S: ProfileStore + ?Sized> ProfileStore for Box<S> {
    fn load_profile(&mut self) -> Result<Profile> {
        (**self).load_profile()
    }

    fn commit_run(&mut self, run: RunResult) -> Result<Profile> {
        (**self).commit_run(run)
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    pub profile: Profile,
    /// Make every load fail
    pub fail_loads: bool,
    /// Make every commit fail
    pub fail_commits: bool,
    commits: usize,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// A store whose loads and commits all fail
    pub fn failing() -> Self {
        Self {
            fail_loads: true,
            fail_commits: true,
            ..Self::default()
        }
    }

    /// Number of commits attempted (failed ones included)
    pub fn commit_count(&self) -> usize {
        self.commits
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load_profile(&mut self) -> Result<Profile> {
        if self.fail_loads {
            anyhow::bail!("memory profile store set to fail loads");
        }
        Ok(self.profile)
    }

    fn commit_run(&mut self, run: RunResult) -> Result<Profile> {
        self.commits += 1;
        if self.fail_commits {
            anyhow::bail!("memory profile store set to fail commits");
        }
        self.profile = self.profile.apply(run);
        Ok(self.profile)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileProfileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Profile stored as a JSON file
    #[derive(Debug, Clone)]
    pub struct FileProfileStore {
        path: PathBuf,
    }

    impl FileProfileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `<data dir>/orbit-dash/profile.json`, if the platform has a data dir
        pub fn default_location() -> Option<Self> {
            dirs::data_local_dir().map(|dir| Self::new(dir.join("orbit-dash").join("profile.json")))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn write(&self, profile: &Profile) -> Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating profile directory {}", parent.display()))?;
            }

            let json = serde_json::to_string_pretty(profile).context("serializing profile")?;

            // Write beside the target, then swap it in
            let tmp = self.path.with_extension("json.tmp");
            fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
            fs::rename(&tmp, &self.path)
                .with_context(|| format!("replacing {}", self.path.display()))?;
            Ok(())
        }
    }

    impl ProfileStore for FileProfileStore {
        fn load_profile(&mut self) -> Result<Profile> {
            if !self.path.exists() {
                log::info!("No profile at {:?}, starting fresh", self.path);
                return Ok(Profile::default());
            }

            let contents = fs::read_to_string(&self.path)
                .with_context(|| format!("reading profile {}", self.path.display()))?;
            let profile = serde_json::from_str(&contents)
                .with_context(|| format!("parsing profile {}", self.path.display()))?;
            log::info!("Loaded profile from {:?}", self.path);
            Ok(profile)
        }

        fn commit_run(&mut self, run: RunResult) -> Result<Profile> {
            // An unreadable file is replaced rather than blocking the commit
            let current = self.load_profile().unwrap_or_else(|e| {
                log::warn!("Discarding unreadable profile: {e:#}");
                Profile::default()
            });
            let updated = current.apply(run);
            self.write(&updated)?;
            log::info!(
                "Profile saved: best={} coins={}",
                updated.best_score,
                updated.total_coins
            );
            Ok(updated)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageProfileStore;

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use super::*;
    use anyhow::anyhow;

    /// Profile stored in the browser's LocalStorage
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorageProfileStore;

    impl LocalStorageProfileStore {
        const STORAGE_KEY: &'static str = "orbit_dash_profile";

        pub fn new() -> Self {
            Self
        }

        fn storage() -> Result<web_sys::Storage> {
            web_sys::window()
                .context("no window")?
                .local_storage()
                .map_err(|e| anyhow!("localStorage unavailable: {e:?}"))?
                .context("localStorage disabled")
        }
    }

    impl ProfileStore for LocalStorageProfileStore {
        fn load_profile(&mut self) -> Result<Profile> {
            let storage = Self::storage()?;
            let stored = storage
                .get_item(Self::STORAGE_KEY)
                .map_err(|e| anyhow!("reading profile: {e:?}"))?;

            match stored {
                Some(json) => {
                    let profile = serde_json::from_str(&json).context("parsing stored profile")?;
                    log::info!("Loaded profile from localStorage");
                    Ok(profile)
                }
                None => {
                    log::info!("No stored profile, starting fresh");
                    Ok(Profile::default())
                }
            }
        }

        fn commit_run(&mut self, run: RunResult) -> Result<Profile> {
            let current = self.load_profile().unwrap_or_else(|e| {
                log::warn!("Discarding unreadable profile: {e:#}");
                Profile::default()
            });
            let updated = current.apply(run);

            let json = serde_json::to_string(&updated).context("serializing profile")?;
            Self::storage()?
                .set_item(Self::STORAGE_KEY, &json)
                .map_err(|e| anyhow!("writing profile: {e:?}"))?;
            log::info!(
                "Profile saved: best={} coins={}",
                updated.best_score,
                updated.total_coins
            );
            Ok(updated)
        }
    }
}
