//! High score persistence
//!
//! The game only ever stores one integer: the best score so far. Browsers keep
//! it in LocalStorage; native runs and tests keep it in memory.

/// Key the high score is stored under
pub const HIGH_SCORE_KEY: &str = "highest_score";

/// Integer key-value slot for the high score
pub trait HighScoreStore {
    /// Stored high score, 0 when nothing was saved yet
    fn load(&self) -> u64;

    fn save(&mut self, score: u64);
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self { value: Some(score) }
    }

    /// Whether anything has been saved
    #[cfg(test)]
    pub fn is_written(&self) -> bool {
        self.value.is_some()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.value.unwrap_or(0)
    }

    fn save(&mut self, score: u64) {
        self.value = Some(score);
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        let stored = Self::storage().and_then(|s| s.get_item(HIGH_SCORE_KEY).ok().flatten());
        match stored.map(|raw| raw.trim().parse::<u64>()) {
            Some(Ok(score)) => score,
            Some(Err(err)) => {
                log::warn!("Ignoring unreadable high score: {err}");
                0
            }
            None => 0,
        }
    }

    fn save(&mut self, score: u64) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(HIGH_SCORE_KEY, &score.to_string()).is_err() {
                log::warn!("Could not write high score");
            } else {
                log::info!("High score saved: {score}");
            }
        }
    }
}
