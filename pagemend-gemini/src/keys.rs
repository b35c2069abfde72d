//! Round-robin API key rotation with failure blacklisting
//!
//! Keys that produce an error are excluded for a fixed window and come
//! back into rotation automatically once the window has elapsed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// How long a failed key stays out of rotation
pub const DEFAULT_BLACKLIST_WINDOW: Duration = Duration::from_secs(300);

/// Environment variable prefix for key discovery (`GEMINI_API_KEY1`..`GEMINI_API_KEY5`)
pub const ENV_PREFIX: &str = "GEMINI_API_KEY";

/// A rotating pool of API keys.
///
/// `next_key` hands out keys round-robin, skipping any key whose last
/// failure is still inside the blacklist window.
#[derive(Debug)]
pub struct KeyRing {
    keys: Vec<String>,
    cursor: usize,
    blacklisted: HashMap<String, Instant>,
    window: Duration,
}

impl KeyRing {
    /// Creates a ring over the given keys with the default blacklist window.
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: 0,
            blacklisted: HashMap::new(),
            window: DEFAULT_BLACKLIST_WINDOW,
        }
    }

    /// Discovers keys from `GEMINI_API_KEY1` through `GEMINI_API_KEY5`.
    ///
    /// Unset or empty variables are skipped, so gaps in the numbering
    /// are fine.
    pub fn from_env() -> Self {
        let keys: Vec<String> = (1..=5)
            .filter_map(|i| std::env::var(format!("{ENV_PREFIX}{i}")).ok())
            .filter(|key| !key.is_empty())
            .collect();
        debug!(count = keys.len(), "loaded API keys from environment");
        Self::new(keys)
    }

    /// Sets the blacklist window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Number of keys in the ring, blacklisted or not.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the ring holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the next usable key and advances the cursor.
    ///
    /// Scans at most one full revolution. Returns `None` when the ring
    /// is empty or every key is still inside its blacklist window.
    pub fn next_key(&mut self) -> Option<String> {
        for _ in 0..self.keys.len() {
            let key = self.keys[self.cursor].clone();
            self.cursor = (self.cursor + 1) % self.keys.len();
            if self.is_usable(&key) {
                return Some(key);
            }
        }
        None
    }

    /// Takes a key out of rotation for the blacklist window.
    pub fn blacklist(&mut self, key: &str) {
        let preview: String = key.chars().take(5).collect();
        warn!(key = %preview, window = ?self.window, "blacklisting API key");
        self.blacklisted.insert(key.to_string(), Instant::now());
    }

    fn is_usable(&self, key: &str) -> bool {
        match self.blacklisted.get(key) {
            Some(since) => since.elapsed() >= self.window,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(keys: &[&str]) -> KeyRing {
        KeyRing::new(keys.iter().map(|k| k.to_string()).collect())
    }

    #[test]
    fn test_next_key_rotates_round_robin() {
        let mut keys = ring(&["a", "b", "c"]);
        assert_eq!(keys.next_key().as_deref(), Some("a"));
        assert_eq!(keys.next_key().as_deref(), Some("b"));
        assert_eq!(keys.next_key().as_deref(), Some("c"));
        assert_eq!(keys.next_key().as_deref(), Some("a"));
    }

    #[test]
    fn test_next_key_skips_blacklisted() {
        let mut keys = ring(&["a", "b", "c"]);
        keys.blacklist("b");
        assert_eq!(keys.next_key().as_deref(), Some("a"));
        assert_eq!(keys.next_key().as_deref(), Some("c"));
        assert_eq!(keys.next_key().as_deref(), Some("a"));
    }

    #[test]
    fn test_next_key_none_when_all_blacklisted() {
        let mut keys = ring(&["a", "b"]);
        keys.blacklist("a");
        keys.blacklist("b");
        assert_eq!(keys.next_key(), None);
    }

    #[test]
    fn test_next_key_none_when_empty() {
        let mut keys = ring(&[]);
        assert_eq!(keys.next_key(), None);
    }

    #[test]
    fn test_blacklist_expires_after_window() {
        let mut keys = ring(&["a"]).with_window(Duration::ZERO);
        keys.blacklist("a");
        // Zero window means a blacklisted key is immediately usable again
        assert_eq!(keys.next_key().as_deref(), Some("a"));
    }

    #[test]
    fn test_len_counts_blacklisted_keys() {
        let mut keys = ring(&["a", "b"]);
        keys.blacklist("a");
        assert_eq!(keys.len(), 2);
        assert!(!keys.is_empty());
    }

    #[test]
    fn test_from_env_skips_gaps() {
        // Process-local mutation; no other test in this binary reads these
        std::env::set_var("GEMINI_API_KEY1", "first");
        std::env::remove_var("GEMINI_API_KEY2");
        std::env::set_var("GEMINI_API_KEY3", "third");
        std::env::remove_var("GEMINI_API_KEY4");
        std::env::set_var("GEMINI_API_KEY5", "");

        let mut keys = KeyRing::from_env();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.next_key().as_deref(), Some("first"));
        assert_eq!(keys.next_key().as_deref(), Some("third"));

        std::env::remove_var("GEMINI_API_KEY1");
        std::env::remove_var("GEMINI_API_KEY3");
        std::env::remove_var("GEMINI_API_KEY5");
    }
}
