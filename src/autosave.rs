//! Save Status and Word Count
//!
//! Status is cosmetic: `Unsaved` on every edit, `Saving` after the idle delay,
//! `Saved` shortly after. Nothing is persisted. Every edit starts a new
//! generation so timers from earlier edits are ignored.

use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Saved,
    Saving,
    Unsaved,
}

impl SaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Saved => "Saved",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Unsaved => "Unsaved",
        }
    }
}

/// Whitespace-separated tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Timer that advances the status of one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
    pub next: SaveStatus,
    pub delay: Duration,
}

impl Tick {
    /// Sleep out the delay, then hand the tick back
    pub async fn wait(self) -> Self {
        tokio::time::sleep(self.delay).await;
        self
    }
}

#[derive(Debug)]
pub struct Autosave {
    status: SaveStatus,
    generation: u64,
    words: usize,
    idle_delay: Duration,
    saving_delay: Duration,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(1000, 500)
    }
}

impl Autosave {
    pub fn new(idle_ms: u64, saving_ms: u64) -> Self {
        Self {
            status: SaveStatus::Saved,
            generation: 0,
            words: 0,
            idle_delay: Duration::from_millis(idle_ms),
            saving_delay: Duration::from_millis(saving_ms),
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn word_count(&self) -> usize {
        self.words
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Count words without touching the save status (initial load)
    pub fn recount(&mut self, text: &str) {
        self.words = word_count(text);
    }

    /// Record an edit and return the first timer of the new generation
    pub fn content_changed(&mut self, text: &str) -> Tick {
        self.words = word_count(text);
        self.status = SaveStatus::Unsaved;
        self.generation += 1;
        Tick {
            generation: self.generation,
            next: SaveStatus::Saving,
            delay: self.idle_delay,
        }
    }

    /// Apply a fired timer. Returns the follow-up timer, if any.
    pub fn advance(&mut self, tick: Tick) -> Option<Tick> {
        if tick.generation != self.generation {
            debug!(
                "Dropping stale autosave tick (gen {} vs {})",
                tick.generation, self.generation
            );
            return None;
        }
        self.status = tick.next;
        match tick.next {
            SaveStatus::Saving => Some(Tick {
                generation: tick.generation,
                next: SaveStatus::Saved,
                delay: self.saving_delay,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\n\nthree\t"), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SaveStatus::Saving.label(), "Saving...");
        assert_eq!(SaveStatus::default(), SaveStatus::Saved);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut autosave = Autosave::default();
        let first = autosave.content_changed("a");
        let _second = autosave.content_changed("a b");
        assert_eq!(autosave.advance(first), None);
        assert_eq!(autosave.status(), SaveStatus::Unsaved);
        assert_eq!(autosave.word_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_sequence_follows_delays() {
        let mut autosave = Autosave::default();
        let start = Instant::now();

        let tick = autosave.content_changed("hello world").wait().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
        let follow_up = autosave.advance(tick).expect("saving stage");
        assert_eq!(autosave.status(), SaveStatus::Saving);

        let tick = follow_up.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(autosave.advance(tick), None);
        assert_eq!(autosave.status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_during_saving_restarts() {
        let mut autosave = Autosave::default();
        let tick = autosave.content_changed("a").wait().await;
        let saving = autosave.advance(tick).unwrap();

        let restart = autosave.content_changed("a b");
        assert_eq!(autosave.advance(saving.wait().await), None);
        assert_eq!(autosave.status(), SaveStatus::Unsaved);

        let tick = restart.wait().await;
        assert!(autosave.advance(tick).is_some());
        assert_eq!(autosave.status(), SaveStatus::Saving);
    }
}
