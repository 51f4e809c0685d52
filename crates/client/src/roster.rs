//! Connected players
//!
//! Badges are kept in insertion order. A departing player's badge is marked
//! as leaving and only dropped once its removal deadline has passed.

use std::time::Duration;

use fleche_protocol::PlayerMap;
use tokio::time::Instant;

/// A player badge as displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub pseudo: String,
    pub color: String,
    pub leaving: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    badge: Badge,
    remove_at: Option<Instant>,
}

/// Live set of players in the game
#[derive(Debug, Clone)]
pub struct PlayerRoster {
    entries: Vec<Entry>,
    leave_delay: Duration,
}

impl PlayerRoster {
    pub const fn new(leave_delay: Duration) -> Self {
        Self {
            entries: Vec::new(),
            leave_delay,
        }
    }

    /// Insert a badge unless the pseudo is already listed
    ///
    /// A badge still fading out after a leave is kept and its removal is
    /// cancelled. Returns whether the roster changed.
    pub fn add(&mut self, pseudo: &str, color: &str) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.badge.pseudo == pseudo) {
            if entry.remove_at.take().is_some() {
                entry.badge.leaving = false;
                return true;
            }
            return false;
        }

        self.entries.push(Entry {
            badge: Badge {
                pseudo: pseudo.to_string(),
                color: color.to_string(),
                leaving: false,
            },
            remove_at: None,
        });
        true
    }

    /// Mark a player as leaving; the badge goes away after the leave delay
    ///
    /// Returns whether the roster changed.
    pub fn remove(&mut self, pseudo: &str, now: Instant) -> bool {
        match self.entries.iter_mut().find(|e| e.badge.pseudo == pseudo) {
            Some(entry) if entry.remove_at.is_none() => {
                entry.badge.leaving = true;
                entry.remove_at = Some(now + self.leave_delay);
                true
            }
            _ => false,
        }
    }

    /// Rebuild from a full snapshot, dropping pending removals
    pub fn replace_all(&mut self, players: &PlayerMap) {
        self.entries.clear();
        for player in players.values() {
            self.add(&player.pseudo, &player.color);
        }
    }

    /// Drop badges whose removal deadline has passed
    pub fn sweep(&mut self, now: Instant) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|entry| match entry.remove_at {
            Some(at) if at <= now => {
                removed.push(entry.badge.pseudo.clone());
                false
            }
            _ => true,
        });
        removed
    }

    /// Earliest pending removal
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().filter_map(|e| e.remove_at).min()
    }

    pub fn badges(&self) -> impl Iterator<Item = &Badge> {
        self.entries.iter().map(|e| &e.badge)
    }

    pub fn contains(&self, pseudo: &str) -> bool {
        self.entries.iter().any(|e| e.badge.pseudo == pseudo)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
