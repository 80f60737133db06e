use rand::Rng;
use rand::seq::IndexedRandom;

/// Picks the next/previous track index for sequential or shuffle play.
///
/// In shuffle mode every pick is remembered for the current round, so no
/// index repeats until all `len` tracks have been picked once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleSelector {
    enabled: bool,
    history: Vec<usize>,
}

impl ShuffleSelector {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            history: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switch mode. Either way the current round starts over.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.history.clear();
    }

    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn next<R: Rng + ?Sized>(
        &mut self,
        current: Option<usize>,
        len: usize,
        rng: &mut R,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if !self.enabled {
            return Some(current.map_or(0, |c| (c + 1) % len));
        }

        if self.history.len() >= len {
            self.history.clear();
        }

        let mut played = vec![false; len];
        for &i in &self.history {
            if let Some(slot) = played.get_mut(i) {
                *slot = true;
            }
        }
        let unplayed: Vec<usize> = (0..len).filter(|&i| !played[i]).collect();

        let pick = match unplayed.choose(rng) {
            Some(&i) => i,
            None => rng.random_range(0..len),
        };
        self.history.push(pick);
        Some(pick)
    }

    /// Step back. In shuffle mode the current pick and the one before it
    /// both leave the history and the earlier one is returned; with fewer
    /// than two picks recorded it behaves like sequential mode.
    pub fn previous(&mut self, current: Option<usize>, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if self.enabled && self.history.len() > 1 {
            self.history.pop();
            return self.history.pop();
        }
        Some(match current {
            Some(c) if c > 0 && c < len => c - 1,
            _ => len - 1,
        })
    }
}
