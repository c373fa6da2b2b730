//! Injectable source of random choices.
//!
//! Responders never touch a global RNG; they ask a [`Chooser`] for an index
//! so a session can be seeded and tests can script the exact picks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks an index out of a list of candidates.
pub trait Chooser {
    /// Returns an index in `0..len`. `len` is always non-zero.
    fn choose(&mut self, len: usize) -> usize;
}

/// Uniform choices backed by a [`StdRng`].
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    /// Seeds the generator from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeds the generator deterministically so a session can be replayed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Builds a seeded chooser when a seed is configured, otherwise an OS-seeded one.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::seeded)
    }
}

impl Chooser for RandomChooser {
    fn choose(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Replays a fixed sequence of picks, cycling when it runs out.
///
/// # Details
/// Each pick is reduced modulo the candidate count, so a script of `[1]`
/// always selects the second template of any category with two or more.
#[derive(Clone, Debug)]
pub struct ScriptedChooser {
    picks: Vec<usize>,
    cursor: usize,
}

impl ScriptedChooser {
    /// Creates a chooser that replays `picks` in order.
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks, cursor: 0 }
    }

    /// Creates a chooser that always returns the same index.
    pub fn constant(pick: usize) -> Self {
        Self::new(vec![pick])
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&mut self, len: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let pick = self.picks[self.cursor % self.picks.len()];
        self.cursor += 1;
        pick % len
    }
}

/// Chooses one entry of `candidates`, or `None` when there are none.
pub fn pick<'a, T>(chooser: &mut dyn Chooser, candidates: &'a [T]) -> Option<&'a T> {
    if candidates.is_empty() {
        return None;
    }
    candidates.get(chooser.choose(candidates.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_choosers_agree() {
        let mut a = RandomChooser::seeded(7);
        let mut b = RandomChooser::seeded(7);
        let left: Vec<usize> = (0..20).map(|_| a.choose(5)).collect();
        let right: Vec<usize> = (0..20).map(|_| b.choose(5)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn random_choices_stay_in_range() {
        let mut chooser = RandomChooser::seeded(42);
        for _ in 0..200 {
            assert!(chooser.choose(3) < 3);
        }
    }

    #[test]
    fn scripted_chooser_cycles_and_wraps() {
        let mut chooser = ScriptedChooser::new(vec![0, 4]);
        assert_eq!(chooser.choose(3), 0);
        assert_eq!(chooser.choose(3), 1);
        assert_eq!(chooser.choose(3), 0);
    }

    #[test]
    fn empty_script_picks_first() {
        let mut chooser = ScriptedChooser::new(Vec::new());
        assert_eq!(chooser.choose(4), 0);
    }

    #[test]
    fn pick_handles_empty_candidates() {
        let mut chooser = ScriptedChooser::constant(2);
        let empty: [&str; 0] = [];
        assert_eq!(pick(&mut chooser, &empty), None);
        assert_eq!(pick(&mut chooser, &["a", "b", "c"]), Some(&"c"));
    }
}
