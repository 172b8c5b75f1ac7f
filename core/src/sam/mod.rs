//! Online suffix automaton (SAM) construction and substring statistics.
//!
//! Builds a minimal deterministic automaton recognizing every factor
//! (contiguous substring) of a sequence of opaque symbols, incrementally as
//! symbols arrive. After [SamEngine::finalize] the automaton answers
//! occurrence-count and background-model queries over factors in
//! `O(|factor|)` time. See the module-level docs on [SamEngine] for the
//! construction algorithm.

mod arena;
mod finalize;
mod query;
mod state;

use {
    crate::{error::SamError, sam::arena::StateArena},
    log::debug,
    std::hash::Hash,
};

pub use crate::sam::state::{State, StateId};

/// Appends are only accepted in `Building`, queries only in `Finalized`,
/// and the only edge between them is `finalize()`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum EnginePhase {
    Building,
    Finalized,
}

/// `maxlen_limit` for [SamEngine::append] / [SamEngine::append_sequence].
///
/// `Unlimited` runs canonical Blumer SAM construction. `Limited(n)` (`n >=
/// 2`) caps the longest factor length the automaton is guaranteed to
/// represent, trading exact factor coverage for bounded memory -- see
/// [SamEngine::append]'s docs for the precise semantics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MaxLen {
    Unlimited,
    Limited(u32),
}

impl From<i64> for MaxLen {
    /// Mirrors the source convention where a negative integer means
    /// unlimited. `0` and `1` convert to `Limited(0)`/`Limited(1)` rather
    /// than failing outright -- the domain error for those values is still
    /// raised by [SamEngine::append] itself, since conversion cannot fail.
    fn from(value: i64) -> Self {
        if value < 0 {
            MaxLen::Unlimited
        } else {
            MaxLen::Limited(value as u32)
        }
    }
}

/// An online suffix automaton over a sequence of symbols of type `T`,
/// together with the unigram frequency tables needed to score factors
/// against a background model.
///
/// # Construction algorithm
///
/// Each [Self::append] implements Blumer's online SAM construction:
///
/// 1. Allocate `cur` with `maxlen(cur) = maxlen(last) + 1`.
/// 2. Walk suffix links from `last` setting `trans(p, symbol) = cur` until a
///    state already transitioning on `symbol` is found or the walk runs off
///    the tree.
/// 3. If the walk ran off the tree, `link(cur) = root`.
/// 4. Otherwise, if the found transition target `q` is "solid"
///    (`maxlen(p) + 1 == maxlen(q)`), `link(cur) = q`.
/// 5. Otherwise clone `q` into a new state `sq` that takes over the subset
///    of `q`'s in-edges reachable by continuing the suffix-link walk, and
///    splice `sq` in as both `q`'s and `cur`'s suffix-link target.
///
/// `touch` counts are seeded during construction (`1` for freshly appended
/// end-states, `0` for clones) and aggregated into final occurrence counts
/// by [Self::finalize].
#[derive(Clone, Debug)]
pub struct SamEngine<T> {
    arena: StateArena<T>,
    root: StateId,
    last: StateId,
    phase: EnginePhase,
    symbol_cnt: std::collections::HashMap<T, u64>,
    symbol_total: u64,
}

impl<T: Copy + Eq + Hash> SamEngine<T> {
    /// Creates a new engine in the `Building` phase, with a single root
    /// state allocated.
    pub fn new() -> Self {
        let mut arena = StateArena::new();
        let root = arena.new_state().expect("arena cannot be exhausted by its first allocation");
        SamEngine {
            arena,
            root,
            last: root,
            phase: EnginePhase::Building,
            symbol_cnt: std::collections::HashMap::new(),
            symbol_total: 0,
        }
    }

    /// `true` once [Self::finalize] has run.
    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.phase == EnginePhase::Finalized
    }

    /// Number of times `symbol` has been appended.
    #[inline]
    pub fn symbol_count(&self, symbol: T) -> u64 {
        self.symbol_cnt.get(&symbol).copied().unwrap_or(0)
    }

    /// Total number of symbols appended, including those swallowed by
    /// maxlen-limited mode without creating a state.
    #[inline]
    pub fn symbol_total(&self) -> u64 {
        self.symbol_total
    }

    /// Total number of states currently in the arena (includes the root).
    #[inline]
    pub fn state_count(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    fn minlen(&self, id: StateId) -> u32 {
        let link = self.arena.get(id).link;
        if link.is_empty() {
            0
        } else {
            self.arena.get(link).maxlen + 1
        }
    }

    /// Extends the automaton by one symbol. See the type-level docs for the
    /// construction algorithm.
    ///
    /// In maxlen-limited mode (`maxlen_limit = Limited(n)`), once the
    /// automaton already has a transition out of the (suffix-link-walked)
    /// `last` state on `symbol`, no new state is created: `last` moves to
    /// that existing state and its `touch` is incremented directly. This
    /// keeps memory bounded by `n` but means `touch` at reused states is a
    /// heuristic count rather than the classical SAM occurrence count --
    /// `occur_count` under a limit should be treated as approximate.
    ///
    /// `symbol_cnt`/`symbol_total` are only updated once `maxlen_limit` has
    /// passed validation, so a rejected call leaves the engine's counters
    /// untouched.
    pub fn append(&mut self, symbol: T, maxlen_limit: MaxLen) -> Result<(), SamError> {
        if self.phase != EnginePhase::Building {
            return Err(SamError::State("cannot append after finalize".to_owned()));
        }

        if let MaxLen::Limited(limit) = maxlen_limit {
            if limit < 2 {
                return Err(SamError::Domain(format!("maxlen_limit must be >= 2 or Unlimited, got {limit}")));
            }
        }

        *self.symbol_cnt.entry(symbol).or_insert(0) += 1;
        self.symbol_total += 1;

        let cur = match maxlen_limit {
            MaxLen::Unlimited => self.arena.new_state()?,
            MaxLen::Limited(limit) => {
                while self.minlen(self.last) + 1 > limit {
                    self.last = self.arena.get(self.last).link;
                }

                if let Some(next) = self.arena.get(self.last).trans(symbol) {
                    self.last = next;
                    self.arena.get_mut(self.last).touch += 1;
                    debug!("maxlen-limited reuse of existing state on repeated symbol");
                    return Ok(());
                }

                self.arena.new_state()?
            }
        };

        let last = self.last;
        self.arena.get_mut(cur).touch = 1;
        self.arena.get_mut(cur).maxlen = self.arena.get(last).maxlen + 1;
        self.last = cur;

        let mut p = last;
        while !p.is_empty() && !self.arena.get(p).has_trans(symbol) {
            self.arena.get_mut(p).trans.insert(symbol, cur);
            p = self.arena.get(p).link;
        }

        if p.is_empty() {
            self.arena.get_mut(cur).link = self.root;
            debug!("state {cur:?} linked to root (walk ran off the suffix-link tree)");
            return Ok(());
        }

        let q = self.arena.get(p).trans(symbol).expect("p has a transition on symbol by loop exit condition");

        if self.arena.get(p).maxlen + 1 == self.arena.get(q).maxlen {
            self.arena.get_mut(cur).link = q;
            return Ok(());
        }

        let sq = self.arena.new_state()?;
        let sq_maxlen = self.arena.get(p).maxlen + 1;
        let q_trans = self.arena.get(q).trans.clone();
        let q_link = self.arena.get(q).link;
        {
            let sq_state = self.arena.get_mut(sq);
            sq_state.touch = 0;
            sq_state.maxlen = sq_maxlen;
            sq_state.trans = q_trans;
            sq_state.link = q_link;
        }

        let mut redirect = p;
        while !redirect.is_empty() && self.arena.get(redirect).trans(symbol) == Some(q) {
            self.arena.get_mut(redirect).trans.insert(symbol, sq);
            redirect = self.arena.get(redirect).link;
        }

        self.arena.get_mut(q).link = sq;
        self.arena.get_mut(cur).link = sq;
        debug!("cloned state {sq:?} from {q:?} to preserve the maxlen invariant");

        Ok(())
    }

    /// Repeatedly [Self::append]s each symbol in `sequence`, in order.
    pub fn append_sequence<I: IntoIterator<Item = T>>(&mut self, sequence: I, maxlen_limit: MaxLen) -> Result<(), SamError> {
        for symbol in sequence {
            self.append(symbol, maxlen_limit)?;
        }
        Ok(())
    }
}

impl<T: Copy + Eq + Hash> Default for SamEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    #[test]
    fn rejects_maxlen_limit_zero_or_one() {
        let mut engine: SamEngine<i64> = SamEngine::new();
        assert!(matches!(engine.append(1, MaxLen::Limited(0)), Err(SamError::Domain(_))));
        assert!(matches!(engine.append(1, MaxLen::Limited(1)), Err(SamError::Domain(_))));
        // Counters are untouched by a rejected append.
        assert_eq!(engine.symbol_total(), 0);
        assert_eq!(engine.symbol_count(1), 0);
    }

    #[test]
    fn append_after_finalize_is_rejected() {
        let mut engine: SamEngine<i64> = SamEngine::new();
        engine.append_sequence([1, 2], MaxLen::Unlimited).unwrap();
        engine.finalize().unwrap();
        assert!(matches!(engine.append(3, MaxLen::Unlimited), Err(SamError::State(_))));
    }

    #[test]
    fn second_finalize_is_rejected() {
        let mut engine: SamEngine<i64> = SamEngine::new();
        engine.append_sequence([1, 2], MaxLen::Unlimited).unwrap();
        engine.finalize().unwrap();
        assert!(matches!(engine.finalize(), Err(SamError::State(_))));
    }

    #[test]
    fn symbol_counters_track_every_append() {
        let mut engine: SamEngine<i64> = SamEngine::new();
        engine.append_sequence([1, 1, 1, 1, 1], MaxLen::Unlimited).unwrap();
        assert_eq!(engine.symbol_total(), 5);
        assert_eq!(engine.symbol_count(1), 5);
        assert_eq!(engine.symbol_count(2), 0);
    }

    #[test]
    fn state_count_is_bounded_by_twice_the_input_length() {
        // After n appends in canonical mode, state count is bounded between 1 and 2n.
        let mut engine: SamEngine<i64> = SamEngine::new();
        let sequence: Vec<i64> = vec![1, 2, 3, 1, 4, 1, 2, 3, 1];
        engine.append_sequence(sequence.iter().copied(), MaxLen::Unlimited).unwrap();
        assert!(engine.state_count() >= 1);
        assert!(engine.state_count() <= 2 * sequence.len());
    }

    #[test]
    fn every_non_root_state_links_to_a_strictly_shorter_maxlen() {
        let mut engine: SamEngine<i64> = SamEngine::new();
        engine.append_sequence([1, 2, 3, 1, 4, 1, 2, 3, 1], MaxLen::Unlimited).unwrap();
        for idx in 0..engine.state_count() {
            let id = StateId::from_index(idx);
            if id == engine.root {
                continue;
            }
            let link = engine.arena.get(id).link();
            assert!(!link.is_empty(), "non-root state must have a suffix link");
            assert!(engine.arena.get(link).maxlen() < engine.arena.get(id).maxlen());
        }
    }

    #[test]
    fn maxlen_limited_construction_bounds_reachable_factor_length() {
        let mut engine: SamEngine<i64> = SamEngine::new();
        engine.append_sequence([1, 2, 3, 1, 2, 3, 1, 2, 3], MaxLen::Limited(2)).unwrap();
        engine.finalize().unwrap();

        assert_eq!(engine.occur_count(&[1, 2]).unwrap(), 3);
        assert_eq!(engine.occur_count(&[2, 3]).unwrap(), 3);
        assert_eq!(engine.occur_count(&[3, 1]).unwrap(), 2);
    }
}
