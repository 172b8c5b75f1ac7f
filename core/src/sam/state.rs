use std::{collections::HashMap, hash::Hash};

/// Handle into a [super::arena::StateArena]. Backed by a `u32` so that a fully
/// built automaton over a multi-gigabyte sequence still fits its state graph
/// in a few dozen bytes per edge.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StateId(u32);

impl StateId {
    /// Reserved handle meaning "no state". Distinct from [Self::ROOT].
    pub const EMPTY: StateId = StateId(u32::MAX);

    /// The automaton's initial state, always the first one allocated.
    pub const ROOT: StateId = StateId(0);

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "state index overflowed StateId");
        StateId(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        debug_assert!(self != StateId::EMPTY, "attempted to index the EMPTY state");
        self.0 as usize
    }

    /// `true` if this handle is the [Self::EMPTY] sentinel.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == StateId::EMPTY
    }
}

/// One equivalence class of right-extensions: a single node of the suffix
/// automaton.
///
/// `minlen(s)` is not stored; it is derived as `link`'s `maxlen + 1` (or `0`
/// when `link` is [StateId::EMPTY]) per the automaton's invariants.
#[derive(Clone, Debug)]
pub struct State<T> {
    pub(crate) maxlen: u32,
    pub(crate) touch: u64,
    pub(crate) link: StateId,
    pub(crate) trans: HashMap<T, StateId>,
}

impl<T: Copy + Eq + Hash> State<T> {
    pub(crate) fn new() -> Self {
        State {
            maxlen: 0,
            touch: 0,
            link: StateId::EMPTY,
            trans: HashMap::new(),
        }
    }

    /// The longest factor represented by this state.
    #[inline]
    pub fn maxlen(&self) -> u32 {
        self.maxlen
    }

    /// The occurrence count attached to this state. Meaningful only after
    /// the owning engine has been finalized.
    #[inline]
    pub fn touch(&self) -> u64 {
        self.touch
    }

    /// The suffix link target, or [StateId::EMPTY] for the root.
    #[inline]
    pub fn link(&self) -> StateId {
        self.link
    }

    #[inline]
    pub fn has_trans(&self, symbol: T) -> bool {
        self.trans.contains_key(&symbol)
    }

    #[inline]
    pub fn trans(&self, symbol: T) -> Option<StateId> {
        self.trans.get(&symbol).copied()
    }

    /// Number of outgoing transitions.
    #[inline]
    pub fn out_count(&self) -> usize {
        self.trans.len()
    }
}
