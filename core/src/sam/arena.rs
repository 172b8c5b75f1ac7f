use {
    crate::{
        error::SamError,
        sam::state::{State, StateId},
    },
    log::error,
    std::hash::Hash,
};

/// Contiguous, append-only storage of automaton states. States are never
/// removed, so handles ([StateId]) returned by [Self::new_state] stay valid
/// for the lifetime of the arena -- there is no relocating/reallocating
/// scheme that could invalidate a held id, only growth.
#[derive(Clone, Debug)]
pub(crate) struct StateArena<T> {
    states: Vec<State<T>>,
}

impl<T: Copy + Eq + Hash> StateArena<T> {
    pub(crate) fn new() -> Self {
        StateArena { states: Vec::new() }
    }

    /// Allocates a new state with zeroed attributes and `link = EMPTY`.
    pub(crate) fn new_state(&mut self) -> Result<StateId, SamError> {
        if self.states.len() >= (u32::MAX - 1) as usize {
            error!("state arena exhausted at {} states", self.states.len());
            return Err(SamError::Capacity("state arena exhausted".to_owned()));
        }

        let id = StateId::from_index(self.states.len());
        self.states.push(State::new());
        Ok(id)
    }

    #[inline]
    pub(crate) fn get(&self, id: StateId) -> &State<T> {
        &self.states[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: StateId) -> &mut State<T> {
        &mut self.states[id.index()]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }
}
