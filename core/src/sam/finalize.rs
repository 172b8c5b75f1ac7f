use {
    crate::{
        error::SamError,
        sam::{EnginePhase, SamEngine, StateId},
    },
    log::debug,
    std::hash::Hash,
};

impl<T: Copy + Eq + Hash> SamEngine<T> {
    /// Aggregates each state's construction-time `touch` into its
    /// suffix-link ancestor, transitioning the engine from `Building` to
    /// `Finalized`.
    ///
    /// Processes states in descending-`maxlen` order -- a valid topological
    /// order of the suffix-link tree, since `link(s)` always has strictly
    /// smaller `maxlen` than `s` -- computed iteratively rather than by
    /// recursive post-order, so a long ingested sequence cannot overflow the
    /// stack.
    ///
    /// Rejects a second call rather than silently re-running, since a
    /// repeated sweep would double-count `touch`.
    pub fn finalize(&mut self) -> Result<(), SamError> {
        if self.phase != EnginePhase::Building {
            return Err(SamError::State("engine has already been finalized".to_owned()));
        }

        debug!("finalizing sam engine with {} states", self.arena.len());

        let sorted = self.topologically_sorted_state_ids();
        for &id in sorted.iter().rev() {
            let link = self.arena.get(id).link;
            if link.is_empty() {
                continue;
            }

            let touch = self.arena.get(id).touch;
            self.arena.get_mut(link).touch += touch;
        }

        self.phase = EnginePhase::Finalized;
        Ok(())
    }

    /// Produces a list of state ids ordered so that later entries have
    /// larger `maxlen`: for each unvisited id (scanned in reverse creation
    /// order), walks suffix links upward pushing onto a scratch stack, then
    /// flushes that stack (root-ward first) onto the result.
    fn topologically_sorted_state_ids(&self) -> Vec<StateId> {
        let n = self.arena.len();
        let mut searched = vec![false; n];
        let mut sorted = Vec::with_capacity(n);
        let mut temp = Vec::new();

        for idx in (0..n).rev() {
            if searched[idx] {
                continue;
            }

            let mut cur = StateId::from_index(idx);
            while !cur.is_empty() && !searched[cur.index()] {
                temp.push(cur);
                searched[cur.index()] = true;
                cur = self.arena.get(cur).link;
            }

            sorted.extend(temp.drain(..).rev());
        }

        sorted
    }
}
