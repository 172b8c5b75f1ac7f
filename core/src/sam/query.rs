use {
    crate::{
        error::SamError,
        sam::{EnginePhase, SamEngine, StateId},
    },
    std::hash::Hash,
};

impl<T: Copy + Eq + Hash> SamEngine<T> {
    fn require_finalized(&self) -> Result<(), SamError> {
        if self.phase != EnginePhase::Finalized {
            return Err(SamError::State("engine has not been finalized".to_owned()));
        }
        Ok(())
    }

    /// Starting from the root, follows transitions symbol by symbol.
    /// Returns [StateId::EMPTY] if any transition is missing or if `factor`
    /// is empty -- the empty factor is not meaningful to the queries below,
    /// so it never resolves to the root.
    pub fn walk(&self, factor: &[T]) -> StateId {
        if factor.is_empty() {
            return StateId::EMPTY;
        }

        let mut state = self.root;
        for &symbol in factor {
            match self.arena.get(state).trans(symbol) {
                Some(next) => state = next,
                None => return StateId::EMPTY,
            }
        }
        state
    }

    /// Number of distinct occurrences of `factor` in the ingested sequence,
    /// or `-1` if `factor` never occurred.
    pub fn occur_count(&self, factor: &[T]) -> Result<i64, SamError> {
        self.require_finalized()?;
        let state = self.walk(factor);
        if state.is_empty() {
            return Ok(-1);
        }
        Ok(self.arena.get(state).touch() as i64)
    }

    /// How "unlikely" `factor` is under a unigram background model built
    /// from the engine's own symbol-frequency tables:
    ///
    /// `log_prob = log(touch) - Σ log(symbol_cnt[c]) + (len - 1) * log(symbol_total)`
    ///
    /// Returns `-1.0` if `factor` never occurred. If `cap > 0` and the
    /// result would exceed it, returns `cap` instead (overflow guard); `cap
    /// <= 0` disables the cap.
    pub fn occur_degree(&self, factor: &[T], cap: f64) -> Result<f64, SamError> {
        self.require_finalized()?;
        let state = self.walk(factor);
        if state.is_empty() {
            return Ok(-1.0);
        }

        let touch = self.arena.get(state).touch();
        let mut log_prob = (touch as f64).ln();
        for &symbol in factor {
            let count = self.symbol_count(symbol);
            debug_assert!(count > 0, "a symbol reached by walk() must have been ingested at least once");
            log_prob -= (count as f64).ln();
        }
        log_prob += ((factor.len() - 1) as f64) * (self.symbol_total as f64).ln();

        if cap > 0.0 && log_prob > cap.ln() {
            return Ok(cap);
        }
        Ok(log_prob.exp())
    }

    /// `occur_degree` with the conventional default cap of `1000.0`.
    pub fn occur_degree_default(&self, factor: &[T]) -> Result<f64, SamError> {
        self.occur_degree(factor, 1000.0)
    }

    /// Number of transitions out of the state reached by `factor`, or `-1`
    /// if `factor` never occurred.
    pub fn out_count(&self, factor: &[T]) -> Result<i64, SamError> {
        self.require_finalized()?;
        let state = self.walk(factor);
        if state.is_empty() {
            return Ok(-1);
        }
        Ok(self.arena.get(state).out_count() as i64)
    }

    /// Approximate probability of extending `factor` by `symbol`, computed
    /// as `exp(log(touch(next)) - log(touch(state)))`. Returns `-1.0` if
    /// `factor` never occurred or has no transition on `symbol`.
    pub fn out_degree(&self, factor: &[T], symbol: T) -> Result<f64, SamError> {
        self.require_finalized()?;
        let state = self.walk(factor);
        if state.is_empty() {
            return Ok(-1.0);
        }

        let Some(next) = self.arena.get(state).trans(symbol) else {
            return Ok(-1.0);
        };

        let touch = self.arena.get(state).touch() as f64;
        let next_touch = self.arena.get(next).touch() as f64;
        Ok((next_touch.ln() - touch.ln()).exp())
    }
}
