// States, alphabet, initial and final states shared by every automaton kind

use gold_core::{Alphabet, AutomataError, State, StateSet};

/// The declarative part of an automaton, validated on construction: the
/// initial state and every final state must be declared states.
#[derive(Debug, Clone)]
pub struct Definition {
    states: StateSet,
    alphabet: Alphabet,
    initial: State,
    finals: StateSet,
}

impl Definition {
    pub fn new<S, SI, F, FI>(
        states: S,
        alphabet: impl Into<Alphabet>,
        initial: impl Into<State>,
        finals: F,
    ) -> Result<Self, AutomataError>
    where
        S: IntoIterator<Item = SI>,
        SI: Into<State>,
        F: IntoIterator<Item = FI>,
        FI: Into<State>,
    {
        let states: StateSet = states.into_iter().map(Into::into).collect();
        let initial = initial.into();
        let finals: StateSet = finals.into_iter().map(Into::into).collect();

        if !states.contains(&initial) {
            return Err(AutomataError::UnknownState(initial));
        }
        let mut undeclared: Vec<&State> = finals.difference(&states).collect();
        undeclared.sort();
        if let Some(state) = undeclared.first() {
            return Err(AutomataError::UnknownState((*state).clone()));
        }

        Ok(Self {
            states,
            alphabet: alphabet.into(),
            initial,
            finals,
        })
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// Declared states in ascending order.
    pub fn sorted_states(&self) -> Vec<&State> {
        let mut states: Vec<&State> = self.states.iter().collect();
        states.sort();
        states
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn initial(&self) -> &State {
        &self.initial
    }

    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    #[inline]
    pub fn contains(&self, state: &State) -> bool {
        self.states.contains(state)
    }

    #[inline]
    pub fn is_final(&self, state: &State) -> bool {
        self.finals.contains(state)
    }
}
