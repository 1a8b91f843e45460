//! State machine - owns its states and guarded edges, tracks the active state.

use std::fmt;

use hecs::{Entity, World};
use rand::RngCore;

use super::states::State;
use super::transitions::Transition;
use crate::components::Action;

/// Index of a state inside the machine that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub usize);

struct Edge {
    predicate: Box<dyn Transition>,
    from: StateId,
    to: StateId,
}

/// Finite state machine attached to an AI-driven entity
///
/// States and edges are owned exclusively. Dropping the machine drops every
/// state (including nested machines, recursively) and every predicate tree.
pub struct StateMachine {
    states: Vec<Box<dyn State>>,
    transitions: Vec<Edge>,
    current: StateId,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            current: StateId(0),
        }
    }

    /// Register a state. The first state added is the initial one.
    pub fn add_state(&mut self, state: impl State + 'static) -> StateId {
        self.states.push(Box::new(state));
        StateId(self.states.len() - 1)
    }

    /// Register an edge `from -> to` guarded by `predicate`.
    /// Edges are tried in registration order.
    pub fn add_transition(
        &mut self,
        predicate: impl Transition + 'static,
        from: StateId,
        to: StateId,
    ) {
        debug_assert!(from.0 < self.states.len() && to.0 < self.states.len());
        self.transitions.push(Edge {
            predicate: Box::new(predicate),
            from,
            to,
        });
    }

    /// Force the active state without running enter/exit hooks
    pub fn switch_state(&mut self, state: StateId) {
        debug_assert!(state.0 < self.states.len());
        self.current = state;
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn active_state(&self) -> Option<&dyn State> {
        self.states.get(self.current.0).map(|s| s.as_ref())
    }

    /// Names of the active state at every nesting level, outermost first
    pub fn active_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut machine = Some(self);
        while let Some(m) = machine {
            let Some(state) = m.active_state() else { break };
            path.push(state.name());
            machine = state.as_machine();
        }
        path
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Run the active state, then fire at most one outgoing edge.
    ///
    /// The first edge (in registration order) leaving the active state whose
    /// predicate holds wins: `exit` on the old state, switch, `enter` on the
    /// new one. The new state does not act until the next call.
    pub fn act(
        &mut self,
        dt: f32,
        world: &World,
        entity: Entity,
        rng: &mut dyn RngCore,
        action: &mut Action,
    ) {
        let current = self.current;
        let Some(state) = self.states.get_mut(current.0) else {
            return;
        };
        state.act(dt, world, entity, rng, action);

        let next = self
            .transitions
            .iter()
            .filter(|edge| edge.from == current)
            .find(|edge| edge.predicate.is_available(world, entity))
            .map(|edge| edge.to);

        if let Some(next) = next {
            log::debug!(
                "{:?}: {} -> {}",
                entity,
                self.states[current.0].name(),
                self.states.get(next.0).map_or("?", |s| s.name())
            );
            self.states[current.0].exit();
            self.current = next;
            if let Some(state) = self.states.get_mut(next.0) {
                state.enter();
            }
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("states", &self.states.iter().map(|s| s.name()).collect::<Vec<_>>())
            .field("transitions", &self.transitions.len())
            .field("current", &self.current)
            .finish()
    }
}
