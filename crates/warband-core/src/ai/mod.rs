//! NPC decision making - hierarchical finite state machines.
//!
//! A [`StateMachine`] holds [`State`]s and edges guarded by [`Transition`]
//! predicates. A whole machine can be nested inside a parent as a single
//! state through [`NestedMachine`]; nesting is composition, not a call
//! stack, so an inner machine never "returns" to its parent.

mod machine;
pub mod states;
pub mod transitions;

pub use machine::{StateId, StateMachine};
pub use states::{NestedMachine, State};
pub use transitions::{Transition, TransitionExt};
