// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic state machine trait used to model multi-step protocols as pure
//! transitions. The machine never performs I/O: a driver observes the
//! current state, performs whatever external call that state requires,
//! and feeds the observation back in as the next input.
//!
//! # Mealy Machine
//!
//! Output depends on both current state and input:
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use cim_ipam::state_machine::*;
//!
//! #[derive(Clone)]
//! enum Door { Open, Closed }
//! enum Push { Toggle }
//!
//! impl StateMachine for Door {
//!     type Input = Push;
//!     type Output = ();
//!     type Error = TransitionError;
//!
//!     fn transition(&self, _input: &Push) -> Result<(Self, ()), TransitionError> {
//!         match self {
//!             Door::Open => Ok((Door::Closed, ())),
//!             Door::Closed => Ok((Door::Open, ())),
//!         }
//!     }
//!
//!     fn is_terminal(&self) -> bool {
//!         false
//!     }
//! }
//! ```

pub mod identity_lookup;

pub use identity_lookup::{LookupInput, LookupPhase, LookupState, LookupStep};

/// Result of a state transition
pub type TransitionResult<S, E = TransitionError> = Result<S, E>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Input is not accepted in the current state
    #[error("Invalid transition from {from} on {input}")]
    InvalidTransition { from: String, input: String },

    /// Machine already reached a terminal state
    #[error("State {0} is terminal")]
    Terminal(String),
}

/// Trait for finite state machines
///
/// Implement this trait to define a state machine with typed states,
/// inputs, and outputs.
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Error type for rejected transitions
    type Error: std::error::Error;

    /// Attempt to transition to a new state given an input
    ///
    /// # Returns
    /// - Ok((new_state, output)) if transition is valid
    /// - Err(Self::Error) if transition is invalid
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output), Self::Error>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Whether no further input is accepted
    fn is_terminal(&self) -> bool;
}
