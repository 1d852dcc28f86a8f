//! Authentication state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//! ┌──────────────────┐   SessionRestored / LoginSucceeded   ┌─────────────────┐
//! │ Unauthenticated  │ ───────────────────────────────────► │  Authenticated  │
//! │    (initial)     │ ◄─────────────────────────────────── │                 │
//! └──────────────────┘   LogoutRequested / SessionRejected  └─────────────────┘
//! ```
//!
//! Both states accept every input, so a logout or rejection is always
//! reachable and a second login simply replaces the identity. There is no
//! separate error state: failures collapse to `Unauthenticated`.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub auth_machine(Unauthenticated)

    Unauthenticated => {
        SessionRestored => Authenticated,
        LoginSucceeded => Authenticated,
        SessionRejected => Unauthenticated,
        LogoutRequested => Unauthenticated
    },
    Authenticated => {
        SessionRestored => Authenticated,
        LoginSucceeded => Authenticated,
        SessionRejected => Unauthenticated,
        LogoutRequested => Unauthenticated
    }
}

pub use auth_machine::Input as AuthMachineInput;
pub use auth_machine::State as AuthMachineState;
pub use auth_machine::StateMachine as AuthMachine;

/// Authentication state for external consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

impl From<&AuthMachineState> for AuthState {
    fn from(state: &AuthMachineState) -> Self {
        match state {
            AuthMachineState::Unauthenticated => AuthState::Unauthenticated,
            AuthMachineState::Authenticated => AuthState::Authenticated,
        }
    }
}

/// Payload for auth state change notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStateChangedPayload {
    /// Current auth state.
    pub state: AuthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
