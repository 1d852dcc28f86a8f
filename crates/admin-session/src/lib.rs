//! Session and request-authorization layer for the CMS admin dashboard.
//!
//! This crate provides:
//! - Token decoding and advisory expiry checks (no signature verification)
//! - A tab-scoped session store that keeps the default credential in sync
//! - A shared HTTP client choosing the public or session credential per request
//! - An FSM-based auth controller with startup validation, login and logout

mod auth_fsm;
mod client;
mod context;
mod controller;
mod error;
mod identity;
mod login;
mod store;
pub mod token;

pub use auth_fsm::auth_machine;
pub use auth_fsm::{AuthMachine, AuthMachineInput, AuthMachineState, AuthState, AuthStateChangedPayload};
pub use client::{select_credential, ClientConfig, Credential, RequestClient};
pub use context::SessionContext;
pub use controller::{AuthController, AuthStateCallback};
pub use error::{SessionError, SessionResult};
pub use identity::Identity;
pub use store::{bearer, SessionStore};
pub use token::{Claims, TokenError};

pub use reqwest::Method;
