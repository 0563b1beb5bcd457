//! Arena contract access
//!
//! The on-chain arena is both the fighter registry (roster, stake) and the
//! settlement ledger (states, balances, battle records). `ArenaClient`
//! implements the collaborator traits from `services::ledger` on top of the
//! generated contract bindings.

pub mod client;
pub mod contracts;

pub use client::ArenaClient;
