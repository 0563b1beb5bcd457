//! Tournament Service
//!
//! Orchestrates one settlement run end to end:
//! 1. Read the stake and the alive roster from the registry
//! 2. Run the bracket to a champion (no ledger writes until it completes)
//! 3. Push states, balances, and the battle record through the LedgerWriter
//! 4. Best-effort local history recording

pub mod history;
pub mod service;
pub mod types;

pub use service::TournamentService;
