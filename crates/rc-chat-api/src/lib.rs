//! Recon Chat API — library crate for the chatbot REST server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `rc-e2e-tests`) can access `AppState` and `build_router`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
