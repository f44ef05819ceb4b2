//! Connection accept loop and the state it shares with connection tasks.

pub mod context;
pub mod listener;
