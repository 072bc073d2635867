//! Domain types shared by the relays and the backend adapters

pub mod turn;

pub use turn::{ChatTurn, HistoryEntry, Role, assemble_turns};
