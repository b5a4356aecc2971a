// Public API for integration tests and potential library usage

pub mod assistant;
pub mod broadcast;
pub mod config;
pub mod protocol;
pub mod state;
pub mod ws;
