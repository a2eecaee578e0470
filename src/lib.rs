pub mod actions;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod logging;
pub mod overlay;
pub mod remote;
pub mod session;
pub mod vault;
