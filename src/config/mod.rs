//! Project configuration loaded from `.shelfvault.toml`.

pub mod settings;

pub use settings::Settings;
