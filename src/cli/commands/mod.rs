pub mod add;
pub mod completions;
pub mod fetch;
pub mod show;
pub mod version;
