pub mod core;
pub mod modal;
pub mod setup;
pub mod store;
pub mod teachers;
