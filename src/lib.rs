pub mod config;
pub mod error;
pub mod fallback;
pub mod i18n;
pub mod scheduler;
pub mod store;
