pub mod config;
pub mod console;
pub mod error;
pub mod import;
pub mod notify;
pub mod ordered;
pub mod state;
pub mod store;
pub mod types;
pub mod upload;
