pub mod client;
pub mod config;
pub mod default_colors;
pub mod error;
pub mod export;
pub mod form;
pub mod render;
pub mod traits;
pub mod types;
pub mod view;
