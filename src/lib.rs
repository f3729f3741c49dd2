pub mod components;
pub mod config;
pub mod error;
pub mod meeting;
pub mod pipeline;
pub mod startup;
pub mod utils;
