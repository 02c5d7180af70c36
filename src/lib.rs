pub mod config;
pub mod error;
pub mod pipeline;
pub mod pose;
pub mod provider;
pub mod render;
pub mod tracker;
