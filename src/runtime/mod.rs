pub mod engine;
pub mod natives;
pub mod output;
pub mod platform;
