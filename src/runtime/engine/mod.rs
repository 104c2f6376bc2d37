pub mod types;

mod conversion;
mod engine;
mod error;
mod template;

#[cfg(test)]
pub(crate) mod tests;

pub use engine::*;
pub use error::*;
pub use template::*;
pub use types::*;
