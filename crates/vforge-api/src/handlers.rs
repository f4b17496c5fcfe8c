//! Request handlers.

pub mod docs;
pub mod health;
pub mod transform;

pub use docs::*;
pub use health::*;
pub use transform::*;
