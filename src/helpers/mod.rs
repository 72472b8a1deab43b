//! Helper functions shared by the renderer, CLI and server

mod date;
mod html;

pub use date::*;
pub use html::*;
