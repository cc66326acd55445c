//! Scope rendering

mod canvas;

pub use canvas::{PixmapScope, ScopeError};
