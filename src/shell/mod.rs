//! Shell startup script produced by `myenv profile`.
//!
//! The script is the merged `export` statements of all active profiles
//! followed by the lines of their login scripts.
pub mod exports;
pub mod onlogin;

pub use exports::{build_exports, render_exports};
pub use onlogin::login_lines;
