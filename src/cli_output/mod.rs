//! Line-based terminal output for CLI commands: headers, padded tables and
//! feedback lines.

mod render;

pub use render::*;
