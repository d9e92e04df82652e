//! Grafel script: the `.grafel` text format and its serde model.
//!
//! ```text
//! // comment
//! Cast:
//!     bob = Square side 50 pos 100x100 color red
//!     d = Dice num 3 pos 300x300
//! Actions:
//!     0-25 bob Move 400x300
//!     10+5 bob Colorize #ff8800
//!     30 bob Exit
//! ```

pub(crate) mod lexer;
pub(crate) mod loader;
pub(crate) mod model;
pub(crate) mod parser;
