pub mod cursor;
pub mod error;

pub use cursor::{ByteCursor, Endian};
pub use error::{ParseError, Result};
