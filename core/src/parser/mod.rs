pub mod cursor;
pub mod error;

pub use cursor::Cursor;
pub use error::{ParseError, ParseErrorKind};

pub(crate) use cursor::{is_ident_continue, is_ident_start};

#[cfg(test)]
mod error_test;
