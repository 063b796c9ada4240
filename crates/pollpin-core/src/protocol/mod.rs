//! Protocol module containing status codes, request classification, and the
//! newline-terminated line codec.

pub mod codec;
pub mod messages;

pub use codec::{read_line, write_line, ProtocolError};
pub use messages::*;
