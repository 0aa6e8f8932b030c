//! Wire protocol between the server and remote players.
//!
//! Messages are JSON objects tagged by `type`, one per line. The codec
//! lives in [`Protocol`]; transports never look inside a line.
mod codec;
mod fault;
mod message;

pub use codec::*;
pub use fault::*;
pub use message::*;
