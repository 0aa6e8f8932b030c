//! Player handles and the transports underneath them.
//!
//! - [`Handle`]: single-owner connection with timeouts and state
//! - [`Transport`]: line pipe trait the handle drives
//! - [`Tcp`]: accepted socket
//! - [`Memory`] / [`Remote`]: in-process seat for bots and tests
mod handle;
mod memory;
mod tcp;
mod transport;

pub use handle::*;
pub use memory::*;
pub use tcp::*;
pub use transport::*;
