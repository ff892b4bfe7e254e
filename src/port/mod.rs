//! Serial link abstraction.
//!
//! The worker never talks to hardware directly; it goes through the
//! [`SerialLink`] trait so that real USB serial ports and mock links are
//! interchangeable.

mod discovery;
mod error;
mod mock;
mod sync_link;
mod traits;

pub use discovery::list_ports;
pub use error::LinkError;
pub use mock::{MockLink, ReadStep};
pub use sync_link::UsbSerialLink;
pub use traits::{LinkSettings, SerialLink, DEFAULT_BAUD_RATE};
