//! A module to encapsulate all things related to radio operation.
pub mod prelude;

mod config;
pub use config::RadioConfig;

mod error;
pub use error::{ConfigError, InitError, RecvError, SendError, TransportError};

pub(crate) mod nrf24;
pub use nrf24::{
    commands, mnemonics, registers, timing, Nrf24, Pipe, SpiTransport, Transport,
    ACK_QUEUE_DEPTH,
};
