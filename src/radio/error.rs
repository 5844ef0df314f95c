//! Error types returned by the driver.
//!
//! Every type except [`TransportError`] is generic over the transport's error
//! type `E`, so a failed bus exchange is always carried in a `Transport(E)` variant
//! and never mistaken for a caller mistake.

use core::fmt::{Debug, Display, Formatter, Result};

/// A failed exchange over the [`SpiTransport`](crate::radio::SpiTransport).
///
/// This is fatal to the in-flight operation only; the driver instance stays usable
/// and the caller may retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput (CE pin) error.
    Gpo(DO),
}

/// Errors from [`RadioInit::begin()`](fn@crate::radio::prelude::RadioInit::begin).
///
/// The caller must not proceed with a driver whose initialization failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E> {
    /// The radio did not echo back the register value that was written to it.
    ///
    /// This usually means the radio is not connected, not powered, or the
    /// SPI bus is misconfigured.
    NotResponding,
    Transport(E),
}

/// Errors from validating or applying configuration.
///
/// All variants except [`ConfigError::Transport`] are detected before any
/// register is written, so a rejected configuration never leaves the radio
/// partially configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError<E> {
    /// ACK payloads were requested without dynamic payloads or without auto-ack.
    IncompatibleAckPayload,
    /// The channel is not in range [0, 127].
    ChannelOutOfRange,
    /// The address width is not 3, 4, or 5 bytes.
    InvalidAddressWidth,
    /// CRC cannot be disabled while auto-ack is enabled.
    CrcRequired,
    /// The static payload length is not in range [1, 32].
    InvalidPayloadLength,
    /// The auto-retry delay or count exceeds 15.
    InvalidAutoRetry,
    /// The pipe number is not in range [0, 5].
    InvalidPipe,
    /// The address length does not equal the configured address width.
    AddressLengthMismatch,
    /// Pipes 2 - 5 must share all but the first byte with pipe 1's address.
    SharedPrefixMismatch,
    Transport(E),
}

/// Errors from [`RadioLink::send()`](fn@crate::radio::prelude::RadioLink::send).
///
/// All of these are recoverable; the caller decides whether to retry the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError<E> {
    /// The receiver never acknowledged the payload.
    ///
    /// The payload is left in the TX FIFO. Until
    /// [`RadioFifo::flush_tx()`](fn@crate::radio::prelude::RadioFifo::flush_tx)
    /// is called, it will be retransmitted ahead of any later payload.
    MaxRetriesExceeded,
    /// The TX FIFO already holds 3 payloads.
    FifoFull,
    /// The transmission did not finish within the given timeout.
    ///
    /// The payload is left in the TX FIFO.
    Timeout,
    /// The payload is longer than 32 bytes (or the configured static payload length).
    PayloadTooLong,
    /// An empty payload is only allowed when ACK payloads are enabled.
    EmptyPayload,
    /// Sending without an acknowledgement was not allowed by the applied configuration.
    NoAckDisabled,
    /// The radio is listening; call `stop_listening()` first.
    NotIdle,
    Transport(E),
}

/// Errors from [`RadioLink::receive()`](fn@crate::radio::prelude::RadioLink::receive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecvError<E> {
    /// No frame is waiting.
    Empty,
    /// The radio reported a dynamic payload length larger than 32 bytes.
    ///
    /// The RX FIFO has been flushed as the datasheet advises.
    Corrupted,
    Transport(E),
}

impl<SPI: Debug, DO: Debug> Display for TransportError<SPI, DO> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TransportError::Spi(e) => write!(f, "SPI transaction failed: {e:?}"),
            TransportError::Gpo(e) => write!(f, "CE pin failed: {e:?}"),
        }
    }
}

impl<E: Display> Display for InitError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            InitError::NotResponding => write!(f, "radio is not responding"),
            InitError::Transport(e) => Display::fmt(e, f),
        }
    }
}

impl<E: Display> Display for ConfigError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ConfigError::IncompatibleAckPayload => {
                write!(f, "ACK payloads require dynamic payloads and auto-ack")
            }
            ConfigError::ChannelOutOfRange => write!(f, "channel must be in range [0, 127]"),
            ConfigError::InvalidAddressWidth => write!(f, "address width must be 3, 4, or 5"),
            ConfigError::CrcRequired => write!(f, "auto-ack requires CRC"),
            ConfigError::InvalidPayloadLength => {
                write!(f, "payload length must be in range [1, 32]")
            }
            ConfigError::InvalidAutoRetry => write!(f, "auto-retry delay and count must be <= 15"),
            ConfigError::InvalidPipe => write!(f, "pipe must be in range [0, 5]"),
            ConfigError::AddressLengthMismatch => {
                write!(f, "address length differs from the address width")
            }
            ConfigError::SharedPrefixMismatch => {
                write!(f, "pipes 2-5 must share pipe 1's address prefix")
            }
            ConfigError::Transport(e) => Display::fmt(e, f),
        }
    }
}

impl<E: Display> Display for SendError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SendError::MaxRetriesExceeded => write!(f, "maximum retries exceeded"),
            SendError::FifoFull => write!(f, "TX FIFO is full"),
            SendError::Timeout => write!(f, "transmission timed out"),
            SendError::PayloadTooLong => write!(f, "payload is too long"),
            SendError::EmptyPayload => write!(f, "empty payloads require ACK payloads"),
            SendError::NoAckDisabled => write!(f, "no-ACK transmissions are not allowed"),
            SendError::NotIdle => write!(f, "radio is listening"),
            SendError::Transport(e) => Display::fmt(e, f),
        }
    }
}

impl<E: Display> Display for RecvError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            RecvError::Empty => write!(f, "no frame available"),
            RecvError::Corrupted => write!(f, "corrupted payload length"),
            RecvError::Transport(e) => Display::fmt(e, f),
        }
    }
}

#[cfg(feature = "std")]
mod std_impls {
    extern crate std;
    use super::*;

    impl<SPI: Debug, DO: Debug> std::error::Error for TransportError<SPI, DO> {}
    impl<E: Display + Debug> std::error::Error for InitError<E> {}
    impl<E: Display + Debug> std::error::Error for ConfigError<E> {}
    impl<E: Display + Debug> std::error::Error for SendError<E> {}
    impl<E: Display + Debug> std::error::Error for RecvError<E> {}
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{ConfigError, SendError, TransportError};
    use std::{format, string::String};

    type Error = TransportError<u8, u8>;

    #[test]
    fn display() {
        let err: ConfigError<Error> = ConfigError::IncompatibleAckPayload;
        assert_eq!(
            format!("{err}"),
            String::from("ACK payloads require dynamic payloads and auto-ack")
        );
        let err: SendError<Error> = SendError::Transport(TransportError::Spi(4));
        assert_eq!(format!("{err}"), String::from("SPI transaction failed: 4"));
    }
}
