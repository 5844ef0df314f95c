//! This module defines the traits that group the driver's operations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use nrf24_link::radio::prelude::*;
//! ```
//!
//! Each trait carries the transport's error type as an associated type, which the
//! operation-specific error enums wrap.

use crate::types::{FifoState, Frame, LinkState, SendOutcome, StatusFlags};

use super::{ConfigError, InitError, Pipe, RadioConfig, RecvError, SendError};

/// A trait to represent bringing up and configuring the link.
pub trait RadioInit {
    type InitErrorType;

    /// Initialize the radio's hardware.
    ///
    /// This verifies the radio answers over the bus, detects the chip variant,
    /// flushes both FIFOs, applies [`RadioConfig::default()`], closes all RX pipes,
    /// and powers the radio up in [`LinkState::Idle`].
    fn begin(&mut self) -> Result<(), InitError<Self::InitErrorType>>;

    /// Validate then apply the given `config`.
    ///
    /// Nothing is written if validation fails. The radio is forced into
    /// [`LinkState::Idle`] while its registers are written; a listening radio
    /// resumes listening afterward.
    fn apply(&mut self, config: &RadioConfig) -> Result<(), ConfigError<Self::InitErrorType>>;

    /// Read back and decode all configuration registers.
    fn read_config(&mut self) -> Result<RadioConfig, Self::InitErrorType>;

    /// Get the radio's currently selected channel.
    fn channel(&mut self) -> Result<u8, Self::InitErrorType>;
}

/// A trait to represent manipulation of data pipes.
pub trait RadioPipe {
    type PipeErrorType;

    /// Set the address of the receiving node.
    ///
    /// This also sets pipe 0's RX address to `address` so the receiver's automatic
    /// acknowledgement can be received, unless the radio is currently listening.
    /// In that case only the TX address is written, and pipe 0 is re-programmed by
    /// [`RadioLink::stop_listening()`].
    ///
    /// A listening radio is held in [`LinkState::Idle`] while the registers are
    /// written, then resumes listening. The same goes for every other method of
    /// this trait that writes a register.
    ///
    /// The `address` length must equal the configured address width.
    fn open_writing_pipe(&mut self, address: &[u8]) -> Result<(), ConfigError<Self::PipeErrorType>>;

    /// Open a specified `pipe` for receiving data when radio is listening.
    ///
    /// ### About pipe addresses
    /// Pipes 0 and 1 store a full address. Pipes 2-5 only store the first byte
    /// (the least significant byte as transmitted), borrowing the rest from pipe 1.
    /// For those pipes the given `address` must match pipe 1's address in all
    /// but the first byte, and pipe 1 must have been opened before.
    ///
    /// <div class="warning">
    ///
    /// Pipe 0 doubles as the auto-ack reply path of the writing pipe. An address
    /// given for pipe 0 here is kept as a shadow address (see
    /// [`RadioPipe::pipe0_shadow_address()`]) and written to the radio when
    /// [`RadioLink::start_listening()`] is called.
    ///
    /// </div>
    fn open_reading_pipe(
        &mut self,
        pipe: u8,
        address: &[u8],
    ) -> Result<(), ConfigError<Self::PipeErrorType>>;

    /// Close a specified pipe from receiving data.
    ///
    /// Closing pipe 0 also forgets its shadow address.
    fn close_pipe(&mut self, pipe: u8) -> Result<(), ConfigError<Self::PipeErrorType>>;

    /// The address pipe 0 was opened with for reception, if any.
    ///
    /// This is the value restored into pipe 0 by [`RadioLink::start_listening()`].
    fn pipe0_shadow_address(&self) -> Option<&[u8]>;

    /// A snapshot of what the driver knows about the given `pipe`.
    fn pipe(&self, pipe: u8) -> Option<Pipe>;

    /// Set the static payload length (range [1, 32]) of a single `pipe`.
    ///
    /// This has no effect on the air while dynamic payloads are enabled.
    fn set_static_payload_size(
        &mut self,
        pipe: u8,
        length: u8,
    ) -> Result<(), ConfigError<Self::PipeErrorType>>;

    /// The configured address width (in bytes) applied to all pipes.
    fn address_width(&self) -> u8;
}

/// A trait to represent manipulation of the RX and TX FIFOs.
pub trait RadioFifo {
    type FifoErrorType;

    /// Is there a frame waiting? Returns the pipe that delivered the oldest one.
    ///
    /// ACK payloads captured by [`RadioLink::send()`] are reported first.
    fn available(&mut self) -> Result<Option<u8>, Self::FifoErrorType>;

    /// Flush the radio's RX FIFO (and any captured ACK payloads).
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    ///
    /// This is the only way to drop a payload left behind by
    /// [`SendError::MaxRetriesExceeded`] or [`SendError::Timeout`].
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Get the state of the specified FIFO.
    ///
    /// - Pass `true` to `about_tx` parameter to get the state of the TX FIFO.
    /// - Pass `false` to `about_tx` parameter to get the state of the RX FIFO.
    fn fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType>;

    /// Was the RX FIFO seen full since the last call?
    ///
    /// A full RX FIFO silently drops further frames. This signal is latched
    /// whenever the driver polls FIFO_STATUS, so it can miss an overflow that
    /// happens and clears between polls.
    fn take_overflow(&mut self) -> bool;
}

/// A trait to represent manipulation of [`StatusFlags`].
pub trait RadioStatus {
    type StatusErrorType;

    /// Get the [`StatusFlags`] state that was cached from the latest bus exchange.
    fn status_flags(&self) -> StatusFlags;

    /// Clear the radio's IRQ status flags.
    ///
    /// Set any member of [`StatusFlags`] to `true` to clear the corresponding event.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType>;

    /// Refresh the internal cache of the STATUS byte
    /// (which is also saved from every bus exchange).
    fn update(&mut self) -> Result<(), Self::StatusErrorType>;
}

/// A trait to represent the TX/RX state machine.
pub trait RadioLink {
    type LinkErrorType;

    /// The current [`LinkState`].
    fn link_state(&self) -> LinkState;

    /// Enter [`LinkState::Listening`].
    ///
    /// Pipe 0 is restored from [`RadioPipe::pipe0_shadow_address()`], or closed if
    /// it has no shadow address.
    fn start_listening(&mut self) -> Result<(), Self::LinkErrorType>;

    /// Leave [`LinkState::Listening`] and go back to [`LinkState::Idle`].
    ///
    /// Pipe 0 is re-programmed with the writing pipe's address and opened, so
    /// acknowledgements of later transmissions can be received.
    fn stop_listening(&mut self) -> Result<(), Self::LinkErrorType>;

    /// Transmit `buf` and block until it is acknowledged, fails, or `timeout_us`
    /// microseconds elapse.
    ///
    /// - Payloads longer than 32 bytes are rejected before any bus exchange.
    /// - An empty `buf` is only allowed with ACK payloads enabled; it is useful to
    ///   solicit an ACK payload.
    /// - With `require_ack == false` the payload is sent with the NO_ACK flag
    ///   (needs [`RadioConfig::with_allow_no_ack()`]).
    ///
    /// On [`SendError::MaxRetriesExceeded`] and [`SendError::Timeout`] the payload
    /// stays in the TX FIFO until [`RadioFifo::flush_tx()`] is called.
    /// A timeout only stops the waiting: a retransmission in flight cannot be
    /// cancelled, so this returns within about `timeout_us` plus one retry cycle.
    fn send(
        &mut self,
        buf: &[u8],
        require_ack: bool,
        timeout_us: u32,
    ) -> Result<SendOutcome, SendError<Self::LinkErrorType>>;

    /// Dequeue the oldest received frame.
    fn receive(&mut self) -> Result<Frame, RecvError<Self::LinkErrorType>>;

    /// Load a payload to attach to the next automatic acknowledgement sent on `pipe`.
    ///
    /// Returns `false` if ACK payloads are disabled, `pipe` is invalid, or the TX
    /// FIFO is full.
    fn write_ack_payload(&mut self, pipe: u8, buf: &[u8]) -> Result<bool, Self::LinkErrorType>;

    /// The number of retransmissions of the last transmission.
    fn last_arc(&mut self) -> Result<u8, Self::LinkErrorType>;
}

/// A trait to represent power management.
pub trait RadioPower {
    type PowerErrorType;

    /// Power down the radio. This also forces [`LinkState::Idle`].
    ///
    /// In full power down mode (a sleep state), the radio will consume approximately
    /// 900nA (.0009mA).
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Power up the radio, then wait `delay` microseconds (5000 if `None`) for it
    /// to reach standby.
    fn power_up(&mut self, delay: Option<u32>) -> Result<(), Self::PowerErrorType>;

    /// Is the radio powered up?
    fn is_powered(&self) -> bool;
}
