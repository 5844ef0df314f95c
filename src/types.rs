//! This module defines the value types shared by the driver's traits.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

use bitfield_struct::bitfield;

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaLevel {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    High,
    /// 0 dBm
    Max,
}

impl PaLevel {
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 2,
            PaLevel::High => 4,
            PaLevel::Max => 6,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            0 => PaLevel::Min,
            2 => PaLevel::Low,
            4 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            PaLevel::Min => write!(f, "Min"),
            PaLevel::Low => write!(f, "Low"),
            PaLevel::High => write!(f, "High"),
            PaLevel::Max => write!(f, "Max"),
        }
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// represents 1 Mbps
    Mbps1,
    /// represents 2 Mbps
    Mbps2,
    /// represents 250 Kbps
    Kbps250,
}

impl DataRate {
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 0x8,
            DataRate::Kbps250 => 0x20,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            0x8 => DataRate::Mbps2,
            0x20 => DataRate::Kbps250,
            _ => DataRate::Mbps1,
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DataRate::Mbps1 => write!(f, "1 Mbps"),
            DataRate::Mbps2 => write!(f, "2 Mbps"),
            DataRate::Kbps250 => write!(f, "250 Kbps"),
        }
    }
}

/// The length of a CRC checksum that is used (if any).
///
/// Cyclical Redundancy Checking (CRC) is commonly used to ensure data integrity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcLength {
    /// represents no CRC checksum is used
    Disabled,
    /// represents CRC 8 bit checksum is used
    Bit8,
    /// represents CRC 16 bit checksum is used
    Bit16,
}

impl CrcLength {
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 8,
            CrcLength::Bit16 => 12,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            8 => CrcLength::Bit8,
            12 => CrcLength::Bit16,
            _ => CrcLength::Disabled,
        }
    }
}

impl Display for CrcLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CrcLength::Disabled => write!(f, "disabled"),
            CrcLength::Bit8 => write!(f, "8 bit"),
            CrcLength::Bit16 => write!(f, "16 bit"),
        }
    }
}

/// The possible states of a FIFO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoState {
    /// Represent the state of a FIFO when it is full.
    Full,
    /// Represent the state of a FIFO when it is empty.
    Empty,
    /// Represent the state of a FIFO when it is not full but not empty either.
    Occupied,
}

impl Display for FifoState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            FifoState::Empty => write!(f, "Empty"),
            FifoState::Full => write!(f, "Full"),
            FifoState::Occupied => write!(f, "Occupied"),
        }
    }
}

/// The operating mode of the link, as tracked by the driver instance.
///
/// | state | CE line | PRIM_RX |
/// |-------|:-------:|:-------:|
/// | [`LinkState::Idle`] | low | any |
/// | [`LinkState::Listening`] | high | 1 |
/// | [`LinkState::Transmitting`] | high | 0 |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Standby (or powered down). Configuration registers may be written.
    #[default]
    Idle,
    /// Receiving on all open pipes until explicitly stopped.
    Listening,
    /// Transmitting the TX FIFO's content. Only observable during a `send()` call.
    Transmitting,
}

impl Display for LinkState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            LinkState::Idle => write!(f, "Idle"),
            LinkState::Listening => write!(f, "Listening"),
            LinkState::Transmitting => write!(f, "Transmitting"),
        }
    }
}

/// The result of a successful transmission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendOutcome {
    /// The receiver acknowledged the payload.
    Acked {
        /// The number of automatic retransmissions it took.
        retries: u8,
        /// Was an ACK payload captured for the next `receive()`?
        ack_payload: bool,
    },
    /// The payload was transmitted without asking for an acknowledgement.
    Sent,
}

/// The largest payload the radio can carry in a single packet.
pub const MAX_PAYLOAD_LENGTH: usize = 32;

/// A received payload and the pipe it arrived on.
///
/// This is a plain value (no allocation); use [`Frame::payload()`] to borrow
/// the valid bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_PAYLOAD_LENGTH],
    len: u8,
    pipe: u8,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            buf: [0; MAX_PAYLOAD_LENGTH],
            len: 0,
            pipe: 0,
        }
    }
}

impl Frame {
    /// Build a frame from the first 32 bytes of `payload`.
    pub fn new(pipe: u8, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_PAYLOAD_LENGTH);
        let mut frame = Self {
            pipe,
            len: len as u8,
            ..Default::default()
        };
        frame.buf[..len].copy_from_slice(&payload[..len]);
        frame
    }

    /// The bytes that were received.
    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The pipe (0 - 5) that delivered this frame.
    pub fn pipe(&self) -> u8 {
        self.pipe
    }

    pub(crate) fn storage(&mut self, len: u8) -> &mut [u8] {
        self.len = len.min(MAX_PAYLOAD_LENGTH as u8);
        &mut self.buf[..self.len as usize]
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Frame pipe: {}, payload: {=[u8]}", self.pipe, self.payload())
    }
}

/// A struct used to describe the different interrupt events.
///
/// To instantiate an object with flags that have different values:
/// ```
/// use nrf24_link::StatusFlags;
/// let flags = StatusFlags::default() // all flags are false
///     .with_rx_dr(true); // assert only `rx_dr` flags
/// assert!(flags.rx_dr());
/// ```
/// Use [`StatusFlags::default`] to instantiate all flags set to false.
/// Use [`StatusFlags::new`] to instantiate all flags set to true.
#[bitfield(u8, new = false, order = Msb)]
pub struct StatusFlags {
    #[bits(1)]
    _padding: u8,

    /// A flag to describe if RX Data Ready to read.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// A flag to describe if TX Data Sent.
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// A flag to describe if TX Data Failed (maximum retries exceeded).
    #[bits(1, access = RO)]
    pub tx_df: bool,

    #[bits(3, access = RO)]
    pub(crate) rx_pipe: u8,

    #[bits(1, access = RO)]
    pub(crate) tx_full: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusFlags rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}

impl StatusFlags {
    /// A mask to isolate only the IRQ flags. Useful for STATUS and CONFIG registers.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// A convenience constructor similar to [`StatusFlags::default`] except
    /// all fields are set to `true`.
    pub fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }

    /// A flag to describe if RX Data Ready to read.
    pub fn with_rx_dr(self, flag: bool) -> Self {
        self.with_flag(Self::RX_DR_OFFSET, flag)
    }

    /// A flag to describe if TX Data Sent.
    pub fn with_tx_ds(self, flag: bool) -> Self {
        self.with_flag(Self::TX_DS_OFFSET, flag)
    }

    /// A flag to describe if TX Data Failed.
    pub fn with_tx_df(self, flag: bool) -> Self {
        self.with_flag(Self::TX_DF_OFFSET, flag)
    }

    const fn with_flag(self, offset: usize, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << offset);
        Self::from_bits(new_val | ((flag as u8) << offset))
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "StatusFlags rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}

#[cfg(test)]
mod test {
    use super::{CrcLength, DataRate, FifoState, Frame, LinkState, PaLevel, StatusFlags};
    extern crate std;
    use std::{format, string::String};

    #[test]
    fn display_enums() {
        assert_eq!(format!("{}", CrcLength::Bit8), String::from("8 bit"));
        assert_eq!(format!("{}", CrcLength::Disabled), String::from("disabled"));
        assert_eq!(format!("{}", DataRate::Kbps250), String::from("250 Kbps"));
        assert_eq!(format!("{}", FifoState::Occupied), String::from("Occupied"));
        assert_eq!(format!("{}", PaLevel::High), String::from("High"));
        assert_eq!(format!("{}", LinkState::Listening), String::from("Listening"));
    }

    #[test]
    fn crc_bits() {
        for crc in [CrcLength::Disabled, CrcLength::Bit8, CrcLength::Bit16] {
            assert_eq!(CrcLength::from_bits(crc.into_bits()), crc);
        }
        // CRCO without EN_CRC means no CRC at all
        assert_eq!(CrcLength::from_bits(4), CrcLength::Disabled);
    }

    #[test]
    fn display_flags() {
        assert_eq!(
            format!("{}", StatusFlags::default()),
            String::from("StatusFlags rx_dr: false, tx_ds: false, tx_df: false")
        );
    }

    #[test]
    fn set_flags() {
        let flags = StatusFlags::default().with_rx_dr(true).with_tx_df(true);
        assert!(flags.rx_dr());
        assert!(!flags.tx_ds());
        assert!(flags.tx_df());
        assert_eq!(flags.into_bits(), 0x50);
        assert_eq!(StatusFlags::new().with_tx_ds(false).into_bits(), 0x50);
    }

    #[test]
    fn status_pipe_number() {
        // RX_P_NO = 0b111 means the RX FIFO is empty
        let flags = StatusFlags::from_bits(0x0E);
        assert_eq!(flags.rx_pipe(), 7);
        let flags = StatusFlags::from_bits(0x43);
        assert!(flags.rx_dr());
        assert_eq!(flags.rx_pipe(), 1);
        assert!(flags.tx_full());
    }

    #[test]
    fn frame_truncates() {
        let frame = Frame::new(2, &[0x55; 40]);
        assert_eq!(frame.len(), 32);
        assert_eq!(frame.pipe(), 2);
        assert!(Frame::new(0, &[]).is_empty());
    }
}
