use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, FifoState, PaLevel};

/// The CONFIG register.
///
/// The IRQ mask bits are left cleared (all events reflected on the IRQ pin).
#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(4)]
    _padding: u8,

    #[bits(2, access = None, default = 3)]
    pub crc_length: u8,

    pub power: bool,

    pub is_rx: bool,
}

impl Config {
    pub(crate) const CRC_MASK: u8 = 0b1100;

    pub const fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits() & Self::CRC_MASK)
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_val = self.into_bits() & !Self::CRC_MASK | length.into_bits();
        Self::from_bits(new_val)
    }
}

/// The SETUP_RETR register.
#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry feature's `delay`.
    #[bits(4, default = 5)]
    pub ard: u8,

    /// The auto-retry feature's `count`.
    #[bits(4, default = 15)]
    pub arc: u8,
}

/// The RF_SETUP register.
///
/// The data rate is encoded in 2 non-adjacent bits (RF_DR_LOW and RF_DR_HIGH),
/// so it is exposed through masks instead of a generated accessor.
#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetup {
    #[bits(5, access = None)]
    data_rate: u8,

    #[bits(2, access = None, default = 3)]
    pa_level: u8,

    #[bits(1, default = true)]
    pub lna_enable: bool,
}

impl RfSetup {
    const PA_MASK: u8 = 0b110;
    const DATA_RATE_MASK: u8 = 0x28;

    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits() & Self::DATA_RATE_MASK)
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_val = self.into_bits() & !Self::DATA_RATE_MASK;
        Self::from_bits(new_val | data_rate.into_bits())
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits() & Self::PA_MASK)
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_val = self.into_bits() & !Self::PA_MASK;
        Self::from_bits(new_val | level.into_bits())
    }
}

/// The FEATURE register.
#[bitfield(u8, order = Msb)]
pub(crate) struct Feature {
    #[bits(5)]
    _padding: u8,

    pub dynamic_payloads: bool,

    pub ack_payloads: bool,

    pub ask_no_ack: bool,
}

/// The FIFO_STATUS register (read-only).
#[bitfield(u8, order = Msb)]
pub(crate) struct FifoStatus {
    #[bits(2)]
    _padding: u8,

    pub tx_full: bool,

    pub tx_empty: bool,

    #[bits(2)]
    _reserved: u8,

    pub rx_full: bool,

    pub rx_empty: bool,
}

impl FifoStatus {
    pub const fn tx_state(&self) -> FifoState {
        Self::state(self.tx_full(), self.tx_empty())
    }

    pub const fn rx_state(&self) -> FifoState {
        Self::state(self.rx_full(), self.rx_empty())
    }

    const fn state(full: bool, empty: bool) -> FifoState {
        if full {
            FifoState::Full
        } else if empty {
            FifoState::Empty
        } else {
            FifoState::Occupied
        }
    }
}
