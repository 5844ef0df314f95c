/// Register offsets for the nRF24L01.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    pub const RPD: u8 = 0x09;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;

    /// Register offsets occupy the lower 5 bits of the R_REGISTER/W_REGISTER commands.
    pub const MASK: u8 = 0x1F;
}

/// SPI commands for the nRF24L01.
pub mod commands {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const ACTIVATE: u8 = 0x50;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const W_TX_PAYLOAD_NO_ACK: u8 = 0xB0;
    pub const W_ACK_PAYLOAD: u8 = 0xA8;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const NOP: u8 = 0xFF;
}

/// Bit mnemonics
pub mod mnemonics {
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;
    /// Enables a feature on all 6 pipes (EN_AA, EN_RXADDR, DYNPD).
    pub const ALL_PIPES: u8 = 0x3F;
}

/// Timing constants, in microseconds.
pub mod timing {
    /// Power on reset to a stable SPI interface (datasheet says 4.5 ms + 14 us).
    pub const POWER_ON_SETTLE: u32 = 5000;
    /// Power down to standby-I (Tpd2stby), worst case for the non-plus variant.
    pub const POWER_UP: u32 = 5000;
    /// Minimum CE high pulse to start a transmission.
    pub const CE_PULSE: u32 = 10;
    /// Default interval between STATUS polls while waiting for a transmission.
    pub const POLL_INTERVAL: u32 = 50;
}
