use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

pub(crate) mod bit_fields;
mod constants;
mod fifo;
mod init;
mod pipe;
mod power;
mod radio;
mod status;
mod transport;
pub use constants::{commands, mnemonics, registers, timing};
pub use pipe::Pipe;
pub use transport::{SpiTransport, Transport};

use bit_fields::{Config, Feature, FifoStatus};
use heapless::Deque;
use pipe::PipeManager;

use crate::{log::warn, DataRate, Frame, LinkState, StatusFlags, MAX_PAYLOAD_LENGTH};

/// The number of ACK payloads that [`Nrf24`] can hold between a
/// `send()` and the `receive()` calls that consume them.
pub const ACK_QUEUE_DEPTH: usize = 3;

/// The time (in microseconds) to let an outgoing auto-ack finish
/// before leaving RX mode, per data rate.
pub(super) const fn tx_delay_for(data_rate: DataRate) -> u32 {
    match data_rate {
        DataRate::Mbps1 => 280,
        DataRate::Mbps2 => 240,
        DataRate::Kbps250 => 505,
    }
}

/// This struct implements the [`Radio*` traits](mod@crate::radio::prelude)
/// for the nRF24L01 transceiver.
///
/// The driver is the single holder of the [`LinkState`]. Every operation takes
/// `&mut self`, so it can only be driven from one place at a time.
///
/// Additionally, there are some functions implemented that are specific to the nRF24L01,
/// including raw access to its registers.
pub struct Nrf24<T> {
    /// The delay (in microseconds) in which
    /// [`RadioLink::stop_listening()`](fn@crate::radio::prelude::RadioLink::stop_listening)
    /// will wait for ACK packets to complete.
    ///
    /// This value is adjusted to the data rate by
    /// [`RadioInit::apply()`](fn@crate::radio::prelude::RadioInit::apply).
    /// If setting this to a custom value, be sure to set it *after* applying
    /// a configuration.
    pub tx_delay: u32,
    /// The interval (in microseconds) between two polls of the STATUS register
    /// while waiting for a transmission to finish.
    ///
    /// A `send()` call's timeout is divided by this value to get its poll budget.
    pub poll_interval: u32,
    transport: T,
    status: StatusFlags,
    config_reg: Config,
    feature: Feature,
    payload_length: u8,
    state: LinkState,
    pipes: PipeManager,
    ack_queue: Deque<Frame, ACK_QUEUE_DEPTH>,
    overflow: bool,
    is_plus_variant: bool,
}

impl<SPI, DO, DELAY> Nrf24<SpiTransport<SPI, DO, DELAY>>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Instantiate an [`Nrf24`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> Self {
        Self::with_transport(SpiTransport::new(ce_pin, spi, delay_impl))
    }
}

impl<T: Transport> Nrf24<T> {
    /// Instantiate an [`Nrf24`] object that talks to the radio through any [`Transport`].
    ///
    /// Nothing is exchanged until
    /// [`RadioInit::begin()`](fn@crate::radio::prelude::RadioInit::begin) is called.
    pub fn with_transport(transport: T) -> Self {
        Self {
            tx_delay: tx_delay_for(DataRate::Mbps1),
            poll_interval: timing::POLL_INTERVAL,
            transport,
            status: StatusFlags::default(),
            // 16 bit CRC, enable all IRQ, and power down as TX
            config_reg: Config::default(),
            feature: Feature::new(),
            payload_length: MAX_PAYLOAD_LENGTH as u8,
            state: LinkState::Idle,
            pipes: PipeManager::new(5),
            ack_queue: Deque::new(),
            overflow: false,
            is_plus_variant: true,
        }
    }

    /// Borrow the underlying [`Transport`].
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying [`Transport`].
    ///
    /// Driving the CE line from here bypasses the driver's [`LinkState`] tracking.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the driver and give back its [`Transport`].
    pub fn release(self) -> T {
        self.transport
    }

    /// Read a single byte from the given `register`.
    pub fn read_register(&mut self, register: u8) -> Result<u8, T::Error> {
        let mut buf = [0u8];
        self.status = self
            .transport
            .exchange(commands::R_REGISTER | register, &mut buf)?;
        Ok(buf[0])
    }

    /// Write a single byte to the given `register`.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), T::Error> {
        self.status = self
            .transport
            .exchange(commands::W_REGISTER | register, &mut [value])?;
        Ok(())
    }

    /// Fill `buf` (up to 32 bytes) with the content of a multi-byte `register`,
    /// like a pipe address.
    ///
    /// Returns the number of bytes read.
    pub fn read_register_multi(&mut self, register: u8, buf: &mut [u8]) -> Result<usize, T::Error> {
        let len = buf.len().min(MAX_PAYLOAD_LENGTH);
        buf[..len].fill(0);
        self.status = self
            .transport
            .exchange(commands::R_REGISTER | register, &mut buf[..len])?;
        Ok(len)
    }

    /// Write up to 32 bytes of `buf` to a multi-byte `register`.
    pub fn write_register_multi(&mut self, register: u8, buf: &[u8]) -> Result<(), T::Error> {
        self.write_buf(commands::W_REGISTER | register, buf)
    }

    /// Is this radio a nRF24L01+ variant?
    ///
    /// The bool that this function returns is only valid _after_ calling
    /// [`RadioInit::begin()`](fn@crate::radio::prelude::RadioInit::begin).
    pub fn is_plus_variant(&self) -> bool {
        self.is_plus_variant
    }

    /// Was a signal stronger than -64 dBm detected on the current channel?
    ///
    /// Only meaningful while listening, for about 40 microseconds after
    /// a packet was received.
    pub fn rpd(&mut self) -> Result<bool, T::Error> {
        Ok(self.read_register(registers::RPD)? & 1 == 1)
    }

    /// Send a command that has no data bytes.
    ///
    /// This is also used to refresh the STATUS byte:
    /// ```ignore
    /// self.command(commands::NOP)?;
    /// // STATUS register is now stored in self.status
    /// ```
    fn command(&mut self, command: u8) -> Result<StatusFlags, T::Error> {
        self.status = self.transport.exchange(command, &mut [])?;
        Ok(self.status)
    }

    fn write_buf(&mut self, command: u8, buf: &[u8]) -> Result<(), T::Error> {
        let len = buf.len().min(MAX_PAYLOAD_LENGTH);
        let mut data = [0u8; MAX_PAYLOAD_LENGTH];
        data[..len].copy_from_slice(&buf[..len]);
        self.status = self.transport.exchange(command, &mut data[..len])?;
        Ok(())
    }

    fn set_ce(&mut self, high: bool) -> Result<(), T::Error> {
        self.transport.set_enable_line(high)
    }

    /// Force [`LinkState::Idle`] before writing configuration registers.
    ///
    /// Returns the state to give back to [`Nrf24::resume()`].
    fn pause(&mut self) -> Result<LinkState, T::Error> {
        let previous = self.state;
        if self.transport.is_enabled() {
            self.set_ce(false)?;
        }
        self.state = LinkState::Idle;
        Ok(previous)
    }

    /// Go back to listening if [`Nrf24::pause()`] interrupted it.
    fn resume(&mut self, previous: LinkState) -> Result<(), T::Error> {
        if previous == LinkState::Listening {
            self.set_ce(true)?;
            self.state = LinkState::Listening;
        }
        Ok(())
    }

    /// Read FIFO_STATUS, latching the overflow signal if the RX FIFO is full.
    fn fifo_status(&mut self) -> Result<FifoStatus, T::Error> {
        let fifo = FifoStatus::from_bits(self.read_register(registers::FIFO_STATUS)?);
        if fifo.rx_full() {
            if !self.overflow {
                warn!("RX FIFO is full; incoming frames are being dropped");
            }
            self.overflow = true;
        }
        Ok(fifo)
    }
}
