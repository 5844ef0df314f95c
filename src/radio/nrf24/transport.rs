//! The boundary between the driver and the host platform.

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{radio::TransportError, StatusFlags, MAX_PAYLOAD_LENGTH};

/// The capabilities the driver needs from the host platform:
/// a duplex byte exchange, one digital output (the radio's CE pin),
/// and a way to wait.
///
/// Implementations are single-owner resources; the driver never
/// calls into a [`Transport`] from more than one thread of control.
pub trait Transport {
    type Error;

    /// Clock out `command` followed by `data`, replacing `data` with the bytes
    /// clocked in.
    ///
    /// Returns the STATUS byte the radio clocks out while receiving `command`.
    /// `data` longer than 32 bytes is truncated.
    fn exchange(&mut self, command: u8, data: &mut [u8]) -> Result<StatusFlags, Self::Error>;

    /// Drive the CE line.
    fn set_enable_line(&mut self, high: bool) -> Result<(), Self::Error>;

    /// The level last written with [`Transport::set_enable_line()`].
    fn is_enabled(&self) -> bool;

    /// Busy-wait for the given number of microseconds.
    fn delay_us(&mut self, us: u32);
}

/// A [`Transport`] over `embedded-hal` 1.0 traits.
///
/// The radio's CSN pin (aka Chip Select pin) shall be defined
/// when instantiating the [`SpiDevice`] object (passed to the `spi` parameter).
pub struct SpiTransport<SPI, DO, DELAY> {
    spi: SPI,
    ce_pin: DO,
    delay_impl: DELAY,
    buf: [u8; MAX_PAYLOAD_LENGTH + 1],
    ce_high: bool,
}

impl<SPI, DO, DELAY> SpiTransport<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> Self {
        Self {
            spi,
            ce_pin,
            delay_impl,
            buf: [0u8; MAX_PAYLOAD_LENGTH + 1],
            ce_high: false,
        }
    }

    /// Give back the bus, the CE pin, and the delay provider.
    pub fn release(self) -> (SPI, DO, DELAY) {
        (self.spi, self.ce_pin, self.delay_impl)
    }
}

impl<SPI, DO, DELAY> Transport for SpiTransport<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type Error = TransportError<SPI::Error, DO::Error>;

    fn exchange(&mut self, command: u8, data: &mut [u8]) -> Result<StatusFlags, Self::Error> {
        let len = data.len().min(MAX_PAYLOAD_LENGTH);
        self.buf[0] = command;
        self.buf[1..=len].copy_from_slice(&data[..len]);
        self.spi
            .transfer_in_place(&mut self.buf[..=len])
            .map_err(TransportError::Spi)?;
        data[..len].copy_from_slice(&self.buf[1..=len]);
        Ok(StatusFlags::from_bits(self.buf[0]))
    }

    fn set_enable_line(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.ce_pin.set_high().map_err(TransportError::Gpo)?;
        } else {
            self.ce_pin.set_low().map_err(TransportError::Gpo)?;
        }
        self.ce_high = high;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.ce_high
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_impl.delay_us(us);
    }
}
