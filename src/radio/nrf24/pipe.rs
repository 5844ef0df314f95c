use crate::{
    log::debug,
    radio::{prelude::RadioPipe, ConfigError, Nrf24},
    LinkState, MAX_PAYLOAD_LENGTH,
};

use super::{registers, Transport};

/// The longest address the radio supports.
const MAX_ADDRESS_WIDTH: usize = 5;

/// A snapshot of what the driver knows about a single RX pipe.
///
/// See [`RadioPipe::pipe()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pipe {
    index: u8,
    address: [u8; MAX_ADDRESS_WIDTH],
    width: u8,
    known: bool,
    enabled: bool,
    static_payload_size: u8,
}

impl Pipe {
    /// The pipe number (0 - 5).
    pub fn index(&self) -> u8 {
        self.index
    }

    /// The full address (of the configured width) this pipe listens on.
    ///
    /// For pipes 2 - 5 this combines the pipe's own first byte with pipe 1's
    /// remaining bytes. Returns `None` if the driver never opened the pipe
    /// (or forgot its address after an address width change).
    pub fn address(&self) -> Option<&[u8]> {
        if self.known {
            Some(&self.address[..self.width as usize])
        } else {
            None
        }
    }

    /// Is this pipe enabled in the EN_RXADDR register?
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The static payload length of this pipe (ignored with dynamic payloads).
    pub fn static_payload_size(&self) -> u8 {
        self.static_payload_size
    }
}

/// The driver's mirror of everything pipe related.
///
/// Pipe 0 is both an RX pipe and the auto-ack reply path of the writing pipe,
/// so 2 addresses are tracked for it: the writing pipe's address and the
/// "shadow" address it was opened with for reception.
pub(crate) struct PipeManager {
    width: u8,
    pub(super) tx_address: Option<[u8; MAX_ADDRESS_WIDTH]>,
    pub(super) pipe0_shadow: Option<[u8; MAX_ADDRESS_WIDTH]>,
    pipe1: Option<[u8; MAX_ADDRESS_WIDTH]>,
    /// The first byte of pipes 2 - 5.
    lsb: [Option<u8>; 4],
    /// The value of EN_RXADDR.
    enabled: u8,
    payload_sizes: [u8; 6],
}

impl PipeManager {
    pub fn new(width: u8) -> Self {
        Self {
            width,
            tx_address: None,
            pipe0_shadow: None,
            pipe1: None,
            lsb: [None; 4],
            enabled: 0,
            payload_sizes: [MAX_PAYLOAD_LENGTH as u8; 6],
        }
    }

    /// Forget all addresses and close all pipes. The static payload sizes survive.
    pub fn reset(&mut self, width: u8) {
        let payload_sizes = self.payload_sizes;
        *self = Self::new(width);
        self.payload_sizes = payload_sizes;
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn enabled_mask(&self) -> u8 {
        self.enabled
    }

    pub fn set_enabled(&mut self, pipe: u8, enable: bool) {
        if enable {
            self.enabled |= 1 << pipe;
        } else {
            self.enabled &= !(1 << pipe);
        }
    }

    pub fn pipe0_shadow(&self) -> Option<&[u8]> {
        self.pipe0_shadow.as_ref().map(|a| &a[..self.width as usize])
    }

    pub fn payload_size(&self, pipe: u8) -> u8 {
        self.payload_sizes[pipe as usize % 6]
    }

    pub fn set_all_payload_sizes(&mut self, size: u8) {
        self.payload_sizes = [size; 6];
    }

    fn check_address<E>(&self, address: &[u8]) -> Result<[u8; MAX_ADDRESS_WIDTH], ConfigError<E>> {
        if address.len() != self.width as usize {
            return Err(ConfigError::AddressLengthMismatch);
        }
        let mut stored = [0u8; MAX_ADDRESS_WIDTH];
        stored[..address.len()].copy_from_slice(address);
        Ok(stored)
    }

    /// Pipes 2 - 5 only differ from pipe 1 in their first byte.
    fn shares_prefix(&self, address: &[u8]) -> bool {
        let width = self.width as usize;
        self.pipe1
            .is_some_and(|pipe1| pipe1[1..width] == address[1..width])
    }

    fn snapshot(&self, index: u8) -> Pipe {
        let mut pipe = Pipe {
            index,
            address: [0; MAX_ADDRESS_WIDTH],
            width: self.width,
            known: false,
            enabled: self.enabled & (1 << index) != 0,
            static_payload_size: self.payload_size(index),
        };
        let address = match index {
            0 => self.pipe0_shadow,
            1 => self.pipe1,
            _ => self.pipe1.zip(self.lsb[index as usize - 2]).map(|(mut a, lsb)| {
                a[0] = lsb;
                a
            }),
        };
        if let Some(address) = address {
            pipe.address = address;
            pipe.known = true;
        }
        pipe
    }
}

impl<T: Transport> RadioPipe for Nrf24<T> {
    type PipeErrorType = T::Error;

    fn open_writing_pipe(&mut self, address: &[u8]) -> Result<(), ConfigError<Self::PipeErrorType>> {
        let stored = self.pipes.check_address(address)?;
        let previous = self.pause().map_err(ConfigError::Transport)?;
        self.write_register_multi(registers::TX_ADDR, address)
            .map_err(ConfigError::Transport)?;
        self.pipes.tx_address = Some(stored);
        if previous == LinkState::Listening {
            // pipe 0 keeps its listening role; stop_listening() takes care of it
            debug!("RX_ADDR_P0 update deferred until listening stops");
        } else {
            self.write_register_multi(registers::RX_ADDR_P0, address)
                .map_err(ConfigError::Transport)?;
            self.pipes.set_enabled(0, true);
            self.write_register(registers::EN_RXADDR, self.pipes.enabled_mask())
                .map_err(ConfigError::Transport)?;
        }
        self.resume(previous).map_err(ConfigError::Transport)
    }

    fn open_reading_pipe(
        &mut self,
        pipe: u8,
        address: &[u8],
    ) -> Result<(), ConfigError<Self::PipeErrorType>> {
        if pipe > 5 {
            return Err(ConfigError::InvalidPipe);
        }
        let stored = self.pipes.check_address(address)?;
        if pipe > 1 && !self.pipes.shares_prefix(address) {
            return Err(ConfigError::SharedPrefixMismatch);
        }
        if pipe == 0 && self.state != LinkState::Listening {
            // While not listening, RX_ADDR_P0 belongs to the writing pipe.
            // start_listening() restores this address and enables the pipe.
            self.pipes.pipe0_shadow = Some(stored);
            return Ok(());
        }

        let previous = self.pause().map_err(ConfigError::Transport)?;
        match pipe {
            0 => {
                self.write_register_multi(registers::RX_ADDR_P0, address)
                    .map_err(ConfigError::Transport)?;
                self.pipes.pipe0_shadow = Some(stored);
            }
            1 => {
                self.write_register_multi(registers::RX_ADDR_P1, address)
                    .map_err(ConfigError::Transport)?;
                self.pipes.pipe1 = Some(stored);
            }
            _ => {
                // only the first byte is stored for pipes 2 - 5
                self.write_register(registers::RX_ADDR_P0 + pipe, address[0])
                    .map_err(ConfigError::Transport)?;
                self.pipes.lsb[pipe as usize - 2] = Some(address[0]);
            }
        }
        self.pipes.set_enabled(pipe, true);
        self.write_register(registers::EN_RXADDR, self.pipes.enabled_mask())
            .map_err(ConfigError::Transport)?;
        self.resume(previous).map_err(ConfigError::Transport)
    }

    fn close_pipe(&mut self, pipe: u8) -> Result<(), ConfigError<Self::PipeErrorType>> {
        if pipe > 5 {
            return Err(ConfigError::InvalidPipe);
        }
        let previous = self.pause().map_err(ConfigError::Transport)?;
        self.pipes.set_enabled(pipe, false);
        self.write_register(registers::EN_RXADDR, self.pipes.enabled_mask())
            .map_err(ConfigError::Transport)?;
        match pipe {
            0 => self.pipes.pipe0_shadow = None,
            1 => self.pipes.pipe1 = None,
            _ => self.pipes.lsb[pipe as usize - 2] = None,
        }
        self.resume(previous).map_err(ConfigError::Transport)
    }

    fn pipe0_shadow_address(&self) -> Option<&[u8]> {
        self.pipes.pipe0_shadow()
    }

    fn pipe(&self, pipe: u8) -> Option<Pipe> {
        if pipe > 5 {
            None
        } else {
            Some(self.pipes.snapshot(pipe))
        }
    }

    fn set_static_payload_size(
        &mut self,
        pipe: u8,
        length: u8,
    ) -> Result<(), ConfigError<Self::PipeErrorType>> {
        if pipe > 5 {
            return Err(ConfigError::InvalidPipe);
        }
        if !(1..=MAX_PAYLOAD_LENGTH as u8).contains(&length) {
            return Err(ConfigError::InvalidPayloadLength);
        }
        let previous = self.pause().map_err(ConfigError::Transport)?;
        self.write_register(registers::RX_PW_P0 + pipe, length)
            .map_err(ConfigError::Transport)?;
        self.pipes.payload_sizes[pipe as usize] = length;
        self.resume(previous).map_err(ConfigError::Transport)
    }

    fn address_width(&self) -> u8 {
        self.pipes.width()
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, RadioPipe};
    use crate::{
        radio::{nrf24::commands, prelude::RadioLink, ConfigError},
        spi_test_expects,
        test::mk_radio,
        LinkState,
    };
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::vec;

    #[test]
    fn open_writing_pipe() {
        let mut tx_buf = [0x55u8; 6];
        tx_buf[0] = registers::TX_ADDR | commands::W_REGISTER;
        let mut p0_buf = [0x55u8; 6];
        p0_buf[0] = registers::RX_ADDR_P0 | commands::W_REGISTER;
        let mut response = [0u8; 6];
        response[0] = 0xEu8;

        let spi_expectations = spi_test_expects![
            (tx_buf.to_vec(), response.to_vec()),
            (p0_buf.to_vec(), response.to_vec()),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let address = [0x55u8; 5];
        assert_eq!(
            radio.open_writing_pipe(&address[..4]),
            Err(ConfigError::AddressLengthMismatch)
        );
        radio.open_writing_pipe(&address).unwrap();
        assert!(radio.pipe(0).unwrap().is_enabled());
        // the writing pipe is not a reception address
        assert!(radio.pipe0_shadow_address().is_none());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn open_reading_pipe5() {
        let mut p1_buf = [0x55u8; 6];
        p1_buf[0] = registers::RX_ADDR_P1 | commands::W_REGISTER;
        let mut response = [0u8; 6];
        response[0] = 0xEu8;
        let spi_expectations = spi_test_expects![
            (p1_buf.to_vec(), response.to_vec()),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 2u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![(registers::RX_ADDR_P0 + 5) | commands::W_REGISTER, 0x11u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 0x22u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let mut address = [0x55u8; 5];
        assert_eq!(
            radio.open_reading_pipe(9, &address),
            Err(ConfigError::InvalidPipe)
        );
        // pipe 1 must be opened first
        assert_eq!(
            radio.open_reading_pipe(5, &address),
            Err(ConfigError::SharedPrefixMismatch)
        );
        radio.open_reading_pipe(1, &address).unwrap();
        address[0] = 0x11;
        address[4] = 0x11;
        assert_eq!(
            radio.open_reading_pipe(5, &address),
            Err(ConfigError::SharedPrefixMismatch)
        );
        address[4] = 0x55;
        radio.open_reading_pipe(5, &address).unwrap();
        let pipe = radio.pipe(5).unwrap();
        assert_eq!(pipe.address(), Some(&address[..]));
        assert!(pipe.is_enabled());
        assert!(radio.pipe(6).is_none());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn pipe0_shadow_while_listening() {
        let address = [0xE7u8; 3];
        let tx_address = *b"2PC";
        let spi_expectations = spi_test_expects![
            // start_listening()
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0xFu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::RX_ADDR_P0 | commands::W_REGISTER, 0xE7, 0xE7, 0xE7],
                vec![0xEu8, 0, 0, 0],
            ),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
            // open_writing_pipe() while listening only writes TX_ADDR
            (
                vec![registers::TX_ADDR | commands::W_REGISTER, b'2', b'P', b'C'],
                vec![0xEu8, 0, 0, 0],
            ),
            // close_pipe(0)
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let ce_expectations = [
            // start_listening()
            PinTransaction::set(PinState::High),
            // CE is low while open_writing_pipe() writes
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            // and while close_pipe() writes
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.pipes.reset(3);
        // powered up before listening
        radio.config_reg = radio.config_reg.with_power(true);
        radio.open_reading_pipe(0, &address).unwrap();
        assert!(!radio.pipe(0).unwrap().is_enabled());
        assert_eq!(radio.pipe0_shadow_address(), Some(&address[..]));
        radio.start_listening().unwrap();
        radio.open_writing_pipe(&tx_address).unwrap();
        assert_eq!(radio.pipe0_shadow_address(), Some(&address[..]));
        radio.close_pipe(0).unwrap();
        assert!(radio.pipe0_shadow_address().is_none());
        assert!(radio.pipe(0).unwrap().address().is_none());
        assert_eq!(radio.link_state(), LinkState::Listening);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn static_payload_size() {
        let spi_expectations = spi_test_expects![(
            vec![(registers::RX_PW_P0 + 2) | commands::W_REGISTER, 8u8],
            vec![0xEu8, 0u8],
        ),];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(
            radio.set_static_payload_size(2, 33),
            Err(ConfigError::InvalidPayloadLength)
        );
        radio.set_static_payload_size(2, 8).unwrap();
        assert_eq!(radio.pipe(2).unwrap().static_payload_size(), 8);
        assert_eq!(radio.pipe(3).unwrap().static_payload_size(), 32);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn static_payload_size_while_listening() {
        let spi_expectations = spi_test_expects![(
            vec![(registers::RX_PW_P0 + 1) | commands::W_REGISTER, 8u8],
            vec![0xEu8, 0u8],
        ),];
        let ce_expectations = [
            PinTransaction::set(PinState::High),
            // RX_PW_P1 is written with CE low
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.set_ce(true).unwrap();
        radio.state = LinkState::Listening;
        radio.set_static_payload_size(1, 8).unwrap();
        assert_eq!(radio.link_state(), LinkState::Listening);
        spi.done();
        ce_pin.done();
    }
}
