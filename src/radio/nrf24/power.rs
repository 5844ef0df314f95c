use crate::{
    radio::{prelude::RadioPower, Nrf24},
    LinkState,
};

use super::{registers, timing, Transport};

impl<T: Transport> RadioPower for Nrf24<T> {
    type PowerErrorType = T::Error;

    /// After calling [`RadioLink::start_listening()`](fn@crate::radio::prelude::RadioLink::start_listening),
    /// a non-PA/LNA radio will consume about
    /// 13.5mA at [`PaLevel::Max`](crate::PaLevel::Max).
    /// During active transmission (including RX role when transmitting an auto-ACK
    /// packet), a non-PA/LNA radio will consume about 11.5mA.
    /// In power standby mode (when not receiving nor transmitting), a non-PA/LNA radio
    /// will consume about 26uA (.026mA).
    /// In full power down mode (a sleep state), the radio will consume approximately
    /// 900nA (.0009mA).
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType> {
        self.set_ce(false)?; // CE must be low while powered down
        self.state = LinkState::Idle;
        self.config_reg = self.config_reg.with_power(false);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())
    }

    fn power_up(&mut self, delay: Option<u32>) -> Result<(), Self::PowerErrorType> {
        // if not powered up then power up and wait for the radio to initialize
        if self.config_reg.power() {
            return Ok(());
        }
        self.config_reg = self.config_reg.with_power(true);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;

        // There must be a delay of Tpd2standby after leaving power down mode
        // before CE is set high. It can be up to 5ms per the 1.0 datasheet.
        let delay = delay.unwrap_or(timing::POWER_UP);
        if delay > 0 {
            self.transport.delay_us(delay);
        }
        Ok(())
    }

    fn is_powered(&self) -> bool {
        self.config_reg.power()
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, RadioPower};
    use crate::{radio::nrf24::commands, spi_test_expects, test::mk_radio, LinkState};
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::vec;

    #[test]
    fn power_cycle() {
        let spi_expectations = spi_test_expects![
            // power_up()
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0xEu8],
                vec![0xEu8, 0u8],
            ),
            // power_down()
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0xCu8],
                vec![0xEu8, 0u8],
            ),
        ];
        let ce_expectations = [PinTransaction::set(PinState::Low)];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(!radio.is_powered());
        radio.power_up(Some(0)).unwrap();
        assert!(radio.is_powered());
        // already powered up; nothing to do
        radio.power_up(None).unwrap();
        radio.state = LinkState::Listening;
        radio.power_down().unwrap();
        assert!(!radio.is_powered());
        assert_eq!(radio.state, LinkState::Idle);
        spi.done();
        ce_pin.done();
    }
}
