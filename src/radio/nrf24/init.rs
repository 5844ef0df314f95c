use super::{
    bit_fields::{Config, Feature, RfSetup, SetupRetry},
    commands, mnemonics, registers, timing, tx_delay_for, Nrf24, Transport,
};
use crate::{
    log::{debug, info, warn},
    radio::{
        prelude::{RadioFifo, RadioInit, RadioPower, RadioStatus},
        ConfigError, InitError, RadioConfig,
    },
    LinkState, StatusFlags,
};

impl<T: Transport> Nrf24<T> {
    /// A private function to write a special SPI command specific to older
    /// non-plus variants of the nRF24L01 radio module. It has no effect on plus variants.
    fn toggle_features(&mut self) -> Result<(), T::Error> {
        self.status = self.transport.exchange(commands::ACTIVATE, &mut [0x73])?;
        Ok(())
    }

    /// Write every configuration register from `config`.
    ///
    /// The caller is responsible for validation and for keeping CE low.
    fn write_config(&mut self, config: &RadioConfig) -> Result<(), T::Error> {
        let width = config.address_width();
        self.write_register(registers::SETUP_AW, width - 2)?;
        if width != self.pipes.width() {
            // the stored addresses no longer fit
            self.pipes.reset(width);
            self.write_register(registers::EN_RXADDR, 0)?;
        }
        self.write_register(registers::SETUP_RETR, config.setup_retry().into_bits())?;
        let all_pipes = |enable: bool| if enable { mnemonics::ALL_PIPES } else { 0 };
        self.write_register(registers::EN_AA, all_pipes(config.auto_ack()))?;
        self.write_register(registers::DYNPD, all_pipes(config.dynamic_payloads()))?;
        let feature = config.feature();
        self.write_register(registers::FEATURE, feature.into_bits())?;
        self.feature = feature;
        self.write_register(registers::RF_SETUP, config.rf_setup().into_bits())?;
        for pipe in 0..6 {
            self.write_register(registers::RX_PW_P0 + pipe, config.payload_length())?;
        }
        self.pipes.set_all_payload_sizes(config.payload_length());
        self.payload_length = config.payload_length();
        self.write_register(registers::RF_CH, config.channel())?;
        self.config_reg = self.config_reg.with_crc_length(config.crc_length());
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;
        self.tx_delay = tx_delay_for(config.data_rate());
        Ok(())
    }
}

impl<T: Transport> RadioInit for Nrf24<T> {
    type InitErrorType = T::Error;

    /// Initialize the radio's hardware using the [`Transport`] given
    /// to [`Nrf24::with_transport()`] (or [`Nrf24::new()`]).
    fn begin(&mut self) -> Result<(), InitError<Self::InitErrorType>> {
        // Must allow the radio time to settle else configuration bits will not necessarily stick.
        // This is actually only required following power up but some settling time also appears to
        // be required after resets too.
        self.transport.delay_us(timing::POWER_ON_SETTLE);

        self.config_reg = self.config_reg.with_is_rx(false);
        self.power_down().map_err(InitError::Transport)?;
        let config = self
            .read_register(registers::CONFIG)
            .map_err(InitError::Transport)?;
        if config != self.config_reg.into_bits() {
            warn!("CONFIG read back as {=u8:#X}; radio is not responding", config);
            return Err(InitError::NotResponding);
        }

        // detect if is a plus variant & use old toggle features command accordingly
        let before_toggle = self
            .read_register(registers::FEATURE)
            .map_err(InitError::Transport)?;
        self.toggle_features().map_err(InitError::Transport)?;
        let after_toggle = self
            .read_register(registers::FEATURE)
            .map_err(InitError::Transport)?;
        self.is_plus_variant = before_toggle == after_toggle;
        if after_toggle < before_toggle {
            // FEATURE register is disabled on non-plus variants until `toggle_features()` is used.
            // MCU may have reset without triggering a power-on-reset in radio.
            self.toggle_features().map_err(InitError::Transport)?;
        }

        self.clear_status_flags(StatusFlags::new())
            .map_err(InitError::Transport)?;
        self.flush_rx().map_err(InitError::Transport)?;
        self.flush_tx().map_err(InitError::Transport)?;

        let config = RadioConfig::default();
        self.pipes.reset(config.address_width());
        self.write_register(registers::EN_RXADDR, 0)
            .map_err(InitError::Transport)?;
        self.write_config(&config).map_err(InitError::Transport)?;
        self.overflow = false;

        self.power_up(None).map_err(InitError::Transport)?;
        self.state = LinkState::Idle;
        info!(
            "nRF24L01{} initialized",
            if self.is_plus_variant { "+" } else { "" }
        );
        Ok(())
    }

    fn apply(&mut self, config: &RadioConfig) -> Result<(), ConfigError<Self::InitErrorType>> {
        config.validate()?;
        let previous = self.state;
        self.set_ce(false).map_err(ConfigError::Transport)?;
        self.state = LinkState::Idle;
        self.write_config(config).map_err(ConfigError::Transport)?;
        self.resume(previous).map_err(ConfigError::Transport)?;
        debug!(
            "applied channel {=u8}, {=u8} byte addresses",
            config.channel(),
            config.address_width()
        );
        Ok(())
    }

    fn read_config(&mut self) -> Result<RadioConfig, Self::InitErrorType> {
        let address_width = (self.read_register(registers::SETUP_AW)? & 3).max(1) + 2;
        let retries = SetupRetry::from_bits(self.read_register(registers::SETUP_RETR)?);
        let auto_ack = self.read_register(registers::EN_AA)? & mnemonics::ALL_PIPES != 0;
        let feature = Feature::from_bits(self.read_register(registers::FEATURE)?);
        let rf_setup = RfSetup::from_bits(self.read_register(registers::RF_SETUP)?);
        let payload_length = self.read_register(registers::RX_PW_P0)? & 0x3F;
        let channel = self.read_register(registers::RF_CH)?;
        let config_reg = Config::from_bits(self.read_register(registers::CONFIG)?);
        Ok(RadioConfig::default()
            .with_address_width(address_width)
            .with_auto_retries(retries.ard(), retries.arc())
            .with_auto_ack(auto_ack)
            .with_dynamic_payloads(feature.dynamic_payloads())
            .with_ack_payloads(feature.ack_payloads())
            .with_allow_no_ack(feature.ask_no_ack())
            .with_data_rate(rf_setup.data_rate())
            .with_pa_level(rf_setup.pa_level())
            .with_lna_enable(rf_setup.lna_enable())
            .with_payload_length(payload_length)
            .with_channel(channel)
            .with_crc_length(config_reg.crc_length()))
    }

    fn channel(&mut self) -> Result<u8, Self::InitErrorType> {
        self.read_register(registers::RF_CH)
    }
}
