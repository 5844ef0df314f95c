use crate::radio::nrf24::bit_fields::{Config, Feature, RfSetup, SetupRetry};
use crate::radio::ConfigError;
use crate::{CrcLength, DataRate, PaLevel};

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use nrf24_link::{radio::RadioConfig, CrcLength};
/// let config = RadioConfig::default()
///     .with_channel(0x6f)
///     .with_crc_length(CrcLength::Bit8);
/// assert_eq!(config.channel(), 0x6f);
/// ```
///
/// Nothing is checked while building; the whole object is validated by
/// [`RadioInit::apply()`](fn@crate::radio::prelude::RadioInit::apply)
/// (or [`RadioConfig::validate()`]) before any register is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    channel: u8,
    address_width: u8,
    crc_length: CrcLength,
    data_rate: DataRate,
    pa_level: PaLevel,
    lna_enable: bool,
    dynamic_payloads: bool,
    ack_payloads: bool,
    allow_no_ack: bool,
    auto_ack: bool,
    auto_retry_delay: u8,
    auto_retry_count: u8,
    payload_length: u8,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `76` |
    /// | [`RadioConfig::address_width()`] | `5` |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::lna_enable()`] | `true` |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit16`] |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps1`] |
    /// | [`RadioConfig::payload_length()`] | `32` |
    /// | [`RadioConfig::dynamic_payloads()`] | `false` |
    /// | [`RadioConfig::auto_ack()`] | `true` (for pipes 0 - 5) |
    /// | [`RadioConfig::ack_payloads()`] | `false` |
    /// | [`RadioConfig::allow_no_ack()`] | `false` |
    /// | [`RadioConfig::auto_retry_delay()`] | `5` |
    /// | [`RadioConfig::auto_retry_count()`] | `15` |
    fn default() -> Self {
        let rf_setup = RfSetup::default();
        let retries = SetupRetry::default();
        Self {
            channel: 76,
            address_width: 5,
            crc_length: Config::default().crc_length(),
            data_rate: rf_setup.data_rate(),
            pa_level: rf_setup.pa_level(),
            lna_enable: rf_setup.lna_enable(),
            dynamic_payloads: false,
            ack_payloads: false,
            allow_no_ack: false,
            auto_ack: true,
            auto_retry_delay: retries.ard(),
            auto_retry_count: retries.arc(),
            payload_length: 32,
        }
    }
}

impl RadioConfig {
    /// Check every rule that ties settings together.
    ///
    /// This is what [`RadioInit::apply()`](fn@crate::radio::prelude::RadioInit::apply)
    /// does before touching the radio.
    pub fn validate<E>(&self) -> Result<(), ConfigError<E>> {
        if !(3..=5).contains(&self.address_width) {
            return Err(ConfigError::InvalidAddressWidth);
        }
        if self.channel > 127 {
            return Err(ConfigError::ChannelOutOfRange);
        }
        if self.ack_payloads && !(self.dynamic_payloads && self.auto_ack) {
            return Err(ConfigError::IncompatibleAckPayload);
        }
        if self.auto_ack && self.crc_length == CrcLength::Disabled {
            return Err(ConfigError::CrcRequired);
        }
        if !(1..=32).contains(&self.payload_length) {
            return Err(ConfigError::InvalidPayloadLength);
        }
        if self.auto_retry_delay > 15 || self.auto_retry_count > 15 {
            return Err(ConfigError::InvalidAutoRetry);
        }
        Ok(())
    }

    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The RF channel, in range [0, 127].
    ///
    /// Channels translate to the RF frequency as an offset of MHz from 2400 MHz.
    pub fn with_channel(self, channel: u8) -> Self {
        Self { channel, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_address_width()`].
    pub const fn address_width(&self) -> u8 {
        self.address_width
    }

    /// The address width (in bytes) used by all pipes. Must be 3, 4, or 5.
    ///
    /// Applying a different width than the radio currently uses closes all RX pipes
    /// and forgets the addresses given to the pipe manager.
    pub fn with_address_width(self, address_width: u8) -> Self {
        Self {
            address_width,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_crc_length()`].
    pub const fn crc_length(&self) -> CrcLength {
        self.crc_length
    }

    /// The Cyclical Redundancy Checksum (CRC) length.
    ///
    /// [`CrcLength::Disabled`] requires auto-ack to be disabled.
    pub fn with_crc_length(self, crc_length: CrcLength) -> Self {
        Self { crc_length, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// The Data Rate (over the air).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self { data_rate, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.pa_level
    }

    /// The Power Amplitude (PA) level.
    pub fn with_pa_level(self, pa_level: PaLevel) -> Self {
        Self { pa_level, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_lna_enable()`].
    pub const fn lna_enable(&self) -> bool {
        self.lna_enable
    }

    /// Enable or disable the chip's Low Noise Amplifier (LNA) feature.
    ///
    /// This value may not be respected depending on the radio module used.
    pub fn with_lna_enable(self, lna_enable: bool) -> Self {
        Self { lna_enable, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_dynamic_payloads()`].
    pub const fn dynamic_payloads(&self) -> bool {
        self.dynamic_payloads
    }

    /// Enable dynamically sized payloads on all pipes.
    pub fn with_dynamic_payloads(self, dynamic_payloads: bool) -> Self {
        Self {
            dynamic_payloads,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_ack_payloads()`].
    pub const fn ack_payloads(&self) -> bool {
        self.ack_payloads
    }

    /// Allow payloads to be attached to automatic acknowledgements.
    ///
    /// Requires dynamic payloads and auto-ack.
    pub fn with_ack_payloads(self, ack_payloads: bool) -> Self {
        Self {
            ack_payloads,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_allow_no_ack()`].
    pub const fn allow_no_ack(&self) -> bool {
        self.allow_no_ack
    }

    /// Allow payloads to be sent without asking for an acknowledgement.
    pub fn with_allow_no_ack(self, allow_no_ack: bool) -> Self {
        Self {
            allow_no_ack,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_auto_ack()`].
    pub const fn auto_ack(&self) -> bool {
        self.auto_ack
    }

    /// Enable automatic acknowledgement (and retransmission) on all pipes.
    pub fn with_auto_ack(self, auto_ack: bool) -> Self {
        Self { auto_ack, ..self }
    }

    /// Returns the `delay` value set by [`RadioConfig::with_auto_retries()`].
    pub const fn auto_retry_delay(&self) -> u8 {
        self.auto_retry_delay
    }

    /// Returns the `count` value set by [`RadioConfig::with_auto_retries()`].
    pub const fn auto_retry_count(&self) -> u8 {
        self.auto_retry_count
    }

    /// Set the automatic retransmission behavior.
    ///
    /// - `delay` is in steps of 250 microseconds, plus 250 (range [0, 15]).
    /// - `count` is the maximum number of retransmissions (range [0, 15]).
    pub fn with_auto_retries(self, delay: u8, count: u8) -> Self {
        Self {
            auto_retry_delay: delay,
            auto_retry_count: count,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_payload_length()`].
    pub const fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// The static payload length (range [1, 32]) used by all pipes when dynamic
    /// payloads are disabled.
    pub fn with_payload_length(self, payload_length: u8) -> Self {
        Self {
            payload_length,
            ..self
        }
    }

    pub(crate) fn rf_setup(&self) -> RfSetup {
        RfSetup::new()
            .with_data_rate(self.data_rate)
            .with_pa_level(self.pa_level)
            .with_lna_enable(self.lna_enable)
    }

    pub(crate) fn setup_retry(&self) -> SetupRetry {
        SetupRetry::new()
            .with_ard(self.auto_retry_delay)
            .with_arc(self.auto_retry_count)
    }

    pub(crate) fn feature(&self) -> Feature {
        Feature::new()
            .with_dynamic_payloads(self.dynamic_payloads)
            .with_ack_payloads(self.ack_payloads)
            .with_ask_no_ack(self.allow_no_ack)
    }
}
