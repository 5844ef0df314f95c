#![doc = include_str!("../README.md")]
//!
//! ## Basic API
//!
//! - [`Nrf24::new()`](fn@crate::radio::Nrf24::new)
//! - [`Nrf24::begin()`](radio/struct.Nrf24.html#method.begin)
//! - [`Nrf24::apply()`](radio/struct.Nrf24.html#method.apply)
//! - [`Nrf24::open_writing_pipe()`](radio/struct.Nrf24.html#method.open_writing_pipe)
//! - [`Nrf24::open_reading_pipe()`](radio/struct.Nrf24.html#method.open_reading_pipe)
//! - [`Nrf24::close_pipe()`](radio/struct.Nrf24.html#method.close_pipe)
//! - [`Nrf24::start_listening()`](radio/struct.Nrf24.html#method.start_listening)
//! - [`Nrf24::stop_listening()`](radio/struct.Nrf24.html#method.stop_listening)
//! - [`Nrf24::send()`](radio/struct.Nrf24.html#method.send)
//! - [`Nrf24::available()`](radio/struct.Nrf24.html#method.available)
//! - [`Nrf24::receive()`](radio/struct.Nrf24.html#method.receive)
//!
//! ## Advanced API
//!
//! - [`Nrf24::with_transport()`](fn@crate::radio::Nrf24::with_transport)
//! - [`Nrf24::read_config()`](radio/struct.Nrf24.html#method.read_config)
//! - [`Nrf24::pipe0_shadow_address()`](radio/struct.Nrf24.html#method.pipe0_shadow_address)
//! - [`Nrf24::pipe()`](radio/struct.Nrf24.html#method.pipe)
//! - [`Nrf24::set_static_payload_size()`](radio/struct.Nrf24.html#method.set_static_payload_size)
//! - [`Nrf24::write_ack_payload()`](radio/struct.Nrf24.html#method.write_ack_payload)
//! - [`Nrf24::fifo_state()`](radio/struct.Nrf24.html#method.fifo_state)
//! - [`Nrf24::take_overflow()`](radio/struct.Nrf24.html#method.take_overflow)
//! - [`Nrf24::flush_rx()`](radio/struct.Nrf24.html#method.flush_rx)
//! - [`Nrf24::flush_tx()`](radio/struct.Nrf24.html#method.flush_tx)
//! - [`Nrf24::clear_status_flags()`](radio/struct.Nrf24.html#method.clear_status_flags)
//! - [`Nrf24::update()`](radio/struct.Nrf24.html#method.update)
//! - [`Nrf24::status_flags()`](radio/struct.Nrf24.html#method.status_flags)
//! - [`Nrf24::last_arc()`](radio/struct.Nrf24.html#method.last_arc)
//! - [`Nrf24::power_up()`](radio/struct.Nrf24.html#method.power_up)
//! - [`Nrf24::power_down()`](radio/struct.Nrf24.html#method.power_down)
//! - [`Nrf24::rpd()`](fn@crate::radio::Nrf24::rpd)
//! - [`Nrf24::is_plus_variant()`](fn@crate::radio::Nrf24::is_plus_variant)
//! - [`Nrf24::read_register()`](fn@crate::radio::Nrf24::read_register)
//! - [`Nrf24::write_register()`](fn@crate::radio::Nrf24::write_register)
//!
#![no_std]

mod log;
mod types;
pub use types::{
    CrcLength, DataRate, FifoState, Frame, LinkState, PaLevel, SendOutcome, StatusFlags,
    MAX_PAYLOAD_LENGTH,
};
pub mod radio;
