use super::{commands, mnemonics, registers, timing, Nrf24, Transport};
use crate::{
    log::{debug, warn},
    radio::{
        prelude::{RadioLink, RadioPower, RadioStatus},
        RecvError, SendError,
    },
    Frame, LinkState, SendOutcome, StatusFlags, MAX_PAYLOAD_LENGTH,
};

impl<T: Transport> Nrf24<T> {
    /// Read the oldest payload in the RX FIFO, which was delivered by `pipe`.
    fn read_frame(&mut self, pipe: u8) -> Result<Frame, RecvError<T::Error>> {
        let len = if self.feature.dynamic_payloads() {
            let mut width = [0u8];
            self.status = self
                .transport
                .exchange(commands::R_RX_PL_WID, &mut width)
                .map_err(RecvError::Transport)?;
            if width[0] as usize > MAX_PAYLOAD_LENGTH {
                // the datasheet says to discard the whole RX FIFO
                warn!("dynamic payload length {=u8} is corrupted", width[0]);
                self.command(commands::FLUSH_RX)
                    .map_err(RecvError::Transport)?;
                return Err(RecvError::Corrupted);
            }
            width[0]
        } else {
            self.pipes.payload_size(pipe)
        };
        let mut frame = Frame::new(pipe, &[]);
        self.status = self
            .transport
            .exchange(commands::R_RX_PAYLOAD, frame.storage(len))
            .map_err(RecvError::Transport)?;
        self.clear_status_flags(StatusFlags::default().with_rx_dr(true))
            .map_err(RecvError::Transport)?;
        Ok(frame)
    }

    /// Move frames from the RX FIFO into the software queue, oldest first.
    ///
    /// Frames that were left unread before the transmission come out ahead of
    /// the ACK payload, so `receive()` still yields everything in arrival order.
    fn capture_ack_payloads(&mut self) -> Result<(), T::Error> {
        while !self.ack_queue.is_full() {
            if self.fifo_status()?.rx_empty() {
                break;
            }
            let pipe = self.status.rx_pipe();
            match self.read_frame(pipe) {
                Ok(frame) => {
                    // room was checked above
                    let _ = self.ack_queue.push_back(frame);
                }
                Err(RecvError::Transport(e)) => return Err(e),
                // RX FIFO was flushed
                Err(_) => break,
            }
        }
        Ok(())
    }

    /// Lower CE and go back to [`LinkState::Idle`] after a transmission.
    fn end_transmission(&mut self) -> Result<(), T::Error> {
        self.set_ce(false)?;
        self.state = LinkState::Idle;
        Ok(())
    }
}

impl<T: Transport> RadioLink for Nrf24<T> {
    type LinkErrorType = T::Error;

    fn link_state(&self) -> LinkState {
        self.state
    }

    fn start_listening(&mut self) -> Result<(), Self::LinkErrorType> {
        if !self.config_reg.power() {
            self.power_up(None)?;
        }
        self.config_reg = self.config_reg.with_is_rx(true);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;
        self.clear_status_flags(StatusFlags::new())?;

        // Restore the pipe0 address, if exists
        let width = self.pipes.width() as usize;
        if let Some(address) = self.pipes.pipe0_shadow {
            self.write_register_multi(registers::RX_ADDR_P0, &address[..width])?;
            self.pipes.set_enabled(0, true);
        } else {
            self.pipes.set_enabled(0, false);
        }
        self.write_register(registers::EN_RXADDR, self.pipes.enabled_mask())?;

        self.set_ce(true)?;
        self.state = LinkState::Listening;
        debug!("listening");
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), Self::LinkErrorType> {
        self.set_ce(false)?;
        self.state = LinkState::Idle;

        self.transport.delay_us(self.tx_delay);
        if self.feature.ack_payloads() {
            // unsent ACK payloads would be transmitted as regular payloads
            self.command(commands::FLUSH_TX)?;
        }

        self.config_reg = self.config_reg.with_is_rx(false);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;

        // pipe 0 is the auto-ack reply path of the writing pipe
        let width = self.pipes.width() as usize;
        if let Some(address) = self.pipes.tx_address {
            self.write_register_multi(registers::RX_ADDR_P0, &address[..width])?;
        }
        self.pipes.set_enabled(0, true);
        self.write_register(registers::EN_RXADDR, self.pipes.enabled_mask())
    }

    /// See [`RadioLink::send()`] for implementation-agnostic detail.
    ///
    /// Static payload lengths are respected by padding `buf` with zeros.
    fn send(
        &mut self,
        buf: &[u8],
        require_ack: bool,
        timeout_us: u32,
    ) -> Result<SendOutcome, SendError<Self::LinkErrorType>> {
        let dynamic = self.feature.dynamic_payloads();
        if buf.len() > MAX_PAYLOAD_LENGTH || (!dynamic && buf.len() > self.payload_length as usize)
        {
            return Err(SendError::PayloadTooLong);
        }
        if buf.is_empty() && !self.feature.ack_payloads() {
            return Err(SendError::EmptyPayload);
        }
        if !require_ack && !self.feature.ask_no_ack() {
            return Err(SendError::NoAckDisabled);
        }
        if self.state == LinkState::Listening {
            return Err(SendError::NotIdle);
        }

        // RX_DR is cleared too, so it only rises for an ACK payload to this send
        self.clear_status_flags(StatusFlags::from_bits(
            mnemonics::MASK_RX_DR | mnemonics::MASK_MAX_RT | mnemonics::MASK_TX_DS,
        ))
        .map_err(SendError::Transport)?;
        if self.status.tx_full() {
            // TX FIFO is full already
            return Err(SendError::FifoFull);
        }

        let command = if require_ack {
            commands::W_TX_PAYLOAD
        } else {
            commands::W_TX_PAYLOAD_NO_ACK
        };
        // pad buf with zeros when payload lengths are static
        let len = if dynamic {
            buf.len()
        } else {
            self.payload_length as usize
        };
        let mut payload = [0u8; MAX_PAYLOAD_LENGTH];
        payload[..buf.len()].copy_from_slice(buf);
        self.status = self
            .transport
            .exchange(command, &mut payload[..len])
            .map_err(SendError::Transport)?;

        self.set_ce(true).map_err(SendError::Transport)?;
        self.state = LinkState::Transmitting;
        self.transport.delay_us(timing::CE_PULSE);

        // now poll until we get a tx_ds or tx_df event
        let budget = timeout_us / self.poll_interval.max(1) + 1;
        let mut ack_payload = false;
        for _ in 0..budget {
            let status = self.command(commands::NOP).map_err(SendError::Transport)?;
            if status.tx_df() {
                // The payload stays in the TX FIFO until flush_tx().
                self.end_transmission().map_err(SendError::Transport)?;
                warn!("no ACK received after maximum retries");
                return Err(SendError::MaxRetriesExceeded);
            }
            if status.tx_ds() {
                self.clear_status_flags(StatusFlags::default().with_tx_ds(true))
                    .map_err(SendError::Transport)?;
                if status.rx_dr() {
                    ack_payload = true;
                    self.capture_ack_payloads()
                        .map_err(SendError::Transport)?;
                }
                // a stale payload may have been sent ahead of this one
                if self.fifo_status().map_err(SendError::Transport)?.tx_empty() {
                    self.end_transmission().map_err(SendError::Transport)?;
                    return if require_ack {
                        let retries = self.last_arc().map_err(SendError::Transport)?;
                        Ok(SendOutcome::Acked {
                            retries,
                            ack_payload,
                        })
                    } else {
                        Ok(SendOutcome::Sent)
                    };
                }
            }
            self.transport.delay_us(self.poll_interval);
        }
        // The radio keeps retrying on its own; only the waiting stops here.
        self.end_transmission().map_err(SendError::Transport)?;
        warn!("transmission timed out after {=u32} us", timeout_us);
        Err(SendError::Timeout)
    }

    /// See [`RadioLink::receive()`] for implementation-agnostic detail.
    ///
    /// Captured ACK payloads are delivered before anything in the RX FIFO.
    fn receive(&mut self) -> Result<Frame, RecvError<Self::LinkErrorType>> {
        if let Some(frame) = self.ack_queue.pop_front() {
            return Ok(frame);
        }
        if self.fifo_status().map_err(RecvError::Transport)?.rx_empty() {
            return Err(RecvError::Empty);
        }
        let pipe = self.status.rx_pipe();
        if pipe > 5 {
            return Err(RecvError::Empty);
        }
        self.read_frame(pipe)
    }

    fn write_ack_payload(&mut self, pipe: u8, buf: &[u8]) -> Result<bool, Self::LinkErrorType> {
        if self.feature.ack_payloads() && pipe <= 5 {
            self.write_buf(commands::W_ACK_PAYLOAD | pipe, buf)?;
            return Ok(!self.status.tx_full());
        }
        Ok(false)
    }

    fn last_arc(&mut self) -> Result<u8, Self::LinkErrorType> {
        Ok(self.read_register(registers::OBSERVE_TX)? & 0xF)
    }
}
