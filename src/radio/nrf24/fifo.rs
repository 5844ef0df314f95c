use crate::radio::{prelude::RadioFifo, Nrf24};
use crate::FifoState;

use super::{commands, Transport};

impl<T: Transport> RadioFifo for Nrf24<T> {
    type FifoErrorType = T::Error;

    fn available(&mut self) -> Result<Option<u8>, Self::FifoErrorType> {
        if let Some(frame) = self.ack_queue.front() {
            return Ok(Some(frame.pipe()));
        }
        if self.fifo_status()?.rx_empty() {
            return Ok(None);
        }
        // the STATUS byte clocked out with FIFO_STATUS tells the pipe number
        let pipe = self.status.rx_pipe();
        Ok((pipe <= 5).then_some(pipe))
    }

    /// Use this to discard all 3 layers in the radio's RX FIFO,
    /// and any ACK payload that was not received yet.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.ack_queue.clear();
        self.command(commands::FLUSH_RX)?;
        Ok(())
    }

    /// Use this to discard all 3 layers in the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.command(commands::FLUSH_TX)?;
        Ok(())
    }

    fn fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType> {
        let fifo = self.fifo_status()?;
        Ok(if about_tx {
            fifo.tx_state()
        } else {
            fifo.rx_state()
        })
    }

    fn take_overflow(&mut self) -> bool {
        core::mem::take(&mut self.overflow)
    }
}
