use crate::{
    radio::{prelude::RadioStatus, Nrf24},
    types::StatusFlags,
};

use super::{commands, registers, Transport};

impl<T: Transport> RadioStatus for Nrf24<T> {
    type StatusErrorType = T::Error;

    fn status_flags(&self) -> StatusFlags {
        self.status
    }

    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType> {
        self.write_register(
            registers::STATUS,
            flags.into_bits() & StatusFlags::IRQ_MASK,
        )
    }

    fn update(&mut self) -> Result<(), Self::StatusErrorType> {
        self.command(commands::NOP)?;
        Ok(())
    }
}
