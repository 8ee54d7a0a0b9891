//! The bus side of the driver: register writes over I²C and the reset line.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use embedded_hal::digital::v2::OutputPin;

use crate::registers::{Register, MAX_REGISTER_WIDTH};
use crate::{Error, Timings};

//
// Public Types
//

/// The TAS3004 has one of two I²C addresses, depending on whether the CS
/// pin is pulled high or low.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusAddress {
    /// The address when the CS pin is high (`0x6A` in 8-bit form)
    CsHigh = 0x35,
    /// The address when the CS pin is low (`0x68` in 8-bit form)
    CsLow = 0x34,
}

/// Owns the I²C bus and the active-low codec reset line.
pub struct Interface<I2C, RST> {
    i2c: I2C,
    reset: RST,
    bus_address: u8,
}

//
// impls on Public Types
//

impl From<BusAddress> for u8 {
    fn from(addr: BusAddress) -> u8 {
        addr as u8
    }
}

impl<I2C, RST> Interface<I2C, RST>
where
    I2C: Write,
    RST: OutputPin,
{
    /// Wrap an I²C bus and the codec's reset pin.
    pub fn new(i2c: I2C, reset: RST, bus_address: BusAddress) -> Interface<I2C, RST> {
        Interface {
            i2c,
            reset,
            bus_address: bus_address.into(),
        }
    }

    /// Send `data` to `register` as a single I²C transfer.
    ///
    /// `data` must already be exactly the register's width; anything past
    /// [`MAX_REGISTER_WIDTH`] bytes is ignored.
    pub fn write_register(&mut self, register: Register, data: &[u8]) -> Result<(), Error> {
        let count = data.len().min(MAX_REGISTER_WIDTH);
        let mut buffer = [0u8; MAX_REGISTER_WIDTH + 1];
        buffer[0] = register.address();
        buffer[1..=count].copy_from_slice(&data[..count]);
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Setting TAS3004 {=u8:#x} to {=[u8]:x}",
            register.address(),
            &buffer[1..=count]
        );
        self.i2c
            .write(self.bus_address, &buffer[..=count])
            .map_err(|_e| {
                #[cfg(feature = "defmt")]
                defmt::warn!("I2C write to TAS3004 {=u8:#x} failed", register.address());
                Error::TransportFailure(register.address())
            })
    }

    /// Pulse the reset line: run, reset, run, with the settle time after each
    /// edge.
    ///
    /// The I²S clocks must already be running, as the TAS3004 may hold the
    /// I²C lines low until it has seen a full reset.
    pub fn reset_pulse<D>(&mut self, delay: &mut D, timings: &Timings) -> Result<(), Error>
    where
        D: DelayMs<u32>,
    {
        self.reset.set_high().map_err(|_| Error::ResetLine)?;
        delay.delay_ms(timings.reset_setup_ms);
        self.reset.set_low().map_err(|_| Error::ResetLine)?;
        delay.delay_ms(timings.reset_hold_ms);
        self.reset.set_high().map_err(|_| Error::ResetLine)?;
        // No I²C traffic until the part has come out of reset
        delay.delay_ms(timings.reset_release_ms);
        Ok(())
    }

    /// Give back the I²C bus and reset pin.
    pub fn release(self) -> (I2C, RST) {
        (self.i2c, self.reset)
    }
}
