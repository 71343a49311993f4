use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::{Error, Pinnacle, Reg, RegisterInterface};

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin,
  D: DelayNs,
{
  /// Raw read of register `addr` (0x00..=0x1F).
  pub fn read_register(&mut self, addr: u8) -> Result<u8, Error<E>> {
    let mut buf = [0u8; 1];
    self.read_registers(addr, &mut buf)?;
    Ok(buf[0])
  }

  /// Raw read of `buf.len()` sequential registers starting at `addr`.
  pub fn read_registers(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
    self.iface.read_registers(addr, buf).map_err(Error::Bus)
  }

  /// Raw write of register `addr`.
  ///
  /// Only the mode and intellimouse state are tracked by the driver; touching
  /// the data mode bit or FeedConfig2 here leaves those out of date.
  pub fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Error<E>> {
    self.write_registers(addr, &[value])
  }

  /// Raw write of sequential registers. Each byte is its own bus write.
  pub fn write_registers(&mut self, addr: u8, data: &[u8]) -> Result<(), Error<E>> {
    self.iface.write_registers(addr, data).map_err(Error::Bus)
  }

  // Typed helpers
  pub(crate) fn read_reg(&mut self, reg: Reg) -> Result<u8, Error<E>> {
    self.read_register(reg.into())
  }

  pub(crate) fn read_regs(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<E>> {
    self.read_registers(reg.into(), buf)
  }

  pub(crate) fn write_reg(&mut self, reg: Reg, value: u8) -> Result<(), Error<E>> {
    self.write_register(reg.into(), value)
  }

  pub(crate) fn write_regs(&mut self, reg: Reg, data: &[u8]) -> Result<(), Error<E>> {
    self.write_registers(reg.into(), data)
  }

  pub(crate) fn read_be_i16(&mut self, reg: Reg) -> Result<i16, Error<E>> {
    let mut buf = [0u8; 2];
    self.read_regs(reg, &mut buf)?;
    Ok(i16::from_be_bytes(buf))
  }
}
