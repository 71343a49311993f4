//! Extended Register Access.
//!
//! The larger 16-bit memory is reached through a handshake on registers
//! 0x1B..0x1E: load the value (for writes), load the address, issue a command
//! and wait for the ASIC to clear the control register. The feed has to be
//! off while raw memory is touched, so every transaction disables it and puts
//! the previous state back afterwards.
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::config::Budget;
use crate::{Error, Pinnacle, Reg, RegisterInterface, ERA_READ, ERA_READ_SEQUENTIAL, ERA_WRITE, ERA_WRITE_SEQUENTIAL};

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin,
  D: DelayNs,
{
  /// Read one byte of extended memory.
  pub fn era_read(&mut self, addr: u16) -> Result<u8, Error<E>> {
    self.with_feed_paused(|pad| {
      pad.era_address(addr)?;
      pad.era_command(ERA_READ)?;
      let value = pad.read_reg(Reg::EraValue)?;
      pad.clear_status_flags()?;
      Ok(value)
    })
  }

  /// Read `buf.len()` consecutive bytes of extended memory starting at `addr`.
  ///
  /// The ASIC advances the address after every sequential read command, so
  /// each byte costs its own command and poll.
  pub fn era_read_bytes(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), Error<E>> {
    self.with_feed_paused(|pad| {
      pad.era_address(addr)?;
      for byte in buf.iter_mut() {
        pad.era_command(ERA_READ_SEQUENTIAL)?;
        *byte = pad.read_reg(Reg::EraValue)?;
        pad.clear_status_flags()?;
      }
      Ok(())
    })
  }

  /// Write one byte of extended memory.
  pub fn era_write(&mut self, addr: u16, value: u8) -> Result<(), Error<E>> {
    self.with_feed_paused(|pad| {
      pad.write_reg(Reg::EraValue, value)?;
      pad.era_address(addr)?;
      pad.era_command(ERA_WRITE)?;
      pad.clear_status_flags()
    })
  }

  /// Write the same `value` to `count` consecutive bytes starting at `addr`.
  ///
  /// Only meant for short runs such as the two byte sample-rate reload timer.
  pub fn era_write_bytes(&mut self, addr: u16, value: u8, count: usize) -> Result<(), Error<E>> {
    self.with_feed_paused(|pad| {
      pad.write_reg(Reg::EraValue, value)?;
      pad.era_address(addr)?;
      pad.write_reg(Reg::EraControl, ERA_WRITE_SEQUENTIAL)?;
      for _ in 0..count {
        pad.era_wait()?;
        pad.clear_status_flags()?;
      }
      Ok(())
    })
  }

  fn with_feed_paused<T, F>(&mut self, f: F) -> Result<T, Error<E>>
  where
    F: FnOnce(&mut Self) -> Result<T, Error<E>>,
  {
    let feed = self.feed_enable()?;
    if feed {
      self.set_feed_enable(false)?;
    }

    let result = f(self);

    if feed {
      self.set_feed_enable(true)?;
    }
    result
  }

  fn era_address(&mut self, addr: u16) -> Result<(), Error<E>> {
    self.write_regs(Reg::EraAddrHigh, &addr.to_be_bytes())
  }

  fn era_command(&mut self, command: u8) -> Result<(), Error<E>> {
    self.write_reg(Reg::EraControl, command)?;
    self.era_wait()
  }

  // The ASIC clears the control register (and raises SW_CC) when done.
  fn era_wait(&mut self) -> Result<(), Error<E>> {
    let mut budget = Budget::new(self.polling.command_limit);
    while self.read_reg(Reg::EraControl)? != 0 {
      if !budget.spend() {
        warn!("Pinnacle: ERA command did not complete");
        return Err(Error::Timeout);
      }
    }
    Ok(())
  }
}
