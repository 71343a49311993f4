use bitfield_struct::bitfield;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::{Error, Pinnacle, Reg, RegisterInterface, CLEAR_FLAGS_DELAY_US};

/// Status1 register (0x02).
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
  #[bits(2)]
  __: u8,
  /// SW_DR: a new report (or AnyMeas result) is waiting.
  pub data_ready: bool,
  /// SW_CC: an ERA command or calibration finished.
  pub command_complete: bool,
  #[bits(4)]
  ___: u8,
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct SysConfig {
  pub(crate) reset: bool,
  pub(crate) shutdown: bool,
  pub(crate) allow_sleep: bool,
  /// Tracking computations disabled so raw AnyMeas measurements can run.
  pub(crate) anymeas: bool,
  pub(crate) anymeas_start: bool,
  #[bits(3)]
  __: u8,
}

impl SysConfig {
  /// Both AnyMeas control bits cleared (`& 0xE7`).
  pub(crate) const fn tracking(self) -> Self {
    self.with_anymeas(false).with_anymeas_start(false)
  }
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct FeedConfig1 {
  pub(crate) feed_enable: bool,
  pub(crate) absolute: bool,
  pub(crate) filter_disable: bool,
  pub(crate) x_disable: bool,
  pub(crate) y_disable: bool,
  __: bool,
  pub(crate) invert_x: bool,
  pub(crate) invert_y: bool,
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct FeedConfig2 {
  pub(crate) intellimouse: bool,
  pub(crate) taps_disable: bool,
  pub(crate) secondary_tap_disable: bool,
  pub(crate) scroll_disable: bool,
  pub(crate) glide_extend_disable: bool,
  #[bits(2)]
  __: u8,
  pub(crate) swap_xy: bool,
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct FeedConfig3 {
  __: bool,
  pub(crate) noise_comp_disable: bool,
  ___: bool,
  pub(crate) palm_comp_disable: bool,
  #[bits(4)]
  ____: u8,
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct CalConfig1 {
  /// Self clearing; set to start a calibration.
  pub(crate) run: bool,
  pub(crate) background: bool,
  pub(crate) nerd: bool,
  pub(crate) track_error: bool,
  pub(crate) tap: bool,
  #[bits(3)]
  __: u8,
}

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin,
  D: DelayNs,
{
  /// Snapshot of the status register.
  pub fn status(&mut self) -> Result<Status, Error<E>> {
    Ok(Status::from_bits(self.read_reg(Reg::Status)?))
  }

  /// Whether fresh data is waiting.
  ///
  /// Uses the data-ready pin when one was supplied, otherwise the status
  /// register's software data-ready flag. Reads do not check this themselves,
  /// so reading without it returns the previous packet again.
  pub fn available(&mut self) -> Result<bool, Error<E>> {
    match self.data_ready_level()? {
      Some(level) => Ok(level),
      None => Ok(self.status()?.data_ready()),
    }
  }

  /// Clear the data-ready and command-complete flags, then give the ASIC the
  /// recommended 50 us to settle.
  pub fn clear_status_flags(&mut self) -> Result<(), Error<E>> {
    self.clear_flags(true)
  }

  pub(crate) fn clear_flags(&mut self, settle: bool) -> Result<(), Error<E>> {
    self.write_reg(Reg::Status, 0)?;
    if settle {
      self.delay.delay_us(CLEAR_FLAGS_DELAY_US);
    }
    Ok(())
  }

  /// Whether touch and button data is being reported.
  pub fn feed_enable(&mut self) -> Result<bool, Error<E>> {
    Ok(self.feed_config1()?.feed_enable())
  }

  /// Turn data reporting on or off. Has no effect in AnyMeas mode.
  ///
  /// The register is only rewritten when the state actually changes.
  pub fn set_feed_enable(&mut self, enable: bool) -> Result<(), Error<E>> {
    let config = self.feed_config1()?;
    if config.feed_enable() != enable {
      self.write_reg(Reg::FeedConfig1, config.with_feed_enable(enable).into_bits())?;
    }
    Ok(())
  }

  /// Whether the ASIC may drop into low power after ~5 s without input.
  pub fn allow_sleep(&mut self) -> Result<bool, Error<E>> {
    Ok(self.sys_config()?.allow_sleep())
  }

  /// Waking from sleep takes about 300 ms before the next event is reported.
  pub fn set_allow_sleep(&mut self, allow: bool) -> Result<(), Error<E>> {
    self.modify_sys_config(|sys| sys.set_allow_sleep(allow))
  }

  /// Whether the ASIC is powered down (standby).
  pub fn shutdown(&mut self) -> Result<bool, Error<E>> {
    Ok(self.sys_config()?.shutdown())
  }

  pub fn set_shutdown(&mut self, shutdown: bool) -> Result<(), Error<E>> {
    self.modify_sys_config(|sys| sys.set_shutdown(shutdown))
  }

  /// `true` when the module carries a factory hardware configuration (470K at R4).
  ///
  /// Such modules ignore secondary tap, intellimouse and glide extend.
  pub fn hard_configured(&mut self) -> Result<bool, Error<E>> {
    Ok(self.read_reg(Reg::HcoId)? & 0x80 != 0)
  }

  pub(crate) fn sys_config(&mut self) -> Result<SysConfig, Error<E>> {
    Ok(SysConfig::from_bits(self.read_reg(Reg::SysConfig)?))
  }

  pub(crate) fn feed_config1(&mut self) -> Result<FeedConfig1, Error<E>> {
    Ok(FeedConfig1::from_bits(self.read_reg(Reg::FeedConfig1)?))
  }

  pub(crate) fn modify_sys_config<F: FnOnce(&mut SysConfig)>(&mut self, f: F) -> Result<(), Error<E>> {
    let mut sys = self.sys_config()?;
    f(&mut sys);
    self.write_reg(Reg::SysConfig, sys.into_bits())
  }

  pub(crate) fn modify_feed_config1<F: FnOnce(&mut FeedConfig1)>(&mut self, f: F) -> Result<(), Error<E>> {
    let mut config = self.feed_config1()?;
    f(&mut config);
    self.write_reg(Reg::FeedConfig1, config.into_bits())
  }
}
