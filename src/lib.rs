#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `no_std` driver for the Cirque Pinnacle (1CA027) capacitive touch controller
//! found on Cirque GlidePoint circular trackpads.
//!
//! The Pinnacle exposes a small register file over SPI or I2C and a larger
//! memory space through an indirect "extended register access" handshake. This
//! crate takes care of:
//!
//! - Framing the Register Access Protocol for both buses behind a single
//!   [`RegisterInterface`] trait
//! - Running the ERA handshake while keeping the data feed state intact
//! - Switching between relative (mouse), absolute (position) and AnyMeas (raw
//!   ADC) modes with the register resets each transition requires
//! - Decoding relative/absolute packets and AnyMeas results into typed reports
//! - Calibration, compensation matrix access, ADC gain and sample rate tuning
//!
//! Everything is blocking and built on the `embedded-hal` 1.0 traits. Enable
//! the `async` feature to await the data-ready line instead of polling it.
//!
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::InputPin, spi::SpiDevice};
//! use cirque_pinnacle::{Config, Mode, Pinnacle, Report, SpiInterface};
//!
//! fn example<SPI, DR, D>(spi: SPI, dr: DR, delay: D) -> Result<(), cirque_pinnacle::Error<SPI::Error>>
//! where
//!   SPI: SpiDevice,
//!   DR: InputPin,
//!   D: DelayNs,
//! {
//!   let mut pad = Pinnacle::new(SpiInterface::new(spi), Some(dr), delay, Config::default())?;
//!   pad.set_mode(Mode::Absolute)?;
//!
//!   loop {
//!     if pad.available()? {
//!       if let Some(Report::Absolute(report)) = pad.read()? {
//!         let _ = report.clamped();
//!       }
//!     }
//!   }
//! }
//! ```
#[macro_use]
mod fmt;

mod anymeas;
mod config;
mod control;
mod era;
mod interface;
mod mode;
mod reg;
mod report;
mod rw;
#[cfg(test)]
mod sim;
mod tuning;
#[cfg(feature = "async")]
mod wait;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

pub use anymeas::*;
pub use config::*;
pub use control::Status;
pub use interface::*;
pub use mode::Mode;
pub use report::*;
pub use tuning::CalibrationMatrix;

use reg::*;

/// Errors that can occur while interacting with the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// Bus transaction failed with the underlying transport error.
  Bus(E),
  /// The identity registers did not hold the expected firmware id/version.
  NotResponding { firmware_id: u8, firmware_version: u8 },
  /// A raw mode value that is neither Relative, AnyMeas nor Absolute.
  InvalidMode(u8),
  /// An argument was outside the range the hardware accepts.
  InvalidArgument,
  /// AnyMeas mode needs a data-ready pin.
  DataReadyRequired,
  /// Reading the data-ready pin failed.
  DataReadyPin,
  /// A bounded busy-poll ran out of attempts (see [`Polling`]).
  Timeout,
  /// The power-on calibration did not finish within
  /// [`Polling::calibration_timeout_us`].
  CalibrationIncomplete,
}

impl<E> From<E> for Error<E> {
  fn from(e: E) -> Self {
    Error::Bus(e)
  }
}

/// Placeholder for drivers built without a data-ready pin.
///
/// [`Pinnacle::available`] then falls back to the status register's software
/// data-ready flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl ErrorType for NoPin {
  type Error = core::convert::Infallible;
}

impl InputPin for NoPin {
  fn is_high(&mut self) -> Result<bool, Self::Error> {
    Ok(false)
  }

  fn is_low(&mut self) -> Result<bool, Self::Error> {
    Ok(true)
  }
}

/// Driver for the Pinnacle ASIC.
///
/// The driver owns the register interface, the optional data-ready pin and a
/// delay provider. It tracks the operating [`Mode`]; every other setting lives
/// on the chip and is re-read when needed.
pub struct Pinnacle<IF, DR, D> {
  iface: IF,
  dr: Option<DR>,
  delay: D,
  mode: Mode,
  // Verified intellimouse extension; reset on every mode change.
  intellimouse: bool,
  polling: Polling,
}

impl<IF, E, D> Pinnacle<IF, NoPin, D>
where
  IF: RegisterInterface<Error = E>,
  D: DelayNs,
{
  /// Create a driver that polls the status register instead of a data-ready pin.
  ///
  /// AnyMeas mode is unavailable for such an instance.
  pub fn without_data_ready(iface: IF, delay: D, config: Config) -> Result<Self, Error<E>> {
    Self::new(iface, None, delay, config)
  }
}

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin,
  D: DelayNs,
{
  /// Verify the ASIC and bring it into relative mode with the staged
  /// configuration.
  ///
  /// Fails with [`Error::NotResponding`] when the identity registers do not
  /// read back firmware id 7 / version 0x3A. An ADC gain above 3 is rejected
  /// with [`Error::InvalidArgument`] before the bus is touched.
  pub fn new(iface: IF, dr: Option<DR>, delay: D, config: Config) -> Result<Self, Error<E>> {
    let mut pad = Self { iface, dr, delay, mode: Mode::Relative, intellimouse: false, polling: config.polling };
    pad.initialize(&config)?;
    Ok(pad)
  }

  fn initialize(&mut self, config: &Config) -> Result<(), Error<E>> {
    if config.adc_gain > 3 {
      return Err(Error::InvalidArgument);
    }

    let (firmware_id, firmware_version) = self.firmware()?;
    if firmware_id != FIRMWARE_ID || firmware_version != FIRMWARE_VERSION {
      warn!("Pinnacle: unexpected identity {} / {}", firmware_id, firmware_version);
      return Err(Error::NotResponding { firmware_id, firmware_version });
    }

    self.detect_finger_stylus(config.detect_finger, config.detect_stylus, config.sample_rate)?;
    self.write_reg(Reg::ZIdle, config.z_idle_count)?;
    self.write_regs(Reg::SysConfig, &[0, 0, 0])?;
    self.set_adc_gain(config.adc_gain)?;

    // Stale data-ready from before the reset would end calibration early.
    let mut drain = config.polling.drain_limit;
    while drain > 0 && self.available()? {
      self.clear_status_flags()?;
      drain -= 1;
    }

    if !self.calibrate(Calibration::default())? {
      return Err(Error::CalibrationIncomplete);
    }

    self.set_feed_enable(true)?;
    info!("Pinnacle: initialized (fw {} v{})", firmware_id, firmware_version);
    Ok(())
  }

  /// Firmware id and version as reported by registers 0x00..0x01.
  pub fn firmware(&mut self) -> Result<(u8, u8), Error<E>> {
    let mut buf = [0u8; 2];
    self.read_regs(Reg::FirmwareId, &mut buf)?;
    Ok((buf[0], buf[1]))
  }

  /// Whether a data-ready pin was supplied at construction.
  pub fn has_data_ready(&self) -> bool {
    self.dr.is_some()
  }

  /// Tear the driver down and give back its peripherals.
  pub fn release(self) -> (IF, Option<DR>, D) {
    (self.iface, self.dr, self.delay)
  }

  fn data_ready_level(&mut self) -> Result<Option<bool>, Error<E>> {
    match self.dr.as_mut() {
      Some(pin) => pin.is_high().map(Some).map_err(|_| Error::DataReadyPin),
      None => Ok(None),
    }
  }
}
