use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::config::Budget;
use crate::control::SysConfig;
use crate::{AnyMeasConfig, Error, Mode, Pinnacle, Reg, RegisterInterface};

/// Electrode mask bit for X electrode `n` (`0..16`).
pub const fn x_electrode(n: u8) -> u32 {
  1 << n
}

/// Electrode mask bit for Y electrode `n` (`0..12`).
pub const fn y_electrode(n: u8) -> u32 {
  1 << (16 + n)
}

/// Mask bit for the builtin ~0.25 pF reference capacitor.
pub const REF0: u32 = 1 << 28;
/// Mask bit for the builtin ~0.5 pF reference capacitor.
pub const REF1: u32 = 1 << 29;

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin,
  D: DelayNs,
{
  /// Program the AnyMeas measurement block. Silently ignored outside AnyMeas.
  pub fn anymeas_mode_config(&mut self, config: AnyMeasConfig) -> Result<(), Error<E>> {
    if self.mode != Mode::AnyMeas {
      return Ok(());
    }

    self.write_regs(Reg::FeedConfig2, &config.block())?;
    self.write_regs(Reg::PacketByte1, &[0; 8])?;
    self.clear_status_flags()
  }

  /// Measure once and block until the result is ready.
  ///
  /// `toggle` selects the electrodes whose output is forced and `polarity`
  /// the direction they are forced in (1 positive, 0 negative). Bits 0..16
  /// are X electrodes, 16..28 Y electrodes, 28 and 29 the reference
  /// capacitors, see [`x_electrode`], [`y_electrode`], [`REF0`], [`REF1`].
  ///
  /// Returns `None` outside AnyMeas mode.
  pub fn measure_adc(&mut self, toggle: u32, polarity: u32) -> Result<Option<i16>, Error<E>> {
    if self.mode != Mode::AnyMeas {
      return Ok(None);
    }

    self.start_measure_adc(toggle, polarity)?;
    let mut budget = Budget::new(self.polling.command_limit);
    while !self.available()? {
      if !budget.spend() {
        warn!("Pinnacle: ADC measurement did not complete");
        return Err(Error::Timeout);
      }
    }
    self.get_measure_adc()
  }

  /// Start a measurement without waiting for it. Does nothing outside AnyMeas.
  pub fn start_measure_adc(&mut self, toggle: u32, polarity: u32) -> Result<(), Error<E>> {
    if self.mode != Mode::AnyMeas {
      return Ok(());
    }

    let mut masks = [0u8; 8];
    masks[..4].copy_from_slice(&toggle.to_be_bytes());
    masks[4..].copy_from_slice(&polarity.to_be_bytes());
    self.write_regs(Reg::PacketByte1, &masks)?;

    // Clear the status flags and kick off the measurement in one go.
    let start = SysConfig::new().with_anymeas(true).with_anymeas_start(true);
    self.write_regs(Reg::Status, &[0, start.into_bits()])
  }

  /// Result of a measurement started with
  /// [`start_measure_adc`](Self::start_measure_adc).
  ///
  /// `None` outside AnyMeas or while the measurement is still running.
  pub fn get_measure_adc(&mut self) -> Result<Option<i16>, Error<E>> {
    if self.mode != Mode::AnyMeas || !self.available()? {
      return Ok(None);
    }

    let value = self.read_be_i16(Reg::AnyMeasResult)?;
    self.clear_status_flags()?;
    trace!("Pinnacle: ADC {}", value);
    Ok(Some(value))
  }
}
