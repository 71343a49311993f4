use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::control::{CalConfig1, FeedConfig3};
use crate::{
  Calibration, EdgeSensitivity, Era, Error, Mode, Pinnacle, Reg, RegisterInterface, SampleRate, CALIBRATION_CELLS,
  RELOAD_TIMER_200, RELOAD_TIMER_300, RELOAD_TIMER_DEFAULT,
};

/// Compensation values as stored by the ASIC, one per sensor cell.
///
/// Cirque's guidance for comparing two matrices: any magnitude above 20000
/// usually means a sensor problem, and cells that differ by more than 500
/// point at a changed environment (something on the pad during calibration,
/// temperature, humidity or noise).
pub type CalibrationMatrix = [i16; CALIBRATION_CELLS];

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin,
  D: DelayNs,
{
  /// Store compensation flags and, with `run`, recalibrate the sensor.
  ///
  /// Returns `false` in AnyMeas mode or when a run does not finish within
  /// [`Polling::calibration_timeout_us`](crate::Polling::calibration_timeout_us).
  pub fn calibrate(&mut self, calibration: Calibration) -> Result<bool, Error<E>> {
    if self.mode == Mode::AnyMeas {
      return Ok(false);
    }

    self.write_reg(Reg::CalConfig1, calibration.register().into_bits())?;
    if !calibration.run {
      return Ok(true);
    }

    let timeout = self.polling.calibration_timeout_us;
    let step = self.polling.calibration_poll_us.max(1);
    let mut waited = 0u32;
    // The ASIC clears the run bit once the matrix is rebuilt.
    while CalConfig1::from_bits(self.read_reg(Reg::CalConfig1)?).run() {
      if waited >= timeout {
        warn!("Pinnacle: calibration timed out after {} us", waited);
        return Ok(false);
      }
      self.delay.delay_us(step);
      waited = waited.saturating_add(step);
    }

    self.clear_status_flags()?;
    debug!("Pinnacle: calibrated in ~{} us", waited);
    Ok(true)
  }

  /// Read the 46-cell compensation matrix. Not meaningful in AnyMeas mode.
  pub fn calibration_matrix(&mut self) -> Result<CalibrationMatrix, Error<E>> {
    let mut raw = [0u8; CALIBRATION_CELLS * 2];
    self.era_read_bytes(Era::CalibrationMatrix.into(), &mut raw)?;

    let mut matrix = [0i16; CALIBRATION_CELLS];
    for (cell, bytes) in matrix.iter_mut().zip(raw.chunks_exact(2)) {
      *cell = i16::from_le_bytes([bytes[0], bytes[1]]);
    }
    Ok(matrix)
  }

  /// Overwrite the compensation matrix.
  ///
  /// Missing cells are written as `0`; values past the 46th are ignored.
  pub fn set_calibration_matrix(&mut self, matrix: &[i16]) -> Result<(), Error<E>> {
    let base: u16 = Era::CalibrationMatrix.into();
    for index in 0..CALIBRATION_CELLS {
      let value = matrix.get(index).copied().unwrap_or(0);
      let addr = base + index as u16 * 2;
      let [low, high] = value.to_le_bytes();
      self.era_write(addr, low)?;
      self.era_write(addr + 1, high)?;
    }
    Ok(())
  }

  /// ADC gain, `0` (most sensitive) to `3` (least sensitive).
  pub fn adc_gain(&mut self) -> Result<u8, Error<E>> {
    Ok(self.era_read(Era::AdcGain.into())? >> 6)
  }

  /// Set the ADC gain for the overlay in use. Values above 3 are rejected.
  ///
  /// Cirque's curved overlay reference uses `1`.
  pub fn set_adc_gain(&mut self, gain: u8) -> Result<(), Error<E>> {
    if gain > 3 {
      return Err(Error::InvalidArgument);
    }
    let value = (self.era_read(Era::AdcGain.into())? & 0x3F) | (gain << 6);
    self.era_write(Era::AdcGain.into(), value)
  }

  /// Change the wide-z-min thresholds used near the sensor edges.
  ///
  /// These are undocumented memory locations taken from Cirque's sample code.
  pub fn tune_edge_sensitivity(&mut self, edge: EdgeSensitivity) -> Result<(), Error<E>> {
    self.era_write(Era::XAxisWideZMin.into(), edge.x_axis_wide_z_min)?;
    self.era_write(Era::YAxisWideZMin.into(), edge.y_axis_wide_z_min)
  }

  /// Choose which touch sources are measured and apply `rate`.
  pub fn detect_finger_stylus(&mut self, finger: bool, stylus: bool, rate: SampleRate) -> Result<(), Error<E>> {
    let flags = self.era_read(Era::FingerStylus.into())?;
    let flags = (flags & !0x05) | ((stylus as u8) << 2) | finger as u8;
    self.era_write(Era::FingerStylus.into(), flags)?;
    self.set_sample_rate(rate)
  }

  /// Current reporting rate.
  ///
  /// 200 and 300 are stored as `0` in the rate register, so those are told
  /// apart through the reload timer.
  pub fn sample_rate(&mut self) -> Result<SampleRate, Error<E>> {
    match self.read_reg(Reg::SampleRate)? {
      0 => match self.era_read(Era::SampleReloadTimer.into())? {
        RELOAD_TIMER_300 => Ok(SampleRate::Hz300),
        RELOAD_TIMER_200 => Ok(SampleRate::Hz200),
        _ => Ok(SampleRate::Hz100),
      },
      hz => Ok(SampleRate::from_hz(hz as u16)),
    }
  }

  /// Set the reporting rate. Ignored in AnyMeas mode.
  ///
  /// 200 and 300 disable palm and noise compensation; any slower rate turns
  /// them back on.
  pub fn set_sample_rate(&mut self, rate: SampleRate) -> Result<(), Error<E>> {
    if self.mode == Mode::AnyMeas {
      return Ok(());
    }
    self.write_sample_rate(rate)
  }

  pub(crate) fn write_sample_rate(&mut self, rate: SampleRate) -> Result<(), Error<E>> {
    let stylus = rate.is_stylus();
    let feed3 = FeedConfig3::new().with_noise_comp_disable(stylus).with_palm_comp_disable(stylus);
    self.write_reg(Reg::FeedConfig3, feed3.into_bits())?;

    let (timer, value) = match rate {
      SampleRate::Hz300 => (RELOAD_TIMER_300, 0),
      SampleRate::Hz200 => (RELOAD_TIMER_200, 0),
      rate => (RELOAD_TIMER_DEFAULT, rate.hz() as u8),
    };
    self.era_write_bytes(Era::SampleReloadTimer.into(), timer, 2)?;
    self.write_reg(Reg::SampleRate, value)?;
    debug!("Pinnacle: sample rate {} Hz", rate.hz());
    Ok(())
  }
}
