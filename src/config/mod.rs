mod absolute;
mod anymeas;
mod calibration;
mod polling;
mod relative;
mod sample_rate;

pub use absolute::*;
pub use anymeas::*;
pub use calibration::*;
pub use polling::*;
pub use relative::*;
pub use sample_rate::*;

use crate::reg::DEFAULT_Z_IDLE;

/// Settings applied while the driver brings the ASIC up in [`Pinnacle::new`].
///
/// The defaults match Cirque's reference bring-up: finger and stylus detection
/// at 100 samples per second, the most sensitive ADC gain and 30 z-idle
/// packets.
///
/// # Example
/// ```no_run
/// use cirque_pinnacle::{Config, Polling, SampleRate};
///
/// // Curved overlays behave better with a less sensitive ADC.
/// let config = Config::default()
///   .with_adc_gain(1)
///   .with_sample_rate(SampleRate::Hz200)
///   .with_polling(Polling::default().with_command_limit(10_000));
/// ```
///
/// [`Pinnacle::new`]: crate::Pinnacle::new
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  pub sample_rate: SampleRate,
  /// ADC gain, `0` (most sensitive) to `3` (least sensitive).
  pub adc_gain: u8,
  /// Empty packets reported after lift-off (one every 10 ms).
  pub z_idle_count: u8,
  pub detect_finger: bool,
  pub detect_stylus: bool,
  pub polling: Polling,
}

impl Config {
  pub const fn new() -> Self {
    Self {
      sample_rate: SampleRate::Hz100,
      adc_gain: 0,
      z_idle_count: DEFAULT_Z_IDLE,
      detect_finger: true,
      detect_stylus: true,
      polling: Polling::new(),
    }
  }

  pub const fn with_sample_rate(mut self, sample_rate: SampleRate) -> Self {
    self.sample_rate = sample_rate;
    self
  }

  pub const fn with_adc_gain(mut self, gain: u8) -> Self {
    self.adc_gain = gain;
    self
  }

  pub const fn with_z_idle_count(mut self, count: u8) -> Self {
    self.z_idle_count = count;
    self
  }

  /// Select which touch sources are measured.
  pub const fn with_detection(mut self, finger: bool, stylus: bool) -> Self {
    self.detect_finger = finger;
    self.detect_stylus = stylus;
    self
  }

  pub const fn with_polling(mut self, polling: Polling) -> Self {
    self.polling = polling;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new()
  }
}
