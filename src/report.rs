use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::{Error, Mode, Pinnacle, Reg, RegisterInterface};

/// Movement since the previous relative mode packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelativeReport {
  /// Bit 0 primary, bit 1 secondary, bit 2 auxiliary (middle).
  pub buttons: u8,
  pub x: i8,
  pub y: i8,
  /// Always `0` unless the intellimouse extension is active.
  pub scroll: i8,
}

impl RelativeReport {
  /// Decode packet bytes 0..=3. `scroll` selects whether byte 3 is used.
  pub const fn decode(packet: [u8; 4], scroll: bool) -> Self {
    Self {
      buttons: packet[0] & 0x07,
      x: packet[1] as i8,
      y: packet[2] as i8,
      scroll: if scroll { packet[3] as i8 } else { 0 },
    }
  }

  /// The report as a 4 byte USB HID mouse report (buttons, x, y, wheel).
  pub const fn buffer(&self) -> [u8; 4] {
    [self.buttons, self.x as u8, self.y as u8, self.scroll as u8]
  }

  pub const fn primary(&self) -> bool {
    self.buttons & 0x01 != 0
  }

  pub const fn secondary(&self) -> bool {
    self.buttons & 0x02 != 0
  }

  pub const fn auxiliary(&self) -> bool {
    self.buttons & 0x04 != 0
  }
}

/// Position reported in absolute mode.
///
/// `z` is masked to 6 bits (`0..=63`) as the packet layout prescribes, although
/// Cirque's datasheet describes z as ranging up to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsoluteReport {
  /// Button inputs 0..=5.
  pub buttons: u8,
  /// `0..=2047`
  pub x: u16,
  /// `0..=1535`
  pub y: u16,
  pub z: u8,
}

impl AbsoluteReport {
  /// Reliable x range recommended by Cirque.
  pub const X_MIN: u16 = 128;
  pub const X_MAX: u16 = 1920;
  /// Reliable y range recommended by Cirque.
  pub const Y_MIN: u16 = 64;
  pub const Y_MAX: u16 = 1472;

  /// Decode packet bytes 0..=5. No clamping is applied.
  pub const fn decode(packet: [u8; 6]) -> Self {
    Self {
      buttons: packet[0] & 0x3F,
      x: packet[2] as u16 | ((packet[4] as u16 & 0x0F) << 8),
      y: packet[3] as u16 | ((packet[4] as u16 & 0xF0) << 4),
      z: packet[5] & 0x3F,
    }
  }

  /// Zero-filled packets are sent after lift-off (see the z-idle count).
  pub const fn is_idle(&self) -> bool {
    self.x == 0 && self.y == 0 && self.z == 0
  }

  /// Position clamped into the reliable sensing area.
  pub fn clamped(&self) -> Self {
    Self {
      x: self.x.clamp(Self::X_MIN, Self::X_MAX),
      y: self.y.clamp(Self::Y_MIN, Self::Y_MAX),
      ..*self
    }
  }

  /// Map the reliable sensing area onto `0..width` by `0..height`.
  pub fn scale(&self, width: u16, height: u16) -> (u16, u16) {
    let clamped = self.clamped();
    let x = u32::from(clamped.x - Self::X_MIN) * u32::from(width) / u32::from(Self::X_MAX - Self::X_MIN + 1);
    let y = u32::from(clamped.y - Self::Y_MIN) * u32::from(height) / u32::from(Self::Y_MAX - Self::Y_MIN + 1);
    (x as u16, y as u16)
  }
}

/// A decoded packet, shaped by the mode it was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
  Relative(RelativeReport),
  Absolute(AbsoluteReport),
}

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin,
  D: DelayNs,
{
  /// Read the current packet. `None` in AnyMeas mode.
  ///
  /// This does not wait for new data; check [`available`](Self::available)
  /// first or the previous packet is returned again.
  pub fn read(&mut self) -> Result<Option<Report>, Error<E>> {
    let mut report = match self.mode {
      Mode::Relative => Report::Relative(RelativeReport::default()),
      Mode::Absolute => Report::Absolute(AbsoluteReport::default()),
      Mode::AnyMeas => return Ok(None),
    };
    self.read_into(&mut report, true)?;
    Ok(Some(report))
  }

  /// Refresh `report` with the current packet, reusing it across calls.
  ///
  /// With `read_buttons == false` the button byte(s) are not transferred and
  /// `buttons` keeps its previous value. In relative mode with taps enabled
  /// that hides tap gestures. A report of the wrong kind is replaced. Returns
  /// `false` (and leaves `report` alone) in AnyMeas mode.
  pub fn read_into(&mut self, report: &mut Report, read_buttons: bool) -> Result<bool, Error<E>> {
    match self.mode {
      Mode::AnyMeas => return Ok(false),
      Mode::Absolute => {
        let buttons = match report {
          Report::Absolute(previous) => previous.buttons,
          Report::Relative(_) => 0,
        };
        let mut packet = [0u8; 6];
        if read_buttons {
          self.read_regs(Reg::PacketByte0, &mut packet)?;
        } else {
          self.read_regs(Reg::PacketByte2, &mut packet[2..])?;
        }
        let mut decoded = AbsoluteReport::decode(packet);
        if !read_buttons {
          decoded.buttons = buttons;
        }
        *report = Report::Absolute(decoded);
      }
      Mode::Relative => {
        let buttons = match report {
          Report::Relative(previous) => previous.buttons,
          Report::Absolute(_) => 0,
        };
        let scroll = self.intellimouse;
        let end = if scroll { 4 } else { 3 };
        let mut packet = [0u8; 4];
        if read_buttons {
          self.read_regs(Reg::PacketByte0, &mut packet[..end])?;
        } else {
          self.read_regs(Reg::PacketByte1, &mut packet[1..end])?;
        }
        let mut decoded = RelativeReport::decode(packet, scroll);
        if !read_buttons {
          decoded.buttons = buttons;
        }
        *report = Report::Relative(decoded);
      }
    }
    self.clear_flags(false)?;
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sim::{driver, Op, Sim};
  use crate::RelativeConfig;

  #[test]
  fn relative_decode() {
    let report = RelativeReport::decode([0x05, 0x0A, 0xF6, 0x00], false);
    assert_eq!(report, RelativeReport { buttons: 5, x: 10, y: -10, scroll: 0 });
    assert!(report.primary() && !report.secondary() && report.auxiliary());
  }

  #[test]
  fn relative_scroll_only_with_extension() {
    assert_eq!(RelativeReport::decode([0xF9, 0, 0, 0xFF], false).scroll, 0);
    let report = RelativeReport::decode([0xF9, 0x80, 0x7F, 0xFF], true);
    assert_eq!(report, RelativeReport { buttons: 1, x: -128, y: 127, scroll: -1 });
    assert_eq!(report.buffer(), [0x01, 0x80, 0x7F, 0xFF]);
  }

  #[test]
  fn absolute_decode() {
    let report = AbsoluteReport::decode([0x01, 0x00, 0xFF, 0x00, 0x01, 0x3F]);
    assert_eq!(report, AbsoluteReport { buttons: 1, x: 511, y: 0, z: 63 });
  }

  #[test]
  fn absolute_decode_masks_z_to_six_bits() {
    let report = AbsoluteReport::decode([0xFF, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(report, AbsoluteReport { buttons: 0x3F, x: 4095, y: 4095, z: 63 });
  }

  #[test]
  fn absolute_helpers() {
    let idle = AbsoluteReport::default();
    assert!(idle.is_idle());
    assert_eq!(idle.clamped(), AbsoluteReport { buttons: 0, x: 128, y: 64, z: 0 });
    assert_eq!(idle.scale(1024, 768), (0, 0));

    let corner = AbsoluteReport { buttons: 0, x: 2047, y: 1535, z: 10 };
    assert!(!corner.is_idle());
    assert_eq!(corner.clamped().x, 1920);
    assert_eq!(corner.clamped().y, 1472);
    assert_eq!(corner.scale(1024, 768), (1023, 767));
  }

  #[test]
  fn read_follows_mode() {
    let (mut pad, sim) = driver(Sim::new(), false);
    sim.set_regs(0x12, &[0x05, 0x0A, 0xF6, 0x7F, 0x01, 0x3F]);
    assert_eq!(pad.read().unwrap(), Some(Report::Relative(RelativeReport { buttons: 5, x: 10, y: -10, scroll: 0 })));
    // Three bytes without the scroll extension, flags cleared without settling.
    assert!(sim.log().contains(&Op::Read(0x12, 3)));
    assert_eq!(sim.writes().last(), Some(&(Reg::Status as u8, 0)));
    assert!(sim.delays_us().is_empty());

    pad.set_mode(Mode::Absolute).unwrap();
    sim.set_regs(0x12, &[0x01, 0x00, 0xFF, 0x00, 0x01, 0x3F]);
    assert_eq!(pad.read().unwrap(), Some(Report::Absolute(AbsoluteReport { buttons: 1, x: 511, y: 0, z: 63 })));
  }

  #[test]
  fn read_with_scroll() {
    let (mut pad, sim) = driver(Sim::new().with_intellimouse(), false);
    pad.relative_mode_config(RelativeConfig::new().with_intellimouse(true)).unwrap();
    sim.set_regs(0x12, &[0x00, 0x01, 0x02, 0xFE]);
    sim.clear_log();

    assert_eq!(pad.read().unwrap(), Some(Report::Relative(RelativeReport { buttons: 0, x: 1, y: 2, scroll: -2 })));
    assert!(sim.log().contains(&Op::Read(0x12, 4)));
  }

  #[test]
  fn read_into_can_skip_buttons() {
    let (mut pad, sim) = driver(Sim::new(), false);
    pad.set_mode(Mode::Absolute).unwrap();
    sim.set_regs(0x12, &[0x02, 0x00, 0x34, 0x12, 0x21, 0x05]);

    let mut report = Report::Absolute(AbsoluteReport { buttons: 0x04, ..Default::default() });
    sim.clear_log();
    assert!(pad.read_into(&mut report, false).unwrap());
    assert_eq!(report, Report::Absolute(AbsoluteReport { buttons: 0x04, x: 0x134, y: 0x212, z: 5 }));
    assert!(sim.log().contains(&Op::Read(0x14, 4)));

    pad.set_mode(Mode::Relative).unwrap();
    sim.set_regs(0x12, &[0x03, 0xFF, 0x01]);
    sim.clear_log();
    assert!(pad.read_into(&mut report, false).unwrap());
    assert_eq!(report, Report::Relative(RelativeReport { buttons: 0, x: -1, y: 1, scroll: 0 }));
    assert!(sim.log().contains(&Op::Read(0x13, 2)));
  }

  #[test]
  fn no_reports_in_anymeas() {
    let (mut pad, sim) = driver(Sim::new(), true);
    pad.set_mode(Mode::AnyMeas).unwrap();
    sim.clear_log();

    assert_eq!(pad.read().unwrap(), None);
    let mut report = Report::Relative(RelativeReport::default());
    assert!(!pad.read_into(&mut report, true).unwrap());
    assert!(sim.log().is_empty());
  }
}
