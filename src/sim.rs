//! In-memory Pinnacle used by the driver tests.
//!
//! Models the register file, the ERA memory behind the handshake registers,
//! the self-clearing calibration bit, the PS/2 intellimouse reply and AnyMeas
//! measurements. Every bus transaction is logged so tests can assert on the
//! exact traffic a call produced.
use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

use crate::reg::*;
use crate::{Config, Error, Pinnacle, RegisterInterface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
  Read(u8, usize),
  Write(u8, u8),
  Command(usize),
}

struct State {
  regs: [u8; 32],
  era: Vec<u8>,
  era_addr: u16,
  era_command: u8,
  busy_polls: u32,
  busy_remaining: u32,
  sequential_write: bool,
  calibration_stuck: bool,
  intellimouse: bool,
  knocked: bool,
  data_ready: bool,
  auto_data_ready: bool,
  adc: i16,
  log: Vec<Op>,
  delays_ns: Vec<u64>,
}

impl State {
  fn write(&mut self, reg: u8, value: u8) {
    self.log.push(Op::Write(reg, value));
    let index = (reg & 0x1F) as usize;

    match reg & 0x1F {
      r if r == Reg::Status as u8 => {
        self.regs[index] = value;
        if value & 0x04 == 0 {
          self.data_ready = false;
        }
      }
      r if r == Reg::SysConfig as u8 && value & 0x10 != 0 => {
        let [high, low] = self.adc.to_be_bytes();
        self.regs[Reg::AnyMeasResult as usize] = high;
        self.regs[Reg::AnyMeasResult as usize + 1] = low;
        self.regs[Reg::Status as usize] |= 0x04;
        self.regs[index] = value & !0x10;
        if self.auto_data_ready {
          self.data_ready = true;
        }
      }
      r if r == Reg::CalConfig1 as u8 && value & 0x01 != 0 && !self.calibration_stuck => {
        self.regs[index] = value & !0x01;
        self.regs[Reg::Status as usize] |= 0x0C;
      }
      r if r == Reg::EraAddrHigh as u8 => {
        self.era_addr = (self.era_addr & 0x00FF) | (value as u16) << 8;
        self.sequential_write = false;
        self.regs[index] = value;
      }
      r if r == Reg::EraAddrLow as u8 => {
        self.era_addr = (self.era_addr & 0xFF00) | value as u16;
        self.sequential_write = false;
        self.regs[index] = value;
      }
      r if r == Reg::EraControl as u8 => self.era_control(value),
      _ => self.regs[index] = value,
    }
  }

  fn era_control(&mut self, command: u8) {
    self.era_command = command;
    self.busy_remaining = self.busy_polls;
    self.sequential_write = command == ERA_WRITE_SEQUENTIAL;
    let addr = self.era_addr as usize;
    match command {
      ERA_READ => self.regs[Reg::EraValue as usize] = self.era[addr],
      ERA_READ_SEQUENTIAL => {
        self.regs[Reg::EraValue as usize] = self.era[addr];
        self.era_addr = self.era_addr.wrapping_add(1);
      }
      ERA_WRITE => self.era[addr] = self.regs[Reg::EraValue as usize],
      _ => {}
    }
  }

  // Sequential writes store one byte per completed poll.
  fn poll_era_control(&mut self) -> u8 {
    if self.busy_remaining > 0 {
      self.busy_remaining -= 1;
      return self.era_command;
    }
    if self.sequential_write {
      self.era[self.era_addr as usize] = self.regs[Reg::EraValue as usize];
      self.era_addr = self.era_addr.wrapping_add(1);
    }
    self.regs[Reg::Status as usize] |= 0x08;
    0
  }

  fn read(&mut self, addr: u8, buf: &mut [u8]) {
    self.log.push(Op::Read(addr, buf.len()));
    if addr == PS2_DEVICE_ID {
      let id = if self.intellimouse && self.knocked { INTELLIMOUSE_ID[1] } else { 0x00 };
      let reply = [0xF3, id, 0x00];
      for (byte, value) in buf.iter_mut().zip(reply) {
        *byte = value;
      }
      return;
    }

    for (i, byte) in buf.iter_mut().enumerate() {
      let reg = (addr as usize + i) & 0x1F;
      *byte = if reg == Reg::EraControl as usize { self.poll_era_control() } else { self.regs[reg] };
    }
  }
}

/// Shared handle on the simulated device.
#[derive(Clone)]
pub(crate) struct Sim(Rc<RefCell<State>>);

impl Sim {
  pub(crate) fn new() -> Self {
    let mut regs = [0u8; 32];
    regs[Reg::FirmwareId as usize] = FIRMWARE_ID;
    regs[Reg::FirmwareVersion as usize] = FIRMWARE_VERSION;
    Self(Rc::new(RefCell::new(State {
      regs,
      era: vec![0; 0x10000],
      era_addr: 0,
      era_command: 0,
      busy_polls: 0,
      busy_remaining: 0,
      sequential_write: false,
      calibration_stuck: false,
      intellimouse: false,
      knocked: false,
      data_ready: false,
      auto_data_ready: true,
      adc: 0,
      log: Vec::new(),
      delays_ns: Vec::new(),
    })))
  }

  pub(crate) fn with_firmware(self, id: u8, version: u8) -> Self {
    self.set_reg(Reg::FirmwareId, id);
    self.set_reg(Reg::FirmwareVersion, version);
    self
  }

  /// Answer the PS/2 knock with the intellimouse device id.
  pub(crate) fn with_intellimouse(self) -> Self {
    self.0.borrow_mut().intellimouse = true;
    self
  }

  pub(crate) fn reg(&self, reg: Reg) -> u8 {
    self.0.borrow().regs[reg as usize]
  }

  pub(crate) fn regs(&self, addr: u8, len: usize) -> Vec<u8> {
    let start = addr as usize;
    self.0.borrow().regs[start..start + len].to_vec()
  }

  pub(crate) fn set_reg(&self, reg: Reg, value: u8) {
    self.0.borrow_mut().regs[reg as usize] = value;
  }

  pub(crate) fn set_regs(&self, addr: u8, values: &[u8]) {
    let start = addr as usize;
    self.0.borrow_mut().regs[start..start + values.len()].copy_from_slice(values);
  }

  pub(crate) fn era(&self, addr: u16) -> u8 {
    self.0.borrow().era[addr as usize]
  }

  pub(crate) fn set_era(&self, addr: u16, value: u8) {
    self.0.borrow_mut().era[addr as usize] = value;
  }

  /// Keep ERA control busy for `polls` reads after each command.
  pub(crate) fn set_busy_polls(&self, polls: u32) {
    let mut state = self.0.borrow_mut();
    state.busy_polls = polls;
    state.busy_remaining = 0;
  }

  pub(crate) fn set_calibration_stuck(&self, stuck: bool) {
    self.0.borrow_mut().calibration_stuck = stuck;
  }

  pub(crate) fn set_data_ready(&self, level: bool) {
    self.0.borrow_mut().data_ready = level;
  }

  /// Whether starting a measurement raises the data-ready pin.
  pub(crate) fn set_auto_data_ready(&self, auto: bool) {
    self.0.borrow_mut().auto_data_ready = auto;
  }

  pub(crate) fn set_adc(&self, value: i16) {
    self.0.borrow_mut().adc = value;
  }

  pub(crate) fn log(&self) -> Vec<Op> {
    self.0.borrow().log.clone()
  }

  pub(crate) fn writes(&self) -> Vec<(u8, u8)> {
    let state = self.0.borrow();
    state
      .log
      .iter()
      .filter_map(|op| match op {
        Op::Write(reg, value) => Some((*reg, *value)),
        _ => None,
      })
      .collect()
  }

  pub(crate) fn delays_us(&self) -> Vec<u32> {
    self.0.borrow().delays_ns.iter().map(|ns| (ns / 1_000) as u32).collect()
  }

  /// Forget recorded traffic and delays.
  pub(crate) fn clear_log(&self) {
    let mut state = self.0.borrow_mut();
    state.log.clear();
    state.delays_ns.clear();
  }
}

pub(crate) struct SimBus(Sim);

impl RegisterInterface for SimBus {
  type Error = Infallible;

  fn read_registers(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
    self.0 .0.borrow_mut().read(addr, buf);
    Ok(())
  }

  fn write_registers(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
    let mut state = self.0 .0.borrow_mut();
    for (i, value) in data.iter().enumerate() {
      state.write(addr.wrapping_add(i as u8), *value);
    }
    Ok(())
  }

  fn write_command(&mut self, cmd: &[u8]) -> Result<(), Self::Error> {
    let mut state = self.0 .0.borrow_mut();
    state.log.push(Op::Command(cmd.len()));
    if cmd == INTELLIMOUSE_KNOCK {
      state.knocked = true;
    }
    Ok(())
  }
}

pub(crate) struct SimPin(Sim);

impl ErrorType for SimPin {
  type Error = Infallible;
}

impl InputPin for SimPin {
  fn is_high(&mut self) -> Result<bool, Self::Error> {
    Ok(self.0 .0.borrow().data_ready)
  }

  fn is_low(&mut self) -> Result<bool, Self::Error> {
    Ok(!self.0 .0.borrow().data_ready)
  }
}

pub(crate) struct SimDelay(Sim);

impl DelayNs for SimDelay {
  fn delay_ns(&mut self, ns: u32) {
    self.0 .0.borrow_mut().delays_ns.push(ns as u64);
  }

  fn delay_us(&mut self, us: u32) {
    self.0 .0.borrow_mut().delays_ns.push(us as u64 * 1_000);
  }

  fn delay_ms(&mut self, ms: u32) {
    self.0 .0.borrow_mut().delays_ns.push(ms as u64 * 1_000_000);
  }
}

pub(crate) type SimPad = Pinnacle<SimBus, SimPin, SimDelay>;

/// Bring up a driver on `sim` with the default configuration and an empty log.
pub(crate) fn driver(sim: Sim, data_ready: bool) -> (SimPad, Sim) {
  match driver_with(sim, data_ready, Config::default()) {
    Ok(pair) => pair,
    Err(e) => panic!("bring-up failed: {:?}", e),
  }
}

pub(crate) fn driver_with(sim: Sim, data_ready: bool, config: Config) -> Result<(SimPad, Sim), Error<Infallible>> {
  let pin = data_ready.then(|| SimPin(sim.clone()));
  let pad = Pinnacle::new(SimBus(sim.clone()), pin, SimDelay(sim.clone()), config)?;
  sim.clear_log();
  Ok((pad, sim))
}

/// Bring up a driver on `sim` with a caller supplied data-ready pin.
#[cfg(feature = "async")]
pub(crate) fn driver_with_pin<P: InputPin>(sim: Sim, pin: Option<P>) -> Pinnacle<SimBus, P, SimDelay> {
  match Pinnacle::new(SimBus(sim.clone()), pin, SimDelay(sim.clone()), Config::default()) {
    Ok(pad) => {
      sim.clear_log();
      pad
    }
    Err(e) => panic!("bring-up failed: {:?}", e),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Mode, NoPin};

  #[test]
  fn bring_up_sequence() {
    let (pad, sim) = driver(Sim::new(), false);

    assert_eq!(pad.mode(), Mode::Relative);
    assert_eq!(sim.reg(Reg::FeedConfig1), 0x01);
    assert_eq!(sim.reg(Reg::FeedConfig2), 0x00);
    assert_eq!(sim.reg(Reg::SysConfig), 0x00);
    assert_eq!(sim.reg(Reg::ZIdle), 30);
    assert_eq!(sim.reg(Reg::SampleRate), 100);
    assert_eq!(sim.reg(Reg::CalConfig1), 0x1E);
    assert_eq!(sim.reg(Reg::Status), 0x00);
    assert_eq!(sim.era(0x00EB), 0x05);
    assert_eq!(sim.era(0x0187) >> 6, 0);
  }

  #[test]
  fn bring_up_applies_config() {
    let config = Config::default().with_adc_gain(2).with_z_idle_count(5).with_detection(true, false);
    let (_pad, sim) = driver_with(Sim::new(), false, config).unwrap();
    assert_eq!(sim.era(0x0187) >> 6, 2);
    assert_eq!(sim.reg(Reg::ZIdle), 5);
    assert_eq!(sim.era(0x00EB), 0x01);
  }

  #[test]
  fn wrong_identity_is_rejected() {
    let sim = Sim::new().with_firmware(0x06, 0x3A);
    let result = driver_with(sim.clone(), false, Config::default());
    assert!(matches!(result, Err(Error::NotResponding { firmware_id: 0x06, firmware_version: 0x3A })));
    // Nothing is written to a device that failed the check.
    assert!(sim.writes().is_empty());

    let sim = Sim::new().with_firmware(0x07, 0x3B);
    assert!(matches!(driver_with(sim, false, Config::default()), Err(Error::NotResponding { .. })));
  }

  #[test]
  fn bad_adc_gain_rejected_before_any_write() {
    let sim = Sim::new();
    let result = driver_with(sim.clone(), false, Config::default().with_adc_gain(5));
    assert!(matches!(result, Err(Error::InvalidArgument)));
    assert!(sim.log().is_empty());
    assert_eq!(sim.era(0x00EB), 0);
  }

  #[test]
  fn stale_data_ready_is_drained() {
    let sim = Sim::new();
    sim.set_reg(Reg::Status, 0x04);
    let (mut pad, _sim) = driver(sim, false);
    assert!(!pad.available().unwrap());
  }

  #[test]
  fn release_returns_parts() {
    let (pad, _sim) = driver(Sim::new(), true);
    assert!(pad.has_data_ready());
    let (_bus, pin, _delay) = pad.release();
    assert!(pin.is_some());
  }

  #[test]
  fn no_pin_driver() {
    let sim = Sim::new();
    let mut pad =
      Pinnacle::without_data_ready(SimBus(sim.clone()), SimDelay(sim.clone()), Config::default()).unwrap();
    assert!(!pad.has_data_ready());
    assert_eq!(pad.firmware().unwrap(), (7, 0x3A));
    assert_eq!(pad.set_mode(Mode::AnyMeas), Err(Error::DataReadyRequired));
    let _: Option<NoPin> = pad.release().1;
  }
}
