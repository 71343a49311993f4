use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::{Error, Pinnacle, RegisterInterface};

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin + Wait,
  D: DelayNs,
{
  /// Wait until the data-ready line signals a new report or ADC result.
  ///
  /// The register traffic that follows stays blocking; only the wait itself
  /// yields to the executor.
  pub async fn wait_for_data(&mut self) -> Result<(), Error<E>> {
    match self.dr.as_mut() {
      Some(pin) => pin.wait_for_high().await.map_err(|_| Error::DataReadyPin),
      None => Err(Error::DataReadyRequired),
    }
  }
}
