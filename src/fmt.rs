//! Logging shims. Forward to `defmt` or `log` depending on the enabled
//! feature, and expand to nothing when neither is enabled.
#![allow(unused_macros)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("the `defmt` and `log` features are mutually exclusive");

macro_rules! trace {
  ($s:literal $(, $x:expr)* $(,)?) => {{
    #[cfg(feature = "defmt")]
    ::defmt::trace!($s $(, $x)*);
    #[cfg(feature = "log")]
    ::log::trace!($s $(, $x)*);
    #[cfg(not(any(feature = "defmt", feature = "log")))]
    let _ = ($( &$x, )*);
  }};
}

macro_rules! debug {
  ($s:literal $(, $x:expr)* $(,)?) => {{
    #[cfg(feature = "defmt")]
    ::defmt::debug!($s $(, $x)*);
    #[cfg(feature = "log")]
    ::log::debug!($s $(, $x)*);
    #[cfg(not(any(feature = "defmt", feature = "log")))]
    let _ = ($( &$x, )*);
  }};
}

macro_rules! info {
  ($s:literal $(, $x:expr)* $(,)?) => {{
    #[cfg(feature = "defmt")]
    ::defmt::info!($s $(, $x)*);
    #[cfg(feature = "log")]
    ::log::info!($s $(, $x)*);
    #[cfg(not(any(feature = "defmt", feature = "log")))]
    let _ = ($( &$x, )*);
  }};
}

macro_rules! warn {
  ($s:literal $(, $x:expr)* $(,)?) => {{
    #[cfg(feature = "defmt")]
    ::defmt::warn!($s $(, $x)*);
    #[cfg(feature = "log")]
    ::log::warn!($s $(, $x)*);
    #[cfg(not(any(feature = "defmt", feature = "log")))]
    let _ = ($( &$x, )*);
  }};
}
