#![doc = include_str!("../README.md")]
#![deny(unused_must_use)]
#![deny(missing_docs)] // Force documentation on all public API's

pub mod camera;
pub mod context;
pub mod error;
pub mod event;
pub mod file;
pub(crate) mod helper;
pub mod list;
pub mod property;

#[doc(inline)]
pub use crate::{
  camera::{Camera, DeviceInfo, Session},
  context::Sdk,
  error::{Error, Result},
};

/// Raw bindings to the vendor SDK.
///
/// Use this at your own risk
pub use edsdk_sys;

#[cfg(all(test, not(feature = "test")))]
compile_error!("The test feature must be enabled to run the tests");

/// Locks the virtual SDK and hands back an initialized [`Sdk`].
#[cfg(all(test, feature = "test"))]
pub(crate) fn sample_sdk() -> (edsdk_sys::test_utils::TestGuard, Sdk) {
  use std::sync::Once;

  static INIT: Once = Once::new();
  INIT.call_once(|| {
    // Show library diagnostics when a test fails.
    let _ = tracing_subscriber::fmt()
      .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
      .with_test_writer()
      .try_init();
  });

  let guard = edsdk_sys::test_utils::lock();
  (guard, Sdk::new().unwrap())
}
