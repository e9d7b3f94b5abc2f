//! SDK lifetime management

use crate::{camera::Camera, list::CameraList, try_eds, Result};
use std::{marker::PhantomData, ptr};
use tracing::{debug, warn};

/// Owns the loaded SDK.
///
/// The library is initialized on construction and terminated on drop.
/// The vendor SDK is thread-affine, so this type is neither [`Send`] nor
/// [`Sync`] and everything borrowed from it stays on the creating thread.
#[derive(Debug)]
pub struct Sdk {
  // Raw-pointer marker keeps the type !Send + !Sync.
  _thread_bound: PhantomData<*mut edsdk_sys::EdsVoid>,
}

impl Sdk {
  /// Loads and initializes the SDK
  pub fn new() -> Result<Self> {
    try_eds!(edsdk_sys::EdsInitializeSDK())?;
    debug!("SDK initialized");

    Ok(Self { _thread_bound: PhantomData })
  }

  /// Enumerates the cameras attached right now
  pub fn camera_list(&self) -> Result<CameraList<'_>> {
    let mut list = ptr::null_mut();

    try_eds!(edsdk_sys::EdsGetCameraList(&mut list))?;

    Ok(CameraList::new(list))
  }

  /// Convenience accessor for the first attached camera, if any
  pub fn first_camera(&self) -> Result<Option<Camera<'_>>> {
    let list = self.camera_list()?;

    if list.len()? == 0 {
      Ok(None)
    } else {
      list.get(0).map(Some)
    }
  }
}

impl Drop for Sdk {
  fn drop(&mut self) {
    if let Err(error) = try_eds!(edsdk_sys::EdsTerminateSDK()) {
      warn!(%error, "failed to terminate the SDK");
    }
  }
}

#[cfg(all(test, feature = "test"))]
mod tests {
  use crate::sample_sdk;
  use edsdk_sys::test_utils;

  #[test]
  fn initialization_failure_is_reported() {
    let _vsdk = test_utils::lock();
    test_utils::fail_next(test_utils::Call::InitializeSdk, edsdk_sys::EDS_ERR_INTERNAL_ERROR);

    let error = crate::Sdk::new().unwrap_err();
    assert_eq!(error.code(), edsdk_sys::EDS_ERR_INTERNAL_ERROR);
  }

  #[test]
  fn no_cameras_means_none() {
    let (_vsdk, sdk) = sample_sdk();

    assert!(sdk.first_camera().unwrap().is_none());
  }

  #[test]
  fn first_camera_picks_the_first_connected() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");
    test_utils::connect_camera("usb:port2", "Canon EOS R6");

    let camera = sdk.first_camera().unwrap().unwrap();
    assert_eq!(camera.device_info().unwrap().description, "Canon EOS 90D");
  }
}
