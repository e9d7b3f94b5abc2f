//! Camera handles and remote-control sessions

use crate::{
  context::Sdk,
  event::{CameraEvent, EventChannel},
  property::{Capacity, ImageQuality, SaveTo, ShutterButton},
  try_eds, Result,
};
use std::{
  marker::PhantomData,
  mem,
  time::{Duration, Instant},
};
use tracing::debug;

/// How often [`Session::wait_event`] pumps the SDK queue while waiting
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Represents a camera
#[derive(Debug)]
pub struct Camera<'sdk> {
  pub(crate) inner: edsdk_sys::EdsCameraRef,
  _sdk: PhantomData<&'sdk Sdk>,
}

impl Drop for Camera<'_> {
  fn drop(&mut self) {
    unsafe { edsdk_sys::EdsRelease(self.inner) };
  }
}

/// Port name and description of a camera, as reported by the SDK
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceInfo {
  /// Name of the port the camera is attached to
  pub port_name: String,
  /// Human-readable model description
  pub description: String,
  /// Transport sub type (PTP generation marker)
  pub sub_type: u32,
}

impl<'sdk> Camera<'sdk> {
  pub(crate) fn new(inner: edsdk_sys::EdsCameraRef) -> Self {
    Self { inner, _sdk: PhantomData }
  }

  /// Port name and description of this camera.
  ///
  /// Works without an open session.
  pub fn device_info(&self) -> Result<DeviceInfo> {
    let mut info = edsdk_sys::EdsDeviceInfo::default();

    try_eds!(edsdk_sys::EdsGetDeviceInfo(self.inner, &mut info))?;

    Ok(DeviceInfo {
      port_name: crate::helper::char_slice_to_string(&info.szPortName),
      description: crate::helper::char_slice_to_string(&info.szDeviceDescription),
      sub_type: info.deviceSubType,
    })
  }

  /// Opens a remote-control session on this camera.
  ///
  /// The session is closed when the returned guard is dropped.
  pub fn open_session(&self) -> Result<Session<'_>> {
    try_eds!(edsdk_sys::EdsOpenSession(self.inner))?;
    debug!("session opened");

    Ok(Session { camera: self, events: None })
  }
}

/// Open remote-control session on a [`Camera`], closed on drop
pub struct Session<'cam> {
  camera: &'cam Camera<'cam>,
  events: Option<EventChannel>,
}

impl Drop for Session<'_> {
  fn drop(&mut self) {
    if let Err(error) = try_eds!(edsdk_sys::EdsCloseSession(self.camera.inner)) {
      debug!(%error, "failed to close session");
    }
  }
}

impl Session<'_> {
  /// Raw command dispatch, for commands this crate has no typed wrapper for
  pub fn send_command(&self, command: edsdk_sys::EdsCameraCommand, param: i32) -> Result<()> {
    try_eds!(edsdk_sys::EdsSendCommand(self.camera.inner, command, param))
  }

  /// Moves the shutter button to `button`
  pub fn press_shutter(&self, button: ShutterButton) -> Result<()> {
    debug!(?button, "pressing shutter");
    self.send_command(edsdk_sys::kEdsCameraCommand_PressShutterButton, button.into())
  }

  /// Presses the shutter completely, then releases it.
  ///
  /// The release is issued on both paths: best-effort before returning the
  /// press error, fire-and-forget after a successful press.
  pub fn trigger(&self) -> Result<()> {
    if let Err(error) = self.press_shutter(ShutterButton::Completely) {
      if let Err(release_error) = self.press_shutter(ShutterButton::Off) {
        debug!(%release_error, "shutter release failed after failed press");
      }
      return Err(error);
    }

    if let Err(release_error) = self.press_shutter(ShutterButton::Off) {
      debug!(%release_error, "ignoring shutter release failure");
    }

    Ok(())
  }

  /// Asks the camera to capture one frame through the PTP capture path
  pub fn take_picture(&self) -> Result<()> {
    self.send_command(edsdk_sys::kEdsCameraCommand_TakePicture, 0)
  }

  /// Selects where captured images are stored
  pub fn set_save_to(&self, save_to: SaveTo) -> Result<()> {
    self.set_property_u32(edsdk_sys::kEdsPropID_SaveTo, save_to as u32)
  }

  /// Selects the JPEG quality for captured images
  pub fn set_image_quality(&self, quality: ImageQuality) -> Result<()> {
    self.set_property_u32(edsdk_sys::kEdsPropID_ImageQuality, quality as u32)
  }

  /// Advertises host-side storage capacity before transfers to the host
  pub fn set_capacity(&self, capacity: Capacity) -> Result<()> {
    try_eds!(edsdk_sys::EdsSetCapacity(self.camera.inner, capacity.into()))
  }

  /// Model name reported through the property interface
  pub fn product_name(&self) -> Result<String> {
    let mut data_type = edsdk_sys::kEdsDataType_Unknown;
    let mut size = 0;
    try_eds!(edsdk_sys::EdsGetPropertySize(
      self.camera.inner,
      edsdk_sys::kEdsPropID_ProductName,
      0,
      &mut data_type,
      &mut size,
    ))?;

    let mut buffer = vec![0u8; size as usize];
    try_eds!(edsdk_sys::EdsGetPropertyData(
      self.camera.inner,
      edsdk_sys::kEdsPropID_ProductName,
      0,
      size,
      buffer.as_mut_ptr().cast(),
    ))?;

    let end = buffer.iter().position(|byte| *byte == 0).unwrap_or(buffer.len());
    Ok(String::from_utf8_lossy(&buffer[..end]).into_owned())
  }

  /// Remaining battery charge in percent
  pub fn battery_level(&self) -> Result<u32> {
    let mut level: u32 = 0;

    try_eds!(edsdk_sys::EdsGetPropertyData(
      self.camera.inner,
      edsdk_sys::kEdsPropID_BatteryLevel,
      0,
      mem::size_of::<u32>() as u32,
      (&mut level as *mut u32).cast(),
    ))?;

    Ok(level)
  }

  /// Waits up to `timeout` for the next object event, pumping the SDK's
  /// event queue while doing so.
  ///
  /// Returns `Ok(None)` when the timeout elapses without an event.
  pub fn wait_event(&mut self, timeout: Duration) -> Result<Option<CameraEvent>> {
    if self.events.is_none() {
      self.events = Some(EventChannel::register(self.camera.inner)?);
    }
    let channel = self.events.as_ref().unwrap();

    let deadline = Instant::now() + timeout;
    loop {
      try_eds!(edsdk_sys::EdsGetEvent())?;

      if let Some(raw) = channel.try_recv() {
        return Ok(Some(CameraEvent::from_raw(raw)));
      }

      let now = Instant::now();
      if now >= deadline {
        return Ok(None);
      }
      std::thread::sleep(EVENT_POLL_INTERVAL.min(deadline - now));
    }
  }

  fn set_property_u32(&self, property: edsdk_sys::EdsPropertyID, value: u32) -> Result<()> {
    try_eds!(edsdk_sys::EdsSetPropertyData(
      self.camera.inner,
      property,
      0,
      mem::size_of::<u32>() as u32,
      (&value as *const u32).cast(),
    ))
  }
}

#[cfg(all(test, feature = "test"))]
mod tests {
  use super::*;
  use crate::sample_sdk;
  use edsdk_sys::test_utils::{self, Call};

  fn press(param: i32) -> test_utils::CommandRecord {
    test_utils::CommandRecord {
      camera: 0,
      command: edsdk_sys::kEdsCameraCommand_PressShutterButton,
      param,
    }
  }

  #[test]
  fn device_info_round_trips_through_the_char_arrays() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let info = camera.device_info().unwrap();

    assert_eq!(info.port_name, "usb:port1");
    assert_eq!(info.description, "Canon EOS 90D");
  }

  #[test]
  fn sessions_close_on_drop() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    drop(camera.open_session().unwrap());

    // Would fail with DeviceBusy if the first session were still open.
    camera.open_session().unwrap();
  }

  #[test]
  fn trigger_presses_then_releases() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let session = camera.open_session().unwrap();
    session.trigger().unwrap();

    let presses = [
      press(edsdk_sys::kEdsCameraCommand_ShutterButton_Completely),
      press(edsdk_sys::kEdsCameraCommand_ShutterButton_OFF),
    ];
    assert_eq!(test_utils::command_log(), presses);
  }

  #[test]
  fn trigger_still_releases_when_the_press_fails() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let session = camera.open_session().unwrap();

    test_utils::fail_next(Call::SendCommand, edsdk_sys::EDS_ERR_TAKE_PICTURE_AF_NG);
    let error = session.trigger().unwrap_err();

    assert_eq!(error.kind(), crate::error::ErrorKind::TakePictureFailed);
    let presses = [
      press(edsdk_sys::kEdsCameraCommand_ShutterButton_Completely),
      press(edsdk_sys::kEdsCameraCommand_ShutterButton_OFF),
    ];
    assert_eq!(test_utils::command_log(), presses);
  }

  #[test]
  fn trigger_ignores_a_failed_release() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let session = camera.open_session().unwrap();

    test_utils::fail_nth(Call::SendCommand, 1, edsdk_sys::EDS_ERR_COMM_DISCONNECTED);
    session.trigger().unwrap();

    let presses = [
      press(edsdk_sys::kEdsCameraCommand_ShutterButton_Completely),
      press(edsdk_sys::kEdsCameraCommand_ShutterButton_OFF),
    ];
    assert_eq!(test_utils::command_log(), presses);
  }

  #[test]
  fn typed_property_setters_reach_the_wire() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let session = camera.open_session().unwrap();

    session.set_save_to(SaveTo::Host).unwrap();
    session.set_image_quality(ImageQuality::JpegLargeFine).unwrap();
    session.set_capacity(Capacity::default()).unwrap();

    let properties = test_utils::property_log();
    assert_eq!(
      properties[0],
      (edsdk_sys::kEdsPropID_SaveTo, edsdk_sys::kEdsSaveTo_Host.to_le_bytes().to_vec())
    );
    assert_eq!(
      properties[1],
      (edsdk_sys::kEdsPropID_ImageQuality, 0x0013_FF0Fu32.to_le_bytes().to_vec())
    );
    assert_eq!(test_utils::capacity_log(), [(0x7FFF_FFFF, 0x1000, 1)]);
  }

  #[test]
  fn property_getters_decode_the_payloads() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let session = camera.open_session().unwrap();

    assert_eq!(session.product_name().unwrap(), "Canon EOS 90D");
    assert_eq!(session.battery_level().unwrap(), 87);
  }

  #[test]
  fn wait_event_times_out_quietly() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let mut session = camera.open_session().unwrap();

    assert!(session.wait_event(Duration::from_millis(1)).unwrap().is_none());
  }

  #[test]
  fn capture_delivers_a_transfer_request() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let mut session = camera.open_session().unwrap();
    session.take_picture().unwrap();

    match session.wait_event(Duration::from_millis(10)).unwrap() {
      Some(CameraEvent::TransferRequest(item)) => {
        assert_eq!(item.info().unwrap().file_name, "IMG_0001.JPG");
      }
      _ => panic!("expected a transfer request"),
    }
  }
}
