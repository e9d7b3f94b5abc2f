//! Shutter smoke test: initialize the SDK, enumerate cameras, print the
//! first camera's device info, open a session and fire the shutter.
//!
//! Exits 0 on success (including when no camera is attached) and 1 when any
//! SDK call fails. Status messages go to stdout; library diagnostics go to
//! stderr under `RUST_LOG` control.

use std::io::{self, Write};
use std::process::ExitCode;

use edsdk::Sdk;
use tracing_subscriber::EnvFilter;

fn run(out: &mut impl Write) -> io::Result<u8> {
  let sdk = match Sdk::new() {
    Ok(sdk) => sdk,
    Err(_) => {
      writeln!(out, "Failed to load EDSDK")?;
      return Ok(1);
    }
  };

  let list = match sdk.camera_list() {
    Ok(list) => list,
    Err(_) => {
      writeln!(out, "Failed to get camera list")?;
      return Ok(1);
    }
  };

  let count = match list.len() {
    Ok(count) => count,
    Err(_) => {
      writeln!(out, "Failed to get number of cameras")?;
      return Ok(1);
    }
  };

  writeln!(out, "Found {} cameras", count)?;
  if count == 0 {
    return Ok(0);
  }

  writeln!(out, "Using first found camera")?;
  let camera = match list.get(0) {
    Ok(camera) => camera,
    Err(_) => {
      writeln!(out, "Failed to get camera")?;
      return Ok(1);
    }
  };

  let info = match camera.device_info() {
    Ok(info) => info,
    Err(_) => {
      writeln!(out, "Failed to get camera device info")?;
      return Ok(1);
    }
  };

  writeln!(out, "Name: {}", info.port_name)?;
  writeln!(out, "Description: {}", info.description)?;

  let session = match camera.open_session() {
    Ok(session) => session,
    Err(_) => {
      writeln!(out, "Failed to open camera session")?;
      return Ok(1);
    }
  };

  // trigger() presses the shutter completely and always follows up with a
  // release, best-effort even when the press fails.
  if session.trigger().is_err() {
    writeln!(out, "Failed to set shutter button")?;
    return Ok(1);
  }

  Ok(0)
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  match run(&mut io::stdout()) {
    Ok(code) => ExitCode::from(code),
    Err(_) => ExitCode::FAILURE,
  }
}

#[cfg(all(test, not(feature = "test")))]
compile_error!("The test feature must be enabled to run the tests");

#[cfg(all(test, feature = "test"))]
mod tests {
  use super::run;
  use edsdk_sys::test_utils::{self, Call};

  fn run_to_string() -> (u8, String) {
    let mut out = Vec::new();
    let code = run(&mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
  }

  #[test]
  fn zero_cameras_is_a_successful_run() {
    let _vsdk = test_utils::lock();

    let (code, output) = run_to_string();
    assert_eq!(code, 0);
    assert_eq!(output, "Found 0 cameras\n");
  }

  #[test]
  fn happy_path_prints_device_info_and_fires_the_shutter() {
    let _vsdk = test_utils::lock();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let (code, output) = run_to_string();
    assert_eq!(code, 0);
    assert_eq!(
      output,
      "Found 1 cameras\n\
       Using first found camera\n\
       Name: usb:port1\n\
       Description: Canon EOS 90D\n"
    );

    let log = test_utils::command_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].param, edsdk_sys::kEdsCameraCommand_ShutterButton_Completely);
    assert_eq!(log[1].param, edsdk_sys::kEdsCameraCommand_ShutterButton_OFF);
  }

  #[test]
  fn shutter_release_failure_is_ignored() {
    let _vsdk = test_utils::lock();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");
    test_utils::fail_nth(Call::SendCommand, 1, edsdk_sys::EDS_ERR_COMM_DISCONNECTED);

    let (code, output) = run_to_string();
    assert_eq!(code, 0);
    assert!(output.ends_with("Description: Canon EOS 90D\n"), "unexpected output: {output:?}");
  }

  #[test]
  fn initialization_failure_aborts() {
    let _vsdk = test_utils::lock();
    test_utils::fail_next(Call::InitializeSdk, edsdk_sys::EDS_ERR_INTERNAL_ERROR);

    let (code, output) = run_to_string();
    assert_eq!(code, 1);
    assert_eq!(output, "Failed to load EDSDK\n");
  }

  #[test]
  fn enumeration_failure_aborts() {
    let _vsdk = test_utils::lock();
    test_utils::fail_next(Call::GetCameraList, edsdk_sys::EDS_ERR_INTERNAL_ERROR);

    let (code, output) = run_to_string();
    assert_eq!(code, 1);
    assert_eq!(output, "Failed to get camera list\n");
  }

  #[test]
  fn child_count_failure_aborts() {
    let _vsdk = test_utils::lock();
    test_utils::fail_next(Call::GetChildCount, edsdk_sys::EDS_ERR_INTERNAL_ERROR);

    let (code, output) = run_to_string();
    assert_eq!(code, 1);
    assert_eq!(output, "Failed to get number of cameras\n");
  }

  #[test]
  fn camera_access_failure_aborts() {
    let _vsdk = test_utils::lock();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");
    test_utils::fail_next(Call::GetChildAtIndex, edsdk_sys::EDS_ERR_DEVICE_NOT_FOUND);

    let (code, output) = run_to_string();
    assert_eq!(code, 1);
    assert!(output.ends_with("Failed to get camera\n"), "unexpected output: {output:?}");
  }

  #[test]
  fn device_info_failure_aborts() {
    let _vsdk = test_utils::lock();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");
    test_utils::fail_next(Call::GetDeviceInfo, edsdk_sys::EDS_ERR_COMM_DISCONNECTED);

    let (code, output) = run_to_string();
    assert_eq!(code, 1);
    assert!(output.ends_with("Failed to get camera device info\n"), "unexpected output: {output:?}");
  }

  #[test]
  fn session_failure_aborts() {
    let _vsdk = test_utils::lock();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");
    test_utils::fail_next(Call::OpenSession, edsdk_sys::EDS_ERR_DEVICE_BUSY);

    let (code, output) = run_to_string();
    assert_eq!(code, 1);
    assert!(output.ends_with("Failed to open camera session\n"), "unexpected output: {output:?}");
  }

  #[test]
  fn shutter_failure_aborts_but_still_releases() {
    let _vsdk = test_utils::lock();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");
    test_utils::fail_next(Call::SendCommand, edsdk_sys::EDS_ERR_TAKE_PICTURE_AF_NG);

    let (code, output) = run_to_string();
    assert_eq!(code, 1);
    assert!(output.ends_with("Failed to set shutter button\n"), "unexpected output: {output:?}");

    let log = test_utils::command_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].param, edsdk_sys::kEdsCameraCommand_ShutterButton_Completely);
    assert_eq!(log[1].param, edsdk_sys::kEdsCameraCommand_ShutterButton_OFF);
  }
}
