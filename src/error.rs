//! Error handling

use std::{error, fmt};

/// Result type used in this library
pub type Result<T> = std::result::Result<T, Error>;

/// Re-export of [`edsdk_sys::EDS_ERR_OK`], the single success code of the SDK
pub const EDS_OK: edsdk_sys::EdsError = edsdk_sys::EDS_ERR_OK;

/// Coarse classification of the SDK error code space
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum ErrorKind {
  /// Unclassified SDK error
  Other,
  /// The operation is not implemented or not supported
  NotSupported,
  /// The SDK reported an internal error
  InternalError,
  /// Memory allocation inside the SDK failed
  NoMemory,
  /// The operation was cancelled
  OperationCancelled,
  /// SDK and camera firmware versions do not match
  IncompatibleVersion,
  /// Bad parameters were passed to the SDK
  BadParameters,
  /// A handle was stale or of the wrong kind
  InvalidHandle,
  /// No camera was found
  DeviceNotFound,
  /// The camera is busy
  DeviceBusy,
  /// The camera reported a hardware-side error
  DeviceError,
  /// Host-side file I/O failed
  FileIo,
  /// A stream operation failed
  StreamIo,
  /// The port is already in use
  CommPortInUse,
  /// The camera was disconnected
  CommDisconnected,
  /// Another communication error
  CommError,
  /// No session is open on the camera
  SessionNotOpen,
  /// A session is already open on the camera
  SessionAlreadyOpen,
  /// The camera refused to take a picture (autofocus, card, mirror, ...)
  TakePictureFailed,
  /// The SDK timed out waiting for the camera
  Timeout,
}

impl ErrorKind {
  fn describe(&self) -> &'static str {
    match self {
      Self::Other => "unclassified SDK error",
      Self::NotSupported => "operation not supported",
      Self::InternalError => "SDK internal error",
      Self::NoMemory => "SDK memory allocation failed",
      Self::OperationCancelled => "operation cancelled",
      Self::IncompatibleVersion => "incompatible SDK version",
      Self::BadParameters => "bad parameters",
      Self::InvalidHandle => "invalid handle",
      Self::DeviceNotFound => "no camera found",
      Self::DeviceBusy => "camera busy",
      Self::DeviceError => "camera hardware error",
      Self::FileIo => "file I/O error",
      Self::StreamIo => "stream error",
      Self::CommPortInUse => "port already in use",
      Self::CommDisconnected => "camera disconnected",
      Self::CommError => "communication error",
      Self::SessionNotOpen => "no session open",
      Self::SessionAlreadyOpen => "session already open",
      Self::TakePictureFailed => "camera refused to take a picture",
      Self::Timeout => "timed out waiting for the camera",
    }
  }
}

/// General error
#[derive(Clone, PartialEq)]
pub struct Error {
  code: edsdk_sys::EdsError,
  info: Option<String>,
}

impl Error {
  /// Creates a new error from a raw SDK error code
  pub fn new(code: edsdk_sys::EdsError) -> Self {
    Self { code, info: None }
  }

  /// The raw SDK error code
  pub fn code(&self) -> edsdk_sys::EdsError {
    self.code
  }

  /// Map the raw code to an [`ErrorKind`]
  pub fn kind(&self) -> ErrorKind {
    use edsdk_sys as sys;

    match self.code {
      sys::EDS_ERR_UNIMPLEMENTED | sys::EDS_ERR_NOT_SUPPORTED => ErrorKind::NotSupported,
      sys::EDS_ERR_INTERNAL_ERROR | sys::EDS_ERR_UNEXPECTED_EXCEPTION => ErrorKind::InternalError,
      sys::EDS_ERR_MEM_ALLOC_FAILED | sys::EDS_ERR_MEM_FREE_FAILED => ErrorKind::NoMemory,
      sys::EDS_ERR_OPERATION_CANCELLED => ErrorKind::OperationCancelled,
      sys::EDS_ERR_INCOMPATIBLE_VERSION => ErrorKind::IncompatibleVersion,

      sys::EDS_ERR_INVALID_PARAMETER
      | sys::EDS_ERR_INVALID_POINTER
      | sys::EDS_ERR_INVALID_INDEX
      | sys::EDS_ERR_INVALID_LENGTH
      | sys::EDS_ERR_INVALID_FN_POINTER
      | sys::EDS_ERR_INVALID_SORT_FN => ErrorKind::BadParameters,
      sys::EDS_ERR_INVALID_HANDLE | sys::EDS_ERR_HANDLE_NOT_FOUND | sys::EDS_ERR_INVALID_ID => {
        ErrorKind::InvalidHandle
      }

      sys::EDS_ERR_DEVICE_NOT_FOUND => ErrorKind::DeviceNotFound,
      sys::EDS_ERR_DEVICE_BUSY | sys::EDS_ERR_PTP_DEVICE_BUSY => ErrorKind::DeviceBusy,
      sys::EDS_ERR_DEVICE_INVALID..=sys::EDS_ERR_DEVICE_NOT_RELEASED => ErrorKind::DeviceError,

      sys::EDS_ERR_FILE_IO_ERROR..=sys::EDS_ERR_FILE_ALREADY_EXISTS => ErrorKind::FileIo,
      sys::EDS_ERR_STREAM_IO_ERROR..=sys::EDS_ERR_STREAM_END_OF_STREAM => ErrorKind::StreamIo,

      sys::EDS_ERR_COMM_PORT_IS_IN_USE => ErrorKind::CommPortInUse,
      sys::EDS_ERR_COMM_DISCONNECTED => ErrorKind::CommDisconnected,
      sys::EDS_ERR_COMM_DEVICE_INCOMPATIBLE..=sys::EDS_ERR_COMM_USB_BUS_ERR => ErrorKind::CommError,

      sys::EDS_ERR_SESSION_NOT_OPEN => ErrorKind::SessionNotOpen,
      sys::EDS_ERR_SESSION_ALREADY_OPEN => ErrorKind::SessionAlreadyOpen,

      sys::EDS_ERR_TAKE_PICTURE_AF_NG..=sys::EDS_ERR_TAKE_PICTURE_CARD_PROTECT_NG => {
        ErrorKind::TakePictureFailed
      }

      sys::EDS_ERR_WAIT_TIMEOUT_ERROR => ErrorKind::Timeout,

      _ => ErrorKind::Other,
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(err: std::io::Error) -> Self {
    Self { code: edsdk_sys::EDS_ERR_FILE_IO_ERROR, info: Some(err.to_string()) }
  }
}

impl From<std::ffi::NulError> for Error {
  fn from(_: std::ffi::NulError) -> Self {
    Self { code: edsdk_sys::EDS_ERR_INVALID_PARAMETER, info: Some("FFI: NulError".to_string()) }
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} (0x{:08X})", self.kind().describe(), self.code)?;

    if let Some(error_info) = &self.info {
      f.write_fmt(format_args!(" [{}]", error_info))?;
    }

    Ok(())
  }
}

impl fmt::Debug for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    <Self as fmt::Display>::fmt(self, f)
  }
}

impl error::Error for Error {}

/// Check the result of an internal SDK function.
///
/// Any code other than [`EDS_OK`] becomes an [`Error`].
#[macro_export]
macro_rules! try_eds {
  ($x:expr) => {{
    let code = unsafe { $x };

    if code == $crate::error::EDS_OK {
      Ok(())
    } else {
      Err($crate::Error::new(code))
    }
  }};
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_cover_the_interesting_codes() {
    assert_eq!(Error::new(edsdk_sys::EDS_ERR_DEVICE_BUSY).kind(), ErrorKind::DeviceBusy);
    assert_eq!(Error::new(edsdk_sys::EDS_ERR_SESSION_NOT_OPEN).kind(), ErrorKind::SessionNotOpen);
    assert_eq!(
      Error::new(edsdk_sys::EDS_ERR_TAKE_PICTURE_NO_CARD_NG).kind(),
      ErrorKind::TakePictureFailed
    );
    assert_eq!(Error::new(0xDEAD_BEEF).kind(), ErrorKind::Other);
  }

  #[test]
  fn display_includes_the_raw_code() {
    let error = Error::new(edsdk_sys::EDS_ERR_COMM_DISCONNECTED);
    insta::assert_snapshot!(error.to_string(), @"camera disconnected (0x000000C1)");
  }

  #[test]
  fn io_errors_map_to_file_io() {
    let error: Error =
      std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
    assert_eq!(error.kind(), ErrorKind::FileIo);
    assert_eq!(error.code(), edsdk_sys::EDS_ERR_FILE_IO_ERROR);
  }
}
