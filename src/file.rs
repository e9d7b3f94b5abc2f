//! Files captured on the camera

use crate::{error::Error, helper::char_slice_to_string, try_eds, Result};
use std::{ffi::CString, path::Path, ptr};

/// File (or folder) entry on the camera's storage, released on drop
pub struct DirectoryItem {
  inner: edsdk_sys::EdsDirectoryItemRef,
}

impl Drop for DirectoryItem {
  fn drop(&mut self) {
    unsafe { edsdk_sys::EdsRelease(self.inner) };
  }
}

/// Name, size and folder flag of a [`DirectoryItem`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectoryItemInfo {
  /// Base name of the entry
  pub file_name: String,
  /// Size in bytes
  pub size: u64,
  /// Whether the entry is a folder
  pub is_folder: bool,
}

impl DirectoryItem {
  pub(crate) fn new(inner: edsdk_sys::EdsDirectoryItemRef) -> Self {
    Self { inner }
  }

  /// Metadata of this entry
  pub fn info(&self) -> Result<DirectoryItemInfo> {
    let mut info = edsdk_sys::EdsDirectoryItemInfo::default();

    try_eds!(edsdk_sys::EdsGetDirectoryItemInfo(self.inner, &mut info))?;

    Ok(DirectoryItemInfo {
      file_name: char_slice_to_string(&info.szFileName),
      size: info.size,
      is_folder: info.isFolder != 0,
    })
  }

  /// Downloads the entry to `path` on the host.
  ///
  /// Refuses to overwrite an existing file.
  pub fn download_to(&self, path: &Path) -> Result<()> {
    if path.exists() {
      return Err(Error::new(edsdk_sys::EDS_ERR_FILE_ALREADY_EXISTS));
    }

    let info = self.info()?;
    let c_path = CString::new(path.to_string_lossy().into_owned())?;
    let stream = FileStream::create_file(&c_path)?;

    self.download_into(info.size, &stream)
  }

  /// Downloads the entry into memory
  pub fn download(&self) -> Result<Vec<u8>> {
    let info = self.info()?;
    let stream = FileStream::create_memory(info.size)?;

    self.download_into(info.size, &stream)?;

    stream.to_vec()
  }

  fn download_into(&self, size: u64, stream: &FileStream) -> Result<()> {
    try_eds!(edsdk_sys::EdsDownload(self.inner, size, stream.inner))?;
    try_eds!(edsdk_sys::EdsDownloadComplete(self.inner))
  }
}

/// RAII wrapper over an `EdsStreamRef`
struct FileStream {
  inner: edsdk_sys::EdsStreamRef,
}

impl Drop for FileStream {
  fn drop(&mut self) {
    unsafe { edsdk_sys::EdsRelease(self.inner) };
  }
}

impl FileStream {
  fn create_file(path: &std::ffi::CStr) -> Result<Self> {
    let mut stream = ptr::null_mut();

    try_eds!(edsdk_sys::EdsCreateFileStream(
      path.as_ptr(),
      edsdk_sys::EdsFileCreateDisposition::CreateAlways,
      edsdk_sys::EdsAccess::ReadWrite,
      &mut stream,
    ))?;

    Ok(Self { inner: stream })
  }

  fn create_memory(size: u64) -> Result<Self> {
    let mut stream = ptr::null_mut();

    try_eds!(edsdk_sys::EdsCreateMemoryStream(size, &mut stream))?;

    Ok(Self { inner: stream })
  }

  /// Copies the stream contents out of the SDK-owned buffer
  fn to_vec(&self) -> Result<Vec<u8>> {
    let mut length = 0;
    try_eds!(edsdk_sys::EdsGetLength(self.inner, &mut length))?;

    let mut pointer = ptr::null_mut();
    try_eds!(edsdk_sys::EdsGetPointer(self.inner, &mut pointer))?;

    if pointer.is_null() {
      return Ok(Vec::new());
    }

    Ok(unsafe { std::slice::from_raw_parts(pointer as *const u8, length as usize) }.to_vec())
  }
}

#[cfg(all(test, feature = "test"))]
mod tests {
  use crate::{event::CameraEvent, sample_sdk};
  use edsdk_sys::test_utils;
  use std::time::Duration;

  fn captured_item(session: &mut crate::Session) -> crate::file::DirectoryItem {
    session.take_picture().unwrap();
    match session.wait_event(Duration::from_millis(10)).unwrap() {
      Some(CameraEvent::TransferRequest(item)) => item,
      _ => panic!("expected a transfer request"),
    }
  }

  #[test]
  fn downloads_into_memory() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let mut session = camera.open_session().unwrap();
    let item = captured_item(&mut session);

    assert_eq!(item.info().unwrap().file_name, "IMG_0001.JPG");
    assert_eq!(item.download().unwrap(), test_utils::SAMPLE_IMAGE);
  }

  #[test]
  fn downloads_to_disk() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let mut session = camera.open_session().unwrap();
    let item = captured_item(&mut session);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("IMG_0001.JPG");
    item.download_to(&path).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), test_utils::SAMPLE_IMAGE);
  }

  #[test]
  fn refuses_to_overwrite() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let camera = sdk.first_camera().unwrap().unwrap();
    let mut session = camera.open_session().unwrap();
    let item = captured_item(&mut session);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("IMG_0001.JPG");
    std::fs::write(&path, b"keep me").unwrap();

    let error = item.download_to(&path).unwrap_err();
    assert_eq!(error.kind(), crate::error::ErrorKind::FileIo);
    assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
  }
}
