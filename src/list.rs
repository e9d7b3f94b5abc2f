//! Camera enumeration

use crate::{camera::Camera, context::Sdk, error::Error, try_eds, Result};
use std::{marker::PhantomData, ops::Range, ptr};

/// Snapshot of the cameras attached at enumeration time.
///
/// The vendor's own sample code never releases this handle; the wrapper
/// treats it like any other reference and releases it on drop.
pub struct CameraList<'sdk> {
  inner: edsdk_sys::EdsCameraListRef,
  _sdk: PhantomData<&'sdk Sdk>,
}

impl Drop for CameraList<'_> {
  fn drop(&mut self) {
    unsafe { edsdk_sys::EdsRelease(self.inner) };
  }
}

impl<'sdk> CameraList<'sdk> {
  pub(crate) fn new(inner: edsdk_sys::EdsCameraListRef) -> Self {
    Self { inner, _sdk: PhantomData }
  }

  /// Number of cameras in the list
  pub fn len(&self) -> Result<usize> {
    let mut count = 0;

    try_eds!(edsdk_sys::EdsGetChildCount(self.inner, &mut count))?;

    Ok(count as usize)
  }

  /// Whether the list is empty
  pub fn is_empty(&self) -> Result<bool> {
    Ok(self.len()? == 0)
  }

  /// The camera at `index`.
  ///
  /// The returned handle stays valid after the list is dropped.
  pub fn get(&self, index: usize) -> Result<Camera<'sdk>> {
    let index =
      i32::try_from(index).map_err(|_| Error::new(edsdk_sys::EDS_ERR_INVALID_INDEX))?;
    let mut camera = ptr::null_mut();

    try_eds!(edsdk_sys::EdsGetChildAtIndex(self.inner, index, &mut camera))?;

    Ok(Camera::new(camera))
  }

  /// Iterator over the cameras in the list
  pub fn iter(&self) -> Result<CameraListIter<'_, 'sdk>> {
    Ok(CameraListIter { list: self, range: 0..self.len()? })
  }
}

/// Iterator returned by [`CameraList::iter`]
pub struct CameraListIter<'list, 'sdk> {
  list: &'list CameraList<'sdk>,
  range: Range<usize>,
}

impl<'sdk> Iterator for CameraListIter<'_, 'sdk> {
  type Item = Result<Camera<'sdk>>;

  fn next(&mut self) -> Option<Self::Item> {
    self.range.next().map(|index| self.list.get(index))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.range.size_hint()
  }
}

impl ExactSizeIterator for CameraListIter<'_, '_> {
  fn len(&self) -> usize {
    self.range.len()
  }
}

#[cfg(all(test, feature = "test"))]
mod tests {
  use crate::sample_sdk;
  use edsdk_sys::test_utils;

  #[test]
  fn enumerates_in_connection_order() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");
    test_utils::connect_camera("usb:port2", "Canon EOS R6");

    let list = sdk.camera_list().unwrap();
    assert_eq!(list.len().unwrap(), 2);

    let descriptions: Vec<String> = list
      .iter()
      .unwrap()
      .map(|camera| camera.unwrap().device_info().unwrap().description)
      .collect();
    assert_eq!(descriptions, ["Canon EOS 90D", "Canon EOS R6"]);
  }

  #[test]
  fn out_of_range_index_is_an_error() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    let list = sdk.camera_list().unwrap();
    let error = list.get(1).unwrap_err();
    assert_eq!(error.kind(), crate::error::ErrorKind::BadParameters);
  }

  #[test]
  fn every_handle_is_released() {
    let (_vsdk, sdk) = sample_sdk();
    test_utils::connect_camera("usb:port1", "Canon EOS 90D");

    {
      let list = sdk.camera_list().unwrap();
      let _camera = list.get(0).unwrap();
    }

    assert_eq!(test_utils::live_handles(), 0);
    assert_eq!(test_utils::release_count(), 2);
  }
}
