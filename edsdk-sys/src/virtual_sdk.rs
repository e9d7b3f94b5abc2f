//! Virtual implementations of the SDK entry points, backed by `edsdk_test`.
//!
//! Signatures match the `extern "C"` declarations so downstream code
//! compiles unchanged; only the raw-pointer marshalling lives here, the
//! state machine is in the `edsdk_test` crate.

use std::ffi::CStr;
use std::path::Path;
use std::ptr;
use std::sync::Mutex;

use edsdk_test::{driver, HandleId};

use crate::{
  EdsAccess, EdsBaseRef, EdsCameraCommand, EdsCameraListRef, EdsCameraRef, EdsCapacity, EdsChar,
  EdsDataType, EdsDeviceInfo, EdsDirectoryItemInfo, EdsDirectoryItemRef, EdsError,
  EdsFileCreateDisposition, EdsInt32, EdsObjectEvent, EdsObjectEventHandler, EdsPropertyID,
  EdsStreamRef, EdsUInt32, EdsUInt64, EdsVoid, EDS_ERR_FILE_ALREADY_EXISTS,
  EDS_ERR_INVALID_POINTER, EDS_ERR_OK,
};

static HANDLER: Mutex<Option<(EdsObjectEventHandler, usize)>> = Mutex::new(None);

fn id(base: EdsBaseRef) -> HandleId {
  base as usize as HandleId
}

fn to_ref(handle: HandleId) -> EdsBaseRef {
  handle as usize as EdsBaseRef
}

fn write_cstr(dst: &mut [EdsChar], src: &str) {
  let n = src.len().min(dst.len() - 1);
  for (slot, byte) in dst[..n].iter_mut().zip(src.as_bytes()) {
    *slot = *byte as EdsChar;
  }
  dst[n] = 0;
}

pub unsafe fn EdsInitializeSDK() -> EdsError {
  driver::initialize()
}

pub unsafe fn EdsTerminateSDK() -> EdsError {
  *HANDLER.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
  driver::terminate()
}

pub unsafe fn EdsRelease(inRef: EdsBaseRef) -> EdsUInt32 {
  driver::release(id(inRef))
}

pub unsafe fn EdsGetChildCount(inRef: EdsBaseRef, outCount: *mut EdsUInt32) -> EdsError {
  if outCount.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::child_count(id(inRef)) {
    Ok(count) => {
      *outCount = count;
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsGetChildAtIndex(
  inRef: EdsBaseRef,
  inIndex: EdsInt32,
  outRef: *mut EdsBaseRef,
) -> EdsError {
  if outRef.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::child_at(id(inRef), inIndex) {
    Ok(handle) => {
      *outRef = to_ref(handle);
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsGetCameraList(outCameraListRef: *mut EdsCameraListRef) -> EdsError {
  if outCameraListRef.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::get_camera_list() {
    Ok(handle) => {
      *outCameraListRef = to_ref(handle);
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsGetDeviceInfo(
  inCameraRef: EdsCameraRef,
  outDeviceInfo: *mut EdsDeviceInfo,
) -> EdsError {
  if outDeviceInfo.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::device_info(id(inCameraRef)) {
    Ok((port, description, sub_type)) => {
      let info = &mut *outDeviceInfo;
      *info = EdsDeviceInfo::default();
      write_cstr(&mut info.szPortName, &port);
      write_cstr(&mut info.szDeviceDescription, &description);
      info.deviceSubType = sub_type;
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsOpenSession(inCameraRef: EdsCameraRef) -> EdsError {
  driver::open_session(id(inCameraRef))
}

pub unsafe fn EdsCloseSession(inCameraRef: EdsCameraRef) -> EdsError {
  driver::close_session(id(inCameraRef))
}

pub unsafe fn EdsSendCommand(
  inCameraRef: EdsCameraRef,
  inCommand: EdsCameraCommand,
  inParam: EdsInt32,
) -> EdsError {
  driver::send_command(id(inCameraRef), inCommand, inParam)
}

pub unsafe fn EdsGetPropertySize(
  inRef: EdsBaseRef,
  inPropertyID: EdsPropertyID,
  _inParam: EdsInt32,
  outDataType: *mut EdsDataType,
  outSize: *mut EdsUInt32,
) -> EdsError {
  if outDataType.is_null() || outSize.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::property_size(id(inRef), inPropertyID) {
    Ok((data_type, size)) => {
      *outDataType = data_type;
      *outSize = size;
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsGetPropertyData(
  inRef: EdsBaseRef,
  inPropertyID: EdsPropertyID,
  _inParam: EdsInt32,
  inPropertySize: EdsUInt32,
  outPropertyData: *mut EdsVoid,
) -> EdsError {
  if outPropertyData.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::property_data(id(inRef), inPropertyID) {
    Ok((_, payload)) => {
      let n = payload.len().min(inPropertySize as usize);
      ptr::copy_nonoverlapping(payload.as_ptr(), outPropertyData as *mut u8, n);
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsSetPropertyData(
  inRef: EdsBaseRef,
  inPropertyID: EdsPropertyID,
  _inParam: EdsInt32,
  inPropertySize: EdsUInt32,
  inPropertyData: *const EdsVoid,
) -> EdsError {
  if inPropertyData.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  let data =
    std::slice::from_raw_parts(inPropertyData as *const u8, inPropertySize as usize).to_vec();
  driver::set_property_data(id(inRef), inPropertyID, data)
}

pub unsafe fn EdsSetObjectEventHandler(
  _inCameraRef: EdsCameraRef,
  _inEvent: EdsObjectEvent,
  inObjectEventHandler: EdsObjectEventHandler,
  inContext: *mut EdsVoid,
) -> EdsError {
  let code = driver::handler_registered();
  if code == EDS_ERR_OK {
    *HANDLER.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) =
      Some((inObjectEventHandler, inContext as usize));
  }
  code
}

pub unsafe fn EdsGetEvent() -> EdsError {
  let events = match driver::take_events() {
    Ok(events) => events,
    Err(code) => return code,
  };
  let handler = *HANDLER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
  if let Some((handler, context)) = handler {
    for (event, object) in events {
      handler(event, to_ref(object), context as *mut EdsVoid);
    }
  }
  EDS_ERR_OK
}

pub unsafe fn EdsGetDirectoryItemInfo(
  inDirItemRef: EdsDirectoryItemRef,
  outDirItemInfo: *mut EdsDirectoryItemInfo,
) -> EdsError {
  if outDirItemInfo.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::dir_item_info(id(inDirItemRef)) {
    Ok((file_name, size, is_folder)) => {
      let info = &mut *outDirItemInfo;
      *info = EdsDirectoryItemInfo::default();
      write_cstr(&mut info.szFileName, &file_name);
      info.size = size;
      info.isFolder = is_folder.into();
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsCreateFileStream(
  inFileName: *const EdsChar,
  inCreateDisposition: EdsFileCreateDisposition,
  _inDesiredAccess: EdsAccess,
  outStream: *mut EdsStreamRef,
) -> EdsError {
  if inFileName.is_null() || outStream.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  let path = CStr::from_ptr(inFileName).to_string_lossy().into_owned();
  if inCreateDisposition == EdsFileCreateDisposition::CreateNew && Path::new(&path).exists() {
    return EDS_ERR_FILE_ALREADY_EXISTS;
  }
  match driver::create_file_stream(&path) {
    Ok(handle) => {
      *outStream = to_ref(handle);
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsCreateMemoryStream(
  inBufferSize: EdsUInt64,
  outStream: *mut EdsStreamRef,
) -> EdsError {
  if outStream.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::create_memory_stream(inBufferSize) {
    Ok(handle) => {
      *outStream = to_ref(handle);
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsGetPointer(inStream: EdsStreamRef, outPointer: *mut *mut EdsVoid) -> EdsError {
  if outPointer.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::stream_data(id(inStream)) {
    Ok((address, _)) => {
      *outPointer = address as *mut EdsVoid;
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsGetLength(inStream: EdsStreamRef, outLength: *mut EdsUInt64) -> EdsError {
  if outLength.is_null() {
    return EDS_ERR_INVALID_POINTER;
  }
  match driver::stream_data(id(inStream)) {
    Ok((_, length)) => {
      *outLength = length;
      EDS_ERR_OK
    }
    Err(code) => code,
  }
}

pub unsafe fn EdsDownload(
  inDirItemRef: EdsDirectoryItemRef,
  inReadSize: EdsUInt64,
  inStream: EdsStreamRef,
) -> EdsError {
  driver::download(id(inDirItemRef), inReadSize, id(inStream))
}

pub unsafe fn EdsDownloadComplete(inDirItemRef: EdsDirectoryItemRef) -> EdsError {
  driver::download_complete(id(inDirItemRef))
}

pub unsafe fn EdsSetCapacity(inCameraRef: EdsCameraRef, inCapacity: EdsCapacity) -> EdsError {
  driver::set_capacity(
    id(inCameraRef),
    inCapacity.numberOfFreeClusters,
    inCapacity.bytesPerSector,
    inCapacity.reset,
  )
}
