//! In-process virtual SDK backing the `test` feature of `edsdk_sys`.
//!
//! The vendor SDK is a proprietary binary that cannot be built or linked in
//! CI, so under the `test` feature the sys crate compiles Rust
//! implementations of the `Eds*` entry points instead of `extern "C"`
//! declarations. Those implementations drive the state machine in this
//! crate: a fleet of virtual cameras, a per-entry-point fault plan, and
//! command/release logs the tests assert on.
//!
//! State is global, like the real SDK's. Tests serialize on [`lock`], which
//! also resets the state, so every test starts from a blank SDK.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// JPEG-shaped payload served by the virtual download path. Tests compare
/// bytes, they never decode it.
pub const SAMPLE_IMAGE: &[u8] = &[
  0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01,
  0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

// Error codes mirrored from the vendor header. Kept private: the public
// constants live in `edsdk_sys`, which depends on this crate.
const ERR_OK: u32 = 0x0000_0000;
const ERR_INTERNAL_ERROR: u32 = 0x0000_0002;
const ERR_FILE_IO_ERROR: u32 = 0x0000_0020;
const ERR_INVALID_HANDLE: u32 = 0x0000_0061;
const ERR_INVALID_INDEX: u32 = 0x0000_0063;
const ERR_DEVICE_BUSY: u32 = 0x0000_0081;
const ERR_SESSION_NOT_OPEN: u32 = 0x0000_2003;

const OBJECT_EVENT_DIR_ITEM_REQUEST_TRANSFER: u32 = 0x0000_0208;

const COMMAND_TAKE_PICTURE: u32 = 0x0000_0000;
const COMMAND_PRESS_SHUTTER_BUTTON: u32 = 0x0000_0004;
const SHUTTER_BUTTON_COMPLETELY: i32 = 0x0000_0003;
const SHUTTER_BUTTON_COMPLETELY_NON_AF: i32 = 0x0001_0003;

/// Entry points of the virtual SDK, used to address the fault plan.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Call {
  /// `EdsInitializeSDK`
  InitializeSdk,
  /// `EdsTerminateSDK`
  TerminateSdk,
  /// `EdsGetCameraList`
  GetCameraList,
  /// `EdsGetChildCount`
  GetChildCount,
  /// `EdsGetChildAtIndex`
  GetChildAtIndex,
  /// `EdsGetDeviceInfo`
  GetDeviceInfo,
  /// `EdsOpenSession`
  OpenSession,
  /// `EdsCloseSession`
  CloseSession,
  /// `EdsSendCommand`
  SendCommand,
  /// `EdsSetObjectEventHandler`
  SetObjectEventHandler,
  /// `EdsGetEvent`
  GetEvent,
  /// `EdsGetPropertySize`
  GetPropertySize,
  /// `EdsGetPropertyData`
  GetPropertyData,
  /// `EdsSetPropertyData`
  SetPropertyData,
  /// `EdsGetDirectoryItemInfo`
  GetDirectoryItemInfo,
  /// `EdsCreateFileStream`
  CreateFileStream,
  /// `EdsCreateMemoryStream`
  CreateMemoryStream,
  /// `EdsDownload`
  Download,
  /// `EdsDownloadComplete`
  DownloadComplete,
  /// `EdsSetCapacity`
  SetCapacity,
}

/// One `EdsSendCommand` observed by the virtual SDK.
///
/// Commands are recorded before the fault plan is consulted, so a command
/// that was made to fail still shows up in the log.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CommandRecord {
  /// Index of the virtual camera the command was sent to.
  pub camera: usize,
  /// Raw command id (`kEdsCameraCommand_*`).
  pub command: u32,
  /// Raw command parameter.
  pub param: i32,
}

/// Opaque id handed across the sys boundary as a fake `EdsBaseRef`.
pub type HandleId = u64;

enum Handle {
  CameraList { cameras: Vec<usize> },
  Camera { index: usize },
  DirectoryItem { file_name: String, data: Vec<u8> },
  Stream { backing: StreamBacking },
}

enum StreamBacking {
  File(PathBuf),
  Memory(Vec<u8>),
}

struct Fault {
  skip: u32,
  code: u32,
}

#[derive(Default)]
struct State {
  initialized: bool,
  cameras: Vec<(String, String)>,
  open_sessions: Vec<usize>,
  fail_plan: HashMap<Call, Fault>,
  commands: Vec<CommandRecord>,
  properties_set: Vec<(u32, Vec<u8>)>,
  capacities: Vec<(i32, i32, i32)>,
  handles: HashMap<HandleId, Handle>,
  next_handle: HandleId,
  next_image: u32,
  pending_events: VecDeque<(u32, HandleId)>,
  release_count: usize,
}

fn state() -> MutexGuard<'static, State> {
  static STATE: OnceLock<Mutex<State>> = OnceLock::new();
  STATE
    .get_or_init(|| Mutex::new(State::default()))
    .lock()
    .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl State {
  fn alloc(&mut self, handle: Handle) -> HandleId {
    self.next_handle += 1;
    self.handles.insert(self.next_handle, handle);
    self.next_handle
  }

  fn planned_failure(&mut self, call: Call) -> Result<(), u32> {
    match self.fail_plan.remove(&call) {
      Some(Fault { skip: 0, code }) => Err(code),
      Some(Fault { skip, code }) => {
        self.fail_plan.insert(call, Fault { skip: skip - 1, code });
        Ok(())
      }
      None => Ok(()),
    }
  }

  fn camera_index(&self, handle: HandleId) -> Result<usize, u32> {
    match self.handles.get(&handle) {
      Some(Handle::Camera { index }) => Ok(*index),
      _ => Err(ERR_INVALID_HANDLE),
    }
  }
}

/// Serializes tests against the global virtual SDK and resets its state.
///
/// Hold the returned guard for the whole test.
pub fn lock() -> TestGuard {
  static TEST_LOCK: Mutex<()> = Mutex::new(());
  let guard = TEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
  *state() = State::default();
  TestGuard { _guard: guard }
}

/// Guard returned by [`lock`].
pub struct TestGuard {
  _guard: MutexGuard<'static, ()>,
}

/// Attaches a virtual camera; it shows up in the next enumeration.
pub fn connect_camera(port_name: &str, description: &str) {
  state().cameras.push((port_name.to_owned(), description.to_owned()));
}

/// Makes the next matching entry point fail with `code`. Consumed on match.
pub fn fail_next(call: Call, code: u32) {
  fail_nth(call, 0, code);
}

/// Like [`fail_next`], but lets `skip` matching calls through first.
pub fn fail_nth(call: Call, skip: u32, code: u32) {
  state().fail_plan.insert(call, Fault { skip, code });
}

/// Every `EdsSendCommand` seen so far, in order.
pub fn command_log() -> Vec<CommandRecord> {
  state().commands.clone()
}

/// Every `EdsSetPropertyData` seen so far, as (property id, raw bytes).
pub fn property_log() -> Vec<(u32, Vec<u8>)> {
  state().properties_set.clone()
}

/// Every `EdsSetCapacity` seen so far, as (free clusters, bytes per sector, reset).
pub fn capacity_log() -> Vec<(i32, i32, i32)> {
  state().capacities.clone()
}

/// Number of handles created but not yet passed to `EdsRelease`.
pub fn live_handles() -> usize {
  state().handles.len()
}

/// Number of `EdsRelease` calls observed.
pub fn release_count() -> usize {
  state().release_count
}

/// Backing implementations for the sys crate's virtual entry points.
///
/// Everything here speaks plain Rust values; the raw-pointer marshalling
/// stays on the `edsdk_sys` side.
#[doc(hidden)]
pub mod driver {
  use super::*;

  pub fn initialize() -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::InitializeSdk) {
      return code;
    }
    s.initialized = true;
    ERR_OK
  }

  pub fn terminate() -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::TerminateSdk) {
      return code;
    }
    // The real SDK reclaims everything on shutdown.
    s.initialized = false;
    s.open_sessions.clear();
    s.handles.clear();
    s.pending_events.clear();
    ERR_OK
  }

  pub fn get_camera_list() -> Result<HandleId, u32> {
    let mut s = state();
    s.planned_failure(Call::GetCameraList)?;
    if !s.initialized {
      return Err(ERR_INTERNAL_ERROR);
    }
    let cameras = (0..s.cameras.len()).collect();
    Ok(s.alloc(Handle::CameraList { cameras }))
  }

  pub fn child_count(handle: HandleId) -> Result<u32, u32> {
    let mut s = state();
    s.planned_failure(Call::GetChildCount)?;
    match s.handles.get(&handle) {
      Some(Handle::CameraList { cameras }) => Ok(cameras.len() as u32),
      _ => Err(ERR_INVALID_HANDLE),
    }
  }

  pub fn child_at(handle: HandleId, index: i32) -> Result<HandleId, u32> {
    let mut s = state();
    s.planned_failure(Call::GetChildAtIndex)?;
    let camera = match s.handles.get(&handle) {
      Some(Handle::CameraList { cameras }) => {
        usize::try_from(index).ok().and_then(|i| cameras.get(i).copied())
      }
      _ => return Err(ERR_INVALID_HANDLE),
    };
    match camera {
      Some(index) => Ok(s.alloc(Handle::Camera { index })),
      None => Err(ERR_INVALID_INDEX),
    }
  }

  pub fn device_info(handle: HandleId) -> Result<(String, String, u32), u32> {
    let mut s = state();
    s.planned_failure(Call::GetDeviceInfo)?;
    let index = s.camera_index(handle)?;
    let (port, description) = s.cameras[index].clone();
    Ok((port, description, 1))
  }

  pub fn open_session(handle: HandleId) -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::OpenSession) {
      return code;
    }
    let index = match s.camera_index(handle) {
      Ok(index) => index,
      Err(code) => return code,
    };
    if s.open_sessions.contains(&index) {
      return ERR_DEVICE_BUSY;
    }
    s.open_sessions.push(index);
    ERR_OK
  }

  pub fn close_session(handle: HandleId) -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::CloseSession) {
      return code;
    }
    let index = match s.camera_index(handle) {
      Ok(index) => index,
      Err(code) => return code,
    };
    match s.open_sessions.iter().position(|open| *open == index) {
      Some(at) => {
        s.open_sessions.remove(at);
        ERR_OK
      }
      None => ERR_SESSION_NOT_OPEN,
    }
  }

  pub fn send_command(handle: HandleId, command: u32, param: i32) -> u32 {
    let mut s = state();
    let index = match s.camera_index(handle) {
      Ok(index) => index,
      Err(code) => return code,
    };
    // Log first: a failed command was still issued by the caller.
    s.commands.push(CommandRecord { camera: index, command, param });
    if let Err(code) = s.planned_failure(Call::SendCommand) {
      return code;
    }
    if !s.open_sessions.contains(&index) {
      return ERR_SESSION_NOT_OPEN;
    }
    let captures = command == COMMAND_TAKE_PICTURE
      || (command == COMMAND_PRESS_SHUTTER_BUTTON
        && (param == SHUTTER_BUTTON_COMPLETELY || param == SHUTTER_BUTTON_COMPLETELY_NON_AF));
    if captures {
      s.next_image += 1;
      let file_name = format!("IMG_{:04}.JPG", s.next_image);
      let item = s.alloc(Handle::DirectoryItem { file_name, data: SAMPLE_IMAGE.to_vec() });
      s.pending_events.push_back((OBJECT_EVENT_DIR_ITEM_REQUEST_TRANSFER, item));
    }
    ERR_OK
  }

  pub fn handler_registered() -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::SetObjectEventHandler) {
      return code;
    }
    ERR_OK
  }

  /// Events queued since the last pump. The sys side dispatches them to the
  /// registered handler.
  pub fn take_events() -> Result<Vec<(u32, HandleId)>, u32> {
    let mut s = state();
    s.planned_failure(Call::GetEvent)?;
    Ok(s.pending_events.drain(..).collect())
  }

  pub fn dir_item_info(handle: HandleId) -> Result<(String, u64, bool), u32> {
    let mut s = state();
    s.planned_failure(Call::GetDirectoryItemInfo)?;
    match s.handles.get(&handle) {
      Some(Handle::DirectoryItem { file_name, data }) => {
        Ok((file_name.clone(), data.len() as u64, false))
      }
      _ => Err(ERR_INVALID_HANDLE),
    }
  }

  pub fn create_file_stream(path: &str) -> Result<HandleId, u32> {
    let mut s = state();
    s.planned_failure(Call::CreateFileStream)?;
    Ok(s.alloc(Handle::Stream { backing: StreamBacking::File(PathBuf::from(path)) }))
  }

  pub fn create_memory_stream(size: u64) -> Result<HandleId, u32> {
    let mut s = state();
    s.planned_failure(Call::CreateMemoryStream)?;
    let backing = StreamBacking::Memory(Vec::with_capacity(size as usize));
    Ok(s.alloc(Handle::Stream { backing }))
  }

  pub fn download(item: HandleId, read_size: u64, stream: HandleId) -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::Download) {
      return code;
    }
    let data = match s.handles.get(&item) {
      Some(Handle::DirectoryItem { data, .. }) => {
        data[..data.len().min(read_size as usize)].to_vec()
      }
      _ => return ERR_INVALID_HANDLE,
    };
    match s.handles.get_mut(&stream) {
      Some(Handle::Stream { backing: StreamBacking::Memory(buffer) }) => {
        buffer.extend_from_slice(&data);
        ERR_OK
      }
      Some(Handle::Stream { backing: StreamBacking::File(path) }) => match fs::write(path, &data) {
        Ok(()) => ERR_OK,
        Err(_) => ERR_FILE_IO_ERROR,
      },
      _ => ERR_INVALID_HANDLE,
    }
  }

  pub fn download_complete(item: HandleId) -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::DownloadComplete) {
      return code;
    }
    match s.handles.get(&item) {
      Some(Handle::DirectoryItem { .. }) => ERR_OK,
      _ => ERR_INVALID_HANDLE,
    }
  }

  /// Pointer and length of a memory stream's buffer.
  ///
  /// The pointer stays valid until the stream handle is released, matching
  /// the contract of `EdsGetPointer` on the real SDK.
  pub fn stream_data(stream: HandleId) -> Result<(usize, u64), u32> {
    let s = state();
    match s.handles.get(&stream) {
      Some(Handle::Stream { backing: StreamBacking::Memory(buffer) }) => {
        Ok((buffer.as_ptr() as usize, buffer.len() as u64))
      }
      _ => Err(ERR_INVALID_HANDLE),
    }
  }

  const DATA_TYPE_STRING: u32 = 2;
  const DATA_TYPE_UINT32: u32 = 9;
  const PROP_PRODUCT_NAME: u32 = 0x0000_0002;
  const PROP_BATTERY_LEVEL: u32 = 0x0000_0008;

  fn property_payload(s: &mut State, handle: HandleId, property: u32) -> Result<(u32, Vec<u8>), u32> {
    let index = s.camera_index(handle)?;
    match property {
      PROP_PRODUCT_NAME => {
        let mut bytes = s.cameras[index].1.clone().into_bytes();
        bytes.push(0);
        Ok((DATA_TYPE_STRING, bytes))
      }
      PROP_BATTERY_LEVEL => Ok((DATA_TYPE_UINT32, 87u32.to_le_bytes().to_vec())),
      _ => Err(ERR_INVALID_INDEX),
    }
  }

  /// Data type and byte size for `EdsGetPropertySize`.
  pub fn property_size(handle: HandleId, property: u32) -> Result<(u32, u32), u32> {
    let mut s = state();
    s.planned_failure(Call::GetPropertySize)?;
    let (data_type, bytes) = property_payload(&mut s, handle, property)?;
    Ok((data_type, bytes.len() as u32))
  }

  /// Property payload for `EdsGetPropertyData`, as (data type, raw bytes).
  pub fn property_data(handle: HandleId, property: u32) -> Result<(u32, Vec<u8>), u32> {
    let mut s = state();
    s.planned_failure(Call::GetPropertyData)?;
    property_payload(&mut s, handle, property)
  }

  pub fn set_property_data(handle: HandleId, property: u32, data: Vec<u8>) -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::SetPropertyData) {
      return code;
    }
    if s.camera_index(handle).is_err() {
      return ERR_INVALID_HANDLE;
    }
    s.properties_set.push((property, data));
    ERR_OK
  }

  pub fn set_capacity(
    handle: HandleId,
    free_clusters: i32,
    bytes_per_sector: i32,
    reset: i32,
  ) -> u32 {
    let mut s = state();
    if let Err(code) = s.planned_failure(Call::SetCapacity) {
      return code;
    }
    if s.camera_index(handle).is_err() {
      return ERR_INVALID_HANDLE;
    }
    s.capacities.push((free_clusters, bytes_per_sector, reset));
    ERR_OK
  }

  /// Returns the remaining reference count, which the virtual SDK pins to 0.
  pub fn release(handle: HandleId) -> u32 {
    let mut s = state();
    s.handles.remove(&handle);
    s.release_count += 1;
    0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn capture_queues_a_transfer_request() {
    let _vsdk = lock();
    connect_camera("usb:001", "Virtual EOS");
    assert_eq!(driver::initialize(), ERR_OK);
    let list = driver::get_camera_list().unwrap();
    let camera = driver::child_at(list, 0).unwrap();
    assert_eq!(driver::open_session(camera), ERR_OK);
    assert_eq!(
      driver::send_command(camera, COMMAND_PRESS_SHUTTER_BUTTON, SHUTTER_BUTTON_COMPLETELY),
      ERR_OK
    );

    let events = driver::take_events().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, OBJECT_EVENT_DIR_ITEM_REQUEST_TRANSFER);

    let (name, size, is_folder) = driver::dir_item_info(events[0].1).unwrap();
    assert_eq!(name, "IMG_0001.JPG");
    assert_eq!(size, SAMPLE_IMAGE.len() as u64);
    assert!(!is_folder);
  }

  #[test]
  fn fault_plan_is_consumed_on_match() {
    let _vsdk = lock();
    connect_camera("usb:001", "Virtual EOS");
    driver::initialize();
    fail_next(Call::GetCameraList, ERR_INTERNAL_ERROR);
    assert_eq!(driver::get_camera_list(), Err(ERR_INTERNAL_ERROR));
    assert!(driver::get_camera_list().is_ok());
  }

  #[test]
  fn fail_nth_skips_the_first_matches() {
    let _vsdk = lock();
    connect_camera("usb:001", "Virtual EOS");
    driver::initialize();
    fail_nth(Call::GetCameraList, 1, ERR_INTERNAL_ERROR);
    assert!(driver::get_camera_list().is_ok());
    assert_eq!(driver::get_camera_list(), Err(ERR_INTERNAL_ERROR));
    assert!(driver::get_camera_list().is_ok());
  }

  #[test]
  fn commands_without_a_session_are_rejected_but_logged() {
    let _vsdk = lock();
    connect_camera("usb:001", "Virtual EOS");
    driver::initialize();
    let list = driver::get_camera_list().unwrap();
    let camera = driver::child_at(list, 0).unwrap();
    assert_eq!(
      driver::send_command(camera, COMMAND_PRESS_SHUTTER_BUTTON, 0),
      ERR_SESSION_NOT_OPEN
    );
    assert_eq!(command_log().len(), 1);
  }
}
