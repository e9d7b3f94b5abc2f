//! Object-event plumbing.
//!
//! The SDK reports camera-side changes through a C callback that only fires
//! while [`EdsGetEvent`](edsdk_sys::EdsGetEvent) is being pumped. The
//! callback forwards raw events into a channel; [`Session::wait_event`]
//! alternates pumping with channel reads and decodes what comes out.
//!
//! [`Session::wait_event`]: crate::camera::Session::wait_event

use crate::{file::DirectoryItem, try_eds, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};

pub(crate) type RawEvent = (edsdk_sys::EdsObjectEvent, edsdk_sys::EdsBaseRef);

/// Decoded object event
pub enum CameraEvent {
  /// A new file appeared on the camera's storage
  FileCreated(DirectoryItem),
  /// The camera asks the host to download a file
  TransferRequest(DirectoryItem),
  /// Any other event, reported with its raw id
  Other {
    /// Raw `kEdsObjectEvent_*` value
    event: edsdk_sys::EdsObjectEvent,
  },
}

impl CameraEvent {
  pub(crate) fn from_raw((event, object): RawEvent) -> Self {
    match event {
      edsdk_sys::kEdsObjectEvent_DirItemCreated => Self::FileCreated(DirectoryItem::new(object)),
      edsdk_sys::kEdsObjectEvent_DirItemRequestTransfer
      | edsdk_sys::kEdsObjectEvent_DirItemRequestTransferDT => {
        Self::TransferRequest(DirectoryItem::new(object))
      }
      _ => {
        // Events we do not surface still carry a reference we must drop.
        if !object.is_null() {
          unsafe { edsdk_sys::EdsRelease(object) };
        }
        Self::Other { event }
      }
    }
  }
}

extern "C" fn forward_object_event(
  event: edsdk_sys::EdsObjectEvent,
  object: edsdk_sys::EdsBaseRef,
  context: *mut edsdk_sys::EdsVoid,
) -> edsdk_sys::EdsError {
  let sender = unsafe { &*(context as *const Sender<RawEvent>) };

  // The SDK does not care about our result; a dropped receiver just means
  // nobody is listening anymore.
  let _ = sender.send((event, object));

  edsdk_sys::EDS_ERR_OK
}

/// Registered handler plus the receiving end of its channel.
///
/// The boxed sender is the context pointer handed to the SDK, so it must
/// stay alive (and pinned) for as long as the handler is registered. The
/// handler itself stays registered for the lifetime of the camera handle.
pub(crate) struct EventChannel {
  _tx: Box<Sender<RawEvent>>,
  rx: Receiver<RawEvent>,
}

impl EventChannel {
  pub(crate) fn register(camera: edsdk_sys::EdsCameraRef) -> Result<Self> {
    let (tx, rx) = unbounded();
    let tx = Box::new(tx);

    try_eds!(edsdk_sys::EdsSetObjectEventHandler(
      camera,
      edsdk_sys::kEdsObjectEvent_All,
      forward_object_event,
      &*tx as *const Sender<RawEvent> as *mut edsdk_sys::EdsVoid,
    ))?;

    Ok(Self { _tx: tx, rx })
  }

  pub(crate) fn try_recv(&self) -> Option<RawEvent> {
    self.rx.try_recv().ok()
  }
}
