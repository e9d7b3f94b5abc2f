//! Typed values for the camera properties this crate drives

/// Positions of the shutter button, as accepted by
/// `kEdsCameraCommand_PressShutterButton`
#[repr(i32)]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ShutterButton {
  /// Button released
  Off = edsdk_sys::kEdsCameraCommand_ShutterButton_OFF,
  /// Button pressed halfway (starts autofocus)
  Halfway = edsdk_sys::kEdsCameraCommand_ShutterButton_Halfway,
  /// Button pressed completely (fires the shutter)
  Completely = edsdk_sys::kEdsCameraCommand_ShutterButton_Completely,
  /// Halfway press without autofocus
  HalfwayNonAf = edsdk_sys::kEdsCameraCommand_ShutterButton_Halfway_NonAF,
  /// Complete press without autofocus
  CompletelyNonAf = edsdk_sys::kEdsCameraCommand_ShutterButton_Completely_NonAF,
}

impl From<ShutterButton> for i32 {
  fn from(button: ShutterButton) -> Self {
    button as i32
  }
}

/// Where the camera stores captured images
#[repr(u32)]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum SaveTo {
  /// On the camera's own storage card
  Camera = edsdk_sys::kEdsSaveTo_Camera,
  /// Streamed to the connected host
  Host = edsdk_sys::kEdsSaveTo_Host,
  /// Both card and host
  Both = edsdk_sys::kEdsSaveTo_Both,
}

/// JPEG quality settings for `kEdsPropID_ImageQuality`
#[repr(u32)]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ImageQuality {
  /// Jpeg Large
  JpegLarge = 0x0010_FF0F,
  /// Jpeg Middle
  JpegMiddle = 0x0110_FF0F,
  /// Jpeg Middle1
  JpegMiddle1 = 0x0510_FF0F,
  /// Jpeg Middle1 Fine
  JpegMiddle1Fine = 0x0513_FF0F,
  /// Jpeg Middle1 Normal
  JpegMiddle1Normal = 0x0512_FF0F,
  /// Jpeg Middle2
  JpegMiddle2 = 0x0610_FF0F,
  /// Jpeg Middle2 Fine
  JpegMiddle2Fine = 0x0613_FF0F,
  /// Jpeg Middle2 Normal
  JpegMiddle2Normal = 0x0612_FF0F,
  /// Jpeg Small
  JpegSmall = 0x0210_FF0F,
  /// Jpeg Small1
  JpegSmall1 = 0x0E10_FF0F,
  /// Jpeg Small2
  JpegSmall2 = 0x0F10_FF0F,
  /// Jpeg Large Fine
  JpegLargeFine = 0x0013_FF0F,
  /// Jpeg Large Normal
  JpegLargeNormal = 0x0012_FF0F,
  /// Jpeg Middle Fine
  JpegMiddleFine = 0x0113_FF0F,
  /// Jpeg Middle Normal
  JpegMiddleNormal = 0x0112_FF0F,
  /// Jpeg Small Fine
  JpegSmallFine = 0x0213_FF0F,
  /// Jpeg Small Normal
  JpegSmallNormal = 0x0212_FF0F,
  /// Jpeg Small1 Fine
  JpegSmall1Fine = 0x0E13_FF0F,
  /// Jpeg Small1 Normal
  JpegSmall1Normal = 0x0E12_FF0F,
  /// Jpeg Small2 Fine
  JpegSmall2Fine = 0x0F13_FF0F,
  /// Jpeg Small3
  JpegSmall3 = 0x1013_FF0F,
}

/// Host-side storage capacity advertised to the camera before a transfer.
///
/// The default mirrors what the vendor samples advertise: effectively
/// unlimited space in 4 KiB sectors, with the camera's cached value reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
  /// Number of free clusters on the host volume
  pub free_clusters: i32,
  /// Bytes per sector on the host volume
  pub bytes_per_sector: i32,
  /// Whether the camera should discard its cached capacity first
  pub reset: bool,
}

impl Default for Capacity {
  fn default() -> Self {
    Self { free_clusters: 0x7FFF_FFFF, bytes_per_sector: 0x1000, reset: true }
  }
}

impl From<Capacity> for edsdk_sys::EdsCapacity {
  fn from(capacity: Capacity) -> Self {
    Self {
      numberOfFreeClusters: capacity.free_clusters,
      bytesPerSector: capacity.bytes_per_sector,
      reset: capacity.reset.into(),
    }
  }
}
