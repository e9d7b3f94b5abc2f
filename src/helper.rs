use std::{ffi, os::raw::c_char};

/// Reads a NUL-terminated C string out of one of the SDK's fixed-size
/// char-array fields.
pub fn char_slice_to_string(chars: &[c_char]) -> String {
  unsafe { String::from_utf8_lossy(ffi::CStr::from_ptr(chars.as_ptr()).to_bytes()) }.into_owned()
}
