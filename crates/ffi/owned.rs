use std::ffi::{CString, c_char};

/// A string whose ownership is handed to the foreign caller.
///
/// The only way out of this type is [`OwnedTraceString::into_raw`], and the
/// only way back in is [`OwnedTraceString::from_raw`], which `FreeString`
/// uses to drop the allocation on the Rust side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedTraceString(CString);

impl OwnedTraceString {
    /// Interior NUL bytes are dropped so the text survives as a C string.
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        let mut bytes = text.into();
        bytes.retain(|byte| *byte != 0);
        OwnedTraceString(CString::new(bytes).unwrap_or_default())
    }

    #[cfg(test)]
    fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or_default()
    }

    pub fn into_raw(self) -> *mut c_char {
        self.0.into_raw()
    }

    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or come from [`OwnedTraceString::into_raw`] and
    /// must not have been reclaimed already.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        // SAFETY: the caller guarantees `ptr` came from `CString::into_raw`.
        Some(OwnedTraceString(unsafe { CString::from_raw(ptr) }))
    }
}

impl From<String> for OwnedTraceString {
    fn from(text: String) -> Self {
        OwnedTraceString::new(text)
    }
}
