//! Storage abstraction for floor plans and background images.

mod upload;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use upload::{StoredImage, UploadedImage, content_type_for, probe_image};
pub use memory::{MemoryImageStore, MemoryStorage};

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileImageStore, FileStorage};

use crate::model::FloorPlanConfig;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Floor plan not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Image error: {0}")]
    Image(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations. Send on native so servers can await it.
#[cfg(not(target_arch = "wasm32"))]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Boxed future for async operations (WASM is single-threaded).
#[cfg(target_arch = "wasm32")]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Floor plan persistence, keyed by show id.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save (replace) the floor plan of a show.
    fn save(&self, show_id: &str, config: &FloorPlanConfig) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the floor plan of a show.
    fn load(&self, show_id: &str) -> BoxFuture<'_, StorageResult<FloorPlanConfig>>;

    /// Delete the floor plan of a show.
    fn delete(&self, show_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all show ids with a stored floor plan.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a show has a stored floor plan.
    fn exists(&self, show_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Floor plan persistence (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, show_id: &str, config: &FloorPlanConfig) -> BoxFuture<'_, StorageResult<()>>;
    fn load(&self, show_id: &str) -> BoxFuture<'_, StorageResult<FloorPlanConfig>>;
    fn delete(&self, show_id: &str) -> BoxFuture<'_, StorageResult<()>>;
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;
    fn exists(&self, show_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Binary storage for uploaded background images.
#[cfg(not(target_arch = "wasm32"))]
pub trait ImageStore: Send + Sync {
    /// Store an upload and return its reference and native dimensions.
    ///
    /// Fails with [`StorageError::Image`] when the bytes are not a
    /// supported image.
    fn put_image(&self, bytes: &[u8]) -> BoxFuture<'_, StorageResult<UploadedImage>>;

    /// Fetch a stored image by reference.
    fn get_image(&self, reference: &str) -> BoxFuture<'_, StorageResult<StoredImage>>;
}

/// Binary storage for uploaded background images (WASM version).
#[cfg(target_arch = "wasm32")]
pub trait ImageStore {
    fn put_image(&self, bytes: &[u8]) -> BoxFuture<'_, StorageResult<UploadedImage>>;
    fn get_image(&self, reference: &str) -> BoxFuture<'_, StorageResult<StoredImage>>;
}

/// Encode an id as a file name stem.
///
/// `[a-z0-9-]` pass through; every other byte becomes `_xx` (lowercase hex).
/// The mapping is one-to-one, also on case-insensitive file systems.
pub(crate) fn encode_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => out.push(char::from(byte)),
            _ => out.push_str(&format!("_{byte:02x}")),
        }
    }
    out
}

/// Inverse of [`encode_id`]; `None` for stems it could not have produced.
pub(crate) fn decode_id(stem: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(stem.len());
    let mut rest = stem.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => {
                bytes.push(byte);
                rest = tail;
            }
            b'_' if tail.len() >= 2 => {
                let hex = std::str::from_utf8(&tail[..2]).ok()?;
                if hex.bytes().any(|b| b.is_ascii_uppercase()) {
                    return None;
                }
                bytes.push(u8::from_str_radix(hex, 16).ok()?);
                rest = &tail[2..];
            }
            _ => return None,
        }
    }
    String::from_utf8(bytes).ok()
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
