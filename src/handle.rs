// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::ptr::null_mut;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Arc;
use tracing::warn;

use crate::api::{RawHandle, VendorApi};
use crate::error::HResult;

/// Owning wrapper around a raw vendor device handle.
///
/// The wrapped value is released through the vendor close call exactly once,
/// no matter how many times [`release`](DeviceHandle::release) runs or on
/// which threads; once released (or if the handle was never valid) the raw
/// value is unreachable and no further native call can observe it.
///
/// Dropping an unreleased handle closes it as a backstop, but the expected
/// path is an explicit release via [`crate::Camera::close`].
pub struct DeviceHandle {
    api: Arc<dyn VendorApi>,
    raw: AtomicPtr<libc::c_void>,
}

impl DeviceHandle {
    /// Take ownership of an already-open raw handle.
    ///
    /// # Errors
    ///
    /// Returns `E_POINTER` if `raw` is the null sentinel.
    pub fn acquire(api: Arc<dyn VendorApi>, raw: RawHandle) -> Result<Self, HResult> {
        if raw.is_null() {
            return Err(HResult::POINTER);
        }
        Ok(Self {
            api,
            raw: AtomicPtr::new(raw),
        })
    }

    /// True while the handle has not been released.
    pub fn is_valid(&self) -> bool {
        !self.raw.load(Ordering::Acquire).is_null()
    }

    /// The raw value for a native call, or `None` once released.
    pub(crate) fn get(&self) -> Option<RawHandle> {
        let raw = self.raw.load(Ordering::Acquire);
        if raw.is_null() {
            None
        } else {
            Some(raw)
        }
    }

    /// Release the underlying resource.
    ///
    /// Idempotent and safe under concurrent callers: the swap below elects a
    /// single winner to perform the native close, everyone else observes the
    /// null sentinel and returns.  Reports whether this call was the one
    /// that closed.  A vendor error from the close itself is not surfaced;
    /// the handle is considered gone once release is requested.
    pub fn release(&self) -> bool {
        let raw = self.raw.swap(null_mut(), Ordering::AcqRel);
        if raw.is_null() {
            return false;
        }
        self.api.close(raw);
        true
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        if self.release() {
            warn!("device handle was not closed explicitly, released in drop");
        }
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::mock::MockSdk;
    use std::thread;

    fn open_mock() -> (Arc<MockSdk>, RawHandle) {
        let mock = Arc::new(MockSdk::new());
        let raw = mock.open(None).expect("mock open");
        (mock, raw)
    }

    #[test]
    fn acquire_rejects_null() {
        let mock = Arc::new(MockSdk::new());
        let api: Arc<dyn VendorApi> = mock;
        assert_eq!(
            DeviceHandle::acquire(api, null_mut()).err(),
            Some(HResult::POINTER)
        );
    }

    #[test]
    fn repeated_release_closes_once() {
        let (mock, raw) = open_mock();
        let api: Arc<dyn VendorApi> = mock.clone();
        let handle = DeviceHandle::acquire(api, raw).expect("acquire");

        assert!(handle.is_valid());
        assert!(handle.release());
        for _ in 0..4 {
            assert!(!handle.release());
        }
        assert!(!handle.is_valid());
        assert_eq!(handle.get(), None);
        assert_eq!(mock.close_count(), 1);
    }

    #[test]
    fn concurrent_release_closes_once() {
        let (mock, raw) = open_mock();
        let api: Arc<dyn VendorApi> = mock.clone();
        let handle = Arc::new(DeviceHandle::acquire(api, raw).expect("acquire"));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || handle.release())
            })
            .collect();
        let winners = workers
            .into_iter()
            .map(|w| w.join())
            .filter(|r| matches!(r, Ok(true)))
            .count();

        assert_eq!(winners, 1);
        assert_eq!(mock.close_count(), 1);
    }

    #[test]
    fn drop_releases_as_backstop() {
        let (mock, raw) = open_mock();
        let api: Arc<dyn VendorApi> = mock.clone();
        drop(DeviceHandle::acquire(api, raw).expect("acquire"));
        assert_eq!(mock.close_count(), 1);
    }
}
