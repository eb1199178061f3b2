// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Vendor runtime seam.
//!
//! [`VendorApi`] is the exact set of native entry points the session layer
//! uses, expressed over a raw handle value.  [`Sdk`] implements it against
//! the dynamically loaded vendor library; the `mock` feature provides an
//! in-process implementation for tests and camera-less development.

use libc::{c_char, c_int, c_uint, c_ushort, c_void};
use lumicam_sys as sys;
use std::ffi::CString;
use tracing::debug;

use crate::device::DeviceInfo;

/// Raw vendor device handle.  Null is the invalid sentinel.
pub type RawHandle = *mut c_void;

/// Native event callback as registered with the runtime.  The context value
/// travels through the vendor as an opaque pointer-sized integer.
pub type EventCallback = sys::PLUMICAM_EVENT_CALLBACK;

/// The native entry points used by [`crate::Camera`].
///
/// Handles are passed by value; implementations must tolerate calls on any
/// thread (the vendor runtime is internally synchronized and tests drive the
/// mock from several threads).  Every status-returning method yields the raw
/// signed 32-bit vendor code.
pub trait VendorApi: Send + Sync {
    fn enumerate(&self) -> Vec<DeviceInfo>;

    /// Open by enumeration id, or the first camera when `id` is `None`.
    /// Returns `None` on failure; the runtime never reports a partial open.
    fn open(&self, id: Option<&str>) -> Option<RawHandle>;

    fn close(&self, h: RawHandle);

    fn start_pull_mode(&self, h: RawHandle, cb: EventCallback, ctx: usize) -> i32;
    fn stop(&self, h: RawHandle) -> i32;
    fn pause(&self, h: RawHandle, pause: bool) -> i32;
    fn snap(&self, h: RawHandle, resolution_index: u32) -> i32;
    fn trigger(&self, h: RawHandle, count: u16) -> i32;
    fn flush(&self, h: RawHandle) -> i32;

    #[allow(clippy::too_many_arguments)]
    fn pull_image(
        &self,
        h: RawHandle,
        data: &mut [u8],
        still: bool,
        bits: i32,
        row_pitch: i32,
        info: &mut sys::LumicamFrameInfoV3,
    ) -> i32;

    #[allow(clippy::too_many_arguments)]
    fn wait_image(
        &self,
        h: RawHandle,
        wait_ms: u32,
        data: &mut [u8],
        still: bool,
        bits: i32,
        row_pitch: i32,
        info: &mut sys::LumicamFrameInfoV3,
    ) -> i32;

    fn get_option(&self, h: RawHandle, option: u32, value: &mut i32) -> i32;
    fn put_option(&self, h: RawHandle, option: u32, value: i32) -> i32;

    fn get_expo_time(&self, h: RawHandle, us: &mut u32) -> i32;
    fn put_expo_time(&self, h: RawHandle, us: u32) -> i32;
    fn expo_time_range(&self, h: RawHandle, min: &mut u32, max: &mut u32, def: &mut u32) -> i32;

    fn get_expo_gain(&self, h: RawHandle, percent: &mut u16) -> i32;
    fn put_expo_gain(&self, h: RawHandle, percent: u16) -> i32;
    fn expo_gain_range(&self, h: RawHandle, min: &mut u16, max: &mut u16, def: &mut u16) -> i32;

    fn get_auto_expo(&self, h: RawHandle, mode: &mut i32) -> i32;
    fn put_auto_expo(&self, h: RawHandle, mode: i32) -> i32;
    fn get_auto_expo_target(&self, h: RawHandle, target: &mut u16) -> i32;
    fn put_auto_expo_target(&self, h: RawHandle, target: u16) -> i32;

    fn get_temp_tint(&self, h: RawHandle, temp: &mut i32, tint: &mut i32) -> i32;
    fn put_temp_tint(&self, h: RawHandle, temp: i32, tint: i32) -> i32;

    fn get_size(&self, h: RawHandle, width: &mut i32, height: &mut i32) -> i32;
    fn put_size(&self, h: RawHandle, width: i32, height: i32) -> i32;
    fn get_esize(&self, h: RawHandle, index: &mut u32) -> i32;
    fn put_esize(&self, h: RawHandle, index: u32) -> i32;
    fn resolution_number(&self, h: RawHandle) -> i32;
    fn resolution(&self, h: RawHandle, index: u32, width: &mut i32, height: &mut i32) -> i32;

    fn serial_number(&self, h: RawHandle, sn: &mut [c_char; 32]) -> i32;
    fn fw_version(&self, h: RawHandle, ver: &mut [c_char; 16]) -> i32;
    fn hw_version(&self, h: RawHandle, ver: &mut [c_char; 16]) -> i32;

    fn get_real_time(&self, h: RawHandle, mode: &mut i32) -> i32;
    fn put_real_time(&self, h: RawHandle, mode: i32) -> i32;
}

/// The real vendor runtime, loaded at construction.
pub struct Sdk {
    lib: sys::Lib,
}

impl Sdk {
    /// Load the vendor runtime under its platform default name from the
    /// system library search path.
    ///
    /// # Errors
    ///
    /// Returns an error if the library cannot be found or a documented
    /// symbol is missing (runtime older than this binding).
    pub fn load() -> Result<Self, libloading::Error> {
        Self::load_from(sys::LIBRARY)
    }

    /// Load the vendor runtime from an explicit path.
    pub fn load_from<P: AsRef<std::ffi::OsStr>>(path: P) -> Result<Self, libloading::Error> {
        let lib = unsafe { sys::Lib::new(path) }?;
        debug!("vendor runtime loaded");
        Ok(Self { lib })
    }

    /// Runtime version string, such as `57.26813.20241028`.
    pub fn version(&self) -> String {
        let ptr = unsafe { self.lib.Lumicam_Version() };
        if ptr.is_null() {
            return String::new();
        }
        unsafe { std::ffi::CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned()
    }
}

impl VendorApi for Sdk {
    fn enumerate(&self) -> Vec<DeviceInfo> {
        let mut arr = [sys::LumicamDeviceV2::default(); sys::LUMICAM_MAX];
        let n = unsafe { self.lib.Lumicam_EnumV2(arr.as_mut_ptr()) } as usize;
        arr[..n.min(sys::LUMICAM_MAX)]
            .iter()
            .map(|raw| unsafe { DeviceInfo::from_raw(raw) })
            .collect()
    }

    fn open(&self, id: Option<&str>) -> Option<RawHandle> {
        let h = match id {
            Some(id) => {
                // An interior NUL cannot name a device; treat it as not found.
                let id = CString::new(id).ok()?;
                unsafe { self.lib.Lumicam_Open(id.as_ptr()) }
            }
            None => unsafe { self.lib.Lumicam_Open(core::ptr::null()) },
        };
        if h.is_null() {
            None
        } else {
            Some(h)
        }
    }

    fn close(&self, h: RawHandle) {
        unsafe { self.lib.Lumicam_Close(h) }
    }

    fn start_pull_mode(&self, h: RawHandle, cb: EventCallback, ctx: usize) -> i32 {
        unsafe {
            self.lib
                .Lumicam_StartPullModeWithCallback(h, cb, ctx as *mut c_void)
        }
    }

    fn stop(&self, h: RawHandle) -> i32 {
        unsafe { self.lib.Lumicam_Stop(h) }
    }

    fn pause(&self, h: RawHandle, pause: bool) -> i32 {
        unsafe { self.lib.Lumicam_Pause(h, pause as c_int) }
    }

    fn snap(&self, h: RawHandle, resolution_index: u32) -> i32 {
        unsafe { self.lib.Lumicam_Snap(h, resolution_index as c_uint) }
    }

    fn trigger(&self, h: RawHandle, count: u16) -> i32 {
        unsafe { self.lib.Lumicam_Trigger(h, count as c_ushort) }
    }

    fn flush(&self, h: RawHandle) -> i32 {
        unsafe { self.lib.Lumicam_Flush(h) }
    }

    fn pull_image(
        &self,
        h: RawHandle,
        data: &mut [u8],
        still: bool,
        bits: i32,
        row_pitch: i32,
        info: &mut sys::LumicamFrameInfoV3,
    ) -> i32 {
        unsafe {
            self.lib.Lumicam_PullImageV3(
                h,
                data.as_mut_ptr() as *mut c_void,
                still as c_int,
                bits,
                row_pitch,
                info,
            )
        }
    }

    fn wait_image(
        &self,
        h: RawHandle,
        wait_ms: u32,
        data: &mut [u8],
        still: bool,
        bits: i32,
        row_pitch: i32,
        info: &mut sys::LumicamFrameInfoV3,
    ) -> i32 {
        unsafe {
            self.lib.Lumicam_WaitImageV3(
                h,
                wait_ms,
                data.as_mut_ptr() as *mut c_void,
                still as c_int,
                bits,
                row_pitch,
                info,
            )
        }
    }

    fn get_option(&self, h: RawHandle, option: u32, value: &mut i32) -> i32 {
        unsafe { self.lib.Lumicam_get_Option(h, option, value) }
    }

    fn put_option(&self, h: RawHandle, option: u32, value: i32) -> i32 {
        unsafe { self.lib.Lumicam_put_Option(h, option, value) }
    }

    fn get_expo_time(&self, h: RawHandle, us: &mut u32) -> i32 {
        unsafe { self.lib.Lumicam_get_ExpoTime(h, us) }
    }

    fn put_expo_time(&self, h: RawHandle, us: u32) -> i32 {
        unsafe { self.lib.Lumicam_put_ExpoTime(h, us) }
    }

    fn expo_time_range(&self, h: RawHandle, min: &mut u32, max: &mut u32, def: &mut u32) -> i32 {
        unsafe { self.lib.Lumicam_get_ExpTimeRange(h, min, max, def) }
    }

    fn get_expo_gain(&self, h: RawHandle, percent: &mut u16) -> i32 {
        unsafe { self.lib.Lumicam_get_ExpoAGain(h, percent) }
    }

    fn put_expo_gain(&self, h: RawHandle, percent: u16) -> i32 {
        unsafe { self.lib.Lumicam_put_ExpoAGain(h, percent) }
    }

    fn expo_gain_range(&self, h: RawHandle, min: &mut u16, max: &mut u16, def: &mut u16) -> i32 {
        unsafe { self.lib.Lumicam_get_ExpoAGainRange(h, min, max, def) }
    }

    fn get_auto_expo(&self, h: RawHandle, mode: &mut i32) -> i32 {
        unsafe { self.lib.Lumicam_get_AutoExpoEnable(h, mode) }
    }

    fn put_auto_expo(&self, h: RawHandle, mode: i32) -> i32 {
        unsafe { self.lib.Lumicam_put_AutoExpoEnable(h, mode) }
    }

    fn get_auto_expo_target(&self, h: RawHandle, target: &mut u16) -> i32 {
        unsafe { self.lib.Lumicam_get_AutoExpoTarget(h, target) }
    }

    fn put_auto_expo_target(&self, h: RawHandle, target: u16) -> i32 {
        unsafe { self.lib.Lumicam_put_AutoExpoTarget(h, target) }
    }

    fn get_temp_tint(&self, h: RawHandle, temp: &mut i32, tint: &mut i32) -> i32 {
        unsafe { self.lib.Lumicam_get_TempTint(h, temp, tint) }
    }

    fn put_temp_tint(&self, h: RawHandle, temp: i32, tint: i32) -> i32 {
        unsafe { self.lib.Lumicam_put_TempTint(h, temp, tint) }
    }

    fn get_size(&self, h: RawHandle, width: &mut i32, height: &mut i32) -> i32 {
        unsafe { self.lib.Lumicam_get_Size(h, width, height) }
    }

    fn put_size(&self, h: RawHandle, width: i32, height: i32) -> i32 {
        unsafe { self.lib.Lumicam_put_Size(h, width, height) }
    }

    fn get_esize(&self, h: RawHandle, index: &mut u32) -> i32 {
        unsafe { self.lib.Lumicam_get_eSize(h, index) }
    }

    fn put_esize(&self, h: RawHandle, index: u32) -> i32 {
        unsafe { self.lib.Lumicam_put_eSize(h, index) }
    }

    fn resolution_number(&self, h: RawHandle) -> i32 {
        unsafe { self.lib.Lumicam_get_ResolutionNumber(h) }
    }

    fn resolution(&self, h: RawHandle, index: u32, width: &mut i32, height: &mut i32) -> i32 {
        unsafe { self.lib.Lumicam_get_Resolution(h, index, width, height) }
    }

    fn serial_number(&self, h: RawHandle, sn: &mut [c_char; 32]) -> i32 {
        unsafe { self.lib.Lumicam_get_SerialNumber(h, sn.as_mut_ptr()) }
    }

    fn fw_version(&self, h: RawHandle, ver: &mut [c_char; 16]) -> i32 {
        unsafe { self.lib.Lumicam_get_FwVersion(h, ver.as_mut_ptr()) }
    }

    fn hw_version(&self, h: RawHandle, ver: &mut [c_char; 16]) -> i32 {
        unsafe { self.lib.Lumicam_get_HwVersion(h, ver.as_mut_ptr()) }
    }

    fn get_real_time(&self, h: RawHandle, mode: &mut i32) -> i32 {
        unsafe { self.lib.Lumicam_get_RealTime(h, mode) }
    }

    fn put_real_time(&self, h: RawHandle, mode: i32) -> i32 {
        unsafe { self.lib.Lumicam_put_RealTime(h, mode) }
    }
}
