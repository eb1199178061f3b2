// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tracing::debug;

use libc::c_char;
use lumicam_sys as sys;

use crate::api::{RawHandle, VendorApi};
use crate::device::{fixed_cstr, Resolution};
use crate::error::HResult;
use crate::event::{event_trampoline, Event};
use crate::frame::FrameInfo;
use crate::handle::DeviceHandle;
use crate::registry;

/// Auto exposure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoExposure {
    #[default]
    Off,
    /// Keep converging continuously.
    Continuous,
    /// Converge once, then hold.
    Once,
}

impl AutoExposure {
    fn from_raw(mode: i32) -> Self {
        match mode {
            1 => AutoExposure::Continuous,
            2 => AutoExposure::Once,
            _ => AutoExposure::Off,
        }
    }

    fn as_raw(self) -> i32 {
        match self {
            AutoExposure::Off => 0,
            AutoExposure::Continuous => 1,
            AutoExposure::Once => 2,
        }
    }
}

/// State shared between the owning [`Camera`] and the event bridge through
/// the callback registry.
pub(crate) struct SessionShared {
    handle: DeviceHandle,
    tx: kanal::Sender<Event>,
}

impl SessionShared {
    /// Close the native handle out from under the session; used by the
    /// bridge on fatal events.  Commands observe the change through the
    /// handle validity check.
    pub(crate) fn invalidate(&self) {
        self.handle.release();
    }

    pub(crate) fn sender(&self) -> &kanal::Sender<Event> {
        &self.tx
    }
}

/// One open camera.
///
/// Owns exactly one [`DeviceHandle`] and one entry in the process-wide
/// callback registry.  All operations are fail-soft: once the session is
/// closed (explicitly, or by the bridge after a disconnect) they return the
/// uniform inoperative status without touching native code.
///
/// Mutating streaming commands take `&mut self`; queries interleave freely
/// with the event stream.  The vendor runtime itself serializes concurrent
/// native calls on the same handle.
pub struct Camera {
    api: Arc<dyn VendorApi>,
    shared: Arc<SessionShared>,
    rx: kanal::Receiver<Event>,
    id: u32,
    last: AtomicI32,
}

impl Camera {
    /// Open a camera.
    ///
    /// `id` is the opaque token from [`crate::DeviceInfo::id`]; `None` opens
    /// the first enumerated camera.  On failure nothing is registered and no
    /// handle exists.
    ///
    /// # Errors
    ///
    /// `E_FAIL` when the runtime cannot open the device (unknown id,
    /// unplugged, or already in use).
    pub fn open(api: Arc<dyn VendorApi>, id: Option<&str>) -> Result<Self, HResult> {
        let raw = api.open(id).ok_or(HResult::FAIL)?;
        let handle = DeviceHandle::acquire(Arc::clone(&api), raw)?;

        let (tx, rx) = kanal::unbounded();
        let shared = Arc::new(SessionShared { handle, tx });
        let id = registry::sessions().register(Arc::clone(&shared));
        debug!(id, "camera session opened");

        Ok(Self {
            api,
            shared,
            rx,
            id,
            last: AtomicI32::new(sys::S_OK),
        })
    }

    /// The typed event stream fed by the vendor runtime.
    ///
    /// Events are enqueued from native threads; consume them from whichever
    /// thread owns the session's lifecycle.  After a fatal event the session
    /// is already closed by the time [`Event::Disconnected`] or
    /// [`Event::Error`] is observed here.
    pub fn events(&self) -> kanal::Receiver<Event> {
        self.rx.clone()
    }

    /// True until [`close`](Camera::close) runs or a fatal event closes the
    /// session.
    pub fn is_open(&self) -> bool {
        self.shared.handle.is_valid()
    }

    /// Status code recorded by the most recent operation on this session.
    pub fn last_status(&self) -> HResult {
        HResult(self.last.load(Ordering::Relaxed))
    }

    /// Close the session: remove it from the callback registry, then
    /// release the native handle.  Idempotent; also runs on drop.
    pub fn close(&mut self) {
        registry::sessions().unregister(self.id);
        if self.shared.handle.release() {
            debug!(id = self.id, "camera session closed");
        }
    }

    fn guard(&self) -> Result<RawHandle, HResult> {
        match self.shared.handle.get() {
            Some(raw) => Ok(raw),
            None => {
                self.last
                    .store(HResult::INOPERATIVE.0, Ordering::Relaxed);
                Err(HResult::INOPERATIVE)
            }
        }
    }

    fn status(&self, code: i32) -> Result<HResult, HResult> {
        self.last.store(code, Ordering::Relaxed);
        HResult::check(code)
    }

    // -------------------------------------------------------------------
    // Streaming control
    // -------------------------------------------------------------------

    /// Start pull-mode streaming.  Frame arrival and state changes are
    /// reported through [`events`](Camera::events); fetch frames with
    /// [`pull_image`](Camera::pull_image).
    pub fn start(&mut self) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self
            .api
            .start_pull_mode(h, Some(event_trampoline), self.id as usize);
        self.status(code).map(|_| ())
    }

    /// Stop streaming.  The session stays open and can be started again.
    pub fn stop(&mut self) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.stop(h);
        self.status(code).map(|_| ())
    }

    /// Pause (`true`) or resume (`false`) the stream.
    pub fn pause(&mut self, pause: bool) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.pause(h, pause);
        self.status(code).map(|_| ())
    }

    /// Request a still frame at the given still-resolution index, or at the
    /// current preview resolution when `None`.  Completion is signaled by
    /// [`Event::StillImage`].
    pub fn snap(&self, resolution_index: Option<u32>) -> Result<(), HResult> {
        let h = self.guard()?;
        let index = resolution_index.unwrap_or(sys::LUMICAM_CURRENT_RESOLUTION);
        let code = self.api.snap(h, index);
        self.status(code).map(|_| ())
    }

    /// Soft trigger: request `count` frames; 0 cancels an outstanding
    /// trigger, [`sys::LUMICAM_TRIGGER_CONTINUOUS`] triggers continuously.
    pub fn trigger(&self, count: u16) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.trigger(h, count);
        self.status(code).map(|_| ())
    }

    /// Discard frames cached in the camera DDR and the runtime.
    pub fn flush(&mut self) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.flush(h);
        self.status(code).map(|_| ())
    }

    // -------------------------------------------------------------------
    // Image retrieval
    // -------------------------------------------------------------------

    /// Fetch the next pending live frame into `data`.
    ///
    /// `bits` selects the output format (24 for RGB24, 32, 48, 8, 16; 0 for
    /// the runtime default per `LUMICAM_OPTION_RGB`); `row_pitch` 0 uses the
    /// default DIB pitch, -1 packs rows without padding.  Returns the frame
    /// metadata as an owned copy; `E_PENDING` when no frame is queued.
    pub fn pull_image(
        &self,
        data: &mut [u8],
        bits: i32,
        row_pitch: i32,
    ) -> Result<FrameInfo, HResult> {
        self.pull(data, false, bits, row_pitch)
    }

    /// Fetch a pending still (snap) frame.
    pub fn pull_still_image(
        &self,
        data: &mut [u8],
        bits: i32,
        row_pitch: i32,
    ) -> Result<FrameInfo, HResult> {
        self.pull(data, true, bits, row_pitch)
    }

    fn pull(
        &self,
        data: &mut [u8],
        still: bool,
        bits: i32,
        row_pitch: i32,
    ) -> Result<FrameInfo, HResult> {
        let h = self.guard()?;
        let mut raw = sys::LumicamFrameInfoV3::default();
        let code = self.api.pull_image(h, data, still, bits, row_pitch, &mut raw);
        self.status(code)?;
        Ok(FrameInfo::from(raw))
    }

    /// Block until a live frame is available and fetch it.
    ///
    /// Suspends the calling thread until a frame arrives, `wait_ms`
    /// elapses (`E_TIMEOUT`), or the session dies; closing the session from
    /// another thread while a wait is outstanding yields a clean failure.
    /// `wait_ms` of 0 does not wait at all, equivalent to
    /// [`pull_image`](Camera::pull_image).
    pub fn wait_image(
        &self,
        wait_ms: u32,
        data: &mut [u8],
        bits: i32,
        row_pitch: i32,
    ) -> Result<FrameInfo, HResult> {
        let h = self.guard()?;
        let mut raw = sys::LumicamFrameInfoV3::default();
        let code = self
            .api
            .wait_image(h, wait_ms, data, false, bits, row_pitch, &mut raw);
        self.status(code)?;
        Ok(FrameInfo::from(raw))
    }

    // -------------------------------------------------------------------
    // Exposure
    // -------------------------------------------------------------------

    /// Current exposure time in microseconds.
    pub fn exposure_time(&self) -> Result<u32, HResult> {
        let h = self.guard()?;
        let mut us = 0;
        let code = self.api.get_expo_time(h, &mut us);
        self.status(code).map(|_| us)
    }

    /// Set the exposure time in microseconds.
    pub fn set_exposure_time(&self, us: u32) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_expo_time(h, us);
        self.status(code).map(|_| ())
    }

    /// Exposure time range as `(min, max, default)`, microseconds.
    pub fn exposure_time_range(&self) -> Result<(u32, u32, u32), HResult> {
        let h = self.guard()?;
        let (mut min, mut max, mut def) = (0, 0, 0);
        let code = self.api.expo_time_range(h, &mut min, &mut max, &mut def);
        self.status(code).map(|_| (min, max, def))
    }

    /// Analog gain in percent, such as 300.
    pub fn exposure_gain(&self) -> Result<u16, HResult> {
        let h = self.guard()?;
        let mut percent = 0;
        let code = self.api.get_expo_gain(h, &mut percent);
        self.status(code).map(|_| percent)
    }

    pub fn set_exposure_gain(&self, percent: u16) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_expo_gain(h, percent);
        self.status(code).map(|_| ())
    }

    /// Analog gain range as `(min, max, default)`, percent.
    pub fn exposure_gain_range(&self) -> Result<(u16, u16, u16), HResult> {
        let h = self.guard()?;
        let (mut min, mut max, mut def) = (0, 0, 0);
        let code = self.api.expo_gain_range(h, &mut min, &mut max, &mut def);
        self.status(code).map(|_| (min, max, def))
    }

    pub fn auto_exposure(&self) -> Result<AutoExposure, HResult> {
        let h = self.guard()?;
        let mut mode = 0;
        let code = self.api.get_auto_expo(h, &mut mode);
        self.status(code).map(|_| AutoExposure::from_raw(mode))
    }

    pub fn set_auto_exposure(&self, mode: AutoExposure) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_auto_expo(h, mode.as_raw());
        self.status(code).map(|_| ())
    }

    /// Auto exposure target brightness, `LUMICAM_AETARGET_MIN..=MAX`.
    pub fn auto_exposure_target(&self) -> Result<u16, HResult> {
        let h = self.guard()?;
        let mut target = sys::LUMICAM_AETARGET_DEF;
        let code = self.api.get_auto_expo_target(h, &mut target);
        self.status(code).map(|_| target)
    }

    pub fn set_auto_exposure_target(&self, target: u16) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_auto_expo_target(h, target);
        self.status(code).map(|_| ())
    }

    // -------------------------------------------------------------------
    // White balance
    // -------------------------------------------------------------------

    /// White balance as `(temperature, tint)`,
    /// `LUMICAM_TEMP_MIN..=MAX` / `LUMICAM_TINT_MIN..=MAX`.
    pub fn temp_tint(&self) -> Result<(i32, i32), HResult> {
        let h = self.guard()?;
        let (mut temp, mut tint) = (0, 0);
        let code = self.api.get_temp_tint(h, &mut temp, &mut tint);
        self.status(code).map(|_| (temp, tint))
    }

    pub fn set_temp_tint(&self, temp: i32, tint: i32) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_temp_tint(h, temp, tint);
        self.status(code).map(|_| ())
    }

    // -------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------

    /// Current video output size.
    pub fn size(&self) -> Result<Resolution, HResult> {
        let h = self.guard()?;
        let (mut width, mut height) = (0, 0);
        let code = self.api.get_size(h, &mut width, &mut height);
        self.status(code).map(|_| Resolution {
            width: width as u32,
            height: height as u32,
        })
    }

    /// Set the video output size; only valid while stopped (the runtime
    /// reports `E_UNEXPECTED` otherwise).
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_size(h, width as i32, height as i32);
        self.status(code).map(|_| ())
    }

    /// Current resolution index.
    pub fn esize(&self) -> Result<u32, HResult> {
        let h = self.guard()?;
        let mut index = 0;
        let code = self.api.get_esize(h, &mut index);
        self.status(code).map(|_| index)
    }

    /// Select a resolution by index; only valid while stopped.
    pub fn set_esize(&mut self, index: u32) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_esize(h, index);
        self.status(code).map(|_| ())
    }

    /// Number of preview resolutions.
    pub fn resolution_count(&self) -> Result<u32, HResult> {
        let h = self.guard()?;
        // count on success, negative status on failure
        let code = self.api.resolution_number(h);
        if code < 0 {
            self.status(code).map(|_| 0)
        } else {
            self.last.store(sys::S_OK, Ordering::Relaxed);
            Ok(code as u32)
        }
    }

    /// Dimensions of the resolution at `index`.
    pub fn resolution(&self, index: u32) -> Result<Resolution, HResult> {
        let h = self.guard()?;
        let (mut width, mut height) = (0, 0);
        let code = self.api.resolution(h, index, &mut width, &mut height);
        self.status(code).map(|_| Resolution {
            width: width as u32,
            height: height as u32,
        })
    }

    // -------------------------------------------------------------------
    // Options and identity
    // -------------------------------------------------------------------

    /// Read an option value; the code space is `LUMICAM_OPTION_xxxx` and is
    /// passed through opaquely.
    pub fn option(&self, option: u32) -> Result<i32, HResult> {
        let h = self.guard()?;
        let mut value = 0;
        let code = self.api.get_option(h, option, &mut value);
        self.status(code).map(|_| value)
    }

    /// Write an option value.
    pub fn set_option(&self, option: u32, value: i32) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_option(h, option, value);
        self.status(code).map(|_| ())
    }

    /// Camera serial number, such as `LC110826145730ABCD1234FEDC5678`.
    pub fn serial_number(&self) -> Result<String, HResult> {
        let h = self.guard()?;
        let mut sn: [c_char; 32] = [0; 32];
        let code = self.api.serial_number(h, &mut sn);
        self.status(code).map(|_| fixed_cstr(&sn))
    }

    /// Firmware version, such as `3.2.1.20140922`.
    pub fn firmware_version(&self) -> Result<String, HResult> {
        let h = self.guard()?;
        let mut ver: [c_char; 16] = [0; 16];
        let code = self.api.fw_version(h, &mut ver);
        self.status(code).map(|_| fixed_cstr(&ver))
    }

    /// Hardware version.
    pub fn hardware_version(&self) -> Result<String, HResult> {
        let h = self.guard()?;
        let mut ver: [c_char; 16] = [0; 16];
        let code = self.api.hw_version(h, &mut ver);
        self.status(code).map(|_| fixed_cstr(&ver))
    }

    /// Realtime mode: 0 queue frames, 1 drop pending frames, 2 drop oldest.
    pub fn real_time(&self) -> Result<i32, HResult> {
        let h = self.guard()?;
        let mut mode = 0;
        let code = self.api.get_real_time(h, &mut mode);
        self.status(code).map(|_| mode)
    }

    pub fn set_real_time(&self, mode: i32) -> Result<(), HResult> {
        let h = self.guard()?;
        let code = self.api.put_real_time(h, mode);
        self.status(code).map(|_| ())
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.close();
    }
}
