// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! In-process stand-in for the vendor runtime.
//!
//! Implements [`VendorApi`] over fake devices so the crate can be exercised
//! without a camera or the vendor library installed.  Frames are synthesized
//! on demand; events can be injected with [`MockSdk::emit`], which invokes
//! the registered callback from a separate thread the same way the real
//! runtime does.  Open/close/native-call counters are exposed so tests can
//! verify that closed sessions never reach the native layer.

use libc::{c_char, c_void};
use lumicam_sys as sys;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use tracing::trace;

use crate::api::{EventCallback, RawHandle, VendorApi};
use crate::device::{DeviceInfo, Model, Resolution};

struct OpenState {
    device: usize,
    started: bool,
    paused: bool,
    callback: EventCallback,
    ctx: usize,
    seq: u32,
    expo_time: u32,
    expo_gain: u16,
    auto_expo: i32,
    auto_expo_target: u16,
    temp: i32,
    tint: i32,
    esize: u32,
    real_time: i32,
    options: HashMap<u32, i32>,
    last_frame: Option<sys::LumicamFrameInfoV3>,
}

impl OpenState {
    fn new(device: usize) -> Self {
        Self {
            device,
            started: false,
            paused: false,
            callback: None,
            ctx: 0,
            seq: 0,
            expo_time: 15_000,
            expo_gain: sys::LUMICAM_EXPOGAIN_DEF,
            auto_expo: 1,
            auto_expo_target: sys::LUMICAM_AETARGET_DEF,
            temp: sys::LUMICAM_TEMP_DEF,
            tint: sys::LUMICAM_TINT_DEF,
            esize: 0,
            real_time: 0,
            options: HashMap::new(),
            last_frame: None,
        }
    }
}

struct Inner {
    devices: Vec<DeviceInfo>,
    open: Mutex<HashMap<usize, OpenState>>,
    next_handle: AtomicUsize,
    opens: AtomicU32,
    closes: AtomicU32,
    native_calls: AtomicU32,
    pump: Option<Duration>,
}

impl Inner {
    fn open_map(&self) -> MutexGuard<'_, HashMap<usize, OpenState>> {
        match self.open.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Fake vendor runtime.
pub struct MockSdk {
    inner: Arc<Inner>,
}

fn default_device() -> DeviceInfo {
    DeviceInfo {
        display_name: "LumiCam LC-2010".to_string(),
        id: "lc2010-0001".to_string(),
        model: Model {
            name: "LC-2010".to_string(),
            flag: sys::LUMICAM_FLAG_CMOS
                | sys::LUMICAM_FLAG_USB30
                | sys::LUMICAM_FLAG_TRIGGER_SOFTWARE
                | sys::LUMICAM_FLAG_DDR,
            maxspeed: 2,
            preview: 3,
            still: 3,
            maxfanspeed: 0,
            ioctrol: 0,
            xpixsz: 2.4,
            ypixsz: 2.4,
            resolutions: vec![
                Resolution {
                    width: 2048,
                    height: 1536,
                },
                Resolution {
                    width: 1024,
                    height: 768,
                },
                Resolution {
                    width: 680,
                    height: 510,
                },
            ],
        },
    }
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSdk {
    /// One fake camera, no frame pump (tests drive events explicitly).
    pub fn new() -> Self {
        Self::with_devices(vec![default_device()])
    }

    pub fn with_devices(devices: Vec<DeviceInfo>) -> Self {
        Self {
            inner: Arc::new(Inner {
                devices,
                open: Mutex::new(HashMap::new()),
                next_handle: AtomicUsize::new(1),
                opens: AtomicU32::new(0),
                closes: AtomicU32::new(0),
                native_calls: AtomicU32::new(0),
                pump: None,
            }),
        }
    }

    /// As [`new`](MockSdk::new), but started sessions get `IMAGE` events at
    /// `interval` from a background thread, like a live sensor.
    pub fn with_pump(interval: Duration) -> Self {
        let mut mock = Self::new();
        // Arc not yet shared, the unwrap cannot race anything.
        if let Some(inner) = Arc::get_mut(&mut mock.inner) {
            inner.pump = Some(interval);
        }
        mock
    }

    /// Successful opens so far.
    pub fn open_count(&self) -> u32 {
        self.inner.opens.load(Ordering::SeqCst)
    }

    /// Native closes so far.
    pub fn close_count(&self) -> u32 {
        self.inner.closes.load(Ordering::SeqCst)
    }

    /// Every per-handle native call since construction; open/close are
    /// counted separately.
    pub fn native_calls(&self) -> u32 {
        self.inner.native_calls.load(Ordering::SeqCst)
    }

    /// Raw handles of the currently open fake cameras, oldest first; lets
    /// tests address [`emit`](MockSdk::emit) without reaching into the
    /// session.
    pub fn open_handles(&self) -> Vec<RawHandle> {
        let map = self.inner.open_map();
        let mut tokens: Vec<usize> = map.keys().copied().collect();
        tokens.sort_unstable();
        tokens.into_iter().map(|t| t as *mut c_void).collect()
    }

    /// The source record of the most recent synthesized frame, for
    /// comparison against what callers copied out.
    pub fn last_frame_info(&self, h: RawHandle) -> Option<sys::LumicamFrameInfoV3> {
        self.inner
            .open_map()
            .get(&(h as usize))
            .and_then(|state| state.last_frame)
    }

    /// Invoke the registered event callback with `event` from a separate
    /// thread, as the vendor runtime would.  Join the returned handle for a
    /// deterministic test sequence.
    pub fn emit(&self, h: RawHandle, event: u32) -> thread::JoinHandle<()> {
        let target = self
            .inner
            .open_map()
            .get(&(h as usize))
            .map(|state| (state.callback, state.ctx));
        thread::spawn(move || {
            if let Some((Some(callback), ctx)) = target {
                unsafe { callback(event, ctx as *mut c_void) };
            }
        })
    }

    fn hit(&self) {
        self.inner.native_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn with_state<R>(
        &self,
        h: RawHandle,
        f: impl FnOnce(&mut OpenState, &DeviceInfo) -> R,
    ) -> Result<R, i32> {
        self.hit();
        let mut map = self.inner.open_map();
        match map.get_mut(&(h as usize)) {
            Some(state) => {
                let device = &self.inner.devices[state.device];
                Ok(f(state, device))
            }
            None => Err(sys::E_UNEXPECTED),
        }
    }

    fn synthesize(state: &mut OpenState, device: &DeviceInfo, still: bool) -> sys::LumicamFrameInfoV3 {
        let res = device
            .model
            .resolutions
            .get(state.esize as usize)
            .copied()
            .unwrap_or(Resolution {
                width: 640,
                height: 480,
            });
        state.seq += 1;
        let mut flag = sys::LUMICAM_FRAMEINFO_FLAG_SEQ
            | sys::LUMICAM_FRAMEINFO_FLAG_TIMESTAMP
            | sys::LUMICAM_FRAMEINFO_FLAG_EXPOTIME
            | sys::LUMICAM_FRAMEINFO_FLAG_EXPOGAIN
            | sys::LUMICAM_FRAMEINFO_FLAG_BLACKLEVEL;
        if still {
            flag |= sys::LUMICAM_FRAMEINFO_FLAG_STILL;
        }
        let info = sys::LumicamFrameInfoV3 {
            width: res.width,
            height: res.height,
            flag,
            seq: state.seq,
            timestamp: state.seq as i64 * 33_333,
            shutterseq: state.seq,
            expotime: state.expo_time,
            expogain: state.expo_gain,
            blacklevel: 16,
        };
        state.last_frame = Some(info);
        info
    }

    fn fill(data: &mut [u8], info: &sys::LumicamFrameInfoV3, bits: i32, row_pitch: i32) -> i32 {
        let bits = if bits == 0 { 24 } else { bits } as usize;
        let row = match row_pitch {
            -1 => info.width as usize * bits / 8, // zero padding
            0 => sys::TDIBWIDTHBYTES(bits * info.width as usize),
            pitch => pitch as usize,
        };
        let needed = row * info.height as usize;
        if data.len() < needed {
            return sys::E_INVALIDARG;
        }
        data[..needed].fill(info.seq as u8);
        sys::S_OK
    }
}

impl VendorApi for MockSdk {
    fn enumerate(&self) -> Vec<DeviceInfo> {
        self.inner.devices.clone()
    }

    fn open(&self, id: Option<&str>) -> Option<RawHandle> {
        let device = match id {
            Some(id) => self.inner.devices.iter().position(|d| d.id == id)?,
            None => {
                if self.inner.devices.is_empty() {
                    return None;
                }
                0
            }
        };

        let token = self.inner.next_handle.fetch_add(1, Ordering::SeqCst);
        self.inner.open_map().insert(token, OpenState::new(device));
        self.inner.opens.fetch_add(1, Ordering::SeqCst);
        trace!(token, device, "mock camera opened");
        Some(token as *mut c_void)
    }

    fn close(&self, h: RawHandle) {
        if self.inner.open_map().remove(&(h as usize)).is_some() {
            self.inner.closes.fetch_add(1, Ordering::SeqCst);
            trace!(token = h as usize, "mock camera closed");
        }
    }

    fn start_pull_mode(&self, h: RawHandle, cb: EventCallback, ctx: usize) -> i32 {
        let code = match self.with_state(h, |state, _| {
            state.callback = cb;
            state.ctx = ctx;
            state.started = true;
            state.paused = false;
        }) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        };

        if code == sys::S_OK {
            if let Some(interval) = self.inner.pump {
                let inner = Arc::clone(&self.inner);
                let token = h as usize;
                thread::spawn(move || loop {
                    thread::sleep(interval);
                    let target = match inner.open_map().get(&token) {
                        Some(state) if state.started => {
                            if state.paused {
                                continue;
                            }
                            (state.callback, state.ctx)
                        }
                        _ => break,
                    };
                    // invoke outside the lock: the callback path pulls the
                    // frame, which locks the map again
                    if let (Some(callback), ctx) = target {
                        unsafe { callback(sys::LUMICAM_EVENT_IMAGE, ctx as *mut c_void) };
                    }
                });
            }
        }
        code
    }

    fn stop(&self, h: RawHandle) -> i32 {
        match self.with_state(h, |state, _| {
            state.started = false;
            state.callback = None;
        }) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
    }

    fn pause(&self, h: RawHandle, pause: bool) -> i32 {
        match self.with_state(h, |state, _| state.paused = pause) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
    }

    fn snap(&self, h: RawHandle, _resolution_index: u32) -> i32 {
        let target = match self.with_state(h, |state, _| {
            if !state.started {
                return Err(sys::E_UNEXPECTED);
            }
            Ok((state.callback, state.ctx))
        }) {
            Ok(Ok(target)) => target,
            Ok(Err(code)) | Err(code) => return code,
        };
        thread::spawn(move || {
            if let (Some(callback), ctx) = target {
                unsafe { callback(sys::LUMICAM_EVENT_STILLIMAGE, ctx as *mut c_void) };
            }
        });
        sys::S_OK
    }

    fn trigger(&self, h: RawHandle, count: u16) -> i32 {
        let target = match self.with_state(h, |state, _| (state.callback, state.ctx)) {
            Ok(target) => target,
            Err(code) => return code,
        };
        if count == 0 {
            return sys::S_OK; // cancel
        }
        let frames = if count == sys::LUMICAM_TRIGGER_CONTINUOUS {
            1
        } else {
            count as usize
        };
        thread::spawn(move || {
            if let (Some(callback), ctx) = target {
                for _ in 0..frames {
                    unsafe { callback(sys::LUMICAM_EVENT_IMAGE, ctx as *mut c_void) };
                }
            }
        });
        sys::S_OK
    }

    fn flush(&self, h: RawHandle) -> i32 {
        match self.with_state(h, |state, _| state.last_frame = None) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
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
        match self.with_state(h, |state, device| {
            if !state.started {
                return Err(sys::E_PENDING);
            }
            Ok(Self::synthesize(state, device, still))
        }) {
            Ok(Ok(frame)) => {
                let code = Self::fill(data, &frame, bits, row_pitch);
                if code == sys::S_OK {
                    *info = frame;
                }
                code
            }
            Ok(Err(code)) | Err(code) => code,
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
        let code = self.pull_image(h, data, still, bits, row_pitch, info);
        if code == sys::E_PENDING {
            if wait_ms > 0 {
                thread::sleep(Duration::from_millis(wait_ms.min(50) as u64));
            }
            return sys::E_TIMEOUT;
        }
        code
    }

    fn get_option(&self, h: RawHandle, option: u32, value: &mut i32) -> i32 {
        match self.with_state(h, |state, _| {
            state.options.get(&option).copied().unwrap_or(0)
        }) {
            Ok(v) => {
                *value = v;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_option(&self, h: RawHandle, option: u32, value: i32) -> i32 {
        match self.with_state(h, |state, _| {
            if state.options.insert(option, value) == Some(value) {
                sys::S_FALSE
            } else {
                sys::S_OK
            }
        }) {
            Ok(code) => code,
            Err(code) => code,
        }
    }

    fn get_expo_time(&self, h: RawHandle, us: &mut u32) -> i32 {
        match self.with_state(h, |state, _| state.expo_time) {
            Ok(v) => {
                *us = v;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_expo_time(&self, h: RawHandle, us: u32) -> i32 {
        if !(100..=2_000_000).contains(&us) {
            self.hit();
            return sys::E_INVALIDARG;
        }
        match self.with_state(h, |state, _| state.expo_time = us) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
    }

    fn expo_time_range(&self, h: RawHandle, min: &mut u32, max: &mut u32, def: &mut u32) -> i32 {
        match self.with_state(h, |_, _| ()) {
            Ok(()) => {
                *min = 100;
                *max = 2_000_000;
                *def = 15_000;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn get_expo_gain(&self, h: RawHandle, percent: &mut u16) -> i32 {
        match self.with_state(h, |state, _| state.expo_gain) {
            Ok(v) => {
                *percent = v;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_expo_gain(&self, h: RawHandle, percent: u16) -> i32 {
        if !(sys::LUMICAM_EXPOGAIN_MIN..=800).contains(&percent) {
            self.hit();
            return sys::E_INVALIDARG;
        }
        match self.with_state(h, |state, _| state.expo_gain = percent) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
    }

    fn expo_gain_range(&self, h: RawHandle, min: &mut u16, max: &mut u16, def: &mut u16) -> i32 {
        match self.with_state(h, |_, _| ()) {
            Ok(()) => {
                *min = sys::LUMICAM_EXPOGAIN_MIN;
                *max = 800;
                *def = sys::LUMICAM_EXPOGAIN_DEF;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn get_auto_expo(&self, h: RawHandle, mode: &mut i32) -> i32 {
        match self.with_state(h, |state, _| state.auto_expo) {
            Ok(v) => {
                *mode = v;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_auto_expo(&self, h: RawHandle, mode: i32) -> i32 {
        match self.with_state(h, |state, _| state.auto_expo = mode) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
    }

    fn get_auto_expo_target(&self, h: RawHandle, target: &mut u16) -> i32 {
        match self.with_state(h, |state, _| state.auto_expo_target) {
            Ok(v) => {
                *target = v;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_auto_expo_target(&self, h: RawHandle, target: u16) -> i32 {
        if !(sys::LUMICAM_AETARGET_MIN..=sys::LUMICAM_AETARGET_MAX).contains(&target) {
            self.hit();
            return sys::E_INVALIDARG;
        }
        match self.with_state(h, |state, _| state.auto_expo_target = target) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
    }

    fn get_temp_tint(&self, h: RawHandle, temp: &mut i32, tint: &mut i32) -> i32 {
        match self.with_state(h, |state, _| (state.temp, state.tint)) {
            Ok((t, n)) => {
                *temp = t;
                *tint = n;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_temp_tint(&self, h: RawHandle, temp: i32, tint: i32) -> i32 {
        if !(sys::LUMICAM_TEMP_MIN..=sys::LUMICAM_TEMP_MAX).contains(&temp)
            || !(sys::LUMICAM_TINT_MIN..=sys::LUMICAM_TINT_MAX).contains(&tint)
        {
            self.hit();
            return sys::E_INVALIDARG;
        }
        match self.with_state(h, |state, _| {
            state.temp = temp;
            state.tint = tint;
        }) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
    }

    fn get_size(&self, h: RawHandle, width: &mut i32, height: &mut i32) -> i32 {
        match self.with_state(h, |state, device| {
            device
                .model
                .resolutions
                .get(state.esize as usize)
                .copied()
                .unwrap_or(Resolution {
                    width: 640,
                    height: 480,
                })
        }) {
            Ok(res) => {
                *width = res.width as i32;
                *height = res.height as i32;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_size(&self, h: RawHandle, width: i32, height: i32) -> i32 {
        match self.with_state(h, |state, device| {
            if state.started {
                return sys::E_UNEXPECTED; // resolution is locked while streaming
            }
            match device
                .model
                .resolutions
                .iter()
                .position(|r| r.width as i32 == width && r.height as i32 == height)
            {
                Some(index) => {
                    state.esize = index as u32;
                    sys::S_OK
                }
                None => sys::E_INVALIDARG,
            }
        }) {
            Ok(code) => code,
            Err(code) => code,
        }
    }

    fn get_esize(&self, h: RawHandle, index: &mut u32) -> i32 {
        match self.with_state(h, |state, _| state.esize) {
            Ok(v) => {
                *index = v;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_esize(&self, h: RawHandle, index: u32) -> i32 {
        match self.with_state(h, |state, device| {
            if state.started {
                return sys::E_UNEXPECTED;
            }
            if (index as usize) < device.model.resolutions.len() {
                state.esize = index;
                sys::S_OK
            } else {
                sys::E_INVALIDARG
            }
        }) {
            Ok(code) => code,
            Err(code) => code,
        }
    }

    fn resolution_number(&self, h: RawHandle) -> i32 {
        match self.with_state(h, |_, device| device.model.resolutions.len() as i32) {
            Ok(count) => count,
            Err(code) => code,
        }
    }

    fn resolution(&self, h: RawHandle, index: u32, width: &mut i32, height: &mut i32) -> i32 {
        match self.with_state(h, |_, device| {
            device.model.resolutions.get(index as usize).copied()
        }) {
            Ok(Some(res)) => {
                *width = res.width as i32;
                *height = res.height as i32;
                sys::S_OK
            }
            Ok(None) => sys::E_INVALIDARG,
            Err(code) => code,
        }
    }

    fn serial_number(&self, h: RawHandle, sn: &mut [c_char; 32]) -> i32 {
        match self.with_state(h, |state, _| state.device) {
            Ok(device) => {
                let text = format!("LC110826145730MOCK{:04}FEDC5678", device);
                write_fixed(sn, text.as_bytes());
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn fw_version(&self, h: RawHandle, ver: &mut [c_char; 16]) -> i32 {
        match self.with_state(h, |_, _| ()) {
            Ok(()) => {
                write_fixed(ver, b"3.2.1.20140922");
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn hw_version(&self, h: RawHandle, ver: &mut [c_char; 16]) -> i32 {
        match self.with_state(h, |_, _| ()) {
            Ok(()) => {
                write_fixed(ver, b"1.0");
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn get_real_time(&self, h: RawHandle, mode: &mut i32) -> i32 {
        match self.with_state(h, |state, _| state.real_time) {
            Ok(v) => {
                *mode = v;
                sys::S_OK
            }
            Err(code) => code,
        }
    }

    fn put_real_time(&self, h: RawHandle, mode: i32) -> i32 {
        match self.with_state(h, |state, _| state.real_time = mode) {
            Ok(()) => sys::S_OK,
            Err(code) => code,
        }
    }
}

fn write_fixed(dst: &mut [c_char], src: &[u8]) {
    let n = src.len().min(dst.len() - 1);
    for (d, s) in dst.iter_mut().zip(src[..n].iter()) {
        *d = *s as c_char;
    }
    dst[n] = 0;
}
