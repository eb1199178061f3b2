// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Low-level FFI bindings for the LumiCam camera SDK.
//!
//! The vendor runtime (`liblumicam.so` / `lumicam.dll` / `liblumicam.dylib`)
//! is closed source and ships with the camera, so it cannot be a link-time
//! dependency.  Every entry point is resolved at runtime with `libloading`
//! when [`Lib::new`] is called.
//!
//! Record layouts, status codes and the option/event/flag tables mirror the
//! vendor headers exactly; the safe wrapper in the `lumicam` crate depends on
//! this bit-compatibility and only ever passes the integer codes through.

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

use libc::{c_char, c_int, c_uint, c_ushort, c_void};

/// Opaque device handle returned by `Lumicam_Open`.
pub type HLumicam = *mut c_void;

/// Signed 32-bit status code returned by every vendor call.
pub type HRESULT = c_int;

/// Maximum number of devices reported by `Lumicam_EnumV2`.
pub const LUMICAM_MAX: usize = 128;

// =============================================================================
// Status codes
// =============================================================================
// This is the complete set the vendor runtime returns; the code, not an
// exception, is the primary error channel.

pub const S_OK: HRESULT = 0x00000000; // Success
pub const S_FALSE: HRESULT = 0x00000001_u32 as HRESULT; // Yet another success; internal value and user-set value coincide, equivalent to noop
pub const E_UNEXPECTED: HRESULT = 0x8000ffff_u32 as HRESULT; // Catastrophic failure; generally the preconditions are not met
pub const E_NOTIMPL: HRESULT = 0x80004001_u32 as HRESULT; // Not supported or not implemented on this model
pub const E_ACCESSDENIED: HRESULT = 0x80070005_u32 as HRESULT; // Permission denied; on Linux check the udev rules
pub const E_OUTOFMEMORY: HRESULT = 0x8007000e_u32 as HRESULT; // Out of memory
pub const E_INVALIDARG: HRESULT = 0x80070057_u32 as HRESULT; // One or more arguments are not valid
pub const E_POINTER: HRESULT = 0x80004003_u32 as HRESULT; // Pointer is NULL
pub const E_FAIL: HRESULT = 0x80004005_u32 as HRESULT; // Generic failure
pub const E_WRONG_THREAD: HRESULT = 0x8001010e_u32 as HRESULT; // Call function in the wrong thread
pub const E_GEN_FAILURE: HRESULT = 0x8007001f_u32 as HRESULT; // Device not functioning; cable, port or hardware damage
pub const E_BUSY: HRESULT = 0x800700aa_u32 as HRESULT; // The requested resource is in use, such as a duplicated open
pub const E_PENDING: HRESULT = 0x8000000a_u32 as HRESULT; // No data is available at this time
pub const E_TIMEOUT: HRESULT = 0x8001011f_u32 as HRESULT; // The timeout period expired

// =============================================================================
// Capability flags (LumicamModelV2::flag, 64 bits)
// =============================================================================

pub const LUMICAM_FLAG_CMOS: u64 = 0x00000001; // cmos sensor
pub const LUMICAM_FLAG_CCD_PROGRESSIVE: u64 = 0x00000002; // progressive ccd sensor
pub const LUMICAM_FLAG_CCD_INTERLACED: u64 = 0x00000004; // interlaced ccd sensor
pub const LUMICAM_FLAG_ROI_HARDWARE: u64 = 0x00000008; // hardware ROI
pub const LUMICAM_FLAG_MONO: u64 = 0x00000010; // monochromatic
pub const LUMICAM_FLAG_BINSKIP_SUPPORTED: u64 = 0x00000020; // bin/skip mode
pub const LUMICAM_FLAG_USB30: u64 = 0x00000040; // usb3.0
pub const LUMICAM_FLAG_TEC: u64 = 0x00000080; // thermoelectric cooler
pub const LUMICAM_FLAG_USB30_OVER_USB20: u64 = 0x00000100; // usb3.0 camera on a usb2.0 port
pub const LUMICAM_FLAG_GETTEMPERATURE: u64 = 0x00000400; // sensor temperature readout
pub const LUMICAM_FLAG_RAW10: u64 = 0x00001000; // pixel format, RAW 10 bits
pub const LUMICAM_FLAG_RAW12: u64 = 0x00002000; // pixel format, RAW 12 bits
pub const LUMICAM_FLAG_RAW14: u64 = 0x00004000; // pixel format, RAW 14 bits
pub const LUMICAM_FLAG_RAW16: u64 = 0x00008000; // pixel format, RAW 16 bits
pub const LUMICAM_FLAG_FAN: u64 = 0x00010000; // cooling fan
pub const LUMICAM_FLAG_TEC_ONOFF: u64 = 0x00020000; // TEC on/off with target temperature
pub const LUMICAM_FLAG_ISP: u64 = 0x00040000; // ISP (Image Signal Processing) chip
pub const LUMICAM_FLAG_TRIGGER_SOFTWARE: u64 = 0x00080000; // software trigger
pub const LUMICAM_FLAG_TRIGGER_EXTERNAL: u64 = 0x00100000; // external trigger
pub const LUMICAM_FLAG_TRIGGER_SINGLE: u64 = 0x00200000; // one trigger, one image
pub const LUMICAM_FLAG_BLACKLEVEL: u64 = 0x00400000; // black level get/set
pub const LUMICAM_FLAG_AUTO_FOCUS: u64 = 0x00800000; // auto focus
pub const LUMICAM_FLAG_BUFFER: u64 = 0x01000000; // frame buffer
pub const LUMICAM_FLAG_DDR: u64 = 0x02000000; // large capacity DDR frame buffer, not less than one full frame
pub const LUMICAM_FLAG_CG: u64 = 0x04000000; // Conversion Gain mode: HCG, LCG
pub const LUMICAM_FLAG_RAW8: u64 = 0x80000000; // pixel format, RAW 8 bits
pub const LUMICAM_FLAG_GLOBALSHUTTER: u64 = 0x0000001000000000; // global shutter
pub const LUMICAM_FLAG_FOCUSMOTOR: u64 = 0x0000002000000000; // focus motor
pub const LUMICAM_FLAG_PRECISE_FRAMERATE: u64 = 0x0000004000000000; // precise framerate & bandwidth
pub const LUMICAM_FLAG_LOW_NOISE: u64 = 0x0000010000000000; // low noise mode
pub const LUMICAM_FLAG_EVENT_HARDWARE: u64 = 0x0000040000000000; // hardware events, such as exposure start & stop
pub const LUMICAM_FLAG_GIGE: u64 = 0x0000200000000000; // 1 Gigabit GigE
pub const LUMICAM_FLAG_10GIGE: u64 = 0x0000400000000000; // 10 Gigabit GigE

// =============================================================================
// Event codes delivered to the registered callback
// =============================================================================

pub const LUMICAM_EVENT_EXPOSURE: c_uint = 0x0001; // exposure time or gain changed
pub const LUMICAM_EVENT_TEMPTINT: c_uint = 0x0002; // white balance changed, Temp/Tint mode
pub const LUMICAM_EVENT_IMAGE: c_uint = 0x0004; // live image arrived, use Lumicam_PullImageV3 to fetch
pub const LUMICAM_EVENT_STILLIMAGE: c_uint = 0x0005; // snap frame arrived, pull with the still flag
pub const LUMICAM_EVENT_WBGAIN: c_uint = 0x0006; // white balance changed, RGB gain mode
pub const LUMICAM_EVENT_TRIGGERFAIL: c_uint = 0x0007; // trigger failed
pub const LUMICAM_EVENT_BLACK: c_uint = 0x0008; // black balance changed
pub const LUMICAM_EVENT_FFC: c_uint = 0x0009; // flat field correction status changed
pub const LUMICAM_EVENT_DFC: c_uint = 0x000a; // dark field correction status changed
pub const LUMICAM_EVENT_ROI: c_uint = 0x000b; // roi changed
pub const LUMICAM_EVENT_LEVELRANGE: c_uint = 0x000c; // level range changed
pub const LUMICAM_EVENT_AUTOEXPO_CONV: c_uint = 0x000d; // auto exposure convergence
pub const LUMICAM_EVENT_AUTOEXPO_CONVFAIL: c_uint = 0x000e; // auto exposure once mode convergence failed
pub const LUMICAM_EVENT_ERROR: c_uint = 0x0080; // generic hardware error
pub const LUMICAM_EVENT_DISCONNECTED: c_uint = 0x0081; // camera disconnected
pub const LUMICAM_EVENT_NOFRAMETIMEOUT: c_uint = 0x0082; // no frame timeout error
pub const LUMICAM_EVENT_FOCUSPOS: c_uint = 0x0084; // focus position
pub const LUMICAM_EVENT_NOPACKETTIMEOUT: c_uint = 0x0085; // no packet timeout
pub const LUMICAM_EVENT_EXPO_START: c_uint = 0x4000; // hardware event: exposure start
pub const LUMICAM_EVENT_EXPO_STOP: c_uint = 0x4001; // hardware event: exposure stop
pub const LUMICAM_EVENT_TRIGGER_ALLOW: c_uint = 0x4002; // hardware event: next trigger allow
pub const LUMICAM_EVENT_HEARTBEAT: c_uint = 0x4003; // hardware event: heartbeat
pub const LUMICAM_EVENT_FACTORY: c_uint = 0x8001; // restore factory settings

// =============================================================================
// Option codes for Lumicam_put_Option / Lumicam_get_Option
// =============================================================================
// The option space is opaque to the wrapper; the integer code and value are
// passed straight through.  Only the codes the vendor documents are listed.

pub const LUMICAM_OPTION_NOFRAME_TIMEOUT: c_uint = 0x01; // 0 => disable, >= NOFRAME_TIMEOUT_MIN => timeout ms
pub const LUMICAM_OPTION_THREAD_PRIORITY: c_uint = 0x02; // priority of the internal grab thread
pub const LUMICAM_OPTION_RAW: c_uint = 0x04; // raw sensor data mode, set only while stopped; 0 = rgb, 1 = raw
pub const LUMICAM_OPTION_HISTOGRAM: c_uint = 0x05; // 0 = only one, 1 = continue mode
pub const LUMICAM_OPTION_BITDEPTH: c_uint = 0x06; // 0 = 8 bits mode, 1 = 16 bits mode
pub const LUMICAM_OPTION_FAN: c_uint = 0x07; // 0 = off, [1, max] = fan speed, -1 = default speed
pub const LUMICAM_OPTION_TEC: c_uint = 0x08; // 0 = cooler off, 1 = cooler on
pub const LUMICAM_OPTION_LINEAR: c_uint = 0x09; // builtin linear tone mapping, default 1
pub const LUMICAM_OPTION_CURVE: c_uint = 0x0a; // builtin curve tone mapping: 0 off, 1 polynomial, 2 logarithmic
pub const LUMICAM_OPTION_TRIGGER: c_uint = 0x0b; // 0 = video, 1 = software trigger, 2 = external, 3 = external + software
pub const LUMICAM_OPTION_RGB: c_uint = 0x0c; // 0 RGB24, 1 RGB48, 2 RGB32, 3 Grey8, 4 Grey16, 5 RGB64
pub const LUMICAM_OPTION_COLORMATIX: c_uint = 0x0d; // builtin color matrix, default 1
pub const LUMICAM_OPTION_WBGAIN: c_uint = 0x0e; // builtin white balance gain, default 1
pub const LUMICAM_OPTION_TECTARGET: c_uint = 0x0f; // TEC target in 0.1 degree Celsius
pub const LUMICAM_OPTION_AUTOEXP_POLICY: c_uint = 0x10; // auto exposure policy
pub const LUMICAM_OPTION_FRAMERATE: c_uint = 0x11; // frame rate limit, 0 = no limit
pub const LUMICAM_OPTION_DEMOSAIC: c_uint = 0x12; // demosaic method: BILINEAR 0, VNG 1, PPG 2, AHD 3, EA 4
pub const LUMICAM_OPTION_BLACKLEVEL: c_uint = 0x15; // black level
pub const LUMICAM_OPTION_MULTITHREAD: c_uint = 0x16; // multithread image processing
pub const LUMICAM_OPTION_BINNING: c_uint = 0x17; // binning
pub const LUMICAM_OPTION_ROTATE: c_uint = 0x18; // rotate clockwise: 0, 90, 180, 270
pub const LUMICAM_OPTION_CG: c_uint = 0x19; // conversion gain: 0 LCG, 1 HCG, 2 HDR
pub const LUMICAM_OPTION_PIXEL_FORMAT: c_uint = 0x1a; // pixel format, LUMICAM_PIXELFORMAT_xxxx
pub const LUMICAM_OPTION_FFC: c_uint = 0x1b; // flat field correction
pub const LUMICAM_OPTION_DDR_DEPTH: c_uint = 0x1c; // number of frames the DDR can cache
pub const LUMICAM_OPTION_DFC: c_uint = 0x1d; // dark field correction
pub const LUMICAM_OPTION_SHARPENING: c_uint = 0x1e; // (threshold << 24) | (radius << 16) | strength
pub const LUMICAM_OPTION_FACTORY: c_uint = 0x1f; // restore factory settings
pub const LUMICAM_OPTION_DEVICE_RESET: c_uint = 0x22; // reset usb device, simulate a replug
pub const LUMICAM_OPTION_UPSIDE_DOWN: c_uint = 0x23; // upside down
pub const LUMICAM_OPTION_TESTPATTERN: c_uint = 0x28; // test pattern
pub const LUMICAM_OPTION_AUTOEXP_THRESHOLD: c_uint = 0x29; // auto exposure threshold, default 5, range [2, 15]
pub const LUMICAM_OPTION_BYTEORDER: c_uint = 0x2a; // 0 => RGB, 1 => BGR; default 1 on Windows, 0 elsewhere
pub const LUMICAM_OPTION_NOPACKET_TIMEOUT: c_uint = 0x2b; // 0 => disable, >= NOPACKET_TIMEOUT_MIN => timeout ms
pub const LUMICAM_OPTION_MAX_PRECISE_FRAMERATE: c_uint = 0x2c; // precise frame rate maximum, 0.1 fps units
pub const LUMICAM_OPTION_PRECISE_FRAMERATE: c_uint = 0x2d; // precise frame rate current value, 0.1 fps units
pub const LUMICAM_OPTION_BANDWIDTH: c_uint = 0x2e; // bandwidth, [1-100]%
pub const LUMICAM_OPTION_RELOAD: c_uint = 0x2f; // reload the last frame in trigger mode
pub const LUMICAM_OPTION_CALLBACK_THREAD: c_uint = 0x30; // dedicated thread for callback: 0 disable, 1 enable
pub const LUMICAM_OPTION_FRONTEND_DEQUE_LENGTH: c_uint = 0x31; // frontend frame buffer deque length, [2, 1024], default 4
pub const LUMICAM_OPTION_MIN_PRECISE_FRAMERATE: c_uint = 0x32; // precise frame rate minimum, 0.1 fps units
pub const LUMICAM_OPTION_SEQUENCER_ONOFF: c_uint = 0x33; // sequencer trigger on/off
pub const LUMICAM_OPTION_SEQUENCER_NUMBER: c_uint = 0x34; // sequencer trigger number, [1, 255]
pub const LUMICAM_OPTION_SEQUENCER_EXPOTIME: c_uint = 0x01000000; // or with the group index, value = exposure time
pub const LUMICAM_OPTION_SEQUENCER_EXPOGAIN: c_uint = 0x02000000; // or with the group index, value = gain
pub const LUMICAM_OPTION_DENOISE: c_uint = 0x35; // denoise strength [0, 100], 0 disables
pub const LUMICAM_OPTION_LOW_NOISE: c_uint = 0x38; // low noise mode, 1 => enable
pub const LUMICAM_OPTION_OPEN_ERRORCODE: c_uint = 0x3b; // last open error code
pub const LUMICAM_OPTION_FLUSH: c_uint = 0x3d; // 1 hard flush (camera DDR), 2 soft flush (runtime), 3 both
pub const LUMICAM_OPTION_NUMBER_DROP_FRAME: c_uint = 0x3e; // frames grabbed from the wire but dropped by the runtime
pub const LUMICAM_OPTION_DEFECT_PIXEL: c_uint = 0x40; // defect pixel correction, default 1
pub const LUMICAM_OPTION_BACKEND_DEQUE_LENGTH: c_uint = 0x41; // backend frame buffer deque length (pull mode), [2, 1024], default 3
pub const LUMICAM_OPTION_HEARTBEAT: c_uint = 0x44; // heartbeat interval ms, [HEARTBEAT_MIN, HEARTBEAT_MAX], 0 disables
pub const LUMICAM_OPTION_FRONTEND_DEQUE_CURRENT: c_uint = 0x45; // current number in frontend deque
pub const LUMICAM_OPTION_BACKEND_DEQUE_CURRENT: c_uint = 0x46; // current number in backend deque
pub const LUMICAM_OPTION_EVENT_HARDWARE: c_uint = 0x04000000; // master switch, or with an event type for the sub-switch
pub const LUMICAM_OPTION_AUTOEXPOSURE_PERCENT: c_uint = 0x4a; // 1~99 peak percent average, 0 or 100 full roi average
pub const LUMICAM_OPTION_EXPOSURE_PRE_DELAY: c_uint = 0x4e; // exposure signal pre-delay, microsecond
pub const LUMICAM_OPTION_EXPOSURE_POST_DELAY: c_uint = 0x4f; // exposure signal post-delay, microsecond
pub const LUMICAM_OPTION_AUTOEXPO_CONV: c_uint = 0x50; // auto exposure convergence status: 1 yes, 0 no, -1 n/a
pub const LUMICAM_OPTION_AUTOEXPO_TRIGGER: c_uint = 0x51; // auto exposure on trigger mode, default 0
pub const LUMICAM_OPTION_DYNAMIC_DEFECT: c_uint = 0x56; // dynamic defect pixel correction
pub const LUMICAM_OPTION_GIGETIMEOUT: c_uint = 0x5a; // GigE heartbeat timeout: 0 auto, 1 enable, 2 disable
pub const LUMICAM_OPTION_ISP: c_uint = 0x5f; // hardware ISP: 0 auto, 1 enable, -1 disable
pub const LUMICAM_OPTION_AUTOEXP_EXPOTIME_DAMP: c_uint = 0x60; // auto exposure time damping, thousandths
pub const LUMICAM_OPTION_AUTOEXP_GAIN_DAMP: c_uint = 0x61; // auto exposure gain damping, thousandths
pub const LUMICAM_OPTION_OVEREXP_POLICY: c_uint = 0x68; // over exposure policy
pub const LUMICAM_OPTION_READOUT_MODE: c_uint = 0x69; // 0 = IWR (Integrate While Read), 1 = ITR (Integrate Then Read)
pub const LUMICAM_OPTION_AWB_CONTINUOUS: c_uint = 0x6c; // auto white balance continuous mode
pub const LUMICAM_OPTION_CDS: c_uint = 0x6e; // correlated double sampling
pub const LUMICAM_OPTION_GVCP_TIMEOUT: c_uint = 0x71; // GVCP timeout ms, [3, 75], default 15
pub const LUMICAM_OPTION_GVCP_RETRY: c_uint = 0x72; // GVCP retry, [2, 8], default 4
pub const LUMICAM_OPTION_RESET_SEQ_TIMESTAMP: c_uint = 0x74; // reset to 0: 1 => seq, 2 => timestamp, 3 => both

// =============================================================================
// Pixel formats (LUMICAM_OPTION_PIXEL_FORMAT values)
// =============================================================================

pub const LUMICAM_PIXELFORMAT_RAW8: c_int = 0x00;
pub const LUMICAM_PIXELFORMAT_RAW10: c_int = 0x01;
pub const LUMICAM_PIXELFORMAT_RAW12: c_int = 0x02;
pub const LUMICAM_PIXELFORMAT_RAW14: c_int = 0x03;
pub const LUMICAM_PIXELFORMAT_RAW16: c_int = 0x04;
pub const LUMICAM_PIXELFORMAT_YUV411: c_int = 0x05;
pub const LUMICAM_PIXELFORMAT_VUYY: c_int = 0x06;
pub const LUMICAM_PIXELFORMAT_YUV444: c_int = 0x07;
pub const LUMICAM_PIXELFORMAT_RGB888: c_int = 0x08;
pub const LUMICAM_PIXELFORMAT_UYVY: c_int = 0x0b;
pub const LUMICAM_PIXELFORMAT_RAW12PACK: c_int = 0x0c;

// =============================================================================
// Frame info flags (LumicamFrameInfoV3::flag)
// =============================================================================

pub const LUMICAM_FRAMEINFO_FLAG_SEQ: c_uint = 0x00000001; // frame sequence number
pub const LUMICAM_FRAMEINFO_FLAG_TIMESTAMP: c_uint = 0x00000002; // timestamp
pub const LUMICAM_FRAMEINFO_FLAG_EXPOTIME: c_uint = 0x00000004; // exposure time
pub const LUMICAM_FRAMEINFO_FLAG_EXPOGAIN: c_uint = 0x00000008; // exposure gain
pub const LUMICAM_FRAMEINFO_FLAG_BLACKLEVEL: c_uint = 0x00000010; // black level
pub const LUMICAM_FRAMEINFO_FLAG_SHUTTERSEQ: c_uint = 0x00000020; // sequence shutter counter
pub const LUMICAM_FRAMEINFO_FLAG_GPS: c_uint = 0x00000040; // GPS block valid
pub const LUMICAM_FRAMEINFO_FLAG_AUTOFOCUS: c_uint = 0x00000080; // auto focus: lum & fv
pub const LUMICAM_FRAMEINFO_FLAG_COUNT: c_uint = 0x00000100; // timecount, framecount, tricount
pub const LUMICAM_FRAMEINFO_FLAG_STILL: c_uint = 0x00008000; // still image

// =============================================================================
// Parameter ranges and defaults
// =============================================================================

pub const LUMICAM_EXPOGAIN_DEF: u16 = 100; // exposure gain, percent
pub const LUMICAM_EXPOGAIN_MIN: u16 = 100;
pub const LUMICAM_TEMP_DEF: i32 = 6503; // color temperature
pub const LUMICAM_TEMP_MIN: i32 = 2000;
pub const LUMICAM_TEMP_MAX: i32 = 15000;
pub const LUMICAM_TINT_DEF: i32 = 1000; // tint
pub const LUMICAM_TINT_MIN: i32 = 200;
pub const LUMICAM_TINT_MAX: i32 = 2500;
pub const LUMICAM_AETARGET_DEF: u16 = 120; // auto exposure target
pub const LUMICAM_AETARGET_MIN: u16 = 16;
pub const LUMICAM_AETARGET_MAX: u16 = 220;
pub const LUMICAM_BLACKLEVEL_MIN: i32 = 0;
pub const LUMICAM_BLACKLEVEL8_MAX: i32 = 31; // bitdepth = 8
pub const LUMICAM_BLACKLEVEL16_MAX: i32 = 31 * 256; // bitdepth = 16
pub const LUMICAM_AUTOEXPO_THRESHOLD_DEF: i32 = 5;
pub const LUMICAM_AUTOEXPO_THRESHOLD_MIN: i32 = 2;
pub const LUMICAM_AUTOEXPO_THRESHOLD_MAX: i32 = 15;
pub const LUMICAM_BANDWIDTH_DEF: i32 = 100; // percent
pub const LUMICAM_BANDWIDTH_MIN: i32 = 1;
pub const LUMICAM_BANDWIDTH_MAX: i32 = 100;
pub const LUMICAM_HEARTBEAT_MIN: i32 = 100; // millisecond
pub const LUMICAM_HEARTBEAT_MAX: i32 = 10000;
pub const LUMICAM_NOFRAME_TIMEOUT_MIN: i32 = 500; // millisecond
pub const LUMICAM_NOPACKET_TIMEOUT_MIN: i32 = 500;

/// Snap/trigger resolution index meaning "use the current preview resolution".
pub const LUMICAM_CURRENT_RESOLUTION: c_uint = 0xffffffff;

/// Soft trigger count meaning "trigger continuously".
pub const LUMICAM_TRIGGER_CONTINUOUS: c_ushort = 0xffff;

/// DIB rows are padded to 32-bit boundaries when the row pitch is 0.
pub const fn TDIBWIDTHBYTES(bits: usize) -> usize {
    (bits + 31) / 32 * 4
}

// =============================================================================
// Structures
// =============================================================================
// Field order, widths and alignment must match the vendor headers; these
// records cross the ABI by pointer.

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LumicamResolution {
    pub width: c_uint,
    pub height: c_uint,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LumicamModelV2 {
    pub name: *const c_char,
    pub flag: u64, // LUMICAM_FLAG_xxxx, 64 bits
    pub maxspeed: c_uint, // number of speed levels, range = [0, maxspeed]
    pub preview: c_uint, // number of preview resolutions
    pub still: c_uint, // number of still resolutions
    pub maxfanspeed: c_uint, // fan speed range = [0, max]
    pub ioctrol: c_uint, // number of input/output controls
    pub xpixsz: f32, // physical pixel size in micrometer
    pub ypixsz: f32,
    pub res: [LumicamResolution; 16],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LumicamDeviceV2 {
    pub displayname: [c_char; 64],
    pub id: [c_char; 64], // unique and opaque id of a connected camera, for Lumicam_Open
    pub model: *const LumicamModelV2,
}

impl Default for LumicamDeviceV2 {
    fn default() -> Self {
        Self {
            displayname: [0; 64],
            id: [0; 64],
            model: core::ptr::null(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LumicamFrameInfoV3 {
    pub width: c_uint,
    pub height: c_uint,
    pub flag: c_uint, // LUMICAM_FRAMEINFO_FLAG_xxxx
    pub seq: c_uint, // frame sequence number
    pub timestamp: i64, // microsecond
    pub shutterseq: c_uint, // sequence shutter counter
    pub expotime: c_uint, // exposure time, microsecond
    pub expogain: c_ushort, // exposure gain, percent
    pub blacklevel: c_ushort,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LumicamGps {
    pub utcstart: i64, // exposure start time: nanosecond since epoch
    pub utcend: i64, // exposure end time
    pub longitude: c_int, // millionth of a degree
    pub latitude: c_int,
    pub altitude: c_int, // millimeter
    pub satellite: c_ushort, // number of satellites
    pub reserved: c_ushort,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LumicamFrameInfoV4 {
    pub v3: LumicamFrameInfoV3,
    pub reserved: c_uint,
    pub lum: c_uint, // auto focus luminance
    pub fv: u64, // auto focus focus value
    pub timecount: u64,
    pub framecount: c_uint,
    pub tricount: c_uint,
    pub gps: LumicamGps,
}

// =============================================================================
// Callback types
// =============================================================================
// The context value is the only state the runtime carries back to the
// caller; it is pointer-sized and opaque to the vendor.

pub type PLUMICAM_EVENT_CALLBACK =
    Option<unsafe extern "C" fn(nEvent: c_uint, ctxEvent: *mut c_void)>;

pub type PLUMICAM_HOTPLUG_CALLBACK = Option<unsafe extern "C" fn(ctxHotPlug: *mut c_void)>;

// =============================================================================
// Vendor runtime loader
// =============================================================================

/// Default vendor library name for the current platform.
#[cfg(target_os = "windows")]
pub const LIBRARY: &str = "lumicam.dll";
#[cfg(target_os = "macos")]
pub const LIBRARY: &str = "liblumicam.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const LIBRARY: &str = "liblumicam.so";

macro_rules! lumicam_api {
    ($(
        $(#[$meta:meta])*
        fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty;
    )*) => {
        /// Dynamically loaded vendor entry points.
        ///
        /// All functions fail to resolve together: [`Lib::new`] returns an
        /// error if any documented symbol is missing from the library, which
        /// indicates a runtime older than this binding.
        pub struct Lib {
            _library: libloading::Library,
            $($name: unsafe extern "C" fn($($ty),*) -> $ret,)*
        }

        impl Lib {
            /// Load the vendor runtime from `path` and resolve every entry
            /// point.
            ///
            /// # Safety
            ///
            /// Loading a shared library runs its initializers; the caller
            /// must ensure `path` names a genuine LumiCam runtime.
            pub unsafe fn new<P: AsRef<std::ffi::OsStr>>(
                path: P,
            ) -> Result<Self, libloading::Error> {
                let library = libloading::Library::new(path)?;
                $(let $name = *library
                    .get::<unsafe extern "C" fn($($ty),*) -> $ret>(
                        concat!(stringify!($name), "\0").as_bytes(),
                    )?;)*
                Ok(Self { _library: library, $($name,)* })
            }

            $(
                $(#[$meta])*
                #[allow(clippy::missing_safety_doc)]
                pub unsafe fn $name(&self, $($arg: $ty),*) -> $ret {
                    (self.$name)($($arg),*)
                }
            )*
        }
    };
}

lumicam_api! {
    /// Runtime version string, such as `57.26813.20241028`.
    fn Lumicam_Version() -> *const c_char;
    /// Enumerate connected cameras into `arr` (capacity [`LUMICAM_MAX`]);
    /// returns the number filled in.
    fn Lumicam_EnumV2(arr: *mut LumicamDeviceV2) -> c_uint;
    /// Open by the opaque id from enumeration; NULL id opens the first
    /// camera.  Returns NULL on failure.
    fn Lumicam_Open(camId: *const c_char) -> HLumicam;
    fn Lumicam_Close(h: HLumicam) -> ();
    /// Start pull mode; `ctxEvent` is handed back verbatim to `funEvent` on
    /// an internal runtime thread.
    fn Lumicam_StartPullModeWithCallback(
        h: HLumicam,
        funEvent: PLUMICAM_EVENT_CALLBACK,
        ctxEvent: *mut c_void,
    ) -> HRESULT;
    fn Lumicam_Stop(h: HLumicam) -> HRESULT;
    /// 1 => pause, 0 => continue.
    fn Lumicam_Pause(h: HLumicam, bPause: c_int) -> HRESULT;
    /// Still image snap; [`LUMICAM_CURRENT_RESOLUTION`] means the current
    /// preview resolution.
    fn Lumicam_Snap(h: HLumicam, nResolutionIndex: c_uint) -> HRESULT;
    /// Soft trigger: 0 cancels, [`LUMICAM_TRIGGER_CONTINUOUS`] triggers
    /// continuously, anything else is the number of images.
    fn Lumicam_Trigger(h: HLumicam, nNumber: c_ushort) -> HRESULT;
    /// Fetch the next pending frame without waiting; E_PENDING when none.
    fn Lumicam_PullImageV3(
        h: HLumicam,
        pImageData: *mut c_void,
        bStill: c_int,
        bits: c_int,
        rowPitch: c_int,
        pInfo: *mut LumicamFrameInfoV3,
    ) -> HRESULT;
    /// As `Lumicam_PullImageV3` but suspends the calling thread until a
    /// frame arrives, `nWaitMS` elapses (E_TIMEOUT) or the handle dies.
    fn Lumicam_WaitImageV3(
        h: HLumicam,
        nWaitMS: c_uint,
        pImageData: *mut c_void,
        bStill: c_int,
        bits: c_int,
        rowPitch: c_int,
        pInfo: *mut LumicamFrameInfoV3,
    ) -> HRESULT;
    fn Lumicam_PullImageV4(
        h: HLumicam,
        pImageData: *mut c_void,
        bStill: c_int,
        bits: c_int,
        rowPitch: c_int,
        pInfo: *mut LumicamFrameInfoV4,
    ) -> HRESULT;
    /// Discard frames cached by the camera DDR and the runtime.
    fn Lumicam_Flush(h: HLumicam) -> HRESULT;
    fn Lumicam_put_Option(h: HLumicam, iOption: c_uint, iValue: c_int) -> HRESULT;
    fn Lumicam_get_Option(h: HLumicam, iOption: c_uint, piValue: *mut c_int) -> HRESULT;
    /// Exposure time in microseconds.
    fn Lumicam_put_ExpoTime(h: HLumicam, Time: c_uint) -> HRESULT;
    fn Lumicam_get_ExpoTime(h: HLumicam, Time: *mut c_uint) -> HRESULT;
    fn Lumicam_get_ExpTimeRange(
        h: HLumicam,
        nMin: *mut c_uint,
        nMax: *mut c_uint,
        nDef: *mut c_uint,
    ) -> HRESULT;
    /// Analog gain in percent, such as 300.
    fn Lumicam_put_ExpoAGain(h: HLumicam, Gain: c_ushort) -> HRESULT;
    fn Lumicam_get_ExpoAGain(h: HLumicam, Gain: *mut c_ushort) -> HRESULT;
    fn Lumicam_get_ExpoAGainRange(
        h: HLumicam,
        nMin: *mut c_ushort,
        nMax: *mut c_ushort,
        nDef: *mut c_ushort,
    ) -> HRESULT;
    /// 0: disable, 1: continuous mode, 2: once mode.
    fn Lumicam_put_AutoExpoEnable(h: HLumicam, bAutoExposure: c_int) -> HRESULT;
    fn Lumicam_get_AutoExpoEnable(h: HLumicam, bAutoExposure: *mut c_int) -> HRESULT;
    fn Lumicam_put_AutoExpoTarget(h: HLumicam, Target: c_ushort) -> HRESULT;
    fn Lumicam_get_AutoExpoTarget(h: HLumicam, Target: *mut c_ushort) -> HRESULT;
    /// White balance, Temp/Tint mode.
    fn Lumicam_put_TempTint(h: HLumicam, nTemp: c_int, nTint: c_int) -> HRESULT;
    fn Lumicam_get_TempTint(h: HLumicam, nTemp: *mut c_int, nTint: *mut c_int) -> HRESULT;
    /// Set the video output resolution, only before start.
    fn Lumicam_put_Size(h: HLumicam, nWidth: c_int, nHeight: c_int) -> HRESULT;
    fn Lumicam_get_Size(h: HLumicam, nWidth: *mut c_int, nHeight: *mut c_int) -> HRESULT;
    /// As put_Size but by resolution index.
    fn Lumicam_put_eSize(h: HLumicam, nResolutionIndex: c_uint) -> HRESULT;
    fn Lumicam_get_eSize(h: HLumicam, nResolutionIndex: *mut c_uint) -> HRESULT;
    /// Number of preview resolutions, or a negative HRESULT.
    fn Lumicam_get_ResolutionNumber(h: HLumicam) -> HRESULT;
    fn Lumicam_get_Resolution(
        h: HLumicam,
        nResolutionIndex: c_uint,
        pWidth: *mut c_int,
        pHeight: *mut c_int,
    ) -> HRESULT;
    /// Serial number, always 32 zero-terminated chars.
    fn Lumicam_get_SerialNumber(h: HLumicam, sn: *mut c_char) -> HRESULT;
    /// Firmware version such as `3.2.1.20140922`, 16 chars.
    fn Lumicam_get_FwVersion(h: HLumicam, fwver: *mut c_char) -> HRESULT;
    /// Hardware version, 16 chars.
    fn Lumicam_get_HwVersion(h: HLumicam, hwver: *mut c_char) -> HRESULT;
    /// 0: no realtime, 1: realtime (drop pending frames), 2: soft realtime.
    fn Lumicam_put_RealTime(h: HLumicam, val: c_int) -> HRESULT;
    fn Lumicam_get_RealTime(h: HLumicam, val: *mut c_int) -> HRESULT;
}
