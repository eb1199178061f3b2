// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Event dispatch bridge.
//!
//! The vendor runtime reports events by invoking the registered callback on
//! one of its internal threads, carrying only the pointer-sized context that
//! was handed to it at start.  The bridge decodes that context back into a
//! registry id, resolves the owning session and enqueues a typed [`Event`]
//! on the session's channel.  No handler logic runs on the native thread and
//! no native memory outlives the callback.
//!
//! A lookup miss is the expected steady-state race with a closing session
//! and is dropped silently.

use libc::{c_uint, c_void};
use lumicam_sys as sys;
use tracing::{debug, trace};

use crate::registry;

/// Typed camera event, decoded from the vendor event code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Exposure time or gain changed.
    Exposure,
    /// White balance changed, Temp/Tint mode.
    TempTint,
    /// Live image ready; fetch with [`crate::Camera::pull_image`].
    Image,
    /// Snap frame ready; fetch with [`crate::Camera::pull_still_image`].
    StillImage,
    /// White balance changed, RGB gain mode.
    WbGain,
    /// Soft or external trigger failed.
    TriggerFail,
    /// Black balance changed.
    Black,
    /// Flat field correction status changed.
    FlatFieldCorrection,
    /// Dark field correction status changed.
    DarkFieldCorrection,
    /// Region of interest changed.
    Roi,
    /// Level range changed.
    LevelRange,
    /// Auto exposure converged.
    AutoExpoConverged,
    /// Auto exposure once mode failed to converge.
    AutoExpoFailed,
    /// Generic hardware error; the session is closed before delivery.
    Error,
    /// Camera disconnected; the session is closed before delivery.
    Disconnected,
    /// No frame within the configured timeout.
    NoFrameTimeout,
    /// No packet within the configured timeout (GigE).
    NoPacketTimeout,
    /// Focus position changed.
    FocusPos,
    /// Hardware event: exposure start.
    ExpoStart,
    /// Hardware event: exposure stop.
    ExpoStop,
    /// Hardware event: next trigger allowed.
    TriggerAllow,
    /// Hardware event: heartbeat.
    Heartbeat,
    /// Factory settings restored.
    Factory,
    /// An event code this binding does not know about.
    Unknown(u32),
}

impl Event {
    pub fn from_raw(code: u32) -> Self {
        match code {
            sys::LUMICAM_EVENT_EXPOSURE => Event::Exposure,
            sys::LUMICAM_EVENT_TEMPTINT => Event::TempTint,
            sys::LUMICAM_EVENT_IMAGE => Event::Image,
            sys::LUMICAM_EVENT_STILLIMAGE => Event::StillImage,
            sys::LUMICAM_EVENT_WBGAIN => Event::WbGain,
            sys::LUMICAM_EVENT_TRIGGERFAIL => Event::TriggerFail,
            sys::LUMICAM_EVENT_BLACK => Event::Black,
            sys::LUMICAM_EVENT_FFC => Event::FlatFieldCorrection,
            sys::LUMICAM_EVENT_DFC => Event::DarkFieldCorrection,
            sys::LUMICAM_EVENT_ROI => Event::Roi,
            sys::LUMICAM_EVENT_LEVELRANGE => Event::LevelRange,
            sys::LUMICAM_EVENT_AUTOEXPO_CONV => Event::AutoExpoConverged,
            sys::LUMICAM_EVENT_AUTOEXPO_CONVFAIL => Event::AutoExpoFailed,
            sys::LUMICAM_EVENT_ERROR => Event::Error,
            sys::LUMICAM_EVENT_DISCONNECTED => Event::Disconnected,
            sys::LUMICAM_EVENT_NOFRAMETIMEOUT => Event::NoFrameTimeout,
            sys::LUMICAM_EVENT_NOPACKETTIMEOUT => Event::NoPacketTimeout,
            sys::LUMICAM_EVENT_FOCUSPOS => Event::FocusPos,
            sys::LUMICAM_EVENT_EXPO_START => Event::ExpoStart,
            sys::LUMICAM_EVENT_EXPO_STOP => Event::ExpoStop,
            sys::LUMICAM_EVENT_TRIGGER_ALLOW => Event::TriggerAllow,
            sys::LUMICAM_EVENT_HEARTBEAT => Event::Heartbeat,
            sys::LUMICAM_EVENT_FACTORY => Event::Factory,
            other => Event::Unknown(other),
        }
    }

    /// Events after which the vendor runtime cannot deliver further frames;
    /// the bridge closes the session before notifying the owner.
    pub fn is_fatal(self) -> bool {
        matches!(self, Event::Error | Event::Disconnected)
    }
}

/// The callback registered with the vendor runtime.  `ctx` is the registry
/// id widened to pointer size, never an object pointer.
pub(crate) unsafe extern "C" fn event_trampoline(n_event: c_uint, ctx: *mut c_void) {
    dispatch(n_event, ctx as usize as u32);
}

/// Forward one raw notification to the owning session, if it still exists.
///
/// The vendor callback trampoline lands here; it is public so that
/// alternative [`crate::VendorApi`] backends can feed the bridge without
/// going through a C callback.
pub fn dispatch(code: u32, id: u32) {
    let Some(shared) = registry::sessions().lookup(id) else {
        trace!(id, code, "event for unregistered context dropped");
        return;
    };

    let event = Event::from_raw(code);
    if event.is_fatal() {
        // Close before the owner hears about it so that any command racing
        // the notification already observes the inoperative state.
        debug!(id, ?event, "fatal event, closing session");
        shared.invalidate();
        registry::sessions().unregister(id);
    }

    // A send failure only means the owner dropped the receiver.
    let _ = shared.sender().send(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        for code in [
            sys::LUMICAM_EVENT_EXPOSURE,
            sys::LUMICAM_EVENT_IMAGE,
            sys::LUMICAM_EVENT_STILLIMAGE,
            sys::LUMICAM_EVENT_ERROR,
            sys::LUMICAM_EVENT_DISCONNECTED,
            sys::LUMICAM_EVENT_HEARTBEAT,
        ] {
            assert_ne!(Event::from_raw(code), Event::Unknown(code));
        }
        assert_eq!(Event::from_raw(0x7777), Event::Unknown(0x7777));
    }

    #[test]
    fn fatal_set() {
        assert!(Event::Error.is_fatal());
        assert!(Event::Disconnected.is_fatal());
        assert!(!Event::Image.is_fatal());
        assert!(!Event::NoFrameTimeout.is_fatal());
        assert!(!Event::Unknown(0x7777).is_fatal());
    }
}
