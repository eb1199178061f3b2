// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use core::fmt;
use lumicam_sys as sys;

/// Per-frame metadata, copied out of the native record during the pull.
///
/// Owned by the caller: unlike the `#[repr(C)]` source record this value has
/// no ties to native memory and stays readable for as long as the caller
/// keeps it, regardless of the session's fate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
    /// Validity bits for the remaining fields, `LUMICAM_FRAMEINFO_FLAG_xxxx`.
    pub flag: u32,
    /// Frame sequence number.
    pub seq: u32,
    /// Capture timestamp in microseconds.
    pub timestamp: i64,
    /// Sequence shutter counter.
    pub shutterseq: u32,
    /// Exposure time in microseconds.
    pub expotime: u32,
    /// Exposure gain in percent.
    pub expogain: u16,
    pub blacklevel: u16,
}

impl FrameInfo {
    /// True when this record describes a still (snap) frame rather than a
    /// live video frame.
    pub fn is_still(&self) -> bool {
        self.flag & sys::LUMICAM_FRAMEINFO_FLAG_STILL != 0
    }

    pub fn has_timestamp(&self) -> bool {
        self.flag & sys::LUMICAM_FRAMEINFO_FLAG_TIMESTAMP != 0
    }

    pub fn has_expotime(&self) -> bool {
        self.flag & sys::LUMICAM_FRAMEINFO_FLAG_EXPOTIME != 0
    }
}

impl From<sys::LumicamFrameInfoV3> for FrameInfo {
    fn from(raw: sys::LumicamFrameInfoV3) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            flag: raw.flag,
            seq: raw.seq,
            timestamp: raw.timestamp,
            shutterseq: raw.shutterseq,
            expotime: raw.expotime,
            expogain: raw.expogain,
            blacklevel: raw.blacklevel,
        }
    }
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} seq:{} ts:{}us expo:{}us gain:{}%",
            self.width, self.height, self.seq, self.timestamp, self.expotime, self.expogain
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_every_field() {
        let raw = sys::LumicamFrameInfoV3 {
            width: 1920,
            height: 1080,
            flag: sys::LUMICAM_FRAMEINFO_FLAG_SEQ
                | sys::LUMICAM_FRAMEINFO_FLAG_TIMESTAMP
                | sys::LUMICAM_FRAMEINFO_FLAG_STILL,
            seq: 7,
            timestamp: 123_456_789,
            shutterseq: 3,
            expotime: 15_000,
            expogain: 200,
            blacklevel: 16,
        };
        let info = FrameInfo::from(raw);
        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
        assert_eq!(info.seq, 7);
        assert_eq!(info.timestamp, 123_456_789);
        assert_eq!(info.shutterseq, 3);
        assert_eq!(info.expotime, 15_000);
        assert_eq!(info.expogain, 200);
        assert_eq!(info.blacklevel, 16);
        assert!(info.is_still());
        assert!(info.has_timestamp());
    }
}
