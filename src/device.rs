// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use core::fmt;
use libc::c_char;
use lumicam_sys as sys;

/// Decode a fixed-width, zero-terminated C char field.
pub(crate) fn fixed_cstr(chars: &[c_char]) -> String {
    let bytes: Vec<u8> = chars
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A single sensor resolution supported by a camera model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Camera model descriptor copied out of the vendor enumeration record.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Model name.
    pub name: String,
    /// Capability bits, `LUMICAM_FLAG_xxxx`.
    pub flag: u64,
    /// Number of frame speed levels, closed interval `[0, maxspeed]`.
    pub maxspeed: u32,
    /// Number of preview resolutions.
    pub preview: u32,
    /// Number of still resolutions.
    pub still: u32,
    /// Maximum fan speed, closed interval `[0, max]`.
    pub maxfanspeed: u32,
    /// Number of input/output controls.
    pub ioctrol: u32,
    /// Physical pixel size in micrometers.
    pub xpixsz: f32,
    pub ypixsz: f32,
    /// Preview resolutions, `preview` entries.
    pub resolutions: Vec<Resolution>,
}

/// One enumerated camera.
///
/// Owned copy of the vendor record: valid indefinitely, unlike the
/// enumeration array it was converted from.  The `id` field is the opaque
/// token accepted by [`crate::Camera::open`].
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    pub display_name: String,
    pub id: String,
    pub model: Model,
}

impl Model {
    /// # Safety
    ///
    /// `raw.name` must be null or point at a zero-terminated string, and
    /// `raw.preview` must not exceed the capacity of `raw.res`.
    pub(crate) unsafe fn from_raw(raw: &sys::LumicamModelV2) -> Self {
        let name = if raw.name.is_null() {
            String::new()
        } else {
            std::ffi::CStr::from_ptr(raw.name)
                .to_string_lossy()
                .into_owned()
        };
        let count = (raw.preview as usize).min(raw.res.len());
        let resolutions = raw.res[..count]
            .iter()
            .map(|r| Resolution {
                width: r.width,
                height: r.height,
            })
            .collect();
        Self {
            name,
            flag: raw.flag,
            maxspeed: raw.maxspeed,
            preview: raw.preview,
            still: raw.still,
            maxfanspeed: raw.maxfanspeed,
            ioctrol: raw.ioctrol,
            xpixsz: raw.xpixsz,
            ypixsz: raw.ypixsz,
            resolutions,
        }
    }
}

impl DeviceInfo {
    /// # Safety
    ///
    /// `raw` must come from the vendor enumeration call; in particular
    /// `raw.model` must be null or point at a live model descriptor.
    pub(crate) unsafe fn from_raw(raw: &sys::LumicamDeviceV2) -> Self {
        let model = if raw.model.is_null() {
            Model::default()
        } else {
            Model::from_raw(&*raw.model)
        };
        Self {
            display_name: fixed_cstr(&raw.displayname),
            id: fixed_cstr(&raw.id),
            model,
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [{}]", self.display_name, self.id)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_cstr_stops_at_nul() {
        let mut field: [c_char; 8] = [0; 8];
        for (i, b) in b"cam".iter().enumerate() {
            field[i] = *b as c_char;
        }
        field[4] = b'x' as c_char; // garbage past the terminator
        assert_eq!(fixed_cstr(&field), "cam");
    }

    #[test]
    fn device_from_raw_copies_fields() {
        let model = sys::LumicamModelV2 {
            name: c"LC-2010".as_ptr(),
            flag: sys::LUMICAM_FLAG_CMOS | sys::LUMICAM_FLAG_USB30,
            maxspeed: 2,
            preview: 2,
            still: 2,
            maxfanspeed: 0,
            ioctrol: 0,
            xpixsz: 2.4,
            ypixsz: 2.4,
            res: {
                let mut res = [sys::LumicamResolution::default(); 16];
                res[0] = sys::LumicamResolution {
                    width: 2048,
                    height: 1536,
                };
                res[1] = sys::LumicamResolution {
                    width: 1024,
                    height: 768,
                };
                res
            },
        };
        let mut raw = sys::LumicamDeviceV2 {
            model: &model,
            ..Default::default()
        };
        for (i, b) in b"LumiCam LC-2010".iter().enumerate() {
            raw.displayname[i] = *b as c_char;
        }
        for (i, b) in b"lc2010-0001".iter().enumerate() {
            raw.id[i] = *b as c_char;
        }

        let info = unsafe { DeviceInfo::from_raw(&raw) };
        assert_eq!(info.display_name, "LumiCam LC-2010");
        assert_eq!(info.id, "lc2010-0001");
        assert_eq!(info.model.name, "LC-2010");
        assert_eq!(info.model.resolutions.len(), 2);
        assert_eq!(
            info.model.resolutions[1],
            Resolution {
                width: 1024,
                height: 768
            }
        );
    }
}
