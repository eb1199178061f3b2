// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # LumiCam SDK Bindings
//!
//! Safe Rust layer over the proprietary LumiCam USB/GigE camera SDK.  The
//! vendor runtime owns the hard parts (sensor control, ISP, auto exposure,
//! DDR frame buffering, trigger sequencing); this crate owns the lifecycle
//! and thread-safety glue around it:
//!
//! - **Device sessions**: [`Camera`] pairs one native handle with one entry
//!   in the process-wide callback registry and degrades gracefully once the
//!   handle is gone — commands on a closed or disconnected session return a
//!   uniform status instead of reaching native code.
//! - **Release-once handles**: the native handle is closed exactly once no
//!   matter how the session ends (explicit close, drop, or a disconnect
//!   reported by the runtime itself).
//! - **Event bridging**: vendor callbacks arrive on runtime-internal
//!   threads carrying an integer context; the bridge translates the context
//!   back to a session and forwards a typed [`Event`] over a channel, so no
//!   application logic ever runs on a native thread.
//!
//! ## Example
//!
//! ```no_run
//! use lumicam::{Camera, Event, Sdk};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sdk = Arc::new(Sdk::load()?);
//! let mut cam = Camera::open(sdk, None)?;
//! let events = cam.events();
//!
//! cam.set_exposure_time(15_000)?;
//! cam.start()?;
//!
//! let size = cam.size()?;
//! let mut frame = vec![0u8; size.width as usize * size.height as usize * 3];
//! while let Ok(event) = events.recv() {
//!     if event == Event::Image {
//!         let info = cam.pull_image(&mut frame, 24, -1)?;
//!         println!("frame {}", info.seq);
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Safety
//!
//! All `unsafe` FFI lives in `lumicam-sys` and the [`api`] seam; the public
//! surface is safe.  Raw pointers into native memory never outlive the call
//! that produced them — frame metadata and device records are copied into
//! owned values at the boundary.

pub mod api;
pub mod device;
pub mod error;
pub mod event;
pub mod frame;
pub mod handle;
#[cfg(feature = "mock")]
pub mod mock;
pub mod registry;
pub mod session;

pub use api::{Sdk, VendorApi};
pub use device::{DeviceInfo, Model, Resolution};
pub use error::HResult;
pub use event::Event;
pub use frame::FrameInfo;
pub use session::{AutoExposure, Camera};
