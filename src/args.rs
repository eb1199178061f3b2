// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the LumiCam demo tool.
///
/// The tool exercises the binding end to end: enumerate cameras, open one,
/// push the exposure/white-balance configuration down, stream frames with an
/// fps readout and optionally snap a still to a JPEG file.  Arguments can be
/// specified via command line or environment variables.
///
/// # Example
///
/// ```bash
/// # Stream 300 frames from the first camera and save a still
/// lumicam --frames 300 --output still.jpg
///
/// # Manual exposure on a specific camera
/// export CAMERA=lc2010-0001
/// lumicam --exposure 8000 --gain 200
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera id from enumeration (default: first enumerated camera)
    #[arg(short, long, env = "CAMERA")]
    pub camera: Option<String>,

    /// List connected cameras and exit
    #[arg(long)]
    pub list: bool,

    /// Path to the vendor runtime (default: platform library search path)
    #[arg(long, env = "LUMICAM_LIB")]
    pub library: Option<PathBuf>,

    /// Preview resolution index
    #[arg(short, long, env = "RESOLUTION", default_value = "0")]
    pub resolution: u32,

    /// Exposure time in microseconds; disables auto exposure
    #[arg(short, long, env = "EXPOSURE")]
    pub exposure: Option<u32>,

    /// Analog gain in percent (100 = unity)
    #[arg(short, long, env = "GAIN")]
    pub gain: Option<u16>,

    /// Auto exposure target brightness (16-220)
    #[arg(long, env = "AE_TARGET")]
    pub ae_target: Option<u16>,

    /// White balance color temperature (2000-15000)
    #[arg(long, env = "WB_TEMP")]
    pub temp: Option<i32>,

    /// White balance tint (200-2500)
    #[arg(long, env = "WB_TINT")]
    pub tint: Option<i32>,

    /// Number of frames to stream before exiting
    #[arg(short = 'n', long, env = "FRAMES", default_value = "120")]
    pub frames: u32,

    /// Snap a still at the end of the run and write it as JPEG
    #[arg(short, long, env = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long, env = "QUALITY", default_value = "90")]
    pub quality: i32,

    /// Use the built-in mock camera instead of the vendor runtime
    #[cfg(feature = "mock")]
    #[arg(long, env = "MOCK")]
    pub mock: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
