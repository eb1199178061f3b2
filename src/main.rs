use args::Args;
use clap::Parser;
use lumicam::{AutoExposure, Camera, Event, HResult, Sdk, VendorApi};
use std::{error::Error, sync::Arc, time::Instant};
use tracing::{debug, info, warn};

mod args;

fn update_fps(prev: &mut Instant, history: &mut Vec<i64>, index: &mut usize) -> i64 {
    let now = Instant::now();

    let elapsed = now.duration_since(*prev);
    *prev = Instant::now();

    history[*index] = 1e9 as i64 / elapsed.as_nanos().max(1) as i64;
    *index = (*index + 1) % history.len();

    (history.iter().sum::<i64>() as f64 / history.len() as f64).round() as i64
}

/// Encode a packed RGB24 frame as JPEG.
fn encode_jpeg(
    pix: &[u8],
    width: u32,
    height: u32,
    quality: i32,
) -> Result<turbojpeg::OwnedBuf, Box<dyn Error>> {
    let image = turbojpeg::Image {
        width: width as usize,
        height: height as usize,
        format: turbojpeg::PixelFormat::RGB,
        pixels: pix,
        pitch: width as usize * 3,
    };

    match turbojpeg::compress(image, quality, turbojpeg::Subsamp::Sub2x2) {
        Ok(buf) => Ok(buf),
        Err(e) => Err(Box::new(e)),
    }
}

fn load_api(args: &Args) -> Result<Arc<dyn VendorApi>, Box<dyn Error>> {
    #[cfg(feature = "mock")]
    if args.mock {
        info!("using the built-in mock camera");
        return Ok(Arc::new(lumicam::mock::MockSdk::with_pump(
            std::time::Duration::from_millis(33),
        )));
    }

    let sdk = match &args.library {
        Some(path) => Sdk::load_from(path)?,
        None => Sdk::load()?,
    };
    info!(version = %sdk.version(), "vendor runtime loaded");
    Ok(Arc::new(sdk))
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("LumiCam Camera Tool");

    let args = Args::parse();

    tracing_log::LogTracer::init()?;
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let api = load_api(&args)?;

    let devices = api.enumerate();
    for (i, dev) in devices.iter().enumerate() {
        println!("camera {}: {}", i, dev);
        for res in &dev.model.resolutions {
            println!("    {}", res);
        }
    }
    if args.list {
        return Ok(());
    }
    if devices.is_empty() {
        return Err(Box::from("no cameras found"));
    }

    let mut cam = Camera::open(api, args.camera.as_deref())?;
    let events = cam.events();

    println!(
        "opened camera sn:{} fw:{} hw:{}",
        cam.serial_number()?,
        cam.firmware_version()?,
        cam.hardware_version()?,
    );

    cam.set_esize(args.resolution)?;

    if let Some(us) = args.exposure {
        cam.set_auto_exposure(AutoExposure::Off)?;
        cam.set_exposure_time(us)?;
    } else {
        cam.set_auto_exposure(AutoExposure::Continuous)?;
        if let Some(target) = args.ae_target {
            cam.set_auto_exposure_target(target)?;
        }
    }
    if let Some(gain) = args.gain {
        cam.set_exposure_gain(gain)?;
    }
    if args.temp.is_some() || args.tint.is_some() {
        let (temp, tint) = cam.temp_tint()?;
        cam.set_temp_tint(args.temp.unwrap_or(temp), args.tint.unwrap_or(tint))?;
    }

    let size = cam.size()?;
    let mut frame = vec![0u8; size.width as usize * size.height as usize * 3];
    info!(%size, frames = args.frames, "starting stream");

    cam.start()?;

    let mut snapped = false;
    if args.frames == 0 && args.output.is_some() {
        cam.snap(None)?;
        snapped = true;
    }

    let mut prev = Instant::now();
    let mut history = vec![0; 30];
    let mut index = 0;
    let mut count = 0u32;
    let mut still = None;

    while count < args.frames || (args.output.is_some() && still.is_none()) {
        let event = match events.recv() {
            Ok(event) => event,
            Err(_) => break,
        };

        match event {
            Event::Image => {
                let info = match cam.pull_image(&mut frame, 24, -1) {
                    Ok(info) => info,
                    Err(hr) if hr == HResult::PENDING => continue,
                    Err(hr) if hr == HResult::INOPERATIVE => break,
                    Err(hr) => {
                        warn!(%hr, "image pull failed");
                        continue;
                    }
                };
                let fps = update_fps(&mut prev, &mut history, &mut index);
                count += 1;
                if args.verbose {
                    println!("frame {} {} fps: {}", count, info, fps);
                } else if count % 30 == 0 {
                    println!("{} frames, {} fps", count, fps);
                }

                if count >= args.frames && args.output.is_some() && !snapped {
                    cam.snap(None)?;
                    snapped = true;
                }
            }
            Event::StillImage => {
                let mut data = vec![0u8; frame.len()];
                match cam.pull_still_image(&mut data, 24, -1) {
                    Ok(info) => still = Some((data, info)),
                    Err(hr) => warn!(%hr, "still pull failed"),
                }
            }
            Event::Disconnected => {
                return Err(Box::from("camera disconnected"));
            }
            Event::Error => {
                return Err(Box::from("camera reported a hardware error"));
            }
            other => debug!(?other, "camera event"),
        }
    }

    if let (Some(path), Some((data, info))) = (&args.output, &still) {
        let jpeg = encode_jpeg(data, info.width, info.height, args.quality)?;
        std::fs::write(path, &jpeg)?;
        println!(
            "saved {} resolution: {}x{} size: {}",
            path.display(),
            info.width,
            info.height,
            jpeg.len()
        );
    }

    if cam.is_open() {
        cam.stop()?;
    }
    cam.close();
    Ok(())
}
