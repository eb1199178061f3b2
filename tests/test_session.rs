// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Session lifecycle and event bridge tests against the mock vendor
//! runtime.  Everything here asserts on the process-wide session registry,
//! so the tests are serialized.

use lumicam::mock::MockSdk;
use lumicam::{event, registry, AutoExposure, Camera, Event, FrameInfo, HResult, VendorApi};
use lumicam_sys as sys;
use serial_test::serial;
use std::sync::Arc;

fn open_mock() -> (Arc<MockSdk>, Camera) {
    let mock = Arc::new(MockSdk::new());
    let api: Arc<dyn VendorApi> = mock.clone();
    let cam = Camera::open(api, None).expect("mock camera should open");
    (mock, cam)
}

#[test]
#[serial]
fn open_with_unknown_id_fails_cleanly() {
    let mock = Arc::new(MockSdk::new());
    let base = registry::active_sessions();

    let api: Arc<dyn VendorApi> = mock.clone();
    let err = Camera::open(api, Some("no-such-camera")).err();

    assert_eq!(err, Some(HResult::FAIL));
    assert_eq!(registry::active_sessions(), base);
    assert_eq!(mock.open_count(), 0);
    assert_eq!(mock.close_count(), 0);
}

#[test]
#[serial]
fn open_registers_close_unregisters() {
    let base = registry::active_sessions();
    let (mock, mut cam) = open_mock();

    assert!(cam.is_open());
    assert_eq!(registry::active_sessions(), base + 1);
    assert_eq!(mock.open_count(), 1);

    cam.close();
    assert!(!cam.is_open());
    assert_eq!(registry::active_sessions(), base);
    assert_eq!(mock.close_count(), 1);

    // close is idempotent, including the implicit close on drop
    cam.close();
    drop(cam);
    assert_eq!(mock.close_count(), 1);
    assert_eq!(registry::active_sessions(), base);
}

#[test]
#[serial]
fn drop_without_close_releases_exactly_once() {
    let base = registry::active_sessions();
    let (mock, cam) = open_mock();
    drop(cam);
    assert_eq!(mock.close_count(), 1);
    assert_eq!(registry::active_sessions(), base);
}

#[test]
#[serial]
fn operations_after_close_never_reach_native() {
    let (mock, mut cam) = open_mock();
    cam.close();

    let calls = mock.native_calls();

    assert_eq!(cam.start().err(), Some(HResult::INOPERATIVE));
    assert_eq!(cam.stop().err(), Some(HResult::INOPERATIVE));
    assert_eq!(cam.exposure_time().err(), Some(HResult::INOPERATIVE));
    assert_eq!(
        cam.set_exposure_time(20_000).err(),
        Some(HResult::INOPERATIVE)
    );
    assert_eq!(cam.temp_tint().err(), Some(HResult::INOPERATIVE));
    assert_eq!(cam.snap(None).err(), Some(HResult::INOPERATIVE));
    assert_eq!(cam.serial_number().err(), Some(HResult::INOPERATIVE));
    assert_eq!(
        cam.option(sys::LUMICAM_OPTION_BITDEPTH).err(),
        Some(HResult::INOPERATIVE)
    );
    let mut buf = [0u8; 16];
    assert_eq!(
        cam.pull_image(&mut buf, 24, -1).err(),
        Some(HResult::INOPERATIVE)
    );
    assert_eq!(
        cam.wait_image(10, &mut buf, 24, -1).err(),
        Some(HResult::INOPERATIVE)
    );

    assert_eq!(cam.last_status(), HResult::INOPERATIVE);
    assert_eq!(mock.native_calls(), calls, "native layer was reached after close");
}

#[test]
#[serial]
fn notification_for_unknown_context_is_dropped() {
    let base = registry::active_sessions();
    let (_mock, cam) = open_mock();
    let events = cam.events();

    // never-registered context id: no crash, no handler, no state change
    event::dispatch(sys::LUMICAM_EVENT_IMAGE, u32::MAX);
    event::dispatch(sys::LUMICAM_EVENT_DISCONNECTED, u32::MAX);

    assert_eq!(registry::active_sessions(), base + 1);
    assert!(cam.is_open());
    assert_eq!(events.try_recv().expect("channel intact"), None);
}

#[test]
#[serial]
fn disconnect_event_auto_closes_session() {
    let base = registry::active_sessions();
    let (mock, mut cam) = open_mock();
    let events = cam.events();

    cam.start().expect("start");
    assert_eq!(registry::active_sessions(), base + 1);

    let handle = mock.open_handles()[0];
    mock.emit(handle, sys::LUMICAM_EVENT_DISCONNECTED)
        .join()
        .expect("emitter thread");

    // the bridge closed the session before notifying the owner
    assert_eq!(events.recv().expect("event"), Event::Disconnected);
    assert!(!cam.is_open());
    assert_eq!(registry::active_sessions(), base);
    assert_eq!(mock.close_count(), 1);

    let calls = mock.native_calls();
    assert_eq!(cam.exposure_time().err(), Some(HResult::INOPERATIVE));
    assert_eq!(mock.native_calls(), calls);

    // a second disconnect for the now-unregistered context is a no-op
    event::dispatch(sys::LUMICAM_EVENT_DISCONNECTED, u32::MAX);
    cam.close();
    assert_eq!(mock.close_count(), 1);
}

#[test]
#[serial]
fn hardware_error_event_auto_closes_session() {
    let base = registry::active_sessions();
    let (mock, mut cam) = open_mock();
    let events = cam.events();

    cam.start().expect("start");
    let handle = mock.open_handles()[0];
    mock.emit(handle, sys::LUMICAM_EVENT_ERROR)
        .join()
        .expect("emitter thread");

    assert_eq!(events.recv().expect("event"), Event::Error);
    assert!(!cam.is_open());
    assert_eq!(registry::active_sessions(), base);
}

#[test]
#[serial]
fn streaming_pull_and_still_snap() {
    let (mock, mut cam) = open_mock();
    let events = cam.events();

    cam.set_esize(1).expect("resolution index 1");
    cam.set_auto_exposure(AutoExposure::Off).expect("ae off");
    cam.set_exposure_time(8_000).expect("exposure");
    cam.set_exposure_gain(200).expect("gain");
    cam.set_temp_tint(5000, 900).expect("white balance");
    cam.start().expect("start");

    let size = cam.size().expect("size");
    assert_eq!((size.width, size.height), (1024, 768));
    let mut data = vec![0u8; size.width as usize * size.height as usize * 3];

    let handle = mock.open_handles()[0];
    mock.emit(handle, sys::LUMICAM_EVENT_IMAGE)
        .join()
        .expect("emitter thread");
    assert_eq!(events.recv().expect("event"), Event::Image);

    let info = cam.pull_image(&mut data, 24, -1).expect("pull");
    assert_eq!((info.width, info.height), (1024, 768));
    assert_eq!(info.expotime, 8_000);
    assert_eq!(info.expogain, 200);
    assert!(!info.is_still());
    assert_eq!(data[0], info.seq as u8);

    // the blocking variant returns the next frame while streaming
    let next = cam.wait_image(100, &mut data, 24, -1).expect("wait");
    assert_eq!(next.seq, info.seq + 1);

    cam.pause(true).expect("pause");
    cam.pause(false).expect("resume");

    cam.snap(None).expect("snap");
    loop {
        match events.recv().expect("event stream") {
            Event::StillImage => break,
            Event::Image => continue,
            other => panic!("unexpected event {other:?}"),
        }
    }
    let info = cam.pull_still_image(&mut data, 24, -1).expect("still pull");
    assert!(info.is_still());

    cam.stop().expect("stop");
    cam.close();
}

#[test]
#[serial]
fn wait_image_reports_timeout_when_not_streaming() {
    let (_mock, cam) = open_mock();
    let mut data = vec![0u8; 2048 * 1536 * 3];
    assert_eq!(
        cam.wait_image(10, &mut data, 24, -1).err(),
        Some(HResult::TIMEOUT)
    );
    assert_eq!(cam.last_status(), HResult::TIMEOUT);
}

#[test]
#[serial]
fn frame_info_is_an_owned_copy() {
    let (mock, mut cam) = open_mock();
    cam.start().expect("start");

    let size = cam.size().expect("size");
    let mut data = vec![0u8; size.width as usize * size.height as usize * 3];
    let info = cam.pull_image(&mut data, 24, -1).expect("pull");

    let handle = mock.open_handles()[0];
    let source = mock
        .last_frame_info(handle)
        .expect("mock kept the source record");
    assert_eq!(info, FrameInfo::from(source));

    // the copy stays fully readable after the session is gone
    cam.close();
    drop(cam);
    assert_eq!(info.width, source.width);
    assert_eq!(info.seq, source.seq);
    assert_eq!(info.timestamp, source.timestamp);
    assert_eq!(info.expotime, source.expotime);
}

#[test]
#[serial]
fn resolution_is_locked_while_streaming() {
    let (_mock, mut cam) = open_mock();
    cam.start().expect("start");

    assert_eq!(cam.set_esize(1).err(), Some(HResult::UNEXPECTED));
    assert_eq!(cam.set_size(1024, 768).err(), Some(HResult::UNEXPECTED));
    assert_eq!(cam.last_status(), HResult::UNEXPECTED);

    cam.stop().expect("stop");
    cam.set_size(1024, 768).expect("set size while stopped");
    assert_eq!(cam.esize().expect("esize"), 1);
}

#[test]
#[serial]
fn option_values_pass_through_opaquely() {
    let (_mock, cam) = open_mock();

    cam.set_option(sys::LUMICAM_OPTION_TRIGGER, 1).expect("set");
    assert_eq!(cam.option(sys::LUMICAM_OPTION_TRIGGER).expect("get"), 1);

    // writing the same value again is the vendor's S_FALSE no-op success
    cam.set_option(sys::LUMICAM_OPTION_TRIGGER, 1).expect("set again");
    assert_eq!(cam.last_status(), HResult::FALSE);

    // unknown codes are not interpreted by the wrapper
    cam.set_option(0x7abc, -7).expect("unknown option");
    assert_eq!(cam.option(0x7abc).expect("unknown option"), -7);
}

#[test]
#[serial]
fn out_of_range_settings_surface_vendor_status() {
    let (_mock, cam) = open_mock();

    assert_eq!(
        cam.set_temp_tint(99_999, 1000).err(),
        Some(HResult::INVALIDARG)
    );
    assert_eq!(cam.set_exposure_time(1).err(), Some(HResult::INVALIDARG));
    assert_eq!(cam.set_exposure_gain(9).err(), Some(HResult::INVALIDARG));
    assert_eq!(cam.last_status(), HResult::INVALIDARG);

    // the session stays fully operative after an ordinary failure
    assert!(cam.exposure_time().is_ok());
}

#[test]
#[serial]
fn exposure_surface_round_trips() {
    let (_mock, mut cam) = open_mock();

    let (min, max, def) = cam.exposure_time_range().expect("time range");
    assert!(min < def && def < max);
    let (gmin, gmax, gdef) = cam.exposure_gain_range().expect("gain range");
    assert!(gmin <= gdef && gdef < gmax);

    cam.set_auto_exposure(AutoExposure::Once).expect("ae once");
    assert_eq!(cam.auto_exposure().expect("ae"), AutoExposure::Once);
    cam.set_auto_exposure_target(140).expect("ae target");
    assert_eq!(cam.auto_exposure_target().expect("ae target"), 140);

    cam.set_real_time(2).expect("real time");
    assert_eq!(cam.real_time().expect("real time"), 2);

    cam.flush().expect("flush");
    cam.trigger(0).expect("cancel trigger");
}

#[test]
#[serial]
fn device_queries_report_mock_identity() {
    let (mock, cam) = open_mock();

    let devices = mock.enumerate();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, "lc2010-0001");
    assert_eq!(devices[0].model.resolutions.len(), 3);

    assert!(cam.serial_number().expect("serial").starts_with("LC"));
    assert_eq!(cam.firmware_version().expect("fw"), "3.2.1.20140922");
    assert_eq!(cam.resolution_count().expect("count"), 3);
    let res = cam.resolution(2).expect("resolution");
    assert_eq!((res.width, res.height), (680, 510));
    assert_eq!(cam.resolution(9).err(), Some(HResult::INVALIDARG));
}
