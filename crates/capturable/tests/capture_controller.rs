//! Tests for CaptureController against a stubbed render layer.
//!

extern crate alloc;

use alloc::sync::Arc;
use core::time::Duration;
use std::{
    sync::mpsc::{Receiver, channel},
    thread,
};

use capturable::{
    CaptureController, CaptureError, CaptureRequests, CaptureResult, PixelFormat, RasterImage,
};
use futures::{FutureExt, StreamExt, executor::block_on};
use image::{DynamicImage, Rgba, RgbaImage};

/// An image whose top-left pixel encodes `tag`.
fn tagged_image(tag: u8) -> RasterImage {
    let mut image = RgbaImage::new(2, 2);
    image.put_pixel(0, 0, Rgba([tag, 0, 0, 255]));
    RasterImage::new(DynamicImage::ImageRgba8(image))
}

fn tag_of(result: &CaptureResult) -> u8 {
    let image = result.image().expect("capture should have succeeded");
    image.image().to_rgba8().get_pixel(0, 0).0[0]
}

/// Callback that forwards the result into a channel.
fn forwarding_callback() -> (
    impl FnOnce(CaptureResult) + Send + 'static,
    Receiver<CaptureResult>,
) {
    let (sender, receiver) = channel();
    (
        move |result| {
            sender.send(result).unwrap();
        },
        receiver,
    )
}

/// Drain one request, echoing `image` back.
fn drain_with(requests: &CaptureRequests, image: &RasterImage) {
    let request = requests.try_next().expect("a request should be pending");
    request.succeed(image.clone());
}

#[test]
fn serialized_captures_each_get_their_own_result() {
    let controller = CaptureController::new();
    let requests = controller.subscribe().unwrap();

    for tag in 0..5 {
        let (callback, receiver) = forwarding_callback();
        controller.request_default(callback);

        drain_with(&requests, &tagged_image(tag));

        let result = receiver.try_recv().unwrap();
        assert_eq!(tag_of(&result), tag);
        assert!(receiver.try_recv().is_err(), "handler ran more than once");
    }
}

#[test]
fn overlapping_requests_only_complete_the_latest() {
    let controller = CaptureController::new();
    let requests = controller.subscribe().unwrap();

    let (first, first_receiver) = forwarding_callback();
    let (second, second_receiver) = forwarding_callback();
    controller.request_default(first);
    controller.request_default(second);

    drain_with(&requests, &tagged_image(7));
    assert!(requests.try_next().is_none());

    assert!(first_receiver.try_recv().is_err());
    assert_eq!(tag_of(&second_receiver.try_recv().unwrap()), 7);
    assert!(second_receiver.try_recv().is_err());
}

#[test]
fn undrained_request_never_completes() {
    let controller = CaptureController::new();
    let requests = controller.subscribe().unwrap();

    let (callback, receiver) = forwarding_callback();
    controller.request_default(callback);

    assert!(controller.has_pending());
    assert!(receiver.recv_timeout(Duration::from_millis(20)).is_err());

    // Tearing down both ends drops the request without running its handler.
    drop(controller);
    drop(requests);
    assert!(receiver.recv().is_err());
}

#[test]
fn awaitable_matches_callback() {
    let controller = CaptureController::new();
    let requests = controller.subscribe().unwrap();
    let image = tagged_image(42);

    let (callback, receiver) = forwarding_callback();
    controller.request(PixelFormat::RgbaF16, callback);
    let request = requests.try_next().unwrap();
    assert_eq!(request.pixel_format(), PixelFormat::RgbaF16);
    request.succeed(image.clone());
    let from_callback = receiver.try_recv().unwrap();

    let capture = controller.capture(PixelFormat::RgbaF16);
    let request = requests.try_next().unwrap();
    assert_eq!(request.pixel_format(), PixelFormat::RgbaF16);
    request.succeed(image.clone());
    let from_future = block_on(capture);

    assert!(
        from_callback
            .image()
            .unwrap()
            .same_image(from_future.image().unwrap())
    );
}

#[test]
fn transport_does_not_modify_the_image() {
    let controller = CaptureController::new();
    let requests = controller.subscribe().unwrap();
    let image = tagged_image(3);

    let capture = controller.capture(PixelFormat::Alpha8);
    drain_with(&requests, &image);

    let result = block_on(capture);
    assert!(result.image().unwrap().same_image(&image));
    assert_eq!(tag_of(&result), 3);
}

#[test]
fn errors_are_delivered_as_results() {
    let controller = CaptureController::new();
    let requests = controller.subscribe().unwrap();

    let capture = controller.capture(PixelFormat::Rgb565);
    requests
        .try_next()
        .unwrap()
        .fail(CaptureError::UnsupportedFormat(PixelFormat::Rgb565));

    match block_on(capture) {
        CaptureResult::Error(error) => {
            assert_eq!(error, CaptureError::UnsupportedFormat(PixelFormat::Rgb565));
        }
        CaptureResult::Success(_) => panic!("expected an error"),
    }
}

#[test]
fn superseded_capture_never_resolves() {
    let controller = CaptureController::new();
    let requests = controller.subscribe().unwrap();

    let mut first = controller.capture(PixelFormat::default());
    let second = controller.capture(PixelFormat::default());
    drain_with(&requests, &tagged_image(9));

    assert!((&mut first).now_or_never().is_none());
    assert!(first.is_abandoned());
    assert!((&mut first).now_or_never().is_none());

    assert_eq!(tag_of(&block_on(second)), 9);
}

#[test]
fn late_subscriber_receives_waiting_capture() {
    let controller = Arc::new(CaptureController::new());
    let image = tagged_image(11);

    let render_layer = {
        let controller = Arc::clone(&controller);
        let image = image.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            let requests = controller.subscribe().unwrap();
            let request = requests.recv().unwrap();
            request.succeed(image);
        })
    };

    let result = block_on(controller.capture(PixelFormat::default()));
    render_layer.join().unwrap();

    assert!(result.image().unwrap().same_image(&image));
}

#[test]
fn callback_scenario_after_one_drain() {
    let controller = CaptureController::new();

    let (first, first_receiver) = forwarding_callback();
    let (second, second_receiver) = forwarding_callback();
    controller.request_default(first);
    controller.request_default(second);

    let requests = controller.subscribe().unwrap();
    drain_with(&requests, &tagged_image(1));

    assert!(first_receiver.try_recv().is_err());
    assert_eq!(tag_of(&second_receiver.try_recv().unwrap()), 1);
    assert!(second_receiver.try_recv().is_err());
}

#[test]
fn blocking_capture_from_another_thread() {
    let controller = Arc::new(CaptureController::new());
    let requests = controller.subscribe().unwrap();

    let caller = {
        let controller = Arc::clone(&controller);
        thread::spawn(move || controller.capture_blocking(PixelFormat::default()))
    };

    let request = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    request.succeed(tagged_image(5));

    assert_eq!(tag_of(&caller.join().unwrap()), 5);
}

#[test]
fn handler_can_issue_another_request() {
    let controller = Arc::new(CaptureController::new());
    let requests = controller.subscribe().unwrap();

    let (callback, receiver) = forwarding_callback();
    let inner = Arc::clone(&controller);
    controller.request_default(move |_result| inner.request_default(callback));

    drain_with(&requests, &tagged_image(0));
    drain_with(&requests, &tagged_image(1));

    assert_eq!(tag_of(&receiver.try_recv().unwrap()), 1);
}

#[test]
fn stream_yields_requests_until_closed() {
    let controller = CaptureController::new();
    let mut requests = controller.subscribe().unwrap();

    let capture = controller.capture(PixelFormat::default());
    let request = block_on(requests.next()).unwrap();
    request.succeed(tagged_image(8));
    assert_eq!(tag_of(&block_on(capture)), 8);

    drop(controller);
    assert!(block_on(requests.next()).is_none());
}

#[test]
fn stream_is_woken_by_publish() {
    let controller = Arc::new(CaptureController::new());
    let mut requests = controller.subscribe().unwrap();

    let publisher = {
        let controller = Arc::clone(&controller);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            controller.capture(PixelFormat::Argb4444)
        })
    };

    let request = block_on(requests.next()).unwrap();
    assert_eq!(request.pixel_format(), PixelFormat::Argb4444);

    let capture = publisher.join().unwrap();
    request.succeed(tagged_image(4));
    assert_eq!(tag_of(&block_on(capture)), 4);
}
