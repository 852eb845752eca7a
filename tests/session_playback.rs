use std::sync::Arc;

use revela::{
    ControlPoint, CurvePreset, ManualScheduler, PlayState, PreparedImage, RasterSurface,
    RevealSession, RevealSettings, SessionEvent, SpeedCurve,
};

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut state = 0xCBF2_9CE4_8422_2325u64;
    for &b in bytes {
        state ^= u64::from(b);
        state = state.wrapping_mul(0x0000_0100_0000_01B3);
    }
    state
}

fn gradient_image(width: u32, height: u32) -> PreparedImage {
    let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / width) as u8);
            data.push((y * 255 / height) as u8);
            data.push(((x + y) % 256) as u8);
            data.push(255);
        }
    }
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(data),
    }
}

fn settings_with(duration_secs: f64) -> RevealSettings {
    RevealSettings {
        duration_secs,
        ..RevealSettings::default()
    }
}

#[test]
fn fixed_step_playback_completes_exactly_once() {
    let image = gradient_image(8, 6);
    let mut session = RevealSession::new(settings_with(1.0), ManualScheduler::new()).unwrap();
    let mut surface = RasterSurface::new(8, 6);

    let token = session.begin_image();
    session.image_ready(token, image.clone());
    session.play(0.0).unwrap();

    let mut events = Vec::new();
    let mut now = 0.0;
    let mut steps = 0;
    while let Some(tick) = session.scheduler_mut().take() {
        now += 0.25;
        events.extend(session.tick(tick, now, &mut surface).unwrap());
        steps += 1;
        assert!(steps <= 8, "reveal did not terminate");
    }

    let progress: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Progress { t, .. } => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![0.25, 0.5, 0.75, 1.0]);

    for e in &events {
        if let SessionEvent::Progress { t, visual } = e {
            assert_eq!(*visual, session.settings().visual_progress(*t));
        }
    }

    let completions = events
        .iter()
        .filter(|e| **e == SessionEvent::Completed)
        .count();
    assert_eq!(completions, 1);
    assert_eq!(events.last(), Some(&SessionEvent::Completed));

    assert_eq!(session.state(), PlayState::Completed);
    assert_eq!(session.progress(), 1.0);
    assert_eq!(
        fnv1a64(&surface.raster().data),
        fnv1a64(&image.rgba8_premul)
    );
}

#[test]
fn near_end_progress_snaps_to_the_full_image() {
    let image = gradient_image(8, 6);
    let settings = RevealSettings {
        duration_secs: 1.0,
        curve: CurvePreset::Linear.curve(),
        ..RevealSettings::default()
    };
    let mut session = RevealSession::new(settings, ManualScheduler::new()).unwrap();
    let mut surface = RasterSurface::new(8, 6);

    let token = session.begin_image();
    session.image_ready(token, image.clone());
    session.play(0.0).unwrap();

    // One tick lands at t = 0.9: raw visual 0.9 crosses the snap threshold,
    // so the frame is already fully sharp while the timeline keeps running.
    let tick = session.scheduler_mut().take().unwrap();
    let events = session.tick(tick, 0.9, &mut surface).unwrap();
    assert_eq!(events.len(), 1);
    match events[0] {
        SessionEvent::Progress { t, visual } => {
            assert!((t - 0.9).abs() < 1e-12);
            assert_eq!(visual, 1.0);
        }
        ref other => panic!("expected Progress, got {other:?}"),
    }
    assert_eq!(session.state(), PlayState::Playing);
    assert_eq!(
        fnv1a64(&surface.raster().data),
        fnv1a64(&image.rgba8_premul)
    );
}

#[test]
fn stale_callbacks_mutate_nothing() {
    let image = gradient_image(8, 6);
    let mut session = RevealSession::new(settings_with(10.0), ManualScheduler::new()).unwrap();
    let mut surface = RasterSurface::new(8, 6);

    let token = session.begin_image();
    session.image_ready(token, image.clone());
    session.render_now(&mut surface).unwrap();
    let digest_before = fnv1a64(&surface.raster().data);

    session.play(0.0).unwrap();
    let cancelled = session.scheduler_mut().take().unwrap();
    session.pause();

    let events = session.tick(cancelled, 5.0, &mut surface).unwrap();
    assert!(events.is_empty());
    assert_eq!(session.progress(), 0.0);
    assert_eq!(fnv1a64(&surface.raster().data), digest_before);

    // Superseded decode completions and failures are equally inert.
    let replaced = session.begin_image();
    assert!(session.image_ready(token, gradient_image(4, 4)).is_empty());
    assert!(session.image_failed(token, "late failure").is_empty());
    assert!(!session.is_image_ready());
    assert_eq!(session.state(), PlayState::Idle);
    let _ = replaced;
}

#[test]
fn seek_end_completes_from_any_state() {
    let image = gradient_image(8, 6);

    // Idle with a ready image, never played.
    let mut session = RevealSession::new(settings_with(30.0), ManualScheduler::new()).unwrap();
    let mut surface = RasterSurface::new(8, 6);
    let token = session.begin_image();
    session.image_ready(token, image.clone());
    let events = session.seek_end(&mut surface).unwrap();
    assert_eq!(
        events,
        vec![
            SessionEvent::Progress {
                t: 1.0,
                visual: 1.0
            },
            SessionEvent::Completed,
        ]
    );
    assert_eq!(session.state(), PlayState::Completed);
    assert_eq!(
        fnv1a64(&surface.raster().data),
        fnv1a64(&image.rgba8_premul)
    );

    // Paused mid-reveal.
    let mut session = RevealSession::new(settings_with(2.0), ManualScheduler::new()).unwrap();
    let mut surface = RasterSurface::new(8, 6);
    let token = session.begin_image();
    session.image_ready(token, image.clone());
    session.play(0.0).unwrap();
    let tick = session.scheduler_mut().take().unwrap();
    session.tick(tick, 0.5, &mut surface).unwrap();
    session.pause();
    let events = session.seek_end(&mut surface).unwrap();
    let completions = events
        .iter()
        .filter(|e| **e == SessionEvent::Completed)
        .count();
    assert_eq!(completions, 1);
    assert_eq!(session.progress(), 1.0);

    // Waiting on a decode: the timeline completes, nothing is rendered.
    let mut session = RevealSession::new(settings_with(30.0), ManualScheduler::new()).unwrap();
    let mut surface = RasterSurface::new(8, 6);
    let _token = session.begin_image();
    let events = session.seek_end(&mut surface).unwrap();
    assert_eq!(
        events,
        vec![
            SessionEvent::Progress {
                t: 1.0,
                visual: 1.0
            },
            SessionEvent::Completed,
        ]
    );
    assert!(surface.raster().data.iter().all(|&b| b == 0));
}

#[test]
fn seek_end_matches_natural_completion_when_the_curve_ends_low() {
    // A valid curve may end below the snap threshold; t = 1 then maps to a
    // partially revealed frame, not the sharp image.
    let curve = SpeedCurve::new(vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(1.0, 0.5),
    ])
    .unwrap();
    let settings = RevealSettings {
        duration_secs: 1.0,
        curve,
        ..RevealSettings::default()
    };
    let image = gradient_image(8, 6);

    // Natural completion through a tick.
    let mut ticked = RevealSession::new(settings.clone(), ManualScheduler::new()).unwrap();
    let mut ticked_surface = RasterSurface::new(8, 6);
    let token = ticked.begin_image();
    ticked.image_ready(token, image.clone());
    ticked.play(0.0).unwrap();
    let tick = ticked.scheduler_mut().take().unwrap();
    let events = ticked.tick(tick, 1.0, &mut ticked_surface).unwrap();
    assert_eq!(
        events,
        vec![
            SessionEvent::Progress {
                t: 1.0,
                visual: 0.5
            },
            SessionEvent::Completed,
        ]
    );
    assert_eq!(ticked.visual(), 0.5);

    // Reveal-now on a second session paints the very same frame.
    let mut jumped = RevealSession::new(settings, ManualScheduler::new()).unwrap();
    let mut jumped_surface = RasterSurface::new(8, 6);
    let token = jumped.begin_image();
    jumped.image_ready(token, image.clone());
    let events = jumped.seek_end(&mut jumped_surface).unwrap();
    assert_eq!(
        events,
        vec![
            SessionEvent::Progress {
                t: 1.0,
                visual: 0.5
            },
            SessionEvent::Completed,
        ]
    );

    let final_frame = fnv1a64(&ticked_surface.raster().data);
    assert_eq!(fnv1a64(&jumped_surface.raster().data), final_frame);
    assert_ne!(final_frame, fnv1a64(&image.rgba8_premul));

    // Repainting the completed state keeps showing that frame.
    let mut repaint = RasterSurface::new(8, 6);
    jumped.render_now(&mut repaint).unwrap();
    assert_eq!(fnv1a64(&repaint.raster().data), final_frame);
}

#[test]
fn duration_change_rescales_remaining_time() {
    let image = gradient_image(8, 6);
    let mut session = RevealSession::new(settings_with(2.0), ManualScheduler::new()).unwrap();
    let mut surface = RasterSurface::new(8, 6);

    let token = session.begin_image();
    session.image_ready(token, image);
    session.play(0.0).unwrap();

    let tick = session.scheduler_mut().take().unwrap();
    session.tick(tick, 0.5, &mut surface).unwrap();
    assert_eq!(session.progress(), 0.25);

    // Halving the duration makes the next half-second cover the remaining
    // three quarters of the timeline.
    session.set_duration(0.5).unwrap();
    let tick = session.scheduler_mut().take().unwrap();
    let events = session.tick(tick, 1.0, &mut surface).unwrap();
    assert!(events.contains(&SessionEvent::Completed));
    assert_eq!(session.progress(), 1.0);
}

#[test]
fn image_swap_midway_restarts_cleanly() {
    let first = gradient_image(8, 6);
    let second = gradient_image(4, 4);
    let mut session = RevealSession::new(settings_with(1.0), ManualScheduler::new()).unwrap();
    let mut surface = RasterSurface::new(8, 6);

    let token = session.begin_image();
    session.image_ready(token, first);
    session.play(0.0).unwrap();
    let tick = session.scheduler_mut().take().unwrap();
    session.tick(tick, 0.5, &mut surface).unwrap();
    assert_eq!(session.progress(), 0.5);

    // Picking a new image abandons the running reveal entirely.
    let replacement = session.begin_image();
    assert_eq!(session.progress(), 0.0);
    assert_eq!(session.state(), PlayState::Idle);
    assert!(session.scheduler_mut().take().is_none());
    assert!(session.play(0.0).is_err());

    let events = session.image_ready(replacement, second);
    assert_eq!(events, vec![SessionEvent::ImageReady]);
    session.play(10.0).unwrap();
    let tick = session.scheduler_mut().take().unwrap();
    session.tick(tick, 10.5, &mut surface).unwrap();
    assert_eq!(session.progress(), 0.5);
    assert_eq!(session.state(), PlayState::Playing);
}
