use std::sync::Arc;

use revela::{ManualScheduler, PreparedImage, RasterSurface, RevealSession, RevealSettings};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut data = Vec::with_capacity(64 * 48 * 4);
    for y in 0..48u32 {
        for x in 0..64u32 {
            data.extend_from_slice(&[(x * 4) as u8, (y * 5) as u8, ((x + y) % 256) as u8, 255]);
        }
    }
    let image = PreparedImage {
        width: 64,
        height: 48,
        rgba8_premul: Arc::new(data),
    };

    let settings = RevealSettings {
        duration_secs: 2.0,
        ..RevealSettings::default()
    };
    let mut session = RevealSession::new(settings, ManualScheduler::new())?;
    let mut surface = RasterSurface::new(64, 48);

    let token = session.begin_image();
    session.image_ready(token, image);
    session.play(0.0)?;

    let mut now = 0.0;
    while let Some(tick) = session.scheduler_mut().take() {
        now += 0.25;
        for event in session.tick(tick, now, &mut surface)? {
            println!("{event:?}");
        }
    }

    Ok(())
}
