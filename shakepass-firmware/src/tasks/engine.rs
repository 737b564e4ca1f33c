//! Engine task
//!
//! Steps the password engine and sleeps for whatever delay each step asks
//! for. Phase changes are logged.

use defmt::*;
use embassy_futures::yield_now;
use embassy_time::Timer;

use shakepass_core::{Engine, EngineConfig};

use crate::board::{ChannelLink, PicoBoard};

/// Engine task - owns the entropy pool and lifecycle
#[embassy_executor::task]
pub async fn engine_task(mut board: PicoBoard, config: EngineConfig) {
    info!("Engine task started");

    let mut engine = Engine::new(config);
    let mut link = ChannelLink;

    engine.boot(&mut board, &mut link);
    let mut phase = engine.phase();

    loop {
        let delay_ms = engine.step(&mut board, &mut link);

        if engine.phase() != phase {
            phase = engine.phase();
            info!(
                "Phase {} (length {}, {} samples mixed)",
                phase.name(),
                engine.length().get(),
                engine.pool().samples()
            );
        }

        if delay_ms == 0 {
            yield_now().await;
        } else {
            Timer::after_millis(delay_ms as u64).await;
        }
    }
}
