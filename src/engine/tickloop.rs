//! Fixed-rate simulation thread.
//!
//! Each iteration runs one tick of the active scene, then waits out the rest
//! of its time budget (`1s / max_tps`). The wait is a receive on the shutdown
//! channel, so stopping the engine interrupts it. A tick that overruns its
//! budget is followed directly by the next one; missed ticks are not made up.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::debug;

use super::Engine;
use super::stats::RateCounter;

pub(crate) fn spawn(engine: Engine, shutdown: Receiver<()>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("{}-tick", engine.name()))
        .spawn(move || tick_loop(engine, shutdown))
}

fn tick_loop(engine: Engine, shutdown: Receiver<()>) {
    debug!("tick thread started");
    let mut counter = RateCounter::new();

    loop {
        let started = Instant::now();
        let budget = Duration::from_secs(1) / engine.max_tps().max(1);

        engine.tick();

        if let Some(tps) = counter.record() {
            engine.report_tps(tps);
        }

        let wait = budget.saturating_sub(started.elapsed());
        match shutdown.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("tick thread stopped");
}
