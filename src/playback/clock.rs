use std::io;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use super::types::PlayerEvent;

/// Source of "now" for the controller.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Start the position clock: a thread that sends a [`PlayerEvent::Tick`]
/// every `interval` until the receiving side goes away.
pub fn spawn_ticker(interval: Duration, events: Sender<PlayerEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("ticker".to_string())
        .spawn(move || {
            loop {
                thread::sleep(interval);
                if events.send(PlayerEvent::Tick(Instant::now())).is_err() {
                    debug!("event loop gone, ticker exiting");
                    break;
                }
            }
        })
}

#[cfg(test)]
pub(crate) use manual::ManualClock;
