use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::board::input::key_detector::{keycode_to_char, DeviceStateKeyDetector, KeyDetector};

/// How often the global keyboard state is sampled.
const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Document-wide key capture: reports key-press edges no matter which window
/// has focus. The subscription owns its background task; teardown is the
/// explicit `unsubscribe`, also run on drop.
pub struct GlobalKeyListener {
    stop: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl GlobalKeyListener {
    /// Starts the poll loop and delivers every mapped key-press edge to
    /// `sink`.
    pub fn subscribe<F>(sink: F) -> Self
    where
        F: Fn(char) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let task = tokio::task::spawn_blocking({
            let stop = stop.clone();
            move || {
                let mut detector = DeviceStateKeyDetector::new();
                info!("global key listener started");
                while !stop.load(Ordering::Relaxed) {
                    for key in drain_presses(&mut detector) {
                        sink(key);
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                debug!("global key listener stopped");
            }
        });
        GlobalKeyListener {
            stop,
            task: Some(task),
        }
    }

    /// Tears the subscription down; the poll loop observes the flag within
    /// one interval. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.task.take();
    }
}

impl Drop for GlobalKeyListener {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// One poll step: refresh the snapshot and return the newly pressed
/// characters.
fn drain_presses<D: KeyDetector>(detector: &mut D) -> Vec<char> {
    detector.update_keys();
    detector
        .get_pressed_keys()
        .into_iter()
        .filter_map(keycode_to_char)
        .collect()
}
