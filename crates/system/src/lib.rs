pub mod battery;
pub mod mock;
pub mod tracker;

pub use battery::{BatterySource, SysfsBattery};
pub use mock::MockBattery;
pub use tracker::BatteryTracker;

use powertrack_core::{clock::now_secs, Message};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

/// Spawn a background Tokio task that polls `tracker` every `interval` and
/// forwards each outcome through the returned channel.
///
/// The tracker moves into the task, so its histories are only ever touched
/// there; the consumer sees owned [`BatteryUpdate`](powertrack_core::BatteryUpdate)s.
/// The task stops automatically when the receiver is dropped.
pub fn spawn_monitor<S>(mut tracker: BatteryTracker<S>, interval: Duration) -> mpsc::Receiver<Message>
where
    S: BatterySource + 'static,
{
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let message = match tracker.poll(now_secs()) {
                Ok(update) => Message::Battery(Box::new(update)),
                Err(e) => {
                    warn!("Battery poll failed: {e}");
                    Message::SensorFailed(e.to_string())
                }
            };

            if tx.send(message).await.is_err() {
                break; // all receivers dropped
            }
        }
    });

    rx
}
