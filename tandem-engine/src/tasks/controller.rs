//! Controller task
//!
//! Owns the [`ModeController`]. Drains intents into a kill-priority queue,
//! applies them in order and fans the resulting effects out to the
//! actuation task, the transport task and the presentation channel.

use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Ticker};

use tandem_core::config::EngineConfig;
use tandem_core::state::{Effect, Effects, Intent, IntentQueue, ModeController};
use tandem_core::Clock;

use crate::channels::{ActuationCommand, EngineChannels, Outbound};
use crate::fmt::{debug, info, warn};

/// Peer liveness check interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 250;

/// Controller task - mode coordination loop
///
/// Returns after a shutdown intent has been applied.
pub async fn controller_task<C: Clock>(channels: &EngineChannels, clock: &C, config: EngineConfig) {
    info!("Controller task started");

    let mut controller = ModeController::new(config);
    let mut queue = IntentQueue::new();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        match select3(
            channels.kill.wait(),
            channels.intents.receive(),
            ticker.next(),
        )
        .await
        {
            Either3::First(()) => enqueue(&mut queue, Intent::Kill),
            Either3::Second(intent) => enqueue(&mut queue, intent),
            Either3::Third(()) => {
                let effects = controller.tick(clock.now());
                dispatch(channels, effects).await;
                continue;
            }
        }

        // Pick up everything already waiting so a kill can overtake it
        while let Ok(intent) = channels.intents.try_receive() {
            enqueue(&mut queue, intent);
        }

        loop {
            // A kill may land while a dispatch waits on a full channel
            if channels.kill.signaled() {
                channels.kill.reset();
                enqueue(&mut queue, Intent::Kill);
            }
            let Some(intent) = queue.pop() else {
                break;
            };
            debug!("Intent: {:?}", intent);
            match controller.handle(intent, clock.now()) {
                Ok(effects) => dispatch(channels, effects).await,
                Err(e) => warn!("Intent rejected: {:?}", e),
            }
            if controller.is_closed() {
                info!("Controller shut down");
                return;
            }
        }
    }
}

fn enqueue(queue: &mut IntentQueue, intent: Intent) {
    if queue.push(intent).is_err() {
        warn!("Intent queue full, dropping {:?}", intent);
    }
}

/// Hand each effect to its consumer, in order
async fn dispatch(channels: &EngineChannels, effects: Effects) {
    for effect in effects {
        match effect {
            Effect::StopLoop => channels.commands.send(ActuationCommand::StopLoop).await,
            Effect::Silence => channels.commands.send(ActuationCommand::Silence).await,
            Effect::StartBeat { config, start } => {
                info!("Precision at {} BPM from {}", config.bpm, start.as_millis());
                channels
                    .commands
                    .send(ActuationCommand::StartBeat { config, start })
                    .await
            }
            Effect::StartReactive { audible, profile } => {
                info!("Reactive ({}) with {}", audible, profile.name());
                channels
                    .commands
                    .send(ActuationCommand::StartReactive { audible, profile })
                    .await
            }
            Effect::Pulse(request) => channels.commands.send(ActuationCommand::Pulse(request)).await,
            Effect::Send(message) => channels.outbound.send(Outbound::Send(message)).await,
            Effect::Notify(notification) => channels.notify(notification),
            Effect::Release => {
                channels.commands.send(ActuationCommand::Release).await;
                channels.outbound.send(Outbound::Close).await;
            }
        }
    }
}
