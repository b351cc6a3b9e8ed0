//! Actuation task
//!
//! Owns the actuator and the only running loop. Each iteration races the
//! active loop against the command channel; dropping the loop future is the
//! cancellation, so two loops can never interleave. Loop state lives outside
//! the future, so a one-shot command (ack, mirrored pulse, silence) lets the
//! same loop resume without losing its anchor.

use embassy_futures::select::{select, Either};
use embassy_time::Timer;

use tandem_core::beat::BeatScheduler;
use tandem_core::config::EngineConfig;
use tandem_core::reactive::ReactiveLoop;
use tandem_core::state::Notification;
use tandem_core::traits::{Actuator, Capability, Entropy};
use tandem_core::{Clock, Timestamp};
use tandem_protocol::Message;

use crate::channels::{ActuationCommand, EngineChannels, Outbound};
use crate::fmt::{debug, info, trace, warn};

/// Loop currently driving the actuator
enum Active {
    Idle,
    Beat(BeatScheduler),
    Reactive(ReactiveLoop),
}

impl Active {
    fn cancel(&mut self) {
        match self {
            Active::Idle => {}
            Active::Beat(scheduler) => scheduler.cancel(),
            Active::Reactive(reactive) => reactive.cancel(),
        }
        *self = Active::Idle;
    }
}

/// Everything a loop needs besides its own state
struct Rig<'a, A, C, E> {
    channels: &'a EngineChannels,
    clock: &'a C,
    actuator: &'a mut A,
    entropy: &'a mut E,
    capability: Capability,
}

/// Actuation task - runs the active loop and executes actuator commands
///
/// Returns after a release command.
pub async fn actuation_task<A, C, E>(
    channels: &EngineChannels,
    clock: &C,
    actuator: &mut A,
    entropy: &mut E,
    config: EngineConfig,
) where
    A: Actuator,
    C: Clock,
    E: Entropy,
{
    info!("Actuation task started");

    let capability = match actuator.capability() {
        Ok(capability) => capability,
        Err(e) => {
            warn!("Actuator capability query failed ({:?}), using fixed effects", e);
            Capability::FixedEffect
        }
    };
    debug!("Actuator capability: {:?}", capability);

    let mut rig = Rig {
        channels,
        clock,
        actuator,
        entropy,
        capability,
    };
    let mut active = Active::Idle;

    loop {
        let command = match &mut active {
            Active::Idle => Some(channels.commands.receive().await),
            Active::Beat(scheduler) => {
                race(run_beat(scheduler, &mut rig), channels).await
            }
            Active::Reactive(reactive) => {
                race(run_reactive(reactive, &mut rig), channels).await
            }
        };

        let Some(command) = command else {
            // Loop ran out on its own
            active = Active::Idle;
            continue;
        };

        trace!("Actuation command: {:?}", command);
        match command {
            ActuationCommand::StopLoop => active.cancel(),
            ActuationCommand::Silence => rig.actuator.silence(),
            ActuationCommand::StartBeat { config: beat, start } => {
                active.cancel();
                match BeatScheduler::start(beat, start, clock.now()) {
                    Ok(scheduler) => active = Active::Beat(scheduler),
                    Err(e) => warn!("Beat loop not started: {:?}", e),
                }
            }
            ActuationCommand::StartReactive { audible, profile } => {
                active.cancel();
                active = Active::Reactive(ReactiveLoop::start(
                    audible,
                    profile,
                    config.reactive,
                    config.role.emits_telemetry(),
                ));
            }
            ActuationCommand::Pulse(request) => {
                if let Some(pulse) = request.shape(capability) {
                    rig.actuator.fire(&pulse);
                }
            }
            ActuationCommand::Release => {
                active.cancel();
                rig.actuator.silence();
                info!("Actuation released");
                return;
            }
        }
    }
}

/// Run a loop until it finishes or a command arrives
async fn race<F>(run: F, channels: &EngineChannels) -> Option<ActuationCommand>
where
    F: core::future::Future<Output = ()>,
{
    match select(run, channels.commands.receive()).await {
        Either::First(()) => None,
        Either::Second(command) => Some(command),
    }
}

/// Sleep until a wall-clock instant
async fn sleep_until<C: Clock>(clock: &C, deadline: Timestamp) {
    let remaining = deadline.millis_since(clock.now());
    if remaining > 0 {
        Timer::after_millis(remaining as u64).await;
    }
}

async fn run_beat<A: Actuator, C: Clock, E: Entropy>(
    scheduler: &mut BeatScheduler,
    rig: &mut Rig<'_, A, C, E>,
) {
    while let Some(deadline) = scheduler.next_deadline() {
        sleep_until(rig.clock, deadline).await;

        let Some(beat) = scheduler.poll(rig.clock.now(), rig.capability) else {
            continue;
        };
        if beat.skipped > 0 {
            debug!("Skipped {} late beats", beat.skipped);
        }
        if let Some(pulse) = &beat.pulse {
            rig.actuator.fire(pulse);
        }
        rig.channels.notify(Notification::Beat {
            index: beat.index,
            at: beat.due,
        });
    }
}

async fn run_reactive<A: Actuator, C: Clock, E: Entropy>(
    reactive: &mut ReactiveLoop,
    rig: &mut Rig<'_, A, C, E>,
) {
    loop {
        let sample = rig.channels.sample.latest();
        let Some(step) = reactive.step(
            sample,
            rig.clock.now(),
            rig.channels.peers_available(),
            rig.capability,
            &mut *rig.entropy,
        ) else {
            return;
        };

        rig.actuator.set_tone(step.tone);
        if let Some(pulse) = &step.pulse {
            rig.actuator.fire(pulse);
        }
        // Transport trouble must never stall actuation
        if let Some(telemetry) = step.telemetry {
            let _ = rig
                .channels
                .outbound
                .try_send(Outbound::Send(Message::Telemetry(telemetry)));
        }
        if step.rediscover {
            let _ = rig.channels.outbound.try_send(Outbound::Rediscover);
        }

        Timer::after_millis(step.delay_ms as u64).await;
    }
}
