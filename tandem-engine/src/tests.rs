//! Runtime tests: the three tasks against fake collaborators on the host

use std::vec::Vec;

use embassy_futures::{block_on, yield_now};
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use tandem_core::shaping::{Effect as Haptic, Pulse};
use tandem_protocol::{decode_engage, decode_telemetry, encode_engage};

use crate::*;

#[derive(Debug, Clone, PartialEq)]
enum Actuation {
    Fire(Pulse),
    Tone(f32),
    Silence,
}

struct FakeActuator {
    capability: Result<Capability, EngineError>,
    log: Vec<Actuation>,
}

impl FakeActuator {
    fn new() -> Self {
        Self {
            capability: Ok(Capability::AmplitudeControl),
            log: Vec::new(),
        }
    }

    fn fired(&self) -> Vec<Pulse> {
        self.log
            .iter()
            .filter_map(|a| match a {
                Actuation::Fire(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Actuator for FakeActuator {
    fn capability(&self) -> Result<Capability, EngineError> {
        self.capability
    }

    fn fire(&mut self, pulse: &Pulse) {
        self.log.push(Actuation::Fire(pulse.clone()));
    }

    fn set_tone(&mut self, amplitude: f32) {
        self.log.push(Actuation::Tone(amplitude));
    }

    fn silence(&mut self) {
        self.log.push(Actuation::Silence);
    }
}

struct FakePeer {
    present: bool,
    sent: Vec<(Route, Vec<u8>)>,
    rediscoveries: usize,
}

impl FakePeer {
    fn new(present: bool) -> Self {
        Self {
            present,
            sent: Vec::new(),
            rediscoveries: 0,
        }
    }

    fn routes(&self) -> Vec<Route> {
        self.sent.iter().map(|(route, _)| *route).collect()
    }
}

impl PeerChannel for FakePeer {
    fn has_peers(&self) -> bool {
        self.present
    }

    fn send(&mut self, route: Route, payload: &[u8]) -> Result<(), EngineError> {
        self.sent.push((route, payload.to_vec()));
        Ok(())
    }

    fn rediscover(&mut self) {
        self.rediscoveries += 1;
    }
}

fn test_config(role: DeviceRole) -> EngineConfig {
    let mut config = EngineConfig::for_role(role);
    config.sync.lead_ms = 20;
    config
}

fn test_clock() -> WallClock {
    WallClock::new(Timestamp::from_millis(1_700_000_000_000))
}

/// Gather notifications for `ms` milliseconds
async fn collect(handle: &EngineHandle<'_>, ms: u64, into: &mut Vec<Notification>) {
    let deadline = Instant::now() + Duration::from_millis(ms);
    loop {
        match select(Timer::at(deadline), handle.next_notification()).await {
            Either::First(()) => return,
            Either::Second(notification) => into.push(notification),
        }
    }
}

fn wrist_engine(channels: &EngineChannels) -> Engine<'_, FakeActuator, FakePeer, WallClock, SmallRng> {
    Engine::new(
        channels,
        test_config(DeviceRole::Wrist),
        FakeActuator::new(),
        FakePeer::new(true),
        test_clock(),
        SmallRng::seed_from_u64(7),
    )
    .unwrap()
}

fn is_beat_pulse(action: &Actuation) -> bool {
    *action == Actuation::Fire(Pulse::one_shot(50, 204))
}

async fn strong_motion(handle: &EngineHandle<'_>) {
    for _ in 0..10 {
        handle.publish_sample(8.0);
        Timer::after_millis(10).await;
    }
}

fn beats(notifications: &[Notification]) -> Vec<(u64, Timestamp)> {
    notifications
        .iter()
        .filter_map(|n| match n {
            Notification::Beat { index, at } => Some((*index, *at)),
            _ => None,
        })
        .collect()
}

fn states(notifications: &[Notification]) -> Vec<Status> {
    notifications
        .iter()
        .filter_map(|n| match n {
            Notification::StateChanged(status) => Some(status.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_invalid_config_rejected() {
    let channels = EngineChannels::new();
    let mut config = test_config(DeviceRole::Wrist);
    config.sync.lead_ms = 0;
    let result = Engine::new(
        &channels,
        config,
        FakeActuator::new(),
        FakePeer::new(true),
        test_clock(),
        SmallRng::seed_from_u64(7),
    );
    assert!(matches!(result, Err(EngineError::InvalidConfig)));
}

#[test]
fn test_initialize_fires_anchored_beats() {
    let channels = EngineChannels::new();
    let engine = Engine::new(
        &channels,
        test_config(DeviceRole::Wrist),
        FakeActuator::new(),
        FakePeer::new(true),
        test_clock(),
        SmallRng::seed_from_u64(7),
    )
    .unwrap();
    let handle = engine.handle();
    let mut seen = Vec::new();

    let ((actuator, peer), ()) = block_on(join(engine.run(), async {
        handle.initialize(ProfileId::Pulse, 600, 80).unwrap();
        collect(&handle, 380, &mut seen).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    let states = states(&seen);
    assert_eq!(states[0].label.as_str(), "PRECISION (600 BPM)");
    assert!(states[0].active);
    assert!(states[0].peer_synced);
    assert_eq!(states.last().unwrap().label.as_str(), "STANDBY");

    let beats = beats(&seen);
    assert!(beats.len() >= 2, "beats: {:?}", beats);
    assert_eq!(beats[0].0, 0);
    for pair in beats.windows(2) {
        let steps = (pair[1].0 - pair[0].0) as i64;
        assert!(steps >= 1);
        // Due instants sit exactly on the anchor grid
        assert_eq!(pair[1].1 - pair[0].1, steps * 100);
    }

    assert!(actuator
        .fired()
        .iter()
        .all(|p| *p == Pulse::one_shot(50, 204)));
    assert!(actuator.fired().len() >= 2);
    assert_eq!(actuator.log.last(), Some(&Actuation::Silence));

    assert_eq!(peer.routes()[0], Route::Engage);
    let engage = decode_engage(&peer.sent[0].1).unwrap();
    assert_eq!(engage.bpm, 600);
    // Beat zero is anchored on the shared instant unless the loop started late
    let target = engage.target.unwrap();
    assert!(beats[0].1 >= target);
}

#[test]
fn test_degraded_actuator_uses_fixed_effects() {
    let channels = EngineChannels::new();
    let mut actuator = FakeActuator::new();
    actuator.capability = Err(EngineError::ActuatorUnavailable);
    let engine = Engine::new(
        &channels,
        test_config(DeviceRole::Wrist),
        actuator,
        FakePeer::new(true),
        test_clock(),
        SmallRng::seed_from_u64(7),
    )
    .unwrap();
    let handle = engine.handle();
    let mut seen = Vec::new();

    let ((actuator, _), ()) = block_on(join(engine.run(), async {
        handle.initialize(ProfileId::Throb, 600, 80).unwrap();
        collect(&handle, 200, &mut seen).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    let fired = actuator.fired();
    assert!(!fired.is_empty());
    assert!(fired.iter().all(|p| *p == Pulse::Effect(Haptic::Click)));
}

#[test]
fn test_reactive_streams_telemetry() {
    let channels = EngineChannels::new();
    let engine = Engine::new(
        &channels,
        test_config(DeviceRole::Wrist),
        FakeActuator::new(),
        FakePeer::new(true),
        test_clock(),
        SmallRng::seed_from_u64(7),
    )
    .unwrap();
    let handle = engine.handle();
    let mut seen = Vec::new();

    let ((actuator, peer), ()) = block_on(join(engine.run(), async {
        handle.request_reactive(true, ProfileId::Pulse).unwrap();
        for _ in 0..10 {
            handle.publish_sample(8.0);
            Timer::after_millis(10).await;
        }
        collect(&handle, 250, &mut seen).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    assert_eq!(states(&seen)[0].label.as_str(), "REACTIVE (AUDIBLE)");

    let telemetry: Vec<_> = peer
        .sent
        .iter()
        .filter(|(route, _)| *route == Route::Telemetry)
        .map(|(_, payload)| decode_telemetry(payload).unwrap())
        .collect();
    assert!(!telemetry.is_empty());
    assert!(telemetry.last().unwrap().intensity_percent > 50);

    assert!(actuator
        .log
        .iter()
        .any(|a| matches!(a, Actuation::Tone(t) if *t > 0.2)));
    assert!(actuator
        .fired()
        .iter()
        .any(|p| matches!(p, Pulse::OneShot { duration_ms: 30, .. })));
}

#[test]
fn test_unreachable_peer_runs_local_only() {
    let channels = EngineChannels::new();
    let engine = Engine::new(
        &channels,
        test_config(DeviceRole::Wrist),
        FakeActuator::new(),
        FakePeer::new(false),
        test_clock(),
        SmallRng::seed_from_u64(7),
    )
    .unwrap();
    let handle = engine.handle();
    let mut seen = Vec::new();

    let ((actuator, peer), ()) = block_on(join(engine.run(), async {
        handle.initialize(ProfileId::Pulse, 600, 80).unwrap();
        collect(&handle, 200, &mut seen).await;
        handle.request_reactive(false, ProfileId::Pulse).unwrap();
        for _ in 0..10 {
            handle.publish_sample(8.0);
            Timer::after_millis(10).await;
        }
        collect(&handle, 100, &mut seen).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    assert!(peer.sent.is_empty());
    assert!(peer.rediscoveries >= 1);
    assert!(states(&seen)
        .iter()
        .any(|s| s.active && !s.peer_synced));
    // Beats keep firing without the peer
    assert!(!beats(&seen).is_empty());
    assert!(!actuator.fired().is_empty());
}

#[test]
fn test_kill_halts_and_stops_peer() {
    let channels = EngineChannels::new();
    let engine = Engine::new(
        &channels,
        test_config(DeviceRole::Wrist),
        FakeActuator::new(),
        FakePeer::new(true),
        test_clock(),
        SmallRng::seed_from_u64(7),
    )
    .unwrap();
    let handle = engine.handle();
    let mut seen = Vec::new();
    let mut after_kill = Vec::new();

    let ((actuator, peer), ()) = block_on(join(engine.run(), async {
        handle.initialize(ProfileId::Pulse, 600, 80).unwrap();
        collect(&handle, 150, &mut seen).await;
        handle.kill();
        collect(&handle, 100, &mut seen).await;
        // No beats once the kill has landed
        collect(&handle, 200, &mut after_kill).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    assert_eq!(peer.routes(), [Route::Engage, Route::Stop]);
    let states = states(&seen);
    let last = states.last().unwrap();
    assert_eq!(last.label.as_str(), "STANDBY");
    assert!(!last.active);
    assert!(beats(&after_kill).is_empty());
    assert!(actuator.log.contains(&Actuation::Silence));
}

#[test]
fn test_peer_engage_is_acknowledged_and_followed() {
    let channels = EngineChannels::new();
    let clock = test_clock();
    let engine = Engine::new(
        &channels,
        test_config(DeviceRole::Handheld),
        FakeActuator::new(),
        FakePeer::new(true),
        clock,
        SmallRng::seed_from_u64(7),
    )
    .unwrap();
    let handle = engine.handle();
    let mut seen = Vec::new();
    let envelope = SyncEnvelope::engage(ProfileId::Geiger, 600, 50, clock.now().offset_ms(30));

    let ((actuator, peer), ()) = block_on(join(engine.run(), async {
        let payload = encode_engage(&envelope).unwrap();
        handle.deliver("/clinical_engage", &payload).unwrap();
        collect(&handle, 250, &mut seen).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    assert!(seen.contains(&Notification::ConfigChanged(envelope.without_target())));
    assert!(seen.contains(&Notification::PeerLiveness { live: true }));
    let fired = actuator.fired();
    assert_eq!(fired[0], Pulse::ack());
    assert!(fired[1..].iter().all(|p| *p == Pulse::Effect(Haptic::Tick)));
    assert!(fired.len() >= 2);
    // A received engage is not echoed back
    assert!(peer.sent.is_empty());
}

#[test]
fn test_precision_after_reactive_mutes_tone() {
    let channels = EngineChannels::new();
    let engine = wrist_engine(&channels);
    let handle = engine.handle();
    let mut seen = Vec::new();

    let ((actuator, _), ()) = block_on(join(engine.run(), async {
        handle.request_reactive(true, ProfileId::Pulse).unwrap();
        strong_motion(&handle).await;
        collect(&handle, 100, &mut seen).await;
        handle.initialize(ProfileId::Pulse, 600, 80).unwrap();
        collect(&handle, 300, &mut seen).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    let log = &actuator.log;
    let first_beat = log.iter().position(is_beat_pulse).unwrap();
    let last_tone = log[..first_beat]
        .iter()
        .rposition(|a| matches!(a, Actuation::Tone(t) if *t > 0.0))
        .unwrap();
    assert!(log[last_tone..first_beat].contains(&Actuation::Silence));
    assert!(!log[first_beat..]
        .iter()
        .any(|a| matches!(a, Actuation::Tone(_))));
}

#[test]
fn test_reactive_during_precision_is_exclusive() {
    let channels = EngineChannels::new();
    let engine = wrist_engine(&channels);
    let handle = engine.handle();
    let mut seen = Vec::new();

    let ((actuator, _), ()) = block_on(join(engine.run(), async {
        handle.initialize(ProfileId::Pulse, 600, 80).unwrap();
        collect(&handle, 250, &mut seen).await;
        handle.request_reactive(true, ProfileId::Pulse).unwrap();
        strong_motion(&handle).await;
        collect(&handle, 200, &mut seen).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    assert!(!beats(&seen).is_empty());
    let log = &actuator.log;
    let first_tone = log
        .iter()
        .position(|a| matches!(a, Actuation::Tone(_)))
        .unwrap();
    assert!(log[..first_tone].iter().any(is_beat_pulse));
    assert!(!log[first_tone..].iter().any(is_beat_pulse));
    assert!(log[first_tone..]
        .iter()
        .any(|a| matches!(a, Actuation::Fire(Pulse::OneShot { duration_ms: 30, .. }))));
}

#[test]
fn test_kill_overtakes_queued_intents() {
    let channels = EngineChannels::new();
    let engine = wrist_engine(&channels);
    let handle = engine.handle();
    let mut seen = Vec::new();

    let ((_, peer), ()) = block_on(join(engine.run(), async {
        for _ in 0..4 {
            handle.initialize(ProfileId::Pulse, 600, 80).unwrap();
            handle.request_reactive(true, ProfileId::Pulse).unwrap();
        }
        // Let the controller start draining, then pull the switch
        yield_now().await;
        handle.kill();
        collect(&handle, 100, &mut seen).await;
        handle.shutdown().unwrap();
        collect(&handle, 50, &mut seen).await;
    }));

    let routes = peer.routes();
    let engages = routes.iter().filter(|r| **r == Route::Engage).count();
    assert_eq!(engages, 4);
    let stop = routes.iter().position(|r| *r == Route::Stop).unwrap();
    // Intents queued before the kill still run, but after it
    assert!(routes[stop + 1..].contains(&Route::Engage));
}
