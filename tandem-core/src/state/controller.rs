//! Mode controller
//!
//! Single owner of the device mode. Each intent is applied by
//! [`ModeController::handle`], which mutates the mode and returns the
//! effects the runtime must carry out, in order.

use heapless::Vec;
use tandem_protocol::{Message, ProfileId, SyncEnvelope, Telemetry};

use super::events::{Intent, Notification, Status};
use super::mode::Mode;
use crate::beat::BeatConfig;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::link::PeerLink;
use crate::shaping::{mirror_pulse, Pulse};
use crate::time::Timestamp;
use crate::traits::Capability;

/// Longest effect list a single transition produces
pub const MAX_EFFECTS: usize = 8;

/// Effects of one transition
pub type Effects = Vec<Effect, MAX_EFFECTS>;

/// Single pulses fired outside the running loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseRequest {
    /// Acknowledge a received config or engage
    Ack,
    /// Render one telemetry sample from the peer
    Mirror {
        profile: ProfileId,
        intensity_percent: u8,
    },
}

impl PulseRequest {
    /// Shape the request for the actuator at hand
    pub fn shape(self, capability: Capability) -> Option<Pulse> {
        match self {
            PulseRequest::Ack => Some(Pulse::ack()),
            PulseRequest::Mirror {
                profile,
                intensity_percent,
            } => mirror_pulse(profile, intensity_percent, capability),
        }
    }
}

/// Work the runtime performs after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Cancel the running loop
    StopLoop,
    /// Stop any pulse and mute the tone
    Silence,
    /// Start the beat loop anchored at `start`
    StartBeat { config: BeatConfig, start: Timestamp },
    /// Start the reactive loop
    StartReactive { audible: bool, profile: ProfileId },
    /// Fire one pulse without disturbing the running loop
    Pulse(PulseRequest),
    /// Send a message to the peer
    Send(Message),
    /// Tell the presentation layer
    Notify(Notification),
    /// Release platform resources
    Release,
}

/// Owner of the device mode
#[derive(Debug, Clone)]
pub struct ModeController {
    config: EngineConfig,
    mode: Mode,
    /// Last configuration stored by a config, share or engage
    stored: SyncEnvelope,
    /// Start instant of the current precision loop
    precision_start: Option<Timestamp>,
    link: PeerLink,
    /// Last published status, for de-duplication
    published: Status,
    peer_live: bool,
    closed: bool,
}

fn emit(effects: &mut Effects, effect: Effect) {
    // MAX_EFFECTS covers the longest transition
    let pushed = effects.push(effect).is_ok();
    debug_assert!(pushed, "effect list overflow");
}

impl ModeController {
    /// Create a controller in standby
    pub fn new(config: EngineConfig) -> Self {
        let link = PeerLink::new(config.link.peer_timeout_ms);
        let mode = Mode::Standby;
        Self {
            config,
            published: Status {
                label: mode.label(),
                active: false,
                peer_synced: link.is_synced(),
            },
            mode,
            stored: SyncEnvelope::default(),
            precision_start: None,
            link,
            peer_live: false,
            closed: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Last stored configuration (never carries a target)
    pub fn stored_config(&self) -> SyncEnvelope {
        self.stored
    }

    pub fn link(&self) -> &PeerLink {
        &self.link
    }

    /// Current status snapshot
    pub fn status(&self) -> Status {
        Status {
            label: self.mode.label(),
            active: self.mode.is_active(),
            peer_synced: self.link.is_synced(),
        }
    }

    /// Check whether precision mode is waiting for its start instant
    pub fn is_engaging(&self, now: Timestamp) -> bool {
        match self.precision_start {
            Some(start) => self.mode.is_precision() && now < start,
            None => false,
        }
    }

    /// Check whether teardown has run
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Apply one intent
    ///
    /// Invalid configuration is rejected with [`EngineError::InvalidConfig`]
    /// and leaves the controller untouched.
    pub fn handle(&mut self, intent: Intent, now: Timestamp) -> Result<Effects, EngineError> {
        let mut effects = Effects::new();
        if self.closed {
            return Ok(effects);
        }

        match intent {
            Intent::ApplyConfig(envelope) => self.store_config(envelope, false, &mut effects)?,
            Intent::ApplyEngage(envelope) => self.engage(envelope, false, now, &mut effects)?,
            Intent::ApplyStop => self.halt(false, &mut effects),
            Intent::RequestReactive { audible, profile } => {
                self.enter_reactive(audible, profile, &mut effects)
            }
            Intent::RequestHalt | Intent::Kill => self.halt(true, &mut effects),
            Intent::Initialize {
                profile,
                bpm,
                intensity,
            } => self.initialize(profile, bpm, intensity, now, &mut effects)?,
            Intent::ShareConfig(envelope) => {
                envelope.validate()?;
                self.stored = envelope.without_target();
                emit(&mut effects, Effect::Send(Message::Config(self.stored)));
            }
            Intent::Received(message) => self.receive(message, now, &mut effects)?,
            Intent::PeerUnreachable => {
                self.link.unreachable();
                self.publish_status(&mut effects);
            }
            Intent::PeerDelivered => {
                self.link.delivered();
                self.publish_status(&mut effects);
            }
            Intent::Shutdown => {
                self.halt(false, &mut effects);
                self.closed = true;
                emit(&mut effects, Effect::Release);
            }
        }
        Ok(effects)
    }

    /// Periodic bookkeeping; reports peer liveness changes
    pub fn tick(&mut self, now: Timestamp) -> Effects {
        let mut effects = Effects::new();
        if self.closed {
            return effects;
        }
        let live = self.link.is_live(now);
        if live != self.peer_live {
            self.peer_live = live;
            emit(
                &mut effects,
                Effect::Notify(Notification::PeerLiveness { live }),
            );
        }
        effects
    }

    fn receive(
        &mut self,
        message: Message,
        now: Timestamp,
        effects: &mut Effects,
    ) -> Result<(), EngineError> {
        // Validate before recording contact so a bad envelope changes nothing
        if let Message::Config(envelope) | Message::Engage(envelope) = message {
            envelope.validate()?;
        }
        self.link.contact(now);
        if !self.peer_live {
            self.peer_live = true;
            emit(
                effects,
                Effect::Notify(Notification::PeerLiveness { live: true }),
            );
        }

        match message {
            Message::Config(envelope) => self.store_config(envelope, true, effects),
            Message::Engage(envelope) => self.engage(envelope, true, now, effects),
            Message::Stop => {
                self.halt(false, effects);
                if self.config.ack_pulses {
                    emit(effects, Effect::Pulse(PulseRequest::Ack));
                }
                Ok(())
            }
            Message::Telemetry(sample) => {
                self.mirror(sample, effects);
                Ok(())
            }
        }
    }

    fn store_config(
        &mut self,
        envelope: SyncEnvelope,
        from_peer: bool,
        effects: &mut Effects,
    ) -> Result<(), EngineError> {
        envelope.validate()?;
        self.stored = envelope.without_target();
        emit(
            effects,
            Effect::Notify(Notification::ConfigChanged(self.stored)),
        );
        if from_peer && self.config.ack_pulses {
            emit(effects, Effect::Pulse(PulseRequest::Ack));
        }
        Ok(())
    }

    fn engage(
        &mut self,
        envelope: SyncEnvelope,
        from_peer: bool,
        now: Timestamp,
        effects: &mut Effects,
    ) -> Result<(), EngineError> {
        envelope.validate()?;
        let target = envelope.target.ok_or(EngineError::InvalidConfig)?;
        self.stored = envelope.without_target();
        emit(
            effects,
            Effect::Notify(Notification::ConfigChanged(self.stored)),
        );
        if from_peer && self.config.ack_pulses {
            emit(effects, Effect::Pulse(PulseRequest::Ack));
        }
        self.enter_precision(BeatConfig::from_envelope(&envelope), target, now, effects);
        Ok(())
    }

    fn initialize(
        &mut self,
        profile: ProfileId,
        bpm: u32,
        intensity: u8,
        now: Timestamp,
        effects: &mut Effects,
    ) -> Result<(), EngineError> {
        let envelope = SyncEnvelope::config(profile, bpm, intensity, self.stored.sleep);
        envelope.validate()?;
        let target = now + self.config.sync.lead_ms as u64;
        self.stored = envelope;
        self.enter_precision(BeatConfig::from_envelope(&envelope), target, now, effects);
        emit(
            effects,
            Effect::Send(Message::Engage(envelope.with_target(target))),
        );
        Ok(())
    }

    fn enter_precision(
        &mut self,
        config: BeatConfig,
        target: Timestamp,
        now: Timestamp,
        effects: &mut Effects,
    ) {
        if self.mode.is_active() {
            emit(effects, Effect::StopLoop);
        }
        // The beat loop never touches the tone
        if self.mode.is_reactive() {
            emit(effects, Effect::Silence);
        }
        emit(
            effects,
            Effect::StartBeat {
                config,
                start: target,
            },
        );
        self.mode = Mode::Precision {
            bpm: config.bpm,
            intensity: config.intensity,
            profile: config.profile,
        };
        self.precision_start = Some(target.max(now));
        self.publish_status(effects);
    }

    fn enter_reactive(&mut self, audible: bool, profile: ProfileId, effects: &mut Effects) {
        let next = Mode::Reactive { audible, profile };
        if self.mode == next {
            return;
        }
        if self.mode.is_active() {
            emit(effects, Effect::StopLoop);
        }
        emit(effects, Effect::StartReactive { audible, profile });
        self.mode = next;
        self.precision_start = None;
        self.publish_status(effects);
    }

    fn halt(&mut self, propagate: bool, effects: &mut Effects) {
        if self.mode.is_active() {
            emit(effects, Effect::StopLoop);
            emit(effects, Effect::Silence);
            self.mode = Mode::Standby;
            self.precision_start = None;
            self.publish_status(effects);
        }
        if propagate {
            emit(effects, Effect::Send(Message::Stop));
        }
    }

    fn mirror(&mut self, sample: Telemetry, effects: &mut Effects) {
        emit(
            effects,
            Effect::Notify(Notification::PeerTelemetry {
                intensity_percent: sample.intensity_percent,
            }),
        );
        match self.mode {
            // The local loop owns the actuator
            Mode::Reactive { .. } => return,
            // The peer took over; its telemetry replaces the beat
            Mode::Precision { .. } => {
                emit(effects, Effect::StopLoop);
                emit(effects, Effect::Silence);
                self.mode = Mode::Standby;
                self.precision_start = None;
                self.publish_status(effects);
            }
            Mode::Standby => {}
        }
        emit(
            effects,
            Effect::Pulse(PulseRequest::Mirror {
                profile: self.stored.profile,
                intensity_percent: sample.intensity_percent,
            }),
        );
    }

    fn publish_status(&mut self, effects: &mut Effects) {
        let status = self.status();
        if status != self.published {
            self.published = status.clone();
            emit(effects, Effect::Notify(Notification::StateChanged(status)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beat::BeatScheduler;
    use crate::config::DeviceRole;
    use tandem_protocol::ModeClass;

    fn ms(v: i64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn wrist() -> ModeController {
        ModeController::new(EngineConfig::for_role(DeviceRole::Wrist))
    }

    fn handheld() -> ModeController {
        ModeController::new(EngineConfig::for_role(DeviceRole::Handheld))
    }

    fn notifications(effects: &Effects) -> impl Iterator<Item = &Notification> {
        effects.iter().filter_map(|e| match e {
            Effect::Notify(n) => Some(n),
            _ => None,
        })
    }

    fn state_changes(effects: &Effects) -> usize {
        notifications(effects)
            .filter(|n| matches!(n, Notification::StateChanged(_)))
            .count()
    }

    fn reactive(audible: bool) -> Intent {
        Intent::RequestReactive {
            audible,
            profile: ProfileId::Pulse,
        }
    }

    fn initialize_60() -> Intent {
        Intent::Initialize {
            profile: ProfileId::Pulse,
            bpm: 60,
            intensity: 80,
        }
    }

    #[test]
    fn test_stop_from_standby_is_silent() {
        let mut ctl = wrist();
        assert!(ctl.handle(Intent::ApplyStop, ms(0)).unwrap().is_empty());
        assert!(ctl.handle(Intent::ApplyStop, ms(1)).unwrap().is_empty());
        assert_eq!(ctl.mode(), Mode::Standby);
    }

    #[test]
    fn test_reactive_start_and_idempotent_request() {
        let mut ctl = wrist();
        let effects = ctl.handle(reactive(true), ms(0)).unwrap();
        assert_eq!(
            effects[0],
            Effect::StartReactive {
                audible: true,
                profile: ProfileId::Pulse
            }
        );
        assert_eq!(state_changes(&effects), 1);
        assert_eq!(ctl.status().label.as_str(), "REACTIVE (AUDIBLE)");

        assert!(ctl.handle(reactive(true), ms(10)).unwrap().is_empty());

        // Switching audibility restarts the loop
        let effects = ctl.handle(reactive(false), ms(20)).unwrap();
        assert_eq!(effects[0], Effect::StopLoop);
        assert!(matches!(effects[1], Effect::StartReactive { audible: false, .. }));
    }

    #[test]
    fn test_reactive_during_precision_cancels_scheduler_first() {
        let mut ctl = wrist();
        ctl.handle(initialize_60(), ms(0)).unwrap();
        assert!(ctl.mode().is_precision());

        let effects = ctl.handle(reactive(false), ms(2_000)).unwrap();
        let stop = effects.iter().position(|e| *e == Effect::StopLoop).unwrap();
        let start = effects
            .iter()
            .position(|e| matches!(e, Effect::StartReactive { .. }))
            .unwrap();
        assert!(stop < start);
        assert!(!effects.iter().any(|e| matches!(e, Effect::StartBeat { .. })));
        assert!(ctl.mode().is_reactive());
    }

    #[test]
    fn test_initialize_engages_peer_at_lead() {
        let mut ctl = wrist();
        let now = ms(1_700_000_000_000);
        let effects = ctl.handle(initialize_60(), now).unwrap();
        let target = now.offset_ms(500);

        assert_eq!(
            effects[0],
            Effect::StartBeat {
                config: BeatConfig::new(ProfileId::Pulse, 60, 80),
                start: target,
            }
        );
        assert!(effects.contains(&Effect::Send(Message::Engage(SyncEnvelope::engage(
            ProfileId::Pulse,
            60,
            80,
            target
        )))));
        assert!(ctl.is_engaging(now));
        assert!(!ctl.is_engaging(target));
        assert_eq!(ctl.status().label.as_str(), "PRECISION (60 BPM)");
    }

    #[test]
    fn test_lead_is_configurable() {
        let mut config = EngineConfig::default();
        config.sync.lead_ms = 1_200;
        let mut ctl = ModeController::new(config);
        let effects = ctl.handle(initialize_60(), ms(0)).unwrap();
        assert!(matches!(
            effects[0],
            Effect::StartBeat { start, .. } if start == ms(1_200)
        ));
    }

    #[test]
    fn test_config_in_standby_notifies_once() {
        let mut ctl = handheld();
        let envelope = SyncEnvelope::config(ProfileId::Geiger, 90, 40, true);
        let effects = ctl
            .handle(Intent::Received(Message::Config(envelope)), ms(0))
            .unwrap();

        let configs: usize = notifications(&effects)
            .filter(|n| matches!(n, Notification::ConfigChanged(_)))
            .count();
        assert_eq!(configs, 1);
        assert_eq!(state_changes(&effects), 0);
        assert!(!effects.iter().any(|e| matches!(
            e,
            Effect::StopLoop | Effect::StartBeat { .. } | Effect::StartReactive { .. }
        )));
        assert!(effects.contains(&Effect::Pulse(PulseRequest::Ack)));
        assert_eq!(ctl.mode(), Mode::Standby);
        assert_eq!(ctl.stored_config(), envelope);
    }

    #[test]
    fn test_local_config_has_no_ack() {
        let mut ctl = wrist();
        let effects = ctl
            .handle(Intent::ApplyConfig(SyncEnvelope::default()), ms(0))
            .unwrap();
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_ack_can_be_disabled() {
        let mut config = EngineConfig::for_role(DeviceRole::Handheld);
        config.ack_pulses = false;
        let mut ctl = ModeController::new(config);
        let engage = SyncEnvelope::engage(ProfileId::Throb, 60, 30, ms(5_000));
        let effects = ctl
            .handle(Intent::Received(Message::Engage(engage)), ms(4_600))
            .unwrap();
        assert!(!effects.iter().any(|e| matches!(e, Effect::Pulse(_))));
    }

    #[test]
    fn test_inbound_engage_restarts_precision() {
        let mut ctl = handheld();
        let first = SyncEnvelope::engage(ProfileId::Pulse, 60, 50, ms(10_000));
        ctl.handle(Intent::Received(Message::Engage(first)), ms(9_500))
            .unwrap();

        let second = SyncEnvelope::engage(ProfileId::Geiger, 100, 70, ms(20_000));
        let effects = ctl
            .handle(Intent::Received(Message::Engage(second)), ms(19_500))
            .unwrap();
        assert!(effects.contains(&Effect::StopLoop));
        assert!(effects.contains(&Effect::StartBeat {
            config: BeatConfig::new(ProfileId::Geiger, 100, 70),
            start: ms(20_000),
        }));
        // Inbound engage never echoes
        assert!(!effects.iter().any(|e| matches!(e, Effect::Send(_))));
        assert_eq!(ctl.status().label.as_str(), "PRECISION (100 BPM)");
    }

    #[test]
    fn test_late_engage_fires_first_beat_immediately() {
        let mut ctl = handheld();
        let now = ms(100_000);
        let engage = SyncEnvelope::engage(ProfileId::Pulse, 60, 80, now.offset_ms(-1_000));
        let effects = ctl
            .handle(Intent::Received(Message::Engage(engage)), now)
            .unwrap();
        assert!(!ctl.is_engaging(now));

        let (config, start) = effects
            .iter()
            .find_map(|e| match e {
                Effect::StartBeat { config, start } => Some((*config, *start)),
                _ => None,
            })
            .unwrap();
        let mut sched = BeatScheduler::start(config, start, now).unwrap();
        let beat = sched.poll(now, Capability::AmplitudeControl).unwrap();
        assert_eq!(beat.index, 0);
        assert!(beat.pulse.is_some());
    }

    #[test]
    fn test_two_devices_share_target() {
        let mut a = wrist();
        let mut b = handheld();
        let t0 = ms(50_000);

        let effects = a.handle(initialize_60(), t0).unwrap();
        let engage = effects
            .iter()
            .find_map(|e| match e {
                Effect::Send(Message::Engage(env)) => Some(*env),
                _ => None,
            })
            .unwrap();

        // Delivered 40 ms later on the other device
        let effects_b = b
            .handle(Intent::Received(Message::Engage(engage)), t0.offset_ms(40))
            .unwrap();
        let start_a = effects.iter().find_map(|e| match e {
            Effect::StartBeat { start, .. } => Some(*start),
            _ => None,
        });
        let start_b = effects_b.iter().find_map(|e| match e {
            Effect::StartBeat { start, .. } => Some(*start),
            _ => None,
        });
        assert_eq!(start_a, start_b);
    }

    #[test]
    fn test_local_halt_propagates_inbound_stop_does_not() {
        let mut ctl = wrist();
        ctl.handle(reactive(true), ms(0)).unwrap();
        let effects = ctl.handle(Intent::RequestHalt, ms(10)).unwrap();
        assert_eq!(effects[0], Effect::StopLoop);
        assert_eq!(effects[1], Effect::Silence);
        assert!(effects.contains(&Effect::Send(Message::Stop)));

        ctl.handle(reactive(true), ms(20)).unwrap();
        let effects = ctl
            .handle(Intent::Received(Message::Stop), ms(30))
            .unwrap();
        assert!(effects.contains(&Effect::Silence));
        assert!(!effects.iter().any(|e| matches!(e, Effect::Send(_))));
    }

    #[test]
    fn test_inbound_stop_is_acknowledged() {
        let mut ctl = handheld();
        let engage = SyncEnvelope::engage(ProfileId::Pulse, 60, 50, ms(1_000));
        ctl.handle(Intent::Received(Message::Engage(engage)), ms(500))
            .unwrap();

        let effects = ctl
            .handle(Intent::Received(Message::Stop), ms(2_000))
            .unwrap();
        let silence = effects.iter().position(|e| *e == Effect::Silence).unwrap();
        let ack = effects
            .iter()
            .position(|e| *e == Effect::Pulse(PulseRequest::Ack))
            .unwrap();
        assert!(silence < ack);

        let mut config = EngineConfig::for_role(DeviceRole::Handheld);
        config.ack_pulses = false;
        let mut quiet = ModeController::new(config);
        let effects = quiet
            .handle(Intent::Received(Message::Stop), ms(0))
            .unwrap();
        assert!(!effects.iter().any(|e| matches!(e, Effect::Pulse(_))));
    }

    #[test]
    fn test_precision_after_reactive_mutes_tone() {
        let mut ctl = wrist();
        ctl.handle(reactive(true), ms(0)).unwrap();
        let effects = ctl.handle(initialize_60(), ms(1_000)).unwrap();
        assert_eq!(effects[0], Effect::StopLoop);
        assert_eq!(effects[1], Effect::Silence);
        assert!(matches!(effects[2], Effect::StartBeat { .. }));

        // Precision to precision has no tone to mute
        let effects = ctl.handle(initialize_60(), ms(2_000)).unwrap();
        assert_eq!(effects[0], Effect::StopLoop);
        assert!(!effects.contains(&Effect::Silence));
    }

    #[test]
    fn test_kill_from_any_state() {
        let setups: [Option<Intent>; 3] = [None, Some(reactive(true)), Some(initialize_60())];
        for setup in setups {
            let mut ctl = wrist();
            if let Some(intent) = setup {
                ctl.handle(intent, ms(0)).unwrap();
            }
            let effects = ctl.handle(Intent::Kill, ms(100)).unwrap();
            assert_eq!(ctl.mode(), Mode::Standby);
            assert!(effects.contains(&Effect::Send(Message::Stop)));
            assert_eq!(effects.contains(&Effect::Silence), setup.is_some());
        }
    }

    #[test]
    fn test_invalid_config_keeps_prior_state() {
        let mut ctl = wrist();
        ctl.handle(reactive(false), ms(0)).unwrap();
        let before = ctl.mode();

        let bad = Intent::Initialize {
            profile: ProfileId::Pulse,
            bpm: 0,
            intensity: 50,
        };
        assert_eq!(ctl.handle(bad, ms(10)), Err(EngineError::InvalidConfig));

        let bad = Intent::ApplyConfig(SyncEnvelope::config(ProfileId::Pulse, 60, 101, false));
        assert_eq!(ctl.handle(bad, ms(20)), Err(EngineError::InvalidConfig));

        // Engage without a target instant
        let bad = Intent::ApplyEngage(SyncEnvelope::default());
        assert_eq!(ctl.handle(bad, ms(30)), Err(EngineError::InvalidConfig));

        assert_eq!(ctl.mode(), before);
        assert_eq!(ctl.stored_config(), SyncEnvelope::default());
    }

    #[test]
    fn test_unreachable_peer_marks_local_only_once() {
        let mut ctl = wrist();
        ctl.handle(reactive(true), ms(0)).unwrap();

        let effects = ctl.handle(Intent::PeerUnreachable, ms(10)).unwrap();
        assert_eq!(
            effects[0],
            Effect::Notify(Notification::StateChanged(Status {
                label: Mode::Reactive {
                    audible: true,
                    profile: ProfileId::Pulse
                }
                .label(),
                active: true,
                peer_synced: false,
            }))
        );
        // Duplicate status is suppressed
        assert!(ctl.handle(Intent::PeerUnreachable, ms(20)).unwrap().is_empty());

        let effects = ctl.handle(Intent::PeerDelivered, ms(30)).unwrap();
        assert_eq!(state_changes(&effects), 1);
        assert!(ctl.status().peer_synced);
    }

    #[test]
    fn test_share_config_sends_without_target() {
        let mut ctl = wrist();
        let envelope = SyncEnvelope::engage(ProfileId::Throb, 75, 60, ms(123));
        let effects = ctl.handle(Intent::ShareConfig(envelope), ms(0)).unwrap();
        assert_eq!(
            effects[0],
            Effect::Send(Message::Config(envelope.without_target()))
        );
        assert_eq!(ctl.mode(), Mode::Standby);
    }

    #[test]
    fn test_telemetry_mirrors_in_standby() {
        let mut ctl = handheld();
        ctl.handle(
            Intent::ApplyConfig(SyncEnvelope::config(ProfileId::Throb, 60, 50, false)),
            ms(0),
        )
        .unwrap();

        let sample = Telemetry {
            mode: ModeClass::ReactiveAudible,
            intensity_percent: 42,
        };
        let effects = ctl
            .handle(Intent::Received(Message::Telemetry(sample)), ms(10))
            .unwrap();
        assert!(effects.contains(&Effect::Notify(Notification::PeerTelemetry {
            intensity_percent: 42
        })));
        assert!(effects.contains(&Effect::Pulse(PulseRequest::Mirror {
            profile: ProfileId::Throb,
            intensity_percent: 42,
        })));
        assert_eq!(ctl.mode(), Mode::Standby);
    }

    #[test]
    fn test_telemetry_cancels_precision() {
        let mut ctl = handheld();
        let engage = SyncEnvelope::engage(ProfileId::Pulse, 60, 50, ms(1_000));
        ctl.handle(Intent::Received(Message::Engage(engage)), ms(500))
            .unwrap();

        let sample = Telemetry {
            mode: ModeClass::ReactiveSilent,
            intensity_percent: 80,
        };
        let effects = ctl
            .handle(Intent::Received(Message::Telemetry(sample)), ms(5_000))
            .unwrap();
        assert!(effects.contains(&Effect::StopLoop));
        assert_eq!(state_changes(&effects), 1);
        assert!(matches!(effects.last(), Some(Effect::Pulse(_))));
        assert_eq!(ctl.mode(), Mode::Standby);
    }

    #[test]
    fn test_telemetry_ignored_during_local_reactive() {
        let mut ctl = handheld();
        ctl.handle(reactive(true), ms(0)).unwrap();
        let sample = Telemetry {
            mode: ModeClass::ReactiveAudible,
            intensity_percent: 90,
        };
        let effects = ctl
            .handle(Intent::Received(Message::Telemetry(sample)), ms(10))
            .unwrap();
        assert!(!effects.iter().any(|e| matches!(
            e,
            Effect::Pulse(_) | Effect::StopLoop | Effect::Silence
        )));
        assert!(ctl.mode().is_reactive());
    }

    #[test]
    fn test_peer_liveness() {
        let mut ctl = handheld();
        let effects = ctl
            .handle(Intent::Received(Message::Stop), ms(1_000))
            .unwrap();
        assert_eq!(
            effects[0],
            Effect::Notify(Notification::PeerLiveness { live: true })
        );
        assert!(ctl.tick(ms(2_000)).is_empty());

        let effects = ctl.tick(ms(3_500));
        assert_eq!(
            effects[0],
            Effect::Notify(Notification::PeerLiveness { live: false })
        );
        assert!(ctl.tick(ms(4_000)).is_empty());
    }

    #[test]
    fn test_shutdown_forces_standby_and_closes() {
        let mut ctl = wrist();
        ctl.handle(initialize_60(), ms(0)).unwrap();
        let effects = ctl.handle(Intent::Shutdown, ms(10)).unwrap();
        assert_eq!(effects[0], Effect::StopLoop);
        assert_eq!(effects[1], Effect::Silence);
        assert_eq!(effects.last(), Some(&Effect::Release));
        assert!(!effects.iter().any(|e| matches!(e, Effect::Send(_))));
        assert!(ctl.is_closed());

        assert!(ctl.handle(reactive(true), ms(20)).unwrap().is_empty());
        assert!(ctl.tick(ms(30)).is_empty());
        assert_eq!(ctl.mode(), Mode::Standby);
    }

    #[test]
    fn test_pulse_request_shape() {
        assert_eq!(
            PulseRequest::Ack.shape(Capability::FixedEffect),
            Some(Pulse::ack())
        );
        let quiet = PulseRequest::Mirror {
            profile: ProfileId::Pulse,
            intensity_percent: 3,
        };
        assert_eq!(quiet.shape(Capability::AmplitudeControl), None);
    }
}
