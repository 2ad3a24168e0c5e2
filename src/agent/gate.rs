use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::event::ActivityEvent;

/// Minimum enforced interval between passive heartbeats for the same file
/// and project. Writes and file/project switches bypass it.
pub const DEFAULT_CADENCE: Duration = Duration::seconds(120);

/// The rule that let a heartbeat through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitReason {
    Write,
    CadenceElapsed,
    FileChanged,
    ProjectChanged,
}

/// Tracking state for one account. Mutated only through
/// [HeartbeatGate::commit] after a heartbeat was actually emitted, so a
/// suppressed event leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateState {
    last_heartbeat_time: Option<DateTime<Utc>>,
    last_path: Option<Arc<str>>,
    last_project: Option<Arc<str>>,
}

impl GateState {
    pub fn last_heartbeat_time(&self) -> Option<DateTime<Utc>> {
        self.last_heartbeat_time
    }
}

/// Decides whether an activity event is worth a heartbeat right now.
/// Decision and state update are split so that callers only commit once a
/// heartbeat is actually handed to the transport.
#[derive(Debug)]
pub struct HeartbeatGate {
    cadence: Duration,
}

impl HeartbeatGate {
    pub fn new(cadence: Duration) -> Self {
        Self { cadence }
    }

    pub fn with_default_cadence() -> Self {
        Self::new(DEFAULT_CADENCE)
    }

    /// Evaluates the rules in order and returns the first that fired, or
    /// `None` when the event should be suppressed.
    pub fn decide(&self, event: &ActivityEvent, state: &GateState) -> Option<EmitReason> {
        if event.kind.is_write() {
            return Some(EmitReason::Write);
        }
        if self.cadence_elapsed(event.timestamp, state) {
            return Some(EmitReason::CadenceElapsed);
        }
        if state.last_path.as_deref() != Some(event.path.as_ref()) {
            return Some(EmitReason::FileChanged);
        }
        if state.last_project.as_deref() != event.project.as_deref() {
            return Some(EmitReason::ProjectChanged);
        }
        None
    }

    /// Records an emitted heartbeat. Must only be called for events that
    /// [decide](Self::decide) approved.
    pub fn commit(&self, event: &ActivityEvent, state: &mut GateState) {
        state.last_heartbeat_time = Some(event.timestamp);
        state.last_path = Some(event.path.clone());
        state.last_project = event.project.clone();
    }

    fn cadence_elapsed(&self, now: DateTime<Utc>, state: &GateState) -> bool {
        match state.last_heartbeat_time {
            Some(last) => now - last >= self.cadence,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use crate::agent::event::ActivityKind;

    use super::*;

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn at(offset_ms: i64) -> DateTime<Utc> {
        Utc.from_utc_datetime(&TEST_START_DATE) + Duration::milliseconds(offset_ms)
    }

    fn event(path: &str, kind: ActivityKind, offset_ms: i64) -> ActivityEvent {
        ActivityEvent {
            path: path.into(),
            project: Some("workspace".into()),
            language: Some("rust".into()),
            kind,
            lines: 10,
            timestamp: at(offset_ms),
        }
    }

    /// Runs decide and, when the event passes, commit. Mirrors what the
    /// sender does with emitted events.
    fn feed(gate: &HeartbeatGate, state: &mut GateState, event: &ActivityEvent) -> Option<EmitReason> {
        let reason = gate.decide(event, state);
        if reason.is_some() {
            gate.commit(event, state);
        }
        reason
    }

    #[test]
    fn first_event_emits_without_history() {
        let gate = HeartbeatGate::with_default_cadence();
        let state = GateState::default();

        let reason = gate.decide(&event("a.rs", ActivityKind::Change, 0), &state);

        assert_eq!(reason, Some(EmitReason::CadenceElapsed));
    }

    #[test]
    fn same_file_within_window_is_suppressed() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        assert!(feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0)).is_some());
        assert_eq!(feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 1_000)), None);
        assert_eq!(feed(&gate, &mut state, &event("a.rs", ActivityKind::Focus, 119_999)), None);
    }

    #[test]
    fn suppressed_event_leaves_state_untouched() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0));
        let snapshot = state.clone();

        assert_eq!(feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 1_000)), None);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn write_always_emits() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0));

        // Same file, same project, deep inside the cadence window.
        let reason = feed(&gate, &mut state, &event("a.rs", ActivityKind::Save, 500));
        assert_eq!(reason, Some(EmitReason::Write));
    }

    #[test]
    fn cadence_window_boundary_is_inclusive() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0));

        assert_eq!(feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 119_999)), None);
        assert_eq!(
            feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 120_000)),
            Some(EmitReason::CadenceElapsed)
        );
    }

    #[test]
    fn file_switch_overrides_cadence() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0));

        let reason = feed(&gate, &mut state, &event("b.rs", ActivityKind::Change, 500));
        assert_eq!(reason, Some(EmitReason::FileChanged));
    }

    #[test]
    fn project_switch_overrides_cadence() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0));

        let mut moved = event("a.rs", ActivityKind::Change, 500);
        moved.project = Some("other workspace".into());
        assert_eq!(feed(&gate, &mut state, &moved), Some(EmitReason::ProjectChanged));
    }

    #[test]
    fn losing_the_project_counts_as_a_switch() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0));

        let mut detached = event("a.rs", ActivityKind::Change, 500);
        detached.project = None;
        assert_eq!(feed(&gate, &mut state, &detached), Some(EmitReason::ProjectChanged));
    }

    #[test]
    fn commit_records_the_emitting_timestamp_exactly() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 123));
        assert_eq!(state.last_heartbeat_time(), Some(at(123)));

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Save, 4_567));
        assert_eq!(state.last_heartbeat_time(), Some(at(4_567)));
    }

    #[test]
    fn mixed_activity_sequence() {
        let gate = HeartbeatGate::with_default_cadence();
        let mut state = GateState::default();

        assert_eq!(
            feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0)),
            Some(EmitReason::CadenceElapsed)
        );
        assert_eq!(feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 1_000)), None);
        assert_eq!(
            feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 121_000)),
            Some(EmitReason::CadenceElapsed)
        );
        assert_eq!(
            feed(&gate, &mut state, &event("b.rs", ActivityKind::Change, 121_500)),
            Some(EmitReason::FileChanged)
        );
        assert_eq!(
            feed(&gate, &mut state, &event("b.rs", ActivityKind::Save, 121_600)),
            Some(EmitReason::Write)
        );
    }

    #[test]
    fn custom_cadence_is_honored() {
        let gate = HeartbeatGate::new(Duration::seconds(10));
        let mut state = GateState::default();

        feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 0));

        assert_eq!(feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 9_999)), None);
        assert_eq!(
            feed(&gate, &mut state, &event("a.rs", ActivityKind::Change, 10_000)),
            Some(EmitReason::CadenceElapsed)
        );
    }
}
