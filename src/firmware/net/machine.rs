use statig::prelude::*;

use super::types::{ConnectionAttemptState, NetEvent, NetOutcome, NetPhase};
use crate::firmware::{config::NET_RETRY_LIMIT, types::NetworkCredentials};

#[derive(Debug)]
pub(super) struct NetMachine {
    pub(super) phase: NetPhase,
    pub(super) active: Option<NetworkCredentials>,
    pub(super) backup: Option<NetworkCredentials>,
    pub(super) attempt: ConnectionAttemptState,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) outcome: NetOutcome,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            outcome: NetOutcome::Unchanged,
        }
    }
}

impl NetMachine {
    pub(super) fn new(active: Option<NetworkCredentials>) -> Self {
        Self {
            phase: NetPhase::Disconnected,
            backup: active.clone(),
            active,
            attempt: ConnectionAttemptState::default(),
        }
    }

    fn begin_trial(&mut self, credentials: &NetworkCredentials) -> NetOutcome {
        self.backup = self.active.clone();
        self.active = Some(credentials.clone());
        self.attempt = ConnectionAttemptState {
            retry_count: 0,
            trialing: true,
            give_up: false,
        };
        self.phase = NetPhase::Disconnected;
        NetOutcome::TrialStarted
    }

    fn attempt_succeeded(&mut self) -> NetOutcome {
        let committed = self.attempt.trialing;
        self.attempt = ConnectionAttemptState::default();
        self.phase = NetPhase::Connected;
        if committed {
            NetOutcome::TrialCommitted
        } else {
            NetOutcome::Connected
        }
    }

    fn attempt_failed(&mut self) -> NetOutcome {
        let attempt = &mut self.attempt;
        attempt.retry_count = attempt.retry_count.saturating_add(1).min(NET_RETRY_LIMIT);
        if attempt.retry_count >= NET_RETRY_LIMIT {
            attempt.give_up = true;
        }
        if attempt.trialing && attempt.give_up {
            self.active = self.backup.clone();
            self.attempt = ConnectionAttemptState::default();
            return NetOutcome::RolledBack;
        }
        if attempt.give_up {
            NetOutcome::GaveUp
        } else {
            NetOutcome::Retrying
        }
    }
}

#[state_machine(initial = "State::disconnected()")]
impl NetMachine {
    #[state]
    fn disconnected(&mut self, context: &mut DispatchContext, event: &NetEvent) -> Outcome<State> {
        match event {
            NetEvent::BeginTrial(credentials) => {
                context.outcome = self.begin_trial(credentials);
                Handled
            }
            NetEvent::StartAttempt => {
                if self.active.is_none() {
                    context.outcome = NetOutcome::NoCredentials;
                    return Handled;
                }
                self.phase = NetPhase::Connecting;
                context.outcome = NetOutcome::AttemptStarted;
                Transition(State::connecting())
            }
            _ => Handled,
        }
    }

    #[state]
    fn connecting(&mut self, context: &mut DispatchContext, event: &NetEvent) -> Outcome<State> {
        match event {
            NetEvent::BeginTrial(credentials) => {
                context.outcome = self.begin_trial(credentials);
                Transition(State::disconnected())
            }
            NetEvent::StartAttempt => {
                context.outcome = NetOutcome::AttemptStarted;
                Handled
            }
            NetEvent::AttemptSucceeded => {
                context.outcome = self.attempt_succeeded();
                Transition(State::connected())
            }
            NetEvent::AttemptFailed => {
                context.outcome = self.attempt_failed();
                if self.active.is_none() {
                    self.phase = NetPhase::Disconnected;
                    return Transition(State::disconnected());
                }
                Handled
            }
            NetEvent::LinkLost => Handled,
        }
    }

    #[state]
    fn connected(&mut self, context: &mut DispatchContext, event: &NetEvent) -> Outcome<State> {
        match event {
            NetEvent::BeginTrial(credentials) => {
                context.outcome = self.begin_trial(credentials);
                Transition(State::disconnected())
            }
            NetEvent::LinkLost => {
                self.phase = NetPhase::Disconnected;
                context.outcome = NetOutcome::LinkLost;
                Transition(State::disconnected())
            }
            _ => Handled,
        }
    }
}
