use statig::blocking::IntoStateMachineExt as _;

use super::machine::{DispatchContext, NetMachine};
use super::types::{ConnectionAttemptState, NetEvent, NetOutcome, NetPhase, NetSnapshot};
use crate::firmware::types::NetworkCredentials;

/// Credential rotation state: `Disconnected -> Connecting -> Connected` with a trial flag.
/// A trial that fails `NET_RETRY_LIMIT` times in a row restores the backup credentials.
pub struct NetEngine {
    machine: statig::blocking::StateMachine<NetMachine>,
}

impl NetEngine {
    pub fn new(active: Option<NetworkCredentials>) -> Self {
        Self {
            machine: NetMachine::new(active).state_machine(),
        }
    }

    pub fn phase(&self) -> NetPhase {
        self.machine.inner().phase
    }

    pub fn active(&self) -> Option<&NetworkCredentials> {
        self.machine.inner().active.as_ref()
    }

    pub fn backup(&self) -> Option<&NetworkCredentials> {
        self.machine.inner().backup.as_ref()
    }

    pub fn attempt(&self) -> ConnectionAttemptState {
        self.machine.inner().attempt
    }

    pub fn snapshot(&self) -> NetSnapshot {
        let inner = self.machine.inner();
        NetSnapshot {
            phase: inner.phase,
            active: inner.active.clone(),
            backup: inner.backup.clone(),
            attempt: inner.attempt,
        }
    }

    pub fn begin_trial(&mut self, credentials: NetworkCredentials) -> NetOutcome {
        self.dispatch(NetEvent::BeginTrial(credentials))
    }

    pub fn start_attempt(&mut self) -> NetOutcome {
        self.dispatch(NetEvent::StartAttempt)
    }

    pub fn attempt_succeeded(&mut self) -> NetOutcome {
        self.dispatch(NetEvent::AttemptSucceeded)
    }

    pub fn attempt_failed(&mut self) -> NetOutcome {
        self.dispatch(NetEvent::AttemptFailed)
    }

    pub fn link_lost(&mut self) -> NetOutcome {
        self.dispatch(NetEvent::LinkLost)
    }

    fn dispatch(&mut self, event: NetEvent) -> NetOutcome {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.outcome
    }
}
