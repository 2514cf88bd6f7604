// Chart animation state machine
use std::time::Duration;

/// Identifies the chart a scheduled continuation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionToken {
    pub generation: u64,
}

/// Timer source that calls back once a transition has run its course
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, token: TransitionToken);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating {
        generation: u64,
    },
}

/// `Idle -> Animating -> Idle`; every restart or stop bumps the generation
/// so continuations scheduled for an earlier chart are recognised as stale.
#[derive(Debug, Default)]
pub struct Animation {
    state: AnimationState,
    generation: u64,
}

impl Animation {
    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn restart(&mut self) -> TransitionToken {
        self.generation += 1;
        self.state = AnimationState::Animating {
            generation: self.generation,
        };
        TransitionToken {
            generation: self.generation,
        }
    }

    pub fn stop(&mut self) {
        self.generation += 1;
        self.state = AnimationState::Idle;
    }

    pub fn token(&self) -> Option<TransitionToken> {
        match self.state {
            AnimationState::Animating { generation } => Some(TransitionToken { generation }),
            AnimationState::Idle => None,
        }
    }

    pub fn is_current(&self, token: TransitionToken) -> bool {
        self.token() == Some(token)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingScheduler {
        pub scheduled: Vec<(Duration, TransitionToken)>,
    }

    impl RecordingScheduler {
        pub fn last(&self) -> Option<TransitionToken> {
            self.scheduled.last().map(|(_, token)| *token)
        }
    }

    impl Scheduler for RecordingScheduler {
        fn schedule(&mut self, delay: Duration, token: TransitionToken) {
            self.scheduled.push((delay, token));
        }
    }
}
