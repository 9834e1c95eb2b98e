/// Final result of a run, reported through the process exit status.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Frame-loop lifecycle.
///
/// The loop moves strictly forward: setup, steady-state rendering, terminal.
/// Termination is sticky; the first recorded outcome wins. The runtime applies
/// quit requests only at the top of an iteration, so a transition never
/// interrupts a frame mid-draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    Initializing,
    Running,
    Terminated(Outcome),
}

impl Phase {
    /// Enters the steady state. Only meaningful from `Initializing`.
    pub fn begin_running(&mut self) {
        if *self == Phase::Initializing {
            *self = Phase::Running;
        }
    }

    /// Records the terminal outcome unless one is already set.
    pub fn terminate(&mut self, outcome: Outcome) {
        if !matches!(*self, Phase::Terminated(_)) {
            *self = Phase::Terminated(outcome);
        }
    }

    pub fn is_running(&self) -> bool {
        *self == Phase::Running
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match *self {
            Phase::Terminated(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_completion_enters_running() {
        let mut phase = Phase::Initializing;
        phase.begin_running();
        assert!(phase.is_running());
        assert_eq!(phase.outcome(), None);
    }

    #[test]
    fn setup_failure_terminates_without_running() {
        let mut phase = Phase::Initializing;
        phase.terminate(Outcome::Failure);
        assert_eq!(phase, Phase::Terminated(Outcome::Failure));

        // A late begin_running must not resurrect the loop.
        phase.begin_running();
        assert_eq!(phase.outcome(), Some(Outcome::Failure));
    }

    #[test]
    fn first_terminal_outcome_is_sticky() {
        let mut phase = Phase::Running;
        phase.terminate(Outcome::Success);
        phase.terminate(Outcome::Failure);
        assert_eq!(phase.outcome(), Some(Outcome::Success));
    }

    #[test]
    fn quit_flag_is_applied_at_the_iteration_check() {
        let mut phase = Phase::Initializing;
        phase.begin_running();

        // Mid-frame: a close request arrives while drawing. The loop only
        // raises a flag; the phase is untouched until the next iteration.
        let quit_requested = true;
        assert!(phase.is_running());

        // Top of the next iteration: the flag is observed and the loop
        // transitions to a clean termination before any drawing starts.
        if quit_requested && phase.is_running() {
            phase.terminate(Outcome::Success);
        }
        assert_eq!(phase.outcome(), Some(Outcome::Success));
    }
}
