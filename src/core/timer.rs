#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Countdown {
    #[default]
    Idle,
    Running {
        interval: u32,
        remaining: u32,
    },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Remaining(u32),
    /// The countdown hit zero and has re-armed itself.
    Advance,
}

impl Countdown {
    pub fn start(&mut self, interval_secs: u32) {
        let interval = interval_secs.max(1);
        *self = Countdown::Running { interval, remaining: interval };
    }

    pub fn cancel(&mut self) {
        if self.is_running() {
            *self = Countdown::Cancelled;
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Countdown::Running { .. })
    }

    pub fn remaining(&self) -> Option<u32> {
        match self {
            Countdown::Running { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        match self {
            Countdown::Running { interval, remaining } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    *remaining = *interval;
                    TickOutcome::Advance
                } else {
                    TickOutcome::Remaining(*remaining)
                }
            }
            Countdown::Idle | Countdown::Cancelled => TickOutcome::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_advances_and_rearms() {
        let mut countdown = Countdown::default();
        countdown.start(3);
        assert_eq!(countdown.remaining(), Some(3));

        assert_eq!(countdown.tick(), TickOutcome::Remaining(2));
        assert_eq!(countdown.tick(), TickOutcome::Remaining(1));
        assert_eq!(countdown.tick(), TickOutcome::Advance);
        assert_eq!(countdown.remaining(), Some(3));
        assert_eq!(countdown.tick(), TickOutcome::Remaining(2));
    }

    #[test]
    fn test_cancelled_countdown_ignores_ticks() {
        let mut countdown = Countdown::default();
        assert_eq!(countdown.tick(), TickOutcome::Idle);

        countdown.start(5);
        countdown.cancel();
        assert_eq!(countdown, Countdown::Cancelled);
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_one_second_interval_advances_every_tick() {
        let mut countdown = Countdown::default();
        countdown.start(0);
        assert_eq!(countdown.tick(), TickOutcome::Advance);
        assert_eq!(countdown.tick(), TickOutcome::Advance);
    }
}
