// ── Write debouncing ──
//
// Trailing-edge debounce keyed by attribute: each request restarts that
// attribute's window and replaces its value. The request it replaces is
// resolved as superseded straight away.

use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::trace;

use super::SetOutcome;
use crate::model::Attribute;

pub(crate) struct Pending {
    pub(crate) value: f64,
    deadline: Instant,
    waiter: Option<oneshot::Sender<SetOutcome>>,
}

impl Pending {
    pub(crate) fn resolve(self, outcome: SetOutcome) {
        if let Some(waiter) = self.waiter {
            // The requester may have stopped waiting.
            let _ = waiter.send(outcome);
        }
    }
}

pub(crate) struct Debouncer {
    window: Duration,
    pending: IndexMap<Attribute, Pending>,
}

impl Debouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            pending: IndexMap::new(),
        }
    }

    pub(crate) fn push(
        &mut self,
        attribute: Attribute,
        value: f64,
        waiter: oneshot::Sender<SetOutcome>,
        now: Instant,
    ) {
        let next = Pending {
            value,
            deadline: now + self.window,
            waiter: Some(waiter),
        };
        if let Some(replaced) = self.pending.insert(attribute, next) {
            trace!(%attribute, old = replaced.value, new = value, "set request superseded");
            replaced.resolve(SetOutcome::Superseded);
        }
    }

    /// Earliest deadline among pending requests.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Remove and return every request whose window has closed, in the
    /// order the attributes were first queued.
    pub(crate) fn take_due(&mut self, now: Instant) -> Vec<(Attribute, Pending)> {
        let due: Vec<Attribute> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(attribute, _)| *attribute)
            .collect();

        due.into_iter()
            .filter_map(|attribute| {
                self.pending
                    .shift_remove(&attribute)
                    .map(|pending| (attribute, pending))
            })
            .collect()
    }

    /// Drop every pending request without answering it.
    pub(crate) fn abandon(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn repeated_request_supersedes_and_restarts_window() {
        let mut debouncer = Debouncer::new(WINDOW);
        let start = Instant::now();

        let (first_tx, mut first_rx) = oneshot::channel();
        debouncer.push(Attribute::FanSpeed, 2.0, first_tx, start);

        let later = start + Duration::from_millis(300);
        let (second_tx, mut second_rx) = oneshot::channel();
        debouncer.push(Attribute::FanSpeed, 4.0, second_tx, later);

        assert_eq!(first_rx.try_recv().unwrap(), SetOutcome::Superseded);
        assert!(second_rx.try_recv().is_err());
        assert_eq!(debouncer.next_deadline(), Some(later + WINDOW));

        assert!(debouncer.take_due(start + WINDOW).is_empty());

        let due = debouncer.take_due(later + WINDOW);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, Attribute::FanSpeed);
        assert_eq!(due[0].1.value, 4.0);
        assert_eq!(debouncer.next_deadline(), None);
    }

    #[test]
    fn attributes_are_debounced_independently() {
        let mut debouncer = Debouncer::new(WINDOW);
        let start = Instant::now();

        let (mode_tx, _mode_rx) = oneshot::channel();
        debouncer.push(Attribute::Mode, 4.0, mode_tx, start);
        let (setpoint_tx, _setpoint_rx) = oneshot::channel();
        debouncer.push(
            Attribute::Setpoint,
            22.0,
            setpoint_tx,
            start + Duration::from_millis(100),
        );

        let due = debouncer.take_due(start + WINDOW);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, Attribute::Mode);

        let due = debouncer.take_due(start + Duration::from_millis(600));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, Attribute::Setpoint);
    }

    #[test]
    fn resolve_delivers_outcome() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        let now = Instant::now();
        let (tx, mut rx) = oneshot::channel();
        debouncer.push(Attribute::Active, 1.0, tx, now);

        for (_, pending) in debouncer.take_due(now) {
            pending.resolve(SetOutcome::Applied { attempts: 1 });
        }
        assert_eq!(rx.try_recv().unwrap(), SetOutcome::Applied { attempts: 1 });
    }

    #[test]
    fn abandon_drops_waiters() {
        let mut debouncer = Debouncer::new(WINDOW);
        let (tx, mut rx) = oneshot::channel();
        debouncer.push(Attribute::Active, 1.0, tx, Instant::now());

        assert_eq!(debouncer.abandon(), 1);
        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
    }
}
