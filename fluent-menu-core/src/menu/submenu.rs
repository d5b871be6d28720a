use std::time::{Duration, Instant};

/// What happens when a dwell elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellAction {
    /// Open the child of this row.
    Open(usize),
    /// Close the open child.
    CloseChild,
}

/// A single cancellable deadline, polled by the owner.
///
/// Nothing runs in the background: the host calls [DwellTimer::poll] with the
/// current time, typically from its frame or timer callback.
#[derive(Debug, Clone)]
pub struct DwellTimer {
    delay: Duration,
    pending: Option<(DwellAction, Instant)>,
}

impl DwellTimer {
    /// A timer firing `delay` after each [DwellTimer::schedule].
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending action with `action`, due `delay` after `now`.
    pub fn schedule(&mut self, action: DwellAction, now: Instant) {
        log::trace!("dwell scheduled: {:?} in {:?}", action, self.delay);
        self.pending = Some((action, now + self.delay));
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some((action, _)) = self.pending.take() {
            log::trace!("dwell cancelled: {:?}", action);
        }
    }

    /// The pending action.
    pub fn pending(&self) -> Option<DwellAction> {
        self.pending.map(|(action, _)| action)
    }

    /// When the pending action is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at)
    }

    /// Take the pending action if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<DwellAction> {
        match self.pending {
            Some((action, at)) if now >= at => {
                self.pending = None;
                Some(action)
            },
            _ => None,
        }
    }
}

/// Parent-side bookkeeping of child popups.
///
/// At most one child is open. Replacing it is a two step protocol so the old
/// child is closed before the new one is shown: [SubmenuCoordinator::take_open]
/// hands the old child out, then [SubmenuCoordinator::set_open] records the new one.
#[derive(Debug, Clone)]
pub struct SubmenuCoordinator<C> {
    open: Option<(usize, C)>,
    dwell: DwellTimer,
}

impl<C> SubmenuCoordinator<C> {
    /// No child open, dwell of `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            open: None,
            dwell: DwellTimer::new(delay),
        }
    }

    /// Row whose child is open.
    pub fn open_row(&self) -> Option<usize> {
        self.open.as_ref().map(|(row, _)| *row)
    }

    /// The open child.
    pub fn open_child(&self) -> Option<&C> {
        self.open.as_ref().map(|(_, child)| child)
    }

    /// Remove and return the open child. The caller closes it.
    pub fn take_open(&mut self) -> Option<(usize, C)> {
        self.open.take()
    }

    /// Record `child` as open on `row`. Any previous child must have been taken first.
    pub fn set_open(&mut self, row: usize, child: C) {
        debug_assert!(self.open.is_none(), "previous child still recorded");
        log::debug!("submenu opened on row {}", row);
        self.open = Some((row, child));
    }

    /// Whether the open child belongs to `row`.
    pub fn is_open_on(&self, row: usize) -> bool {
        self.open_row() == Some(row)
    }

    /// Start the dwell to open the child of `row`.
    pub fn schedule_open(&mut self, row: usize, now: Instant) {
        self.dwell.schedule(DwellAction::Open(row), now);
    }

    /// Start the dwell to close the open child. Ignored when nothing is open.
    pub fn schedule_close(&mut self, now: Instant) {
        if self.open.is_some() {
            self.dwell.schedule(DwellAction::CloseChild, now);
        }
    }

    /// Cancel the pending dwell.
    pub fn cancel_dwell(&mut self) {
        self.dwell.cancel();
    }

    /// The pending dwell action.
    pub fn pending(&self) -> Option<DwellAction> {
        self.dwell.pending()
    }

    /// When the pending dwell is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.dwell.deadline()
    }

    /// Take the dwell action due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<DwellAction> {
        self.dwell.poll(now)
    }

    /// Change the dwell delay. Applies to the next schedule.
    pub fn set_delay(&mut self, delay: Duration) {
        self.dwell.delay = delay;
    }
}
