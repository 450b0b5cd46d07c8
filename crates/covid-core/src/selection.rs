// File: crates/covid-core/src/selection.rs
// Summary: Shared selection context (current month + metric) with a publish/subscribe registry.
// Notes:
// - The context is created before any widget and handed to each by `Rc`; widgets
//   subscribe in their constructors, so every publish reaches every live widget.
// - Everything runs on the UI thread, hence `Rc`/`Cell`/`RefCell` and no locks.
// - Publishing only queues events; widgets apply them in `sync`, so a widget may
//   publish from inside its own event handler without re-entrant borrows.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use crate::aggregate::MonthKey;
use crate::record::Metric;

/// Month shown on the map when nothing has been selected yet.
pub const DEFAULT_MONTH: MonthKey = MonthKey::from_parts(2021, 1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionState {
    pub current_month: MonthKey,
    pub current_metric: Metric,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self { current_month: DEFAULT_MONTH, current_metric: Metric::Cases }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    MonthChanged(MonthKey),
    MetricChanged(Metric),
}

type Inbox = RefCell<VecDeque<SelectionEvent>>;

/// Receiving end handed to one widget.
pub struct Subscription {
    name: &'static str,
    inbox: Rc<Inbox>,
}

impl Subscription {
    pub fn name(&self) -> &'static str { self.name }

    /// Take all pending events in publish order.
    pub fn drain(&self) -> Vec<SelectionEvent> {
        self.inbox.borrow_mut().drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("name", &self.name).field("pending", &self.pending()).finish()
    }
}

#[derive(Default)]
pub struct SelectionContext {
    state: Cell<SelectionState>,
    subscribers: RefCell<Vec<(&'static str, Weak<Inbox>)>>,
}

impl SelectionContext {
    pub fn new(initial: SelectionState) -> Rc<Self> {
        Rc::new(Self { state: Cell::new(initial), subscribers: RefCell::new(Vec::new()) })
    }

    pub fn state(&self) -> SelectionState { self.state.get() }
    pub fn month(&self) -> MonthKey { self.state.get().current_month }
    pub fn metric(&self) -> Metric { self.state.get().current_metric }

    /// Register a new receiver; it sees every event published afterwards.
    pub fn subscribe(&self, name: &'static str) -> Subscription {
        let inbox: Rc<Inbox> = Rc::new(RefCell::new(VecDeque::new()));
        self.subscribers.borrow_mut().push((name, Rc::downgrade(&inbox)));
        debug!(subscriber = name, "selection subscriber registered");
        Subscription { name, inbox }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().iter().filter(|(_, w)| w.strong_count() > 0).count()
    }

    /// Set the selected month. Returns `false` (and publishes nothing) when unchanged.
    pub fn select_month(&self, month: MonthKey) -> bool {
        let mut s = self.state.get();
        if s.current_month == month {
            return false;
        }
        s.current_month = month;
        self.state.set(s);
        info!(%month, "selected month");
        self.publish(SelectionEvent::MonthChanged(month));
        true
    }

    /// Set the selected metric. Returns `false` (and publishes nothing) when unchanged.
    pub fn select_metric(&self, metric: Metric) -> bool {
        let mut s = self.state.get();
        if s.current_metric == metric {
            return false;
        }
        s.current_metric = metric;
        self.state.set(s);
        info!(%metric, "selected metric");
        self.publish(SelectionEvent::MetricChanged(metric));
        true
    }

    fn publish(&self, event: SelectionEvent) {
        let mut subs = self.subscribers.borrow_mut();
        subs.retain(|(_, weak)| match weak.upgrade() {
            Some(inbox) => {
                inbox.borrow_mut().push_back(event);
                true
            }
            None => false,
        });
        debug!(?event, receivers = subs.len(), "selection event published");
    }
}

impl std::fmt::Debug for SelectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionContext")
            .field("state", &self.state.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
