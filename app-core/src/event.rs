//! Events are how user interactions reach the application state. They are
//! queued while the UI is drawn and applied afterwards, once per frame, in the
//! order they were queued.

use std::collections::VecDeque;

/// Whether an event is done or has to be applied again next frame (e.g.
/// because it waits for a file dialog running on another thread).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Finished,
    Busy,
}

pub trait AppEvent {
    type App;
    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String>;
}

pub type BoxedEvent<A> = Box<dyn AppEvent<App = A>>;

/// Outcome of [`EventQueue::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub finished: usize,
    pub busy: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn any_finished(&self) -> bool {
        self.finished > 0
    }
}

/// FIFO store of pending events.
///
/// The queue usually lives inside the application it operates on, so it
/// cannot be borrowed while the events mutate the app. [`EventQueue::run`]
/// therefore takes a closure that hands out the queue on demand.
pub struct EventQueue<A> {
    queue: VecDeque<BoxedEvent<A>>,
    /// Set by [`EventQueue::discard_events`] so a running drain stops too.
    discarded: bool,
}

impl<A> EventQueue<A> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            discarded: false,
        }
    }

    pub fn queue_event(&mut self, event: BoxedEvent<A>) {
        self.queue.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending event. Called from inside [`EventQueue::run`], it
    /// also drops the events not applied yet and the busy ones.
    pub fn discard_events(&mut self) {
        self.queue.clear();
        self.discarded = true;
    }

    /// Apply every event that was queued before this call. Events queued
    /// while applying are kept for the next run, as are busy ones (behind
    /// the newly queued events).
    pub fn run(app: &mut A, queue_of: impl Fn(&mut A) -> &mut Self) -> RunSummary {
        let queue = queue_of(app);
        queue.discarded = false;
        let pending: Vec<_> = queue.queue.drain(..).collect();
        let mut summary = RunSummary::default();
        let mut backlog = Vec::new();

        for mut event in pending {
            let state = event.apply(app);
            if queue_of(app).discarded {
                if state.is_ok() {
                    summary.finished += 1;
                }
                log::debug!("pending events discarded");
                backlog.clear();
                break;
            }
            match state {
                Ok(EventState::Finished) => summary.finished += 1,
                Ok(EventState::Busy) => {
                    summary.busy += 1;
                    backlog.push(event);
                }
                Err(err) => {
                    summary.failed += 1;
                    log::error!("event failed: {err}");
                }
            }
        }

        queue_of(app).queue.extend(backlog);
        summary
    }
}

impl<A> Default for EventQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        log: Vec<&'static str>,
        events: EventQueue<Counter>,
    }

    struct Push(&'static str);

    impl AppEvent for Push {
        type App = Counter;

        fn apply(&mut self, app: &mut Counter) -> Result<EventState, String> {
            app.log.push(self.0);
            Ok(EventState::Finished)
        }
    }

    struct WaitTwice(u8);

    impl AppEvent for WaitTwice {
        type App = Counter;

        fn apply(&mut self, app: &mut Counter) -> Result<EventState, String> {
            if self.0 < 2 {
                self.0 += 1;
                return Ok(EventState::Busy);
            }
            app.log.push("waited");
            Ok(EventState::Finished)
        }
    }

    struct Fail;

    impl AppEvent for Fail {
        type App = Counter;

        fn apply(&mut self, _app: &mut Counter) -> Result<EventState, String> {
            Err("nope".into())
        }
    }

    struct Spawn;

    impl AppEvent for Spawn {
        type App = Counter;

        fn apply(&mut self, app: &mut Counter) -> Result<EventState, String> {
            app.events.queue_event(Box::new(Push("spawned")));
            Ok(EventState::Finished)
        }
    }

    struct Discard;

    impl AppEvent for Discard {
        type App = Counter;

        fn apply(&mut self, app: &mut Counter) -> Result<EventState, String> {
            app.events.discard_events();
            Ok(EventState::Finished)
        }
    }

    fn counter() -> Counter {
        let _ = env_logger::builder().is_test(true).try_init();
        Counter {
            log: Vec::new(),
            events: EventQueue::new(),
        }
    }

    #[test]
    fn test_events_are_applied_in_queue_order() {
        let mut app = counter();
        app.events.queue_event(Box::new(Push("a")));
        app.events.queue_event(Box::new(Push("b")));
        app.events.queue_event(Box::new(Push("c")));

        let summary = EventQueue::run(&mut app, |app| &mut app.events);

        assert_eq!(app.log, vec!["a", "b", "c"]);
        assert_eq!(summary.finished, 3);
        assert!(app.events.is_empty());
    }

    #[test]
    fn test_busy_events_are_retried() {
        let mut app = counter();
        app.events.queue_event(Box::new(WaitTwice(0)));

        assert_eq!(EventQueue::run(&mut app, |app| &mut app.events).busy, 1);
        assert_eq!(EventQueue::run(&mut app, |app| &mut app.events).busy, 1);
        let summary = EventQueue::run(&mut app, |app| &mut app.events);

        assert!(summary.any_finished());
        assert_eq!(app.log, vec!["waited"]);
        assert!(app.events.is_empty());
    }

    #[test]
    fn test_failed_events_are_dropped() {
        let mut app = counter();
        app.events.queue_event(Box::new(Fail));
        app.events.queue_event(Box::new(Push("after")));

        let summary = EventQueue::run(&mut app, |app| &mut app.events);

        assert_eq!(summary.failed, 1);
        assert_eq!(app.log, vec!["after"]);
        assert!(app.events.is_empty());
    }

    #[test]
    fn test_events_queued_while_running_wait_for_next_run() {
        let mut app = counter();
        app.events.queue_event(Box::new(Spawn));

        EventQueue::run(&mut app, |app| &mut app.events);
        assert!(app.log.is_empty());
        assert_eq!(app.events.len(), 1);

        EventQueue::run(&mut app, |app| &mut app.events);
        assert_eq!(app.log, vec!["spawned"]);
    }

    #[test]
    fn test_discard_drops_pending_and_busy_events() {
        let mut app = counter();
        app.events.queue_event(Box::new(WaitTwice(0)));
        app.events.queue_event(Box::new(Discard));
        app.events.queue_event(Box::new(Push("dropped")));

        let summary = EventQueue::run(&mut app, |app| &mut app.events);

        assert_eq!(summary.finished, 1);
        assert!(app.events.is_empty());
        EventQueue::run(&mut app, |app| &mut app.events);
        assert!(app.log.is_empty());
    }
}
