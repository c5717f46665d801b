use std::sync::{Arc, Mutex};

use launchflow::domain::NotificationCategory;
use launchflow::port::{Event, Notifier};

/// Thread-safe event collector for notification assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock notifier events").clone()
    }

    pub fn categories(&self) -> Vec<NotificationCategory> {
        self.events().iter().map(Event::category).collect()
    }

    pub fn count(&self, category: NotificationCategory) -> usize {
        self.categories()
            .into_iter()
            .filter(|c| *c == category)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events
            .lock()
            .expect("lock notifier events")
            .push(event);
    }
}
