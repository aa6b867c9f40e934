//! Event sources
//!
//! A source feeds raw events into a model. The trait is deliberately small:
//! the model pulls with [`EventSource::next`] until the source is drained.
//! Anything that can hand out events in order can be a source; the in-crate
//! [`VecSource`] wraps a fixed event list for tests and replays.

use std::collections::VecDeque;

use octopus_types::Event;

/// Pull-model event supplier.
pub trait EventSource {
    /// The next event, or `None` once the source is exhausted.
    fn next(&mut self) -> Option<Event>;
}

/// A source over a fixed list of events, yielded front to back.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    events: VecDeque<Event>,
}

impl VecSource {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for VecSource {
    fn next(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}

impl FromIterator<Event> for VecSource {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_source_yields_in_order() {
        let mut source = VecSource::new([Event::new("first"), Event::new("second")]);
        assert_eq!(source.len(), 2);
        assert_eq!(source.next().map(|e| e.name), Some("first".to_string()));
        assert_eq!(source.next().map(|e| e.name), Some("second".to_string()));
        assert!(source.next().is_none());
        assert!(source.is_empty());
    }

    #[test]
    fn test_vec_source_from_iterator() {
        let source: VecSource = (0..3).map(|_| Event::new("tick")).collect();
        assert_eq!(source.len(), 3);
    }
}
