//! Classification and dispatch of raw `(code, line)` pairs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::taxonomy::Taxonomy;

use super::{Event, EventHandler};

#[derive(Default)]
struct Channels {
    known: Vec<Box<dyn EventHandler>>,
    unknown: Vec<Box<dyn EventHandler>>,
}

impl Channels {
    fn append(&mut self, other: &mut Channels) {
        self.known.append(&mut other.known);
        self.unknown.append(&mut other.unknown);
    }
}

/// Classifies incoming codes against a [`Taxonomy`] and publishes the result.
///
/// `parse_and_publish` may be called from several producer threads. One lock covers the
/// whole delivery of an event, so a handler always finishes before the next event is
/// handed to any handler.
///
/// Registration goes through a separate pending list that is merged before each delivery,
/// so a handler may register further handlers; they see events from the next one on.
pub struct EventParser {
    taxonomy: Arc<Taxonomy>,
    channels: Mutex<Channels>,
    pending: Mutex<Channels>,
    known_count: AtomicU64,
    unknown_count: AtomicU64,
}

impl EventParser {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            taxonomy,
            channels: Mutex::new(Channels::default()),
            pending: Mutex::new(Channels::default()),
            known_count: AtomicU64::new(0),
            unknown_count: AtomicU64::new(0),
        }
    }

    pub fn taxonomy(&self) -> &Arc<Taxonomy> {
        &self.taxonomy
    }

    /// Register a handler for events whose code is in the taxonomy.
    pub fn add_known_handler(&self, handler: impl EventHandler + 'static) {
        lock(&self.pending).known.push(Box::new(handler));
    }

    /// Register a handler for events whose code is not in the taxonomy.
    pub fn add_unknown_handler(&self, handler: impl EventHandler + 'static) {
        lock(&self.pending).unknown.push(Box::new(handler));
    }

    pub fn classify(&self, code: u32, line: impl Into<String>) -> Event {
        let resolved = self
            .taxonomy
            .lookup(code)
            .unwrap_or_else(|| self.taxonomy.unknown())
            .clone();
        Event::new(resolved, code, line.into())
    }

    pub fn parse_and_publish(&self, code: u32, line: impl Into<String>) {
        let event = self.classify(code, line);
        let mut channels = lock(&self.channels);
        channels.append(&mut lock(&self.pending));

        if event.is_unknown() {
            self.unknown_count.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(code, "Unknown event code");
            for handler in &mut channels.unknown {
                handler.handle_event(&event);
            }
        } else {
            self.known_count.fetch_add(1, Ordering::Relaxed);
            for handler in &mut channels.known {
                handler.handle_event(&event);
            }
        }
    }

    /// Events published to the known channel so far.
    pub fn known_count(&self) -> u64 {
        self.known_count.load(Ordering::Relaxed)
    }

    /// Events published to the unknown channel so far.
    pub fn unknown_count(&self) -> u64 {
        self.unknown_count.load(Ordering::Relaxed)
    }
}

fn lock(channels: &Mutex<Channels>) -> MutexGuard<'_, Channels> {
    channels.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::UNKNOWN_EVENT;
    use std::sync::atomic::AtomicBool;

    fn parser() -> EventParser {
        EventParser::new(Arc::new(Taxonomy::bundled().unwrap()))
    }

    #[test]
    fn every_taxonomy_code_classifies_as_itself() {
        let parser = parser();
        let codes: Vec<u32> = parser.taxonomy().codes().map(|c| c.code()).collect();
        assert!(!codes.is_empty());
        for code in codes {
            let event = parser.classify(code, "line");
            assert!(!event.is_unknown(), "{code:06X}");
            assert_eq!(event.code().code(), code);
            assert_eq!(event.raw_code(), code);
        }
    }

    #[test]
    fn missing_codes_classify_as_sentinel() {
        let parser = parser();
        for code in [0x000001, 0x0FFFFF, 0xFFFFFF, 0x1000000] {
            assert!(!parser.taxonomy().contains(code));
            let event = parser.classify(code, "???");
            assert!(event.is_unknown());
            assert_eq!(event.code().code(), UNKNOWN_EVENT);
            assert_eq!(event.raw_code(), code);
            assert_eq!(event.line(), "???");
            assert!(event.group().is_none());
        }
    }

    #[test]
    fn publish_routes_to_exactly_one_channel_in_arrival_order() {
        let parser = parser();
        let known = Arc::new(Mutex::new(Vec::new()));
        let unknown = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&known);
        parser.add_known_handler(move |e: &Event| sink.lock().unwrap().push(e.line().to_string()));
        let sink = Arc::clone(&unknown);
        parser.add_unknown_handler(move |e: &Event| sink.lock().unwrap().push(e.raw_code()));

        parser.parse_and_publish(0x000A29, "first");
        parser.parse_and_publish(0x000001, "bogus");
        parser.parse_and_publish(0x000039, "second");

        assert_eq!(*known.lock().unwrap(), ["first", "second"]);
        assert_eq!(*unknown.lock().unwrap(), [0x000001]);
        assert_eq!(parser.known_count(), 2);
        assert_eq!(parser.unknown_count(), 1);
    }

    #[test]
    fn publish_without_handlers_is_harmless() {
        let parser = parser();
        parser.parse_and_publish(0x000A29, "nobody listening");
        assert_eq!(parser.known_count(), 1);
    }

    #[test]
    fn handlers_can_register_handlers_during_delivery() {
        let parser = Arc::new(parser());
        let late = Arc::new(Mutex::new(Vec::new()));

        let registrar = Arc::clone(&parser);
        let sink = Arc::clone(&late);
        let mut registered = false;
        parser.add_known_handler(move |_: &Event| {
            assert!(registrar.known_count() >= 1);
            if !registered {
                registered = true;
                let sink = Arc::clone(&sink);
                registrar.add_known_handler(move |e: &Event| {
                    sink.lock().unwrap().push(e.line().to_string())
                });
                registrar.add_unknown_handler(|_: &Event| {});
            }
        });

        parser.parse_and_publish(0x000A29, "first");
        parser.parse_and_publish(0x000A29, "second");
        parser.parse_and_publish(0x000A29, "third");

        assert_eq!(*late.lock().unwrap(), ["second", "third"]);
        assert_eq!(parser.known_count(), 3);
    }

    #[test]
    fn concurrent_producers_never_interleave_handlers() {
        let parser = Arc::new(parser());
        let in_flight = Arc::new(AtomicBool::new(false));
        let total = Arc::new(Mutex::new(0u64));

        let flag = Arc::clone(&in_flight);
        let sum = Arc::clone(&total);
        parser.add_known_handler(move |_: &Event| {
            assert!(!flag.swap(true, Ordering::SeqCst), "handler re-entered");
            let current = *sum.lock().unwrap();
            std::thread::yield_now();
            *sum.lock().unwrap() = current + 1;
            flag.store(false, Ordering::SeqCst);
        });

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let parser = Arc::clone(&parser);
                scope.spawn(move || {
                    for _ in 0..250 {
                        parser.parse_and_publish(0x000A29, "hit");
                    }
                });
            }
        });

        assert_eq!(*total.lock().unwrap(), 1000);
        assert_eq!(parser.known_count(), 1000);
    }
}
