//! Event log shared by the pipeline stages of a tick.

use std::ops::Range;

use delivery_rush_core::Event;

/// Systems that read the event log, each at its own pace.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Reader {
    Flow,
    Extender,
    Combat,
    Ledger,
    Waves,
}

impl Reader {
    const COUNT: usize = 5;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Append-only event buffer with a read cursor per system.
///
/// Every event is delivered to every reader exactly once, even when it is
/// emitted after that reader's stage has already run for the current tick.
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    events: Vec<Event>,
    tick_start: usize,
    cursors: [usize; Reader::COUNT],
}

impl EventLog {
    pub(crate) fn sink(&mut self) -> &mut Vec<Event> {
        &mut self.events
    }

    /// Claims the events the reader has not seen yet.
    pub(crate) fn unread(&mut self, reader: Reader) -> Range<usize> {
        let cursor = &mut self.cursors[reader.index()];
        let range = *cursor..self.events.len();
        *cursor = self.events.len();
        range
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> &[Event] {
        &self.events[range]
    }

    /// Events emitted since the current tick began.
    pub(crate) fn current_tick(&self) -> &[Event] {
        &self.events[self.tick_start..]
    }

    /// Drops events every reader has seen and opens a new tick.
    pub(crate) fn begin_tick(&mut self) {
        let oldest = self.cursors.iter().copied().min().unwrap_or(0);
        let _ = self.events.drain(..oldest);
        for cursor in &mut self.cursors {
            *cursor -= oldest;
        }
        self.tick_start = self.events.len();
    }

    /// Forgets every event, including unread ones.
    pub(crate) fn reset(&mut self) {
        self.events.clear();
        self.tick_start = 0;
        self.cursors = [0; Reader::COUNT];
    }
}
