use std::collections::VecDeque;

use log::warn;

use crate::{FrameId, StreamId};

const RECENT_CLAMP_EVENTS: usize = 32;

/// A value that fell outside its stream's declared range and was clamped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClampEvent {
    pub stream: StreamId,
    pub frame_id: FrameId,
    pub components: u8,
}

/// Running counters for a session. Nothing here affects behaviour.
#[derive(Clone, Debug, Default)]
pub struct SyncDiagnostics {
    captured: u64,
    sent: u64,
    applied: u64,
    stale: u64,
    unauthorized: u64,
    unknown: u64,
    malformed_packets: u64,
    underruns: u64,
    clamps: u64,
    recent_clamps: VecDeque<ClampEvent>,
}

impl SyncDiagnostics {
    /// Records sealed by the capture pipeline
    pub fn captured(&self) -> u64 {
        self.captured
    }

    /// Entries written to outbound packets
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Received records inserted into a buffer
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Received records dropped as stale or duplicate
    pub fn stale(&self) -> u64 {
        self.stale
    }

    pub fn unauthorized(&self) -> u64 {
        self.unauthorized
    }

    /// Received records for streams that are not registered
    pub fn unknown(&self) -> u64 {
        self.unknown
    }

    pub fn malformed_packets(&self) -> u64 {
        self.malformed_packets
    }

    /// Interpolation passes over a stream with no records yet
    pub fn underruns(&self) -> u64 {
        self.underruns
    }

    pub fn clamps(&self) -> u64 {
        self.clamps
    }

    /// Most recent clamp events, oldest first
    pub fn recent_clamps(&self) -> impl Iterator<Item = &ClampEvent> {
        self.recent_clamps.iter()
    }

    pub(crate) fn record_captured(&mut self) {
        self.captured += 1;
    }

    pub(crate) fn record_sent(&mut self, entries: u64) {
        self.sent += entries;
    }

    pub(crate) fn record_applied(&mut self) {
        self.applied += 1;
    }

    pub(crate) fn record_stale(&mut self) {
        self.stale += 1;
    }

    pub(crate) fn record_unauthorized(&mut self) {
        self.unauthorized += 1;
    }

    pub(crate) fn record_unknown(&mut self) {
        self.unknown += 1;
    }

    pub(crate) fn record_malformed_packet(&mut self) {
        self.malformed_packets += 1;
    }

    pub(crate) fn record_underrun(&mut self) {
        self.underruns += 1;
    }

    pub(crate) fn record_clamp(&mut self, event: ClampEvent) {
        warn!(
            "{} at frame {}: {} component(s) outside the declared range were clamped",
            event.stream, event.frame_id, event.components
        );
        self.clamps += 1;
        if self.recent_clamps.len() == RECENT_CLAMP_EVENTS {
            self.recent_clamps.pop_front();
        }
        self.recent_clamps.push_back(event);
    }
}
