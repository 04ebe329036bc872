use log::{debug, trace, warn};

use crate::{
    authority::AuthorityManager,
    config::HeartbeatConfig,
    diagnostics::SyncDiagnostics,
    stream::{Capabilities, SyncRegistry, SyncStream},
    value::SyncValue,
    FrameId, StreamId,
};

/// A record sealed this tick that should go out on the wire
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedFrame {
    pub stream: StreamId,
    pub frame_id: FrameId,
    pub value: SyncValue,
    pub has_changed: bool,
}

/// Samples live values into frame records on the authoritative side.
pub struct CapturePipeline {
    heartbeat: Option<HeartbeatConfig>,
}

impl CapturePipeline {
    pub fn new(heartbeat: Option<HeartbeatConfig>) -> Self {
        Self { heartbeat }
    }

    /// Runs one capture pass. Returns the records to send, in apply order.
    ///
    /// Ghost streams, streams without the capture capability and streams whose
    /// entity is not currently capturable here are skipped.
    pub fn capture(
        &self,
        frame_id: FrameId,
        registry: &mut SyncRegistry,
        authority: &AuthorityManager,
        diagnostics: &mut SyncDiagnostics,
    ) -> Vec<CapturedFrame> {
        let mut outbound = Vec::new();
        let mut sealed = 0;

        for stream in registry.iter_mut() {
            if stream.realm().is_ghost() || !stream.capabilities().contains(Capabilities::CAPTURE)
            {
                continue;
            }
            if !authority.may_capture(&stream.entity(), frame_id) {
                continue;
            }

            let Some(frame) = Self::capture_stream(frame_id, stream) else {
                continue;
            };
            sealed += 1;
            diagnostics.record_captured();

            if self.should_send(stream, frame.has_changed) {
                outbound.push(frame);
            }
        }

        debug!(
            "frame {}: sealed {} record(s), {} outbound",
            frame_id,
            sealed,
            outbound.len()
        );

        outbound
    }

    fn capture_stream(frame_id: FrameId, stream: &mut SyncStream) -> Option<CapturedFrame> {
        let realm = stream.realm();
        let value = stream
            .handler_mut()
            .on_capture_current_values(frame_id, true, realm)?;

        if !stream.config().precision.accepts(&value) {
            warn!(
                "{} captured a {} value but is declared as {}; dropping it",
                stream.id(),
                value.kind(),
                stream.config().precision.kind()
            );
            return None;
        }

        if !stream.buffer_mut().push_value(frame_id, value) {
            trace!("{} already holds frame {}", stream.id(), frame_id);
            return None;
        }
        let has_changed = stream
            .buffer()
            .latest()
            .map(|record| record.has_changed())
            .unwrap_or(true);

        Some(CapturedFrame {
            stream: stream.id(),
            frame_id,
            value,
            has_changed,
        })
    }

    fn should_send(&self, stream: &mut SyncStream, has_changed: bool) -> bool {
        if has_changed {
            stream.set_idle_ticks(0);
            return true;
        }

        let idle_ticks = stream.idle_ticks().saturating_add(1);
        stream.set_idle_ticks(idle_ticks);

        let Some(heartbeat) = self.heartbeat else {
            return true;
        };
        if idle_ticks < heartbeat.idle_ticks {
            return true;
        }
        (idle_ticks - heartbeat.idle_ticks) % heartbeat.interval.max(1) == 0
    }
}
