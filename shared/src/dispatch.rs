use std::collections::BTreeMap;

use log::{debug, trace, warn};

use crate::{
    authority::AuthorityManager,
    diagnostics::SyncDiagnostics,
    stream::{Capabilities, SyncRegistry},
    wire::InboundBatch,
    StreamId,
};

/// Outcome of applying one inbound batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub applied: usize,
    pub stale: usize,
    pub unauthorized: usize,
    pub unknown: usize,
}

/// Applies received frames to their streams' buffers and fires snapshot callbacks.
pub struct SnapshotDispatcher;

impl SnapshotDispatcher {
    /// Inserts every frame of `batch` in frame id order, then calls
    /// `on_snapshot` once per stream that received something new, lowest
    /// `apply_order` first.
    pub fn dispatch(
        mut batch: InboundBatch,
        registry: &mut SyncRegistry,
        authority: &AuthorityManager,
        diagnostics: &mut SyncDiagnostics,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        // keyed by dispatch rank
        let mut touched: BTreeMap<usize, StreamId> = BTreeMap::new();
        let sender = batch.sender;

        batch.frames.sort_by_key(|frame| frame.frame_id);

        for frame in batch.frames {
            let Some(position) = registry.position(&frame.stream) else {
                trace!("dropping frame {} for unregistered {}", frame.frame_id, frame.stream);
                report.unknown += 1;
                diagnostics.record_unknown();
                continue;
            };
            let Some(stream) = registry.stream_mut(&frame.stream) else {
                continue;
            };

            if !authority.accepts(
                &stream.entity(),
                sender,
                frame.frame_id,
                frame.claims_authority,
            ) {
                warn!(
                    "rejecting frame {} of {} from {}: sender is not the authority for {}",
                    frame.frame_id,
                    frame.stream,
                    sender,
                    stream.entity()
                );
                report.unauthorized += 1;
                diagnostics.record_unauthorized();
                continue;
            }

            if !stream.config().precision.accepts(&frame.value) {
                warn!(
                    "rejecting frame {} of {}: {} value does not match the stream",
                    frame.frame_id,
                    frame.stream,
                    frame.value.kind()
                );
                report.unknown += 1;
                diagnostics.record_unknown();
                continue;
            }

            if !stream.buffer_mut().push_value(frame.frame_id, frame.value) {
                trace!("stale frame {} for {}", frame.frame_id, frame.stream);
                report.stale += 1;
                diagnostics.record_stale();
                continue;
            }

            report.applied += 1;
            diagnostics.record_applied();
            touched.insert(position, frame.stream);
        }

        for stream_id in touched.into_values() {
            let Some(stream) = registry.stream_mut(&stream_id) else {
                continue;
            };
            let initialize = stream.mark_initialized();
            if !stream.capabilities().contains(Capabilities::SNAPSHOT) {
                continue;
            }
            let Some(latest) = stream.buffer().latest() else {
                continue;
            };
            let frame_id = latest.frame_id();
            let value = *latest.value();
            let is_acting_authority = authority.is_mine(&stream.entity());

            stream
                .handler_mut()
                .on_snapshot(frame_id, is_acting_authority, initialize, &value);
        }

        debug!(
            "batch from {}: {} applied, {} stale, {} unauthorized, {} unknown",
            sender, report.applied, report.stale, report.unauthorized, report.unknown
        );

        report
    }
}
