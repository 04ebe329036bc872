use log::{debug, info, warn};

use crate::{
    authority::{
        AuthorityChange, AuthorityError, AuthorityManager, AuthorityState, ReplicationMode,
        TransferTicket,
    },
    capture::CapturePipeline,
    config::SyncConfig,
    diagnostics::{ClampEvent, SyncDiagnostics},
    dispatch::{DispatchReport, SnapshotDispatcher},
    error::SyncError,
    interpolation::Interpolator,
    stream::{Capabilities, StreamConfig, StreamError, StreamHandler, SyncRegistry, SyncStream},
    wire::{read_packet, FramePacketWriter, InboundBatch},
    EntityId, FrameId, ParticipantId, StreamId,
};

/// Everything one participant needs to synchronize its entities.
///
/// A session owns the stream registry and the authority records; nothing is
/// shared between sessions. Capture, dispatch and interpolation are separate
/// passes the host calls from its own tick loop.
pub struct SyncSession {
    config: SyncConfig,
    registry: SyncRegistry,
    authority: AuthorityManager,
    capture: CapturePipeline,
    interpolator: Interpolator,
    diagnostics: SyncDiagnostics,
}

impl SyncSession {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            registry: SyncRegistry::new(config.buffer_capacity),
            authority: AuthorityManager::new(config.local, config.master),
            capture: CapturePipeline::new(config.heartbeat),
            interpolator: Interpolator::new(config.interpolation_delay),
            diagnostics: SyncDiagnostics::default(),
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn local(&self) -> ParticipantId {
        self.config.local
    }

    // Entities

    pub fn register_entity(
        &mut self,
        entity: EntityId,
        mode: ReplicationMode,
    ) -> Result<(), SyncError> {
        self.registry.register_entity(entity, mode)?;
        if let Err(error) = self.authority.register_entity(entity, mode) {
            // keep both registries in step
            let _ = self.registry.deregister_entity(&entity);
            return Err(error.into());
        }
        debug!("registered {} ({:?})", entity, mode);
        Ok(())
    }

    /// Adds a stream to a registered entity. If the entity already has a
    /// writer, an `AUTHORITY` handler is told straight away whether it is local.
    pub fn register_stream<H: StreamHandler + 'static>(
        &mut self,
        entity: EntityId,
        stream: StreamId,
        config: StreamConfig,
        handler: H,
    ) -> Result<(), SyncError> {
        self.registry
            .register_stream(entity, stream, config, Box::new(handler))?;

        let state = self.authority.state(&entity);
        if let Some(registered) = self.registry.stream_mut(&stream) {
            if state.is_some_and(|state| state != AuthorityState::Unowned)
                && registered.capabilities().contains(Capabilities::AUTHORITY)
            {
                let is_mine = state == Some(AuthorityState::OwnedLocal);
                registered.handler_mut().on_change_authority(is_mine);
            }
        }
        Ok(())
    }

    /// Releases the entity's streams and authority record. A pending transfer
    /// is dropped without any callback.
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<(), SyncError> {
        let streams = self.registry.deregister_entity(&entity)?;
        if let Some(ticket) = self.authority.pending_transfer(&entity) {
            debug!("dropping in-flight transfer of {} to {}", entity, ticket.to());
        }
        self.authority.deregister_entity(&entity);
        debug!("destroyed {} and {} stream(s)", entity, streams.len());
        Ok(())
    }

    // Authority

    pub fn assign_owner(&mut self, entity: EntityId, owner: ParticipantId) -> Result<(), SyncError> {
        if let Some(change) = self.authority.assign_owner(entity, owner)? {
            self.notify_authority(change);
        }
        Ok(())
    }

    /// Starts a hand-off of `entity` to `to`, effective from `at_frame`. When
    /// this participant is the current writer its capture stops immediately,
    /// and the transfer point must come after every frame it already captured.
    pub fn request_transfer(
        &mut self,
        entity: EntityId,
        to: ParticipantId,
        at_frame: FrameId,
    ) -> Result<TransferTicket, SyncError> {
        if self.authority.writer(&entity) == Some(self.local()) {
            if let Some(highest) = self.highest_captured(&entity) {
                if at_frame <= highest {
                    return Err(AuthorityError::InvalidTransferPoint {
                        entity,
                        at_frame,
                        earliest: highest + 1,
                    }
                    .into());
                }
            }
        }

        Ok(self.authority.request_transfer(entity, to, at_frame)?)
    }

    pub fn commit_transfer(&mut self, ticket: &TransferTicket) -> Result<(), SyncError> {
        if let Some(change) = self.authority.commit_transfer(ticket)? {
            self.notify_authority(change);
        }
        Ok(())
    }

    pub fn abort_transfer(&mut self, entity: EntityId) -> Result<TransferTicket, SyncError> {
        Ok(self.authority.abort_transfer(entity)?)
    }

    pub fn authority_state(&self, entity: &EntityId) -> Option<AuthorityState> {
        self.authority.state(entity)
    }

    pub fn is_mine(&self, entity: &EntityId) -> bool {
        self.authority.is_mine(entity)
    }

    pub fn authority(&self) -> &AuthorityManager {
        &self.authority
    }

    // Passes

    /// Captures every stream this participant writes and packs the records
    /// into outbound packets.
    pub fn capture_tick(&mut self, frame_id: FrameId) -> Vec<Vec<u8>> {
        let frames = self.capture.capture(
            frame_id,
            &mut self.registry,
            &self.authority,
            &mut self.diagnostics,
        );

        let mut writer = FramePacketWriter::new(self.local(), self.config.max_packet_bytes);
        for frame in &frames {
            let Some(stream) = self.registry.stream(&frame.stream) else {
                continue;
            };
            match writer.write_entry(
                frame.stream,
                frame.frame_id,
                true,
                &frame.value,
                &stream.config().precision,
            ) {
                Ok(outcome) => {
                    if outcome.is_clamped() {
                        self.diagnostics.record_clamp(ClampEvent {
                            stream: frame.stream,
                            frame_id: frame.frame_id,
                            components: outcome.clamped_components,
                        });
                    }
                }
                Err(error) => warn!("could not encode {}: {}", frame.stream, error),
            }
        }

        self.diagnostics.record_sent(writer.entry_count() as u64);
        writer.finish()
    }

    /// Encodes the stream's latest record into a single-entry packet, for an
    /// out-of-band (e.g. reliable) send. Only the acting authority may do this.
    pub fn quantize_stream(&mut self, stream_id: StreamId) -> Result<Vec<u8>, SyncError> {
        let local = self.local();
        let max_packet_bytes = self.config.max_packet_bytes;
        let stream = self
            .registry
            .stream_mut(&stream_id)
            .ok_or(StreamError::UnknownStream { stream: stream_id })?;
        let entity = stream.entity();

        if stream.realm().is_ghost() || !self.authority.is_mine(&entity) {
            return Err(SyncError::NotAuthoritative {
                stream: stream_id,
                entity,
            });
        }

        let Some(latest) = stream.buffer().latest() else {
            return Err(StreamError::NoRecord { stream: stream_id }.into());
        };
        let frame_id = latest.frame_id();
        let value = *latest.value();

        if stream.capabilities().contains(Capabilities::QUANTIZE) {
            let realm = stream.realm();
            stream.handler_mut().on_quantize(frame_id, realm);
        }

        let mut writer = FramePacketWriter::new(local, max_packet_bytes);
        let outcome = writer.write_entry(
            stream_id,
            frame_id,
            true,
            &value,
            &stream.config().precision,
        )?;
        if outcome.is_clamped() {
            self.diagnostics.record_clamp(ClampEvent {
                stream: stream_id,
                frame_id,
                components: outcome.clamped_components,
            });
        }
        self.diagnostics.record_sent(1);

        writer
            .finish()
            .pop()
            .ok_or_else(|| StreamError::NoRecord { stream: stream_id }.into())
    }

    /// Decodes and applies one received packet. Entries decoded before a
    /// malformed one are still applied.
    pub fn receive_packet(&mut self, bytes: &[u8]) -> Result<DispatchReport, SyncError> {
        let mut batch = match read_packet(bytes, &self.registry) {
            Ok(batch) => batch,
            Err(error) => {
                warn!("discarding unreadable packet: {}", error);
                self.diagnostics.record_malformed_packet();
                return Err(error.into());
            }
        };

        if let Some(error) = batch.error.take() {
            warn!(
                "packet from {} decoded partially ({} entries): {}",
                batch.sender,
                batch.frames.len(),
                error
            );
            self.diagnostics.record_malformed_packet();
        }

        Ok(self.dispatch(batch))
    }

    /// Applies an already decoded batch
    pub fn dispatch(&mut self, batch: InboundBatch) -> DispatchReport {
        SnapshotDispatcher::dispatch(
            batch,
            &mut self.registry,
            &self.authority,
            &mut self.diagnostics,
        )
    }

    /// Runs one render pass at `render_frame`, which may be fractional
    pub fn interpolate(&mut self, render_frame: f64) -> usize {
        self.interpolator.interpolate(
            render_frame,
            &mut self.registry,
            &self.authority,
            &mut self.diagnostics,
        )
    }

    // Inspection

    pub fn stream(&self, stream: &StreamId) -> Option<&SyncStream> {
        self.registry.stream(stream)
    }

    pub fn registry(&self) -> &SyncRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &SyncDiagnostics {
        &self.diagnostics
    }

    fn highest_captured(&self, entity: &EntityId) -> Option<FrameId> {
        self.registry
            .streams_of(entity)
            .iter()
            .filter_map(|stream| self.registry.stream(stream))
            .filter_map(|stream| stream.buffer().highest_frame())
            .max()
    }

    fn notify_authority(&mut self, change: AuthorityChange) {
        info!(
            "{} is now {} (is_mine: {})",
            change.entity,
            change.state.name(),
            change.is_mine
        );

        // registry iteration is already in apply order
        for stream in self.registry.iter_mut() {
            if stream.entity() != change.entity
                || !stream.capabilities().contains(Capabilities::AUTHORITY)
            {
                continue;
            }
            stream.handler_mut().on_change_authority(change.is_mine);
        }
    }
}
