use std::collections::HashMap;

use framesync_shared::{
    EntityId, ParticipantId, ReplicationMode, StreamConfig, StreamId, SyncConfig, SyncSession,
    SyncValue,
};

use crate::helpers::{CallLog, LiveValue, RecordingHandler};

/// A session plus the recording handlers of its streams
pub struct TestPeer {
    pub session: SyncSession,
    pub log: CallLog,
    live: HashMap<StreamId, LiveValue>,
}

impl TestPeer {
    pub fn new(local: u16, master: u16) -> Self {
        Self::with_config(SyncConfig::new(ParticipantId(local), ParticipantId(master)))
    }

    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            session: SyncSession::new(config),
            log: CallLog::new(),
            live: HashMap::new(),
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.session.local()
    }

    pub fn add_entity(&mut self, entity: EntityId, mode: ReplicationMode) {
        self.session
            .register_entity(entity, mode)
            .expect("entity registration failed");
    }

    /// Registers a stream backed by a [`RecordingHandler`] with every capability
    pub fn add_stream(&mut self, entity: EntityId, stream: StreamId, config: StreamConfig) {
        let handler = RecordingHandler::new(stream, &self.log);
        self.add_stream_with(entity, stream, config, handler);
    }

    pub fn add_stream_with(
        &mut self,
        entity: EntityId,
        stream: StreamId,
        config: StreamConfig,
        handler: RecordingHandler,
    ) {
        self.live.insert(stream, handler.live());
        self.session
            .register_stream(entity, stream, config, handler)
            .expect("stream registration failed");
    }

    pub fn set_live(&self, stream: StreamId, value: impl Into<SyncValue>) {
        self.live
            .get(&stream)
            .expect("stream has no live value")
            .set(value);
    }

    /// Makes the stream's handler skip capture until a value is set again
    pub fn clear_live(&self, stream: StreamId) {
        self.live
            .get(&stream)
            .expect("stream has no live value")
            .clear();
    }

    /// Buffered frame ids of a stream, oldest first
    pub fn frame_ids(&self, stream: StreamId) -> Vec<u32> {
        self.session
            .stream(&stream)
            .map(|stream| stream.buffer().frame_ids())
            .unwrap_or_default()
    }

    pub fn latest_value(&self, stream: StreamId) -> Option<SyncValue> {
        self.session
            .stream(&stream)
            .and_then(|stream| stream.buffer().latest().map(|record| *record.value()))
    }
}
