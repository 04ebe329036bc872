use std::collections::HashMap;

use crate::{
    authority::ReplicationMode,
    stream::{StreamConfig, StreamError, StreamHandler, SyncStream},
    EntityId, StreamId,
};

struct EntityStreams {
    mode: ReplicationMode,
    streams: Vec<StreamId>,
}

/// Owns every synchronized stream of a session.
///
/// Streams are kept sorted by `(apply_order, id)`, so iteration order is the
/// dispatch order.
pub struct SyncRegistry {
    default_capacity: usize,
    entities: HashMap<EntityId, EntityStreams>,
    streams: Vec<SyncStream>,
    positions: HashMap<StreamId, usize>,
}

impl SyncRegistry {
    pub fn new(default_capacity: usize) -> Self {
        Self {
            default_capacity,
            entities: HashMap::new(),
            streams: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn register_entity(
        &mut self,
        entity: EntityId,
        mode: ReplicationMode,
    ) -> Result<(), StreamError> {
        if self.entities.contains_key(&entity) {
            return Err(StreamError::DuplicateEntity { entity });
        }
        self.entities.insert(
            entity,
            EntityStreams {
                mode,
                streams: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn contains_entity(&self, entity: &EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    pub fn entity_mode(&self, entity: &EntityId) -> Option<ReplicationMode> {
        self.entities.get(entity).map(|entry| entry.mode)
    }

    pub fn register_stream(
        &mut self,
        entity: EntityId,
        id: StreamId,
        config: StreamConfig,
        handler: Box<dyn StreamHandler>,
    ) -> Result<(), StreamError> {
        let entry = self
            .entities
            .get(&entity)
            .ok_or(StreamError::UnknownEntity { entity })?;
        if self.positions.contains_key(&id) {
            return Err(StreamError::DuplicateStream { stream: id });
        }
        if config.replication_mode != entry.mode {
            return Err(StreamError::ReplicationModeMismatch {
                stream: id,
                entity,
                declared: config.replication_mode,
                entity_mode: entry.mode,
            });
        }
        config.precision.validate()?;
        let capacity = config.capacity.unwrap_or(self.default_capacity);
        if capacity < 2 {
            return Err(StreamError::InvalidCapacity {
                stream: id,
                capacity,
            });
        }

        let key = (config.apply_order, id);
        let position = self
            .streams
            .partition_point(|stream| (stream.apply_order(), stream.id()) < key);
        self.streams.insert(
            position,
            SyncStream::new(id, entity, config, capacity, handler),
        );
        self.reindex();

        if let Some(entry) = self.entities.get_mut(&entity) {
            entry.streams.push(id);
        }

        Ok(())
    }

    /// Removes the entity and releases all of its streams
    pub fn deregister_entity(&mut self, entity: &EntityId) -> Result<Vec<StreamId>, StreamError> {
        let entry = self
            .entities
            .remove(entity)
            .ok_or(StreamError::UnknownEntity { entity: *entity })?;

        self.streams.retain(|stream| stream.entity() != *entity);
        self.reindex();

        Ok(entry.streams)
    }

    pub fn streams_of(&self, entity: &EntityId) -> &[StreamId] {
        self.entities
            .get(entity)
            .map(|entry| entry.streams.as_slice())
            .unwrap_or(&[])
    }

    pub fn stream(&self, id: &StreamId) -> Option<&SyncStream> {
        self.positions.get(id).map(|position| &self.streams[*position])
    }

    pub fn stream_mut(&mut self, id: &StreamId) -> Option<&mut SyncStream> {
        let position = *self.positions.get(id)?;
        Some(&mut self.streams[position])
    }

    /// Dispatch rank of a stream, lower ranks are applied first
    pub fn position(&self, id: &StreamId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Streams in apply order
    pub fn iter(&self) -> impl Iterator<Item = &SyncStream> {
        self.streams.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut SyncStream> {
        self.streams.iter_mut()
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (position, stream) in self.streams.iter().enumerate() {
            self.positions.insert(stream.id(), position);
        }
    }
}
