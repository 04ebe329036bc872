use framesync_shared::{
    EntityId, ParticipantId, PrecisionSpec, ReplicationMode, StreamConfig, StreamId,
};
use framesync_test::{exchange, Call, TestPeer};

const HOST: ParticipantId = ParticipantId(1);

fn peers_with_orders(streams: &[(EntityId, StreamId, i32)]) -> (TestPeer, TestPeer) {
    let mut host = TestPeer::new(HOST.0, HOST.0);
    let mut guest = TestPeer::new(2, HOST.0);

    for peer in [&mut host, &mut guest] {
        for (entity, stream, order) in streams {
            if !peer.session.registry().contains_entity(entity) {
                peer.add_entity(*entity, ReplicationMode::OwnerSend);
                peer.session.assign_owner(*entity, HOST).unwrap();
            }
            let config = StreamConfig::new(PrecisionSpec::Integer { min: 0, max: 1000 })
                .with_apply_order(*order);
            peer.add_stream(*entity, *stream, config);
        }
    }
    for (_, stream, _) in streams {
        host.set_live(*stream, stream.0 as i32);
    }

    (host, guest)
}

#[test]
fn snapshots_follow_apply_order() {
    let entity = EntityId(1);
    let (mut host, mut guest) = peers_with_orders(&[
        (entity, StreamId(1), 3),
        (entity, StreamId(2), 1),
        (entity, StreamId(3), 2),
    ]);

    exchange(&mut host, &mut guest, 1);

    assert_eq!(
        guest.log.snapshot_order(),
        vec![StreamId(2), StreamId(3), StreamId(1)]
    );
}

#[test]
fn apply_order_spans_entities() {
    let (mut host, mut guest) = peers_with_orders(&[
        (EntityId(1), StreamId(1), 5),
        (EntityId(2), StreamId(2), -1),
        (EntityId(1), StreamId(3), 0),
        (EntityId(2), StreamId(4), 5),
    ]);

    exchange(&mut host, &mut guest, 1);

    assert_eq!(
        guest.log.snapshot_order(),
        vec![StreamId(2), StreamId(3), StreamId(1), StreamId(4)]
    );
}

#[test]
fn only_the_first_snapshot_initializes() {
    let entity = EntityId(1);
    let (mut host, mut guest) = peers_with_orders(&[(entity, StreamId(1), 0)]);

    exchange(&mut host, &mut guest, 1);
    exchange(&mut host, &mut guest, 2);

    let initialize: Vec<bool> = guest
        .log
        .calls_for(StreamId(1))
        .into_iter()
        .filter_map(|call| match call {
            Call::Snapshot { initialize, .. } => Some(initialize),
            _ => None,
        })
        .collect();
    assert_eq!(initialize, vec![true, false]);
}

#[test]
fn streams_without_new_data_are_not_snapshotted() {
    let entity = EntityId(1);
    let (mut host, mut guest) =
        peers_with_orders(&[(entity, StreamId(1), 0), (entity, StreamId(2), 1)]);
    host.clear_live(StreamId(2));

    exchange(&mut host, &mut guest, 1);

    assert_eq!(guest.log.snapshot_order(), vec![StreamId(1)]);
}
