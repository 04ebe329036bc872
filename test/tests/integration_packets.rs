use framesync_shared::{
    EntityId, ParticipantId, PrecisionSpec, ReplicationMode, StreamConfig, StreamError, StreamId,
    SyncConfig, SyncError, SyncValue, Vec3,
};
use framesync_test::{deliver, Call, TestPeer};

const ENTITY: EntityId = EntityId(1);
const HOST: ParticipantId = ParticipantId(1);

fn peers_with(config: SyncConfig, streams: u32, stream_config: StreamConfig) -> (TestPeer, TestPeer) {
    let mut host = TestPeer::with_config(config);
    let mut guest = TestPeer::new(2, HOST.0);
    for peer in [&mut host, &mut guest] {
        peer.add_entity(ENTITY, ReplicationMode::OwnerSend);
        for id in 0..streams {
            peer.add_stream(ENTITY, StreamId(id), stream_config.clone());
        }
        peer.session.assign_owner(ENTITY, HOST).unwrap();
    }
    (host, guest)
}

#[test]
fn captures_are_split_to_fit_the_packet_size() {
    let config = SyncConfig {
        max_packet_bytes: 64,
        ..SyncConfig::new(HOST, HOST)
    };
    let (mut host, mut guest) = peers_with(config, 40, StreamConfig::new(PrecisionSpec::FullVector));
    for id in 0..40 {
        host.set_live(StreamId(id), Vec3::new(id as f32, 0.0, -1.0));
    }

    let packets = host.session.capture_tick(1);

    assert_eq!(packets.len(), 10);
    assert!(packets.iter().all(|packet| packet.len() <= 64));
    assert_eq!(host.session.diagnostics().sent(), 40);

    let report = deliver(&packets, &mut guest);
    assert_eq!(report.applied, 40);
    assert_eq!(
        guest.latest_value(StreamId(39)),
        Some(SyncValue::Vector(Vec3::new(39.0, 0.0, -1.0)))
    );
}

#[test]
fn quiet_tick_sends_nothing() {
    let (mut host, _guest) = peers_with(
        SyncConfig::new(HOST, HOST),
        3,
        StreamConfig::new(PrecisionSpec::Bool),
    );

    assert!(host.session.capture_tick(1).is_empty());
}

#[test]
fn out_of_band_quantization_sends_the_latest_record() {
    let (mut host, mut guest) = peers_with(
        SyncConfig::new(HOST, HOST),
        1,
        StreamConfig::new(PrecisionSpec::Integer { min: -50, max: 50 }),
    );
    host.set_live(StreamId(0), -12);
    host.session.capture_tick(4);

    let packet = host.session.quantize_stream(StreamId(0)).unwrap();

    assert!(host
        .log
        .calls_for(StreamId(0))
        .contains(&Call::Quantize {
            frame_id: 4,
            realm: framesync_shared::Realm::Primary,
        }));
    let report = deliver(&[packet], &mut guest);
    assert_eq!(report.applied, 1);
    assert_eq!(guest.latest_value(StreamId(0)), Some(SyncValue::Integer(-12)));
}

#[test]
fn out_of_band_quantization_requires_authority_and_data() {
    let (mut host, mut guest) = peers_with(
        SyncConfig::new(HOST, HOST),
        1,
        StreamConfig::new(PrecisionSpec::Bool),
    );

    assert_eq!(
        host.session.quantize_stream(StreamId(0)),
        Err(SyncError::Stream(StreamError::NoRecord {
            stream: StreamId(0)
        }))
    );
    assert_eq!(
        guest.session.quantize_stream(StreamId(0)),
        Err(SyncError::NotAuthoritative {
            stream: StreamId(0),
            entity: ENTITY,
        })
    );
    assert_eq!(
        host.session.quantize_stream(StreamId(5)),
        Err(SyncError::Stream(StreamError::UnknownStream {
            stream: StreamId(5)
        }))
    );
}

#[test]
fn replayed_packets_are_stale() {
    let (mut host, mut guest) = peers_with(
        SyncConfig::new(HOST, HOST),
        2,
        StreamConfig::new(PrecisionSpec::FullScalar),
    );
    host.set_live(StreamId(0), 1.0_f32);
    host.set_live(StreamId(1), 2.0_f32);

    let packets = host.session.capture_tick(1);
    assert_eq!(deliver(&packets, &mut guest).applied, 2);

    let report = deliver(&packets, &mut guest);
    assert_eq!(report.applied, 0);
    assert_eq!(report.stale, 2);
    assert_eq!(guest.log.snapshot_order().len(), 2);
}
