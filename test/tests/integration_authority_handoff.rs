/// Two-phase authority hand-off between two peers
use framesync_shared::{
    AuthorityError, AuthorityState, EntityId, FramePacketWriter, ParticipantId, PrecisionSpec,
    ReplicationMode, StreamConfig, StreamId, SyncError, SyncValue,
};
use framesync_test::{deliver, exchange, exchange_n_times, TestPeer};

const ENTITY: EntityId = EntityId(7);
const VALUE: StreamId = StreamId(1);
const A: ParticipantId = ParticipantId(1);
const B: ParticipantId = ParticipantId(2);
const MASTER: ParticipantId = ParticipantId(0);

fn peers() -> (TestPeer, TestPeer) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut a = TestPeer::new(A.0, MASTER.0);
    let mut b = TestPeer::new(B.0, MASTER.0);
    for peer in [&mut a, &mut b] {
        peer.add_entity(ENTITY, ReplicationMode::OwnerSend);
        peer.add_stream(ENTITY, VALUE, StreamConfig::new(PrecisionSpec::FullScalar));
        peer.session.assign_owner(ENTITY, A).unwrap();
    }
    a.set_live(VALUE, 1.0_f32);
    b.set_live(VALUE, 2.0_f32);

    (a, b)
}

fn packet_from(sender: ParticipantId, frame_id: u32, claims_authority: bool) -> Vec<Vec<u8>> {
    let mut writer = FramePacketWriter::new(sender, 508);
    writer
        .write_entry(
            VALUE,
            frame_id,
            claims_authority,
            &SyncValue::Scalar(frame_id as f32),
            &PrecisionSpec::FullScalar,
        )
        .unwrap();
    writer.finish()
}

#[test]
fn requesting_a_transfer_freezes_the_old_writer() {
    let (mut a, mut b) = peers();
    exchange_n_times(&mut a, &mut b, 1, 3);

    a.session.request_transfer(ENTITY, B, 10).unwrap();

    assert!(a.session.capture_tick(4).is_empty());
    assert_eq!(a.session.authority_state(&ENTITY), Some(AuthorityState::OwnedLocal));
}

#[test]
fn new_writer_starts_only_after_commit() {
    let (mut a, mut b) = peers();
    exchange_n_times(&mut a, &mut b, 1, 3);

    let ticket_a = a.session.request_transfer(ENTITY, B, 10).unwrap();
    let ticket_b = b.session.request_transfer(ENTITY, B, 10).unwrap();
    assert!(b.session.capture_tick(10).is_empty());

    a.session.commit_transfer(&ticket_a).unwrap();
    b.session.commit_transfer(&ticket_b).unwrap();

    let report = exchange(&mut b, &mut a, 10);
    assert_eq!(report.applied, 1);
    assert_eq!(a.latest_value(VALUE), Some(SyncValue::Scalar(2.0)));
    assert!(b.session.is_mine(&ENTITY));
    assert!(!a.session.is_mine(&ENTITY));
}

#[test]
fn new_writer_waits_for_its_transfer_point() {
    let (mut a, mut b) = peers();
    exchange_n_times(&mut a, &mut b, 1, 3);

    let ticket_a = a.session.request_transfer(ENTITY, B, 10).unwrap();
    let ticket_b = b.session.request_transfer(ENTITY, B, 10).unwrap();
    a.session.commit_transfer(&ticket_a).unwrap();
    b.session.commit_transfer(&ticket_b).unwrap();

    for frame_id in 4..10 {
        assert!(
            b.session.capture_tick(frame_id).is_empty(),
            "frame {frame_id} belongs to the previous writer"
        );
    }
    assert_eq!(b.frame_ids(VALUE), vec![1, 2, 3]);

    let report = exchange(&mut b, &mut a, 10);
    assert_eq!(report.applied, 1);
    assert_eq!(a.session.diagnostics().unauthorized(), 0);
    assert_eq!(a.frame_ids(VALUE), vec![1, 2, 3, 10]);
    assert_eq!(b.frame_ids(VALUE), vec![1, 2, 3, 10]);
}

#[test]
fn claims_are_accepted_while_the_receiver_is_still_in_flight() {
    let (mut a, mut b) = peers();
    exchange(&mut a, &mut b, 1);

    a.session.request_transfer(ENTITY, B, 10).unwrap();
    let ticket_b = b.session.request_transfer(ENTITY, B, 10).unwrap();
    b.session.commit_transfer(&ticket_b).unwrap();

    let report = exchange(&mut b, &mut a, 10);
    assert_eq!(report.applied, 1);
    assert_eq!(report.unauthorized, 0);
}

#[test]
fn transfer_point_partitions_late_frames() {
    let (mut a, mut b) = peers();
    exchange(&mut a, &mut b, 1);

    let ticket = b.session.request_transfer(ENTITY, B, 10).unwrap();

    // late frame of the old writer, before the transfer point
    let report = deliver(&packet_from(A, 5, true), &mut b);
    assert_eq!(report.applied, 1);

    // the old writer may not write at or past the transfer point
    let report = deliver(&packet_from(A, 10, true), &mut b);
    assert_eq!(report.unauthorized, 1);

    b.session.commit_transfer(&ticket).unwrap();
    let report = deliver(&packet_from(A, 11, true), &mut b);
    assert_eq!(report.unauthorized, 1);
    assert_eq!(b.frame_ids(VALUE), vec![1, 5]);
}

#[test]
fn third_parties_are_never_accepted() {
    let (mut a, mut b) = peers();
    exchange(&mut a, &mut b, 1);

    let report = deliver(&packet_from(ParticipantId(9), 2, true), &mut b);

    assert_eq!(report.unauthorized, 1);
    assert_eq!(b.session.diagnostics().unauthorized(), 1);
    assert_eq!(b.frame_ids(VALUE), vec![1]);
}

#[test]
fn concurrent_request_is_a_retryable_conflict() {
    let (mut a, _b) = peers();

    a.session.request_transfer(ENTITY, B, 10).unwrap();
    let error = a
        .session
        .request_transfer(ENTITY, ParticipantId(3), 12)
        .unwrap_err();

    let authority_error = match error {
        SyncError::Authority(authority_error) => authority_error,
        other => panic!("expected an authority error, got {other:?}"),
    };
    assert_eq!(
        authority_error,
        AuthorityError::TransferInFlight {
            entity: ENTITY,
            pending_to: B,
        }
    );
    assert!(authority_error.is_retryable());

    a.session.abort_transfer(ENTITY).unwrap();
    assert!(a.session.request_transfer(ENTITY, ParticipantId(3), 12).is_ok());
}

#[test]
fn abort_resumes_capture() {
    let (mut a, _b) = peers();
    a.session.capture_tick(1);

    a.session.request_transfer(ENTITY, B, 10).unwrap();
    assert!(a.session.capture_tick(2).is_empty());

    a.session.abort_transfer(ENTITY).unwrap();
    assert_eq!(a.session.capture_tick(3).len(), 1);
    assert_eq!(a.log.authority_changes(VALUE), vec![true]);
}

#[test]
fn transfer_point_must_follow_captured_frames() {
    let (mut a, _b) = peers();
    a.session.capture_tick(1);
    a.session.capture_tick(2);

    let error = a.session.request_transfer(ENTITY, B, 2).unwrap_err();
    assert!(matches!(
        error,
        SyncError::Authority(AuthorityError::InvalidTransferPoint { earliest: 3, .. })
    ));
}

#[test]
fn destroying_an_entity_drops_its_transfer_silently() {
    let (mut a, _b) = peers();
    let ticket = a.session.request_transfer(ENTITY, B, 10).unwrap();
    a.log.clear();

    a.session.destroy_entity(ENTITY).unwrap();

    assert!(a.log.calls().is_empty());
    assert!(a.session.stream(&VALUE).is_none());
    assert!(matches!(
        a.session.commit_transfer(&ticket),
        Err(SyncError::Authority(AuthorityError::EntityNotRegistered { .. }))
    ));
}

#[test]
fn master_send_entities_are_written_by_the_master() {
    let mut master = TestPeer::new(MASTER.0, MASTER.0);
    let mut owner = TestPeer::new(A.0, MASTER.0);
    let config = StreamConfig::new(PrecisionSpec::FullScalar)
        .with_replication_mode(ReplicationMode::MasterSend);

    for peer in [&mut master, &mut owner] {
        peer.add_entity(ENTITY, ReplicationMode::MasterSend);
        peer.add_stream(ENTITY, VALUE, config.clone());
        peer.session.assign_owner(ENTITY, A).unwrap();
    }
    master.set_live(VALUE, 3.0_f32);
    owner.set_live(VALUE, 4.0_f32);

    assert!(owner.session.capture_tick(1).is_empty());
    assert_eq!(exchange(&mut master, &mut owner, 1).applied, 1);
    assert_eq!(owner.latest_value(VALUE), Some(SyncValue::Scalar(3.0)));

    assert!(matches!(
        owner.session.request_transfer(ENTITY, A, 5),
        Err(SyncError::Authority(AuthorityError::MasterControlled { .. }))
    ));
    assert_eq!(master.log.authority_changes(VALUE), vec![true]);
    assert_eq!(owner.log.authority_changes(VALUE), vec![false]);
}
