use super::*;

/// Tests a join the voice library refuses.
///
/// Expected: JoinFailed, nothing pending, no session, nothing played
#[tokio::test(start_paused = true)]
async fn join_failure_returns_to_idle() {
    let test = Harness::new(FakeVoiceGateway::new().failing_joins());

    let outcome = test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    assert_eq!(outcome, Outcome::JoinFailed);
    assert_eq!(test.pending_count().await, 0);
    assert_eq!(test.session_count().await, 0);
    assert_eq!(test.gateway.play_count(), 0);
}

/// Tests a join that never reports ready.
///
/// The join outlives the pending trigger, so it is abandoned and whatever half-open
/// connection the library holds is released.
///
/// Expected: JoinFailed with a leave call after the join
#[tokio::test(start_paused = true)]
async fn join_timeout_releases_half_open_connection() {
    let test = Harness::new(FakeVoiceGateway::new().with_join_delay(Duration::from_secs(60)));

    let outcome = test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    assert_eq!(outcome, Outcome::JoinFailed);
    assert_eq!(
        test.gateway.calls(),
        vec![
            VoiceCall::Join(guild_id(), channel_id()),
            VoiceCall::Leave(guild_id()),
        ]
    );
    assert_eq!(test.pending_count().await, 0);
    assert_eq!(test.session_count().await, 0);
}

/// Tests a join timing out after a newer join in the same guild took over.
///
/// The abandoned join must not release the connection the newer join is opening.
///
/// Expected: JoinFailed, no leave call, the newer pending join left in place
#[tokio::test(start_paused = true)]
async fn join_timeout_keeps_newer_join_in_guild() {
    let test = Harness::new(FakeVoiceGateway::new().with_join_delay(Duration::from_secs(60)));

    let first = tokio::spawn({
        let controller = test.controller.clone();
        async move { controller.handle_occupancy(occupancy(4, 4, false)).await }
    });
    sleep(Duration::from_secs(5)).await;

    let other = ChannelId::new(2_001);
    {
        let mut state = test.registry.write().await;
        let now = Instant::now();
        let generation = state.pending_mut(channel_id(), now).unwrap().generation;
        state.release_pending(channel_id(), generation);
        state.begin_pending(guild_id(), other, now, Duration::from_secs(10));
    }

    assert_eq!(first.await.unwrap(), Outcome::JoinFailed);
    assert_eq!(test.gateway.leave_count(), 0);

    let mut state = test.registry.write().await;
    let pending = state.pending_for_guild(guild_id(), Instant::now()).unwrap();
    assert_eq!(pending.channel_id, other);
}

/// Tests a connection error reported by the voice library.
///
/// Expected: session ended, connection released once, poll stopped
#[tokio::test(start_paused = true)]
async fn connection_error_ends_session() {
    let test = Harness::new(FakeVoiceGateway::new());
    test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    test.controller
        .handle_connection_event(ConnectionEvent {
            guild_id: guild_id(),
            kind: ConnectionEventKind::Error("websocket closed".to_string()),
        })
        .await;

    assert_eq!(test.session_count().await, 0);
    assert_eq!(test.gateway.leave_count(), 1);

    test.probe.set(occupancy(1, 0, true));
    sleep(Duration::from_secs(10)).await;
    assert_eq!(test.gateway.leave_count(), 1);
}

/// Tests an unsolicited destroyed status after the clip played.
///
/// The connection is already gone, so only bookkeeping is released and no session is
/// left pointing at it.
///
/// Expected: no session, no leave call
#[tokio::test(start_paused = true)]
async fn destroyed_connection_releases_bookkeeping() {
    let test = Harness::new(FakeVoiceGateway::new());
    test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    test.controller
        .handle_connection_event(ConnectionEvent {
            guild_id: guild_id(),
            kind: ConnectionEventKind::Destroyed,
        })
        .await;

    assert_eq!(test.session_count().await, 0);
    assert_eq!(test.gateway.leave_count(), 0);
}

/// Tests a status report for a guild without a session.
///
/// This is what arrives after the bot leaves on its own.
///
/// Expected: no voice calls
#[tokio::test(start_paused = true)]
async fn connection_event_without_session_is_ignored() {
    let test = Harness::new(FakeVoiceGateway::new());

    test.controller
        .handle_connection_event(ConnectionEvent {
            guild_id: guild_id(),
            kind: ConnectionEventKind::Destroyed,
        })
        .await;

    assert!(test.gateway.calls().is_empty());
}

/// Tests a playback failure after joining.
///
/// Expected: Joined, session kept with the audio marked finished, no leave
#[tokio::test(start_paused = true)]
async fn playback_failure_keeps_session() {
    let test = Harness::new(FakeVoiceGateway::new().failing_playback());

    let outcome = test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    assert_eq!(outcome, Outcome::Joined);
    assert_eq!(test.gateway.leave_count(), 0);

    let state = test.registry.read().await;
    let session = state.session_for_guild(guild_id()).unwrap();
    assert_eq!(session.channel_id, channel_id());
    assert!(session.last_audio_finished);
    assert!(!session.poll.is_cancelled());
}
