use super::*;

/// Tests the fourth member arriving in a channel of three.
///
/// Verifies that the bot joins the channel and plays the clip once at half volume,
/// then stays connected with the audio marked finished.
///
/// Expected: Joined, one join and one play at 0.5
#[tokio::test(start_paused = true)]
async fn joins_and_plays_when_fourth_member_arrives() {
    let test = Harness::new(FakeVoiceGateway::new());

    let outcome = test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    assert_eq!(outcome, Outcome::Joined);
    assert_eq!(
        test.gateway.calls(),
        vec![
            VoiceCall::Join(guild_id(), channel_id()),
            VoiceCall::Play(guild_id(), PathBuf::from(CLIP), 0.5),
        ]
    );

    let state = test.registry.read().await;
    assert!(state.is_connected_to(guild_id(), channel_id()));
    assert!(state.session_for_guild(guild_id()).unwrap().last_audio_finished);
}

/// Tests counts below and above the threshold.
///
/// Only the exact threshold triggers a join.
///
/// Expected: Unchanged and no voice calls for every other count
#[tokio::test(start_paused = true)]
async fn ignores_counts_other_than_threshold() {
    let test = Harness::new(FakeVoiceGateway::new());

    for count in [0, 1, 2, 3, 5, 6] {
        let outcome = test
            .controller
            .handle_occupancy(occupancy(count, count, false))
            .await;
        assert_eq!(outcome, Outcome::Unchanged, "count {}", count);
    }

    assert!(test.gateway.calls().is_empty());
    assert_eq!(test.pending_count().await, 0);
}

/// Tests a qualifying count while the bot is already in the channel.
///
/// Expected: Unchanged, no join
#[tokio::test(start_paused = true)]
async fn ignores_threshold_when_bot_present() {
    let test = Harness::new(FakeVoiceGateway::new());

    let outcome = test.controller.handle_occupancy(occupancy(5, 4, true)).await;

    assert_eq!(outcome, Outcome::Unchanged);
    assert_eq!(test.gateway.join_count(), 0);
}

/// Tests a repeated qualifying event once connected.
///
/// The cache may not list the bot yet, so the event still looks qualifying.
///
/// Expected: Suppressed(Connected), a single join
#[tokio::test(start_paused = true)]
async fn suppresses_repeat_while_connected() {
    let test = Harness::new(FakeVoiceGateway::new());
    test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    let outcome = test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    assert_eq!(outcome, Outcome::Suppressed(SuppressReason::Connected));
    assert_eq!(test.gateway.join_count(), 1);
}

/// Tests more members arriving before the first join completes.
///
/// A fifth and sixth member join, and the fourth member's state is re-sent, while the
/// join is still in flight.
///
/// Expected: one join request in total
#[tokio::test(start_paused = true)]
async fn concurrent_events_during_join_request_one_join() {
    let test = Harness::new(FakeVoiceGateway::new().with_join_delay(Duration::from_secs(2)));

    let first = tokio::spawn({
        let controller = test.controller.clone();
        async move { controller.handle_occupancy(occupancy(4, 4, false)).await }
    });
    sleep(Duration::from_millis(100)).await;

    let repeat = test.controller.handle_occupancy(occupancy(4, 4, false)).await;
    let fifth = test.controller.handle_occupancy(occupancy(5, 5, false)).await;
    let sixth = test.controller.handle_occupancy(occupancy(6, 6, false)).await;

    assert_eq!(repeat, Outcome::Suppressed(SuppressReason::Pending));
    assert_eq!(fifth, Outcome::Unchanged);
    assert_eq!(sixth, Outcome::Unchanged);

    assert_eq!(first.await.unwrap(), Outcome::Joined);
    assert_eq!(test.gateway.join_count(), 1);
    assert_eq!(test.gateway.play_count(), 1);
}

/// Tests a second qualifying event inside the debounce window after a failed join.
///
/// Expected: Suppressed(Debounced), no second join
#[tokio::test(start_paused = true)]
async fn debounces_retrigger_within_window() {
    let test = Harness::new(FakeVoiceGateway::new().failing_joins());

    let first = test.controller.handle_occupancy(occupancy(4, 4, false)).await;
    sleep(Duration::from_secs(5)).await;
    let second = test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    assert_eq!(first, Outcome::JoinFailed);
    assert_eq!(second, Outcome::Suppressed(SuppressReason::Debounced));
    assert_eq!(test.gateway.join_count(), 1);
}

/// Tests that debounce is not permanent.
///
/// The bot joins, is left alone and leaves, then the channel fills up again. Inside
/// the window the new crowd is ignored; after the window it triggers a second join.
///
/// Expected: two joins overall
#[tokio::test(start_paused = true)]
async fn retriggers_after_window_elapses() {
    let test = Harness::new(FakeVoiceGateway::new());

    assert_eq!(
        test.controller.handle_occupancy(occupancy(4, 4, false)).await,
        Outcome::Joined
    );
    assert_eq!(
        test.controller.handle_occupancy(occupancy(1, 0, true)).await,
        Outcome::Left
    );
    assert_eq!(
        test.controller.handle_occupancy(occupancy(4, 4, false)).await,
        Outcome::Suppressed(SuppressReason::Debounced)
    );

    sleep(Duration::from_secs(11)).await;

    assert_eq!(
        test.controller.handle_occupancy(occupancy(4, 4, false)).await,
        Outcome::Joined
    );
    assert_eq!(test.gateway.join_count(), 2);
}

/// Tests a crowd forming in a second channel of a guild the bot is already in.
///
/// Expected: Suppressed(GuildBusy), the first session untouched
#[tokio::test(start_paused = true)]
async fn suppresses_second_channel_in_same_guild() {
    let test = Harness::new(FakeVoiceGateway::new());
    test.controller.handle_occupancy(occupancy(4, 4, false)).await;

    let other = ChannelId::new(2_001);
    let outcome = test
        .controller
        .handle_occupancy(occupancy_in(guild_id(), other, 4, 4, false))
        .await;

    assert_eq!(outcome, Outcome::Suppressed(SuppressReason::GuildBusy));
    assert_eq!(test.gateway.join_count(), 1);
    assert!(test
        .registry
        .read()
        .await
        .is_connected_to(guild_id(), channel_id()));
}

/// Tests a crowd forming in a second channel while the first channel's join is in flight.
///
/// Only one connection per guild may be opened, so the second channel must not start
/// its own join.
///
/// Expected: Suppressed(GuildBusy), one join and one play, session in the first channel
#[tokio::test(start_paused = true)]
async fn suppresses_second_channel_while_join_in_flight() {
    let test = Harness::new(FakeVoiceGateway::new().with_join_delay(Duration::from_secs(2)));

    let first = tokio::spawn({
        let controller = test.controller.clone();
        async move { controller.handle_occupancy(occupancy(4, 4, false)).await }
    });
    sleep(Duration::from_millis(100)).await;

    let other = ChannelId::new(2_001);
    let outcome = test
        .controller
        .handle_occupancy(occupancy_in(guild_id(), other, 4, 4, false))
        .await;

    assert_eq!(outcome, Outcome::Suppressed(SuppressReason::GuildBusy));
    assert_eq!(first.await.unwrap(), Outcome::Joined);
    assert_eq!(test.gateway.join_count(), 1);
    assert_eq!(test.gateway.play_count(), 1);
    assert_eq!(test.session_count().await, 1);
    assert!(test
        .registry
        .read()
        .await
        .is_connected_to(guild_id(), channel_id()));
}

/// Tests that guilds are tracked independently.
///
/// Expected: Joined in both guilds, two sessions
#[tokio::test(start_paused = true)]
async fn joins_in_separate_guilds() {
    let test = Harness::new(FakeVoiceGateway::new());
    let other_guild = GuildId::new(1_001);
    let other_channel = ChannelId::new(3_000);

    let first = test.controller.handle_occupancy(occupancy(4, 4, false)).await;
    let second = test
        .controller
        .handle_occupancy(occupancy_in(other_guild, other_channel, 4, 4, false))
        .await;

    assert_eq!(first, Outcome::Joined);
    assert_eq!(second, Outcome::Joined);
    assert_eq!(test.session_count().await, 2);
}
