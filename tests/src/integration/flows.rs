//! # Integration Test Flows
//!
//! Full league flows through the runtime container: profiles, queue
//! lifecycle, the snake draft, Elo updates from dl-01-rating, and the change
//! notifications published on shared-bus.
//!
//! ## Flows Tested
//!
//! 1. **Lobby → draft → match → history**: the canonical eight-player match
//! 2. **Event ordering**: what a lobby or draft screen would observe
//! 3. **Back-to-back matches**: claims released on completion, ratings carried over
//! 4. **Script driver**: the same flow expressed as a command script

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use dl_01_rating::{RatedPlayer, RatingEngine};
    use dl_02_draft_queue::{
        ActiveQueueIndex, DraftError, DraftQueueApi, JoinQueue, MatchStore, ReportWinner,
        StartMatch,
    };
    use league_runtime::ScriptRunner;
    use shared_bus::{EventFilter, EventTopic, LeagueEvent};
    use shared_types::{MatchStatus, PlayerId, QueueStatus, TeamSide, Version};

    use crate::fixtures::{drafted_queue, filled_queue, rating, seeded_league, SEEDED};

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    // =========================================================================
    // LOBBY → DRAFT → MATCH
    // =========================================================================

    #[tokio::test]
    async fn test_balanced_match_moves_ratings_by_twelve() {
        let league = seeded_league().await.unwrap();
        let queue_id = drafted_queue(&league, "friday").await.unwrap();

        let queue = league.draft_queue.queue(queue_id).await.unwrap();
        assert_eq!(queue.value.status, QueueStatus::InProgress);
        assert_eq!(queue.value.roster(TeamSide::A), ids(&["p1", "p3", "p5", "p6"]).as_slice());
        assert_eq!(queue.value.roster(TeamSide::B), ids(&["p2", "p4", "p7", "p8"]).as_slice());
        assert_eq!(queue.value.current_drafter(), None);

        let report = league
            .draft_queue
            .report_winner(ReportWinner {
                queue_id,
                winning_team: TeamSide::A,
                base_version: Some(queue.version),
            })
            .await
            .unwrap();

        assert_eq!(report.queue.value.status, QueueStatus::Completed);
        assert_eq!(report.record.status, MatchStatus::Completed);
        assert_eq!(report.record.winning_team, TeamSide::A);
        assert_eq!(report.record.rating_changes.len(), 8);

        for (player, before) in SEEDED {
            let expected = if report.record.team_a.contains(&PlayerId::from(player)) {
                before + 12
            } else {
                before - 12
            };
            assert_eq!(rating(&league, player).await.unwrap(), expected, "{player}");
        }

        // Exactly one record for the queue, visible in each player's history.
        let stored = league.matches.find_by_queue(queue_id).await.unwrap();
        assert_eq!(stored, Some(report.record.clone()));
        let history = league
            .draft_queue
            .match_history(&PlayerId::from("p8"))
            .await
            .unwrap();
        assert_eq!(history, vec![report.record]);
    }

    #[tokio::test]
    async fn test_engine_and_service_agree() {
        let league = seeded_league().await.unwrap();
        let queue_id = drafted_queue(&league, "friday").await.unwrap();
        let queue = league.draft_queue.queue(queue_id).await.unwrap().value;

        let snapshot = |side: TeamSide| -> Vec<RatedPlayer> {
            queue
                .roster(side)
                .iter()
                .map(|p| {
                    let seeded = SEEDED.iter().find(|(id, _)| *id == p.as_str()).map(|(_, r)| *r);
                    RatedPlayer::new(p.clone(), seeded)
                })
                .collect()
        };
        let updates = RatingEngine::default()
            .compute(&snapshot(TeamSide::A), &snapshot(TeamSide::B), TeamSide::B)
            .unwrap();

        let report = league
            .draft_queue
            .report_winner(ReportWinner {
                queue_id,
                winning_team: TeamSide::B,
                base_version: None,
            })
            .await
            .unwrap();

        for update in updates {
            let change = report
                .record
                .rating_changes
                .iter()
                .find(|c| c.player_id == update.player_id)
                .unwrap();
            assert_eq!(change.before, update.before);
            assert_eq!(change.after, update.after);
        }
        // The upset costs the favourites more than the win above earned them.
        assert_eq!(rating(&league, "p1").await.unwrap(), 1200 - 20);
        assert_eq!(rating(&league, "p8").await.unwrap(), 800 + 20);
    }

    #[tokio::test]
    async fn test_lobby_lists_only_active_queues() {
        let league = seeded_league().await.unwrap();
        let done = drafted_queue(&league, "done").await.unwrap();
        league
            .draft_queue
            .report_winner(ReportWinner {
                queue_id: done,
                winning_team: TeamSide::A,
                base_version: None,
            })
            .await
            .unwrap();
        let open = filled_queue(&league, "open", &["p1", "p2"]).await.unwrap();

        let lobby = league
            .draft_queue
            .list_queues(&QueueStatus::ACTIVE)
            .await
            .unwrap();
        let ids: Vec<_> = lobby.iter().map(|q| q.value.id).collect();
        assert_eq!(ids, vec![open]);

        let everything = league.draft_queue.list_queues(&[]).await.unwrap();
        assert_eq!(everything.len(), 2);
    }

    // =========================================================================
    // EVENT ORDERING
    // =========================================================================

    #[tokio::test]
    async fn test_events_follow_the_queue_lifecycle() {
        let league = seeded_league().await.unwrap();
        let queue_id = drafted_queue(&league, "friday").await.unwrap();

        let mut stream = league.event_bus.event_stream(EventFilter::queue(queue_id));
        league
            .draft_queue
            .report_winner(ReportWinner {
                queue_id,
                winning_team: TeamSide::A,
                base_version: None,
            })
            .await
            .unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            let event = timeout(Duration::from_secs(1), stream.next())
                .await
                .unwrap()
                .unwrap();
            seen.push(event);
        }

        assert!(matches!(&seen[0], LeagueEvent::MatchRecorded(m) if m.queue_id == queue_id));
        assert!(matches!(&seen[1], LeagueEvent::RatingsApplied { changes, .. } if changes.len() == 8));
        assert!(matches!(
            &seen[2],
            LeagueEvent::QueueUpdated { queue, .. } if queue.status == QueueStatus::Completed
        ));
    }

    #[tokio::test]
    async fn test_queue_versions_increase_with_each_write() {
        let league = seeded_league().await.unwrap();
        let mut sub = league
            .event_bus
            .subscribe(EventFilter::topics(vec![EventTopic::Queue]));

        let queue_id = drafted_queue(&league, "friday").await.unwrap();

        let mut versions = Vec::new();
        while let Ok(Some(event)) = sub.try_recv() {
            if let LeagueEvent::QueueUpdated { queue, version } = event {
                assert_eq!(queue.id, queue_id);
                versions.push(version);
            }
        }
        // create + 8 joins + start + 6 picks
        assert_eq!(versions.len(), 16);
        assert!(versions.windows(2).all(|w| w[1] == w[0].next()));
        assert_eq!(
            league.draft_queue.queue(queue_id).await.unwrap().version,
            *versions.last().unwrap()
        );
    }

    // =========================================================================
    // BACK-TO-BACK MATCHES
    // =========================================================================

    #[tokio::test]
    async fn test_players_requeue_after_completion() {
        let league = seeded_league().await.unwrap();
        let first = drafted_queue(&league, "first").await.unwrap();

        // Still bound to the first queue while it is in progress.
        let second = league.draft_queue.create_queue("second").await.unwrap();
        let err = league
            .draft_queue
            .join_queue(JoinQueue {
                queue_id: second.value.id,
                player_id: PlayerId::from("p1"),
                base_version: Some(second.version),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::PreconditionFailed { .. }));

        league
            .draft_queue
            .report_winner(ReportWinner {
                queue_id: first,
                winning_team: TeamSide::A,
                base_version: None,
            })
            .await
            .unwrap();
        for (player, _) in SEEDED {
            assert_eq!(
                league.active.active_queue(&PlayerId::from(player)).await.unwrap(),
                None
            );
        }

        let players: Vec<&str> = SEEDED.iter().map(|(p, _)| *p).collect();
        for player in &players {
            league
                .draft_queue
                .join_queue(JoinQueue {
                    queue_id: second.value.id,
                    player_id: PlayerId::from(*player),
                    base_version: None,
                })
                .await
                .unwrap();
        }
        let started = league
            .draft_queue
            .start_match(StartMatch {
                queue_id: second.value.id,
                base_version: None,
            })
            .await
            .unwrap();

        // Captains come from the post-match ratings: p1 1212, p2 1088.
        let captains = started.value.captains().unwrap();
        assert_eq!(captains.team_a, PlayerId::from("p1"));
        assert_eq!(captains.team_b, PlayerId::from("p2"));

        let history = league
            .draft_queue
            .match_history(&PlayerId::from("p1"))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_archive_removes_completed_queue() {
        let league = seeded_league().await.unwrap();
        let queue_id = drafted_queue(&league, "friday").await.unwrap();
        let report = league
            .draft_queue
            .report_winner(ReportWinner {
                queue_id,
                winning_team: TeamSide::B,
                base_version: None,
            })
            .await
            .unwrap();

        let err = league
            .draft_queue
            .archive_queue(queue_id, Some(Version(report.queue.version.0 - 1)))
            .await
            .unwrap_err();
        assert!(err.is_retryable());

        league
            .draft_queue
            .archive_queue(queue_id, Some(report.queue.version))
            .await
            .unwrap();
        assert!(matches!(
            league.draft_queue.queue(queue_id).await,
            Err(DraftError::NotFound { .. })
        ));
        // The match record outlives its queue.
        assert_eq!(league.matches.len(), 1);
    }

    // =========================================================================
    // SCRIPT DRIVER
    // =========================================================================

    #[tokio::test]
    async fn test_script_drives_a_full_match() {
        let league = seeded_league().await.unwrap();
        let runner = ScriptRunner::new(
            Arc::clone(&league.draft_queue),
            league.config.draft.max_attempts(),
        );
        let script = "
            # lobby
            queue friday
            join friday p1
            join friday p2
            join friday p3
            join friday p4
            join friday p5
            join friday p6
            join friday p7
            join friday p8

            # draft
            start friday
            pick friday p1 p3
            pick friday p2 p4
            pick friday p2 p7
            pick friday p1 p5
            pick friday p1 p6
            pick friday p2 p8

            report friday A
            leaderboard
        ";

        let mut out = Vec::new();
        let summary = runner.run(script, &mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(summary.failed, 0, "{out}");
        assert_eq!(summary.parse_errors, 0);
        assert_eq!(summary.executed, 18);
        assert!(out.contains("  p1 1200 -> 1212 (+12)"));
        assert!(out.contains("  p8 800 -> 788 (-12)"));
        assert!(out.contains("1. p1 (Player p1) 1212"));
    }
}
