//! # Command Script
//!
//! Line-oriented driver for the draft queue service.
//!
//! ```text
//! profile <player> <display-name...>
//! queue <name>
//! join <queue> <player>
//! leave <queue> <player>
//! start <queue>
//! pick <queue> <captain> <player>
//! report <queue> <A|B>
//! show <queue>
//! queues
//! leaderboard
//! history <player>
//! recover
//! archive <queue>
//! ```
//!
//! Queues are addressed by name. Blank lines and `#` comments are skipped.
//! A line that fails to parse or a command that fails is reported and the
//! script carries on.

use std::io::Write;
use std::sync::Arc;

use dl_02_draft_queue::{
    retry_on_conflict, DraftError, DraftQueueApi, DraftResult, JoinQueue, LeaveQueue, PickPlayer,
    ReportWinner, StartMatch,
};
use shared_types::{
    Match, PlayerId, Queue, QueueId, QueueStatus, TeamSide, Versioned, DRAFT_PICKS, QUEUE_CAPACITY,
};
use thiserror::Error;
use tracing::{debug, warn};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Profile {
        player: PlayerId,
        display_name: String,
    },
    Queue {
        name: String,
    },
    Join {
        queue: String,
        player: PlayerId,
    },
    Leave {
        queue: String,
        player: PlayerId,
    },
    Start {
        queue: String,
    },
    Pick {
        queue: String,
        captain: PlayerId,
        player: PlayerId,
    },
    Report {
        queue: String,
        winner: TeamSide,
    },
    Show {
        queue: String,
    },
    Queues,
    Leaderboard,
    History {
        player: PlayerId,
    },
    Recover,
    Archive {
        queue: String,
    },
}

/// A line the parser rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match keyword {
        "profile" => {
            if args.len() < 2 {
                return Err(usage("profile <player> <display-name...>"));
            }
            ScriptCommand::Profile {
                player: PlayerId::from(args[0]),
                display_name: args[1..].join(" "),
            }
        }
        "queue" => {
            let [name] = exact::<1>(&args, "queue <name>")?;
            ScriptCommand::Queue {
                name: name.to_string(),
            }
        }
        "join" => {
            let [queue, player] = exact::<2>(&args, "join <queue> <player>")?;
            ScriptCommand::Join {
                queue: queue.to_string(),
                player: PlayerId::from(player),
            }
        }
        "leave" => {
            let [queue, player] = exact::<2>(&args, "leave <queue> <player>")?;
            ScriptCommand::Leave {
                queue: queue.to_string(),
                player: PlayerId::from(player),
            }
        }
        "start" => {
            let [queue] = exact::<1>(&args, "start <queue>")?;
            ScriptCommand::Start {
                queue: queue.to_string(),
            }
        }
        "pick" => {
            let [queue, captain, player] = exact::<3>(&args, "pick <queue> <captain> <player>")?;
            ScriptCommand::Pick {
                queue: queue.to_string(),
                captain: PlayerId::from(captain),
                player: PlayerId::from(player),
            }
        }
        "report" => {
            let [queue, winner] = exact::<2>(&args, "report <queue> <A|B>")?;
            ScriptCommand::Report {
                queue: queue.to_string(),
                winner: winner.parse().map_err(|e| format!("{e}"))?,
            }
        }
        "show" => {
            let [queue] = exact::<1>(&args, "show <queue>")?;
            ScriptCommand::Show {
                queue: queue.to_string(),
            }
        }
        "queues" => {
            exact::<0>(&args, "queues")?;
            ScriptCommand::Queues
        }
        "leaderboard" => {
            exact::<0>(&args, "leaderboard")?;
            ScriptCommand::Leaderboard
        }
        "history" => {
            let [player] = exact::<1>(&args, "history <player>")?;
            ScriptCommand::History {
                player: PlayerId::from(player),
            }
        }
        "recover" => {
            exact::<0>(&args, "recover")?;
            ScriptCommand::Recover
        }
        "archive" => {
            let [queue] = exact::<1>(&args, "archive <queue>")?;
            ScriptCommand::Archive {
                queue: queue.to_string(),
            }
        }
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}

fn exact<'a, const N: usize>(args: &[&'a str], form: &str) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(args).map_err(|_| usage(form))
}

fn usage(form: &str) -> String {
    format!("usage: {form}")
}

/// Counts from one script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub executed: usize,
    pub failed: usize,
    pub parse_errors: usize,
}

/// Executes script commands against a `DraftQueueApi`.
pub struct ScriptRunner<S: DraftQueueApi> {
    service: Arc<S>,
    max_attempts: u32,
}

impl<S: DraftQueueApi> ScriptRunner<S> {
    /// `max_attempts` bounds `retry_on_conflict` for every mutating command.
    pub fn new(service: Arc<S>, max_attempts: u32) -> Self {
        Self {
            service,
            max_attempts,
        }
    }

    /// Run `text`, writing results and errors to `out`.
    pub async fn run<W: Write>(&self, text: &str, out: &mut W) -> std::io::Result<ScriptSummary> {
        let mut summary = ScriptSummary::default();
        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let command = match parse_line(line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    summary.parse_errors += 1;
                    writeln!(out, "{}", ParseError { line: line_no, message })?;
                    continue;
                }
            };

            debug!(line = line_no, ?command, "Executing script command");
            match self.execute(&command).await {
                Ok(lines) => {
                    summary.executed += 1;
                    for text in lines {
                        writeln!(out, "{text}")?;
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    warn!(line = line_no, %err, "Script command failed");
                    writeln!(out, "line {line_no}: error: {err}")?;
                }
            }
        }
        Ok(summary)
    }

    /// Execute one command and return its output lines.
    pub async fn execute(&self, command: &ScriptCommand) -> DraftResult<Vec<String>> {
        let service = self.service.as_ref();
        let attempts = self.max_attempts;

        match command {
            ScriptCommand::Profile {
                player,
                display_name,
            } => {
                let profile = service.create_profile(player.clone(), display_name).await?;
                Ok(vec![format!(
                    "created profile {} ({}) rating {}",
                    profile.player_id, profile.display_name, profile.rating
                )])
            }
            ScriptCommand::Queue { name } => {
                if self.find_queue(name).await.is_ok() {
                    return Err(DraftError::precondition(format!(
                        "queue name '{name}' is already in use"
                    )));
                }
                let queue = service.create_queue(name).await?;
                Ok(vec![queue_line(&queue)])
            }
            ScriptCommand::Join { queue, player } => {
                let queue_id = self.find_queue(queue).await?;
                let queue = retry_on_conflict(attempts, || {
                    service.join_queue(JoinQueue {
                        queue_id,
                        player_id: player.clone(),
                        base_version: None,
                    })
                })
                .await?;
                Ok(vec![queue_line(&queue)])
            }
            ScriptCommand::Leave { queue, player } => {
                let queue_id = self.find_queue(queue).await?;
                let queue = retry_on_conflict(attempts, || {
                    service.leave_queue(LeaveQueue {
                        queue_id,
                        player_id: player.clone(),
                        base_version: None,
                    })
                })
                .await?;
                Ok(vec![queue_line(&queue)])
            }
            ScriptCommand::Start { queue } => {
                let queue_id = self.find_queue(queue).await?;
                let queue = retry_on_conflict(attempts, || {
                    service.start_match(StartMatch {
                        queue_id,
                        base_version: None,
                    })
                })
                .await?;
                Ok(describe_queue(&queue))
            }
            ScriptCommand::Pick {
                queue,
                captain,
                player,
            } => {
                let queue_id = self.find_queue(queue).await?;
                let queue = retry_on_conflict(attempts, || {
                    service.pick_player(PickPlayer {
                        queue_id,
                        actor_id: captain.clone(),
                        picked_id: player.clone(),
                        base_version: None,
                    })
                })
                .await?;
                Ok(vec![pick_line(&queue, captain, player)])
            }
            ScriptCommand::Report { queue, winner } => {
                let queue_id = self.find_queue(queue).await?;
                let report = retry_on_conflict(attempts, || {
                    service.report_winner(ReportWinner {
                        queue_id,
                        winning_team: *winner,
                        base_version: None,
                    })
                })
                .await?;
                let mut lines = vec![format!(
                    "{}: team {} wins, match {}",
                    report.queue.value.name, report.record.winning_team, report.record.id
                )];
                lines.extend(report.record.rating_changes.iter().map(|change| {
                    format!(
                        "  {} {} -> {} ({:+})",
                        change.player_id,
                        change.before,
                        change.after,
                        change.delta()
                    )
                }));
                Ok(lines)
            }
            ScriptCommand::Show { queue } => {
                let queue_id = self.find_queue(queue).await?;
                Ok(describe_queue(&service.queue(queue_id).await?))
            }
            ScriptCommand::Queues => {
                let queues = service.list_queues(&[]).await?;
                if queues.is_empty() {
                    return Ok(vec!["no queues".to_string()]);
                }
                Ok(queues.iter().map(queue_line).collect())
            }
            ScriptCommand::Leaderboard => {
                let profiles = service.leaderboard().await?;
                Ok(profiles
                    .iter()
                    .enumerate()
                    .map(|(rank, p)| {
                        format!("{}. {} ({}) {}", rank + 1, p.player_id, p.display_name, p.rating)
                    })
                    .collect())
            }
            ScriptCommand::History { player } => {
                let history = service.match_history(player).await?;
                if history.is_empty() {
                    return Ok(vec![format!("{player}: no matches")]);
                }
                Ok(history.iter().map(|m| history_line(m, player)).collect())
            }
            ScriptCommand::Recover => {
                let recovered = service.recover_pending_reports().await?;
                Ok(vec![format!("recovered {} pending report(s)", recovered.len())])
            }
            ScriptCommand::Archive { queue } => {
                let queue_id = self.find_queue(queue).await?;
                retry_on_conflict(attempts, || service.archive_queue(queue_id, None)).await?;
                Ok(vec![format!("archived {queue}")])
            }
        }
    }

    async fn find_queue(&self, name: &str) -> DraftResult<QueueId> {
        self.service
            .list_queues(&[])
            .await?
            .into_iter()
            .find(|q| q.value.name == name)
            .map(|q| q.value.id)
            .ok_or_else(|| DraftError::NotFound {
                entity: "queue",
                id: name.to_string(),
            })
    }
}

fn queue_line(queue: &Versioned<Queue>) -> String {
    format!(
        "{}: {}/{} players [{}] v{}",
        queue.value.name,
        queue.value.players.len(),
        QUEUE_CAPACITY,
        queue.value.status,
        queue.version
    )
}

fn pick_line(queue: &Versioned<Queue>, captain: &PlayerId, player: &PlayerId) -> String {
    let picks = queue
        .value
        .draft
        .as_ref()
        .map(|d| d.pick_index.value())
        .unwrap_or_default();
    let next = match queue.value.current_drafter() {
        Some(drafter) => format!("next {drafter}"),
        None => format!("draft complete [{}]", queue.value.status),
    };
    format!(
        "{}: {captain} picked {player} ({picks}/{DRAFT_PICKS}), {next}",
        queue.value.name
    )
}

fn describe_queue(queue: &Versioned<Queue>) -> Vec<String> {
    let mut lines = vec![queue_line(queue)];
    let value = &queue.value;
    match &value.draft {
        None => {
            let players: Vec<&str> = value.players.iter().map(PlayerId::as_str).collect();
            lines.push(format!("  players: {}", players.join(" ")));
        }
        Some(draft) => {
            for side in [TeamSide::A, TeamSide::B] {
                let roster: Vec<&str> = draft.roster(side).iter().map(PlayerId::as_str).collect();
                lines.push(format!(
                    "  team {side} (captain {}): {}",
                    draft.captains.captain(side),
                    roster.join(" ")
                ));
            }
            if value.status == QueueStatus::Drafting {
                let pool: Vec<&str> = draft.draft_pool.iter().map(PlayerId::as_str).collect();
                lines.push(format!("  pool: {}", pool.join(" ")));
                if let Some(drafter) = &draft.current_drafter {
                    lines.push(format!("  next pick: {drafter}"));
                }
            }
        }
    }
    lines
}

fn history_line(record: &Match, player: &PlayerId) -> String {
    let side = if record.team_a.contains(player) {
        TeamSide::A
    } else {
        TeamSide::B
    };
    let outcome = if record.winning_team == side {
        "won"
    } else {
        "lost"
    };
    let delta = record
        .rating_changes
        .iter()
        .find(|c| &c.player_id == player)
        .map(|c| format!(" ({:+})", c.delta()))
        .unwrap_or_default();
    format!("{}: team {side} {outcome}{delta}", record.name)
}
