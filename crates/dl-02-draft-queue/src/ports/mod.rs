//! Ports layer (hexagonal architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::{
    Command, CommandOutcome, DraftQueueApi, JoinQueue, LeaveQueue, MatchReport, PickPlayer,
    ReportWinner, StartMatch,
};
pub use outbound::{
    ActiveQueueIndex, ChangeNotifier, ClaimOutcome, ManualTimeSource, MatchInsert, MatchStore,
    PlayerRegistry, QueueStore, SystemTimeSource, TimeSource,
};
