use shared::domain::CompanyId;

/// Notifications for frontends observing the roster state machine.
///
/// Senders never block on slow receivers; a frontend that falls behind
/// simply misses intermediate transitions and re-reads the snapshot.
#[derive(Debug, Clone)]
pub enum RosterEvent {
    RosterLoading,
    RosterLoaded { page: u32, total: u64 },
    RosterFailed(String),
    RecordPatched { id: CompanyId },
    MutationFailed(String),
}
