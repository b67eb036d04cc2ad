use crate::analyzers::types::OperationalStatus;

/// Classifies a plant from its open incidents and overdue maintenance.
///
/// | Condition                              | Status    |
/// |----------------------------------------|-----------|
/// | active > 2 or overdue > 1              | critical  |
/// | active > 0 or overdue > 0              | attention |
/// | otherwise                              | optimal   |
///
/// Tiers are checked lowest first and only ever escalate.
pub fn classify_status(active_incidents: usize, overdue_maintenance: usize) -> OperationalStatus {
    let mut status = OperationalStatus::Optimal;

    if active_incidents > 0 || overdue_maintenance > 0 {
        status = OperationalStatus::Attention;
    }

    if active_incidents > 2 || overdue_maintenance > 1 {
        status = OperationalStatus::Critical;
    }

    status
}
