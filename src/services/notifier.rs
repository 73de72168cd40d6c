use uuid::Uuid;

/// Fire-and-forget notification hook for roster changes.
///
/// Delivery (email) belongs to an external collaborator; this seam emits the
/// event so a delivery backend can be wired in without touching roster logic.
/// Failures here must never fail the triggering operation.
pub fn participant_status_changed(game_id: Uuid, user_id: Uuid, status: &str) {
    tracing::info!(%game_id, %user_id, status, "participant status changed");
}

/// Notification hook for booking decisions on managed fields.
pub fn booking_decided(game_id: Uuid, approved: bool) {
    tracing::info!(%game_id, approved, "booking decided");
}
