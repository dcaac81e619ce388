//! Status publication seam between the controller and display layers.

use tracing::info;

use crate::sim::types::SystemStatus;

/// Consumer of periodic status snapshots (dashboard, display, log).
pub trait StatusSink {
    fn publish(&mut self, status: &SystemStatus);
}

/// Emits each snapshot as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn publish(&mut self, status: &SystemStatus) {
        info!(
            cluster = %status.cluster_id,
            operational = status.operational,
            ticks = status.ticks_completed,
            temp_c = status.ambient_temp_c,
            estimated_c = status.estimated_temp_c,
            battery_wh = status.battery_status.battery_level_wh,
            "status"
        );
    }
}

/// Keeps every published snapshot in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub published: Vec<SystemStatus>,
}

impl StatusSink for MemorySink {
    fn publish(&mut self, status: &SystemStatus) {
        self.published.push(status.clone());
    }
}

/// Discards every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn publish(&mut self, _status: &SystemStatus) {}
}
