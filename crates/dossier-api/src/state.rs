//! Application state for the API server.

use dossier_chat::ChatService;
use dossier_report::ReportService;

/// Shared application state: the hot-path chat service and the read-side
/// report service. The worker pool lives outside the state; the gateway
/// only ever talks to the queue through the chat service.
pub struct AppState {
    pub chat: ChatService,
    pub reports: ReportService,

    /// Server start time (for health checks)
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(chat: ChatService, reports: ReportService) -> Self {
        Self {
            chat,
            reports,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
