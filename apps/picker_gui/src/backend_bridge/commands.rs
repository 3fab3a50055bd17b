//! Commands queued from the UI to the draw worker.

pub enum BackendCommand {
    StartDraw { entrants: String },
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::StartDraw { .. } => "start_draw",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
