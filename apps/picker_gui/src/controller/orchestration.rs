//! Command orchestration helpers from UI actions to the draw worker queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Draw engine disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn queues_command_without_touching_status() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        dispatch_backend_command(
            &tx,
            BackendCommand::StartDraw {
                entrants: "Alice".into(),
            },
            &mut status,
        );
        assert!(status.is_empty());
        assert!(matches!(
            rx.try_recv(),
            Ok(BackendCommand::StartDraw { entrants }) if entrants == "Alice"
        ));
    }

    #[test]
    fn reports_full_queue() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::Shutdown, &mut status);
        dispatch_backend_command(&tx, BackendCommand::Shutdown, &mut status);
        assert!(status.contains("queue is full"));
    }

    #[test]
    fn reports_disconnected_worker() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::Shutdown, &mut status);
        assert!(status.contains("disconnected"));
    }
}
