//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::LoadCorpora => "load_corpora",
        BackendCommand::LoadModels => "load_models",
        BackendCommand::LoadCorpusDetail { .. } => "load_corpus_detail",
        BackendCommand::PreprocessCorpus { .. } => "preprocess_corpus",
        BackendCommand::TrainModel { .. } => "train_model",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Backend command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected (possible startup failure); restart the console"
                .to_string();
        }
    }
}
