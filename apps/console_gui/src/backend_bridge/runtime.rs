//! Backend worker: a dedicated thread owning a tokio runtime that performs
//! queued commands against the backend and reports completions to the UI.
//!
//! Requests are never cancelled. A command that was issued always completes
//! and its completion event always reaches the queue; the workflow reducer
//! decides whether the carried token is still current.

use std::thread;

use backend_client::{BackendApi, HttpBackend};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_worker(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    server_url: String,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::WorkerStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let backend = HttpBackend::new(server_url);
            let _ = ui_tx.try_send(UiEvent::WorkerReady);
            run_command_loop(&backend, cmd_rx, ui_tx).await;
        });
    });
}

async fn run_command_loop<B: BackendApi>(
    backend: &B,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::LoadCorpora => match backend.list_corpora().await {
                Ok(corpora) => {
                    let _ = ui_tx.try_send(UiEvent::CorporaLoaded(corpora));
                }
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::CorporaLoadFailed(UiError::from_backend(
                        UiErrorContext::CorpusList,
                        &err,
                    )));
                }
            },
            BackendCommand::LoadModels => match backend.list_models().await {
                Ok(models) => {
                    let _ = ui_tx.try_send(UiEvent::ModelsLoaded(models));
                }
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::ModelsLoadFailed(UiError::from_backend(
                        UiErrorContext::ModelList,
                        &err,
                    )));
                }
            },
            BackendCommand::LoadCorpusDetail { corpus_id } => {
                match backend.get_corpus(corpus_id).await {
                    Ok(detail) => {
                        let _ = ui_tx.try_send(UiEvent::CorpusDetailLoaded(Box::new(detail)));
                    }
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::CorpusDetailLoadFailed {
                            corpus_id,
                            error: UiError::from_backend(UiErrorContext::CorpusDetail, &err),
                        });
                    }
                }
            }
            BackendCommand::PreprocessCorpus { corpus_id, token } => {
                match backend.preprocess_corpus(corpus_id).await {
                    Ok(()) => {
                        let _ = ui_tx.try_send(UiEvent::PreprocessSucceeded { token });
                    }
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::PreprocessFailed {
                            token,
                            error: UiError::from_backend(UiErrorContext::Preprocess, &err),
                        });
                    }
                }
            }
            BackendCommand::TrainModel { model_id, token } => {
                match backend.train_model(model_id).await {
                    Ok(()) => {
                        let _ = ui_tx.try_send(UiEvent::TrainSucceeded { token });
                    }
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::TrainFailed {
                            token,
                            error: UiError::from_backend(UiErrorContext::Train, &err),
                        });
                    }
                }
            }
        }
    }
}
