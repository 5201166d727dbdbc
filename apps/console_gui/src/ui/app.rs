use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use shared::domain::CorpusId;
use shared::partition::membership_rows;
use shared::protocol::{CorpusDetail, CorpusSummary, ModelSummary};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{
    ListState, ResourceRow, WorkflowCommand, WorkflowEvent, WorkflowState,
};

pub const SETTINGS_STORAGE_KEY: &str = "console_settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Preprocess,
    Train,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedConsoleSettings {
    pub screen: Screen,
}

enum DetailFetch {
    Loading,
    Loaded(Box<CorpusDetail>),
    Failed(String),
}

struct DetailView {
    corpus_id: CorpusId,
    fetch: DetailFetch,
}

pub struct ConsoleApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    screen: Screen,
    corpora: WorkflowState<CorpusSummary>,
    models: WorkflowState<ModelSummary>,
    detail: Option<DetailView>,

    server_url: String,
    status: String,
}

impl ConsoleApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        server_url: String,
        persisted: Option<PersistedConsoleSettings>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            screen: persisted.unwrap_or_default().screen,
            corpora: WorkflowState::new(false),
            models: WorkflowState::new(true),
            detail: None,
            server_url,
            status: "Backend worker starting...".to_string(),
        }
    }

    fn apply_corpora_event(&mut self, event: WorkflowEvent<CorpusSummary>) {
        for command in self.corpora.apply(event) {
            let cmd = match command {
                WorkflowCommand::FetchList => BackendCommand::LoadCorpora,
                WorkflowCommand::PerformAction { id, token } => BackendCommand::PreprocessCorpus {
                    corpus_id: id,
                    token,
                },
            };
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
        }
    }

    fn apply_models_event(&mut self, event: WorkflowEvent<ModelSummary>) {
        for command in self.models.apply(event) {
            let cmd = match command {
                WorkflowCommand::FetchList => BackendCommand::LoadModels,
                WorkflowCommand::PerformAction { id, token } => BackendCommand::TrainModel {
                    model_id: id,
                    token,
                },
            };
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::WorkerReady => {
                    self.status = "Backend worker ready".to_string();
                }
                UiEvent::CorporaLoaded(corpora) => {
                    self.apply_corpora_event(WorkflowEvent::ListLoaded(corpora));
                }
                UiEvent::CorporaLoadFailed(error) => {
                    self.status =
                        format!("{} error: {}", err_label(error.category()), error.message());
                    self.apply_corpora_event(WorkflowEvent::ListFailed(
                        error.message().to_string(),
                    ));
                }
                UiEvent::ModelsLoaded(models) => {
                    self.apply_models_event(WorkflowEvent::ListLoaded(models));
                }
                UiEvent::ModelsLoadFailed(error) => {
                    self.status =
                        format!("{} error: {}", err_label(error.category()), error.message());
                    self.apply_models_event(WorkflowEvent::ListFailed(error.message().to_string()));
                }
                UiEvent::CorpusDetailLoaded(payload) => {
                    if let Some(view) = &mut self.detail {
                        if view.corpus_id == payload.corpus_id {
                            view.fetch = DetailFetch::Loaded(payload);
                        }
                    }
                }
                UiEvent::CorpusDetailLoadFailed { corpus_id, error } => {
                    if let Some(view) = &mut self.detail {
                        if view.corpus_id == corpus_id {
                            view.fetch = DetailFetch::Failed(error.message().to_string());
                        }
                    }
                }
                UiEvent::PreprocessSucceeded { token } => {
                    self.status = "Corpus preprocessing started".to_string();
                    self.apply_corpora_event(WorkflowEvent::SubmitSucceeded { token });
                }
                UiEvent::PreprocessFailed { token, error } => {
                    self.apply_corpora_event(WorkflowEvent::SubmitFailed {
                        token,
                        message: error.message().to_string(),
                    });
                }
                UiEvent::TrainSucceeded { token } => {
                    self.status = "Model training started".to_string();
                    self.apply_models_event(WorkflowEvent::SubmitSucceeded { token });
                }
                UiEvent::TrainFailed { token, error } => {
                    self.apply_models_event(WorkflowEvent::SubmitFailed {
                        token,
                        message: error.message().to_string(),
                    });
                }
                UiEvent::Error(error) => {
                    self.status =
                        format!("{} error: {}", err_label(error.category()), error.message());
                }
            }
        }
    }

    /// Lists load on first visit, mirroring a mount-time fetch per screen.
    fn ensure_active_list_requested(&mut self) {
        match self.screen {
            Screen::Preprocess => {
                if matches!(self.corpora.list, ListState::Idle) {
                    self.apply_corpora_event(WorkflowEvent::ListRequested);
                }
            }
            Screen::Train => {
                if matches!(self.models.list, ListState::Idle) {
                    self.apply_models_event(WorkflowEvent::ListRequested);
                }
            }
        }
    }

    fn open_corpus_detail(&mut self, corpus_id: CorpusId) {
        self.detail = Some(DetailView {
            corpus_id,
            fetch: DetailFetch::Loading,
        });
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::LoadCorpusDetail { corpus_id },
            &mut self.status,
        );
    }

    fn has_inflight_work(&self) -> bool {
        matches!(self.corpora.list, ListState::Loading)
            || matches!(self.models.list, ListState::Loading)
            || self.corpora.is_submitting()
            || self.models.is_submitting()
            || matches!(
                self.detail,
                Some(DetailView {
                    fetch: DetailFetch::Loading,
                    ..
                })
            )
    }

    fn show_preprocess_screen(&mut self, ui: &mut egui::Ui) {
        ui.heading("Preprocess a corpus");
        ui.add_space(6.0);

        let mut pending: Vec<WorkflowEvent<CorpusSummary>> = Vec::new();
        let mut opened_detail: Option<CorpusId> = None;

        match &self.corpora.list {
            ListState::Idle | ListState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading corpora...");
                });
            }
            ListState::Failed(message) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("Failed to load corpora: {message}"),
                );
                if ui.button("Retry").clicked() {
                    pending.push(WorkflowEvent::ListRequested);
                }
            }
            ListState::Loaded(corpora) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::Grid::new("corpora_table")
                        .striped(true)
                        .num_columns(3)
                        .spacing([24.0, 6.0])
                        .show(ui, |ui| {
                            ui.strong("ID");
                            ui.strong("Name");
                            ui.strong("Actions");
                            ui.end_row();

                            if corpora.is_empty() {
                                ui.label("This table is empty");
                                ui.end_row();
                            }
                            for corpus in corpora {
                                ui.label(corpus.corpus_id.0.to_string());
                                if ui
                                    .link(&corpus.name)
                                    .on_hover_text("Show corpus detail")
                                    .clicked()
                                {
                                    opened_detail = Some(corpus.corpus_id);
                                }
                                if ui.button("Preprocess this corpus").clicked() {
                                    pending.push(WorkflowEvent::ConfirmOpened(corpus.corpus_id));
                                }
                                ui.end_row();
                            }
                        });
                });
            }
        }

        for event in pending {
            self.apply_corpora_event(event);
        }
        if let Some(corpus_id) = opened_detail {
            self.open_corpus_detail(corpus_id);
        }
    }

    fn show_train_screen(&mut self, ui: &mut egui::Ui) {
        ui.heading("Train a model");
        ui.add_space(6.0);

        let mut pending: Vec<WorkflowEvent<ModelSummary>> = Vec::new();

        match &self.models.list {
            ListState::Idle | ListState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading models...");
                });
            }
            ListState::Failed(message) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("Failed to load models: {message}"),
                );
                if ui.button("Retry").clicked() {
                    pending.push(WorkflowEvent::ListRequested);
                }
            }
            ListState::Loaded(models) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::Grid::new("models_table")
                        .striped(true)
                        .num_columns(4)
                        .spacing([24.0, 6.0])
                        .show(ui, |ui| {
                            ui.strong("ID");
                            ui.strong("Name");
                            ui.strong("Corpus ID");
                            ui.strong("Actions");
                            ui.end_row();

                            if models.is_empty() {
                                ui.label("This table is empty");
                                ui.end_row();
                            }
                            for model in models {
                                ui.label(model.model_id.0.to_string());
                                ui.label(&model.name);
                                ui.label(model.corpus_id.0.to_string());
                                if ui.button("Train this model").clicked() {
                                    pending.push(WorkflowEvent::ConfirmOpened(model.model_id));
                                }
                                ui.end_row();
                            }
                        });
                });
            }
        }

        for event in pending {
            self.apply_models_event(event);
        }
    }

    fn show_corpus_detail(&mut self, ui: &mut egui::Ui) {
        let mut back = false;
        let mut retry: Option<CorpusId> = None;

        if let Some(view) = &self.detail {
            if ui.button("Back to corpora").clicked() {
                back = true;
            }
            ui.add_space(6.0);

            match &view.fetch {
                DetailFetch::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading corpus detail...");
                    });
                }
                DetailFetch::Failed(message) => {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        format!("Failed to load corpus detail: {message}"),
                    );
                    if ui.button("Retry").clicked() {
                        retry = Some(view.corpus_id);
                    }
                }
                DetailFetch::Loaded(detail) => {
                    ui.heading(format!("{} (id: {})", detail.name, detail.corpus_id.0));
                    ui.add_space(6.0);

                    egui::Grid::new("corpus_facts")
                        .num_columns(2)
                        .spacing([24.0, 4.0])
                        .show(ui, |ui| {
                            ui.strong("Feature type");
                            ui.label(&detail.feature_type);
                            ui.end_row();
                            ui.strong("Label type");
                            ui.label(&detail.label_type);
                            ui.end_row();
                            ui.strong("Max samples");
                            ui.label(
                                detail
                                    .maximum_samples
                                    .map(|n| n.to_string())
                                    .unwrap_or_else(|| "N/A".to_string()),
                            );
                            ui.end_row();
                            ui.strong("Training utterances");
                            ui.label(detail.partition.training.len().to_string());
                            ui.end_row();
                            ui.strong("Validation utterances");
                            ui.label(detail.partition.validation.len().to_string());
                            ui.end_row();
                            ui.strong("Testing utterances");
                            ui.label(detail.partition.testing.len().to_string());
                            ui.end_row();
                        });

                    ui.add_space(10.0);
                    ui.heading("Utterances in this corpus");
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        egui::Grid::new("utterance_table")
                            .striped(true)
                            .num_columns(4)
                            .spacing([24.0, 4.0])
                            .show(ui, |ui| {
                                ui.strong("ID");
                                ui.strong("Training");
                                ui.strong("Validation");
                                ui.strong("Testing");
                                ui.end_row();

                                let rows = membership_rows(&detail.partition);
                                if rows.is_empty() {
                                    ui.label("This table is empty");
                                    ui.end_row();
                                }
                                for row in rows {
                                    ui.label(&row.utterance_id.0);
                                    ui.label(flag_text(row.in_training));
                                    ui.label(flag_text(row.in_validation));
                                    ui.label(flag_text(row.in_testing));
                                    ui.end_row();
                                }
                            });
                    });
                }
            }
        }

        if back {
            self.detail = None;
        }
        if let Some(corpus_id) = retry {
            self.open_corpus_detail(corpus_id);
        }
    }

    fn show_confirm_modals(&mut self, ctx: &egui::Context) {
        let events = confirm_modal_events(
            ctx,
            "Confirm operation",
            "Are you sure you want to preprocess this corpus?",
            &self.corpora,
        );
        for event in events {
            self.apply_corpora_event(event);
        }

        let events = confirm_modal_events(
            ctx,
            "Confirm train",
            "Are you sure you want to train this model?",
            &self.models,
        );
        for event in events {
            self.apply_models_event(event);
        }
    }
}

fn flag_text(member: bool) -> &'static str {
    if member {
        "yes"
    } else {
        ""
    }
}

/// Renders the confirmation dialog for one workflow and returns the events
/// the interaction produced. Cancel and the title-bar close stay available
/// while a submit is in flight; only the confirm control is gated.
fn confirm_modal_events<R: ResourceRow>(
    ctx: &egui::Context,
    title: &str,
    prompt: &str,
    workflow: &WorkflowState<R>,
) -> Vec<WorkflowEvent<R>> {
    let mut events = Vec::new();
    if !workflow.modal_open() {
        return events;
    }

    let submitting = workflow.is_submitting();
    let mut open = true;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .open(&mut open)
        .show(ctx, |ui| {
            ui.strong(prompt);
            ui.add_space(6.0);

            match workflow.selected_row() {
                Some(row) => {
                    egui::Grid::new((title, "confirm_fields"))
                        .num_columns(2)
                        .spacing([24.0, 4.0])
                        .show(ui, |ui| {
                            ui.label("ID");
                            ui.label(row.id_text());
                            ui.end_row();
                            ui.label("Name");
                            ui.label(row.name());
                            ui.end_row();
                        });
                }
                // Stale selection after a reload: render a placeholder
                // instead of looking up a row that no longer exists.
                None => {
                    ui.label("The selected entry is no longer in the list.");
                }
            }

            if let Some(message) = workflow.submit_error() {
                ui.add_space(4.0);
                ui.colored_label(ui.visuals().error_fg_color, message);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!submitting, egui::Button::new("Confirm"))
                    .clicked()
                {
                    events.push(WorkflowEvent::SubmitConfirmed);
                }
                if submitting {
                    ui.spinner();
                }
                if ui.button("Cancel").clicked() {
                    events.push(WorkflowEvent::ConfirmClosed);
                }
            });
        });

    if !open {
        events.push(WorkflowEvent::ConfirmClosed);
    }
    events
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.ensure_active_list_requested();

        egui::TopBottomPanel::top("console_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Persephone operator console");
            ui.add_space(4.0);
        });

        egui::SidePanel::left("screen_navigation")
            .resizable(false)
            .default_width(160.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                if ui
                    .selectable_label(self.screen == Screen::Preprocess, "Corpora")
                    .clicked()
                {
                    self.screen = Screen::Preprocess;
                    self.detail = None;
                }
                if ui
                    .selectable_label(self.screen == Screen::Train, "Models")
                    .clicked()
                {
                    self.screen = Screen::Train;
                    self.detail = None;
                }
            });

        egui::TopBottomPanel::bottom("status_line").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(&self.server_url);
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.detail.is_some() {
                self.show_corpus_detail(ui);
            } else {
                match self.screen {
                    Screen::Preprocess => self.show_preprocess_screen(ui),
                    Screen::Train => self.show_train_screen(ui),
                }
            }
        });

        self.show_confirm_modals(ctx);

        // Worker completions arrive between frames; keep polling while
        // anything is outstanding.
        if self.has_inflight_work() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedConsoleSettings {
            screen: self.screen,
        };
        if let Ok(text) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PersistedConsoleSettings, Screen};

    #[test]
    fn persisted_settings_round_trip() {
        let settings = PersistedConsoleSettings {
            screen: Screen::Train,
        };
        let text = serde_json::to_string(&settings).expect("serialize");
        let restored: PersistedConsoleSettings = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(restored, settings);
    }

    #[test]
    fn unknown_settings_fields_fall_back_to_defaults() {
        let restored: PersistedConsoleSettings = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(restored.screen, Screen::Preprocess);
    }
}
