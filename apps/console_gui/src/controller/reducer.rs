//! Confirm/submit workflow state machine shared by the preprocess and train
//! screens.
//!
//! The same machine drives both resource types; the only behavioral split is
//! whether a successful submit reloads the list. All transitions live in
//! [`WorkflowState::apply`], which takes an event and returns the side
//! effects the caller must perform, so the whole workflow is testable without
//! any rendering or networking.

use shared::protocol::{CorpusSummary, ModelSummary};

/// Row shown in a resource table. The workflow only needs identity and a
/// display name.
pub trait ResourceRow: Clone {
    type Id: Copy + PartialEq + std::fmt::Debug;

    fn id(&self) -> Self::Id;
    fn id_text(&self) -> String;
    fn name(&self) -> &str;
}

impl ResourceRow for CorpusSummary {
    type Id = shared::domain::CorpusId;

    fn id(&self) -> Self::Id {
        self.corpus_id
    }

    fn id_text(&self) -> String {
        self.corpus_id.0.to_string()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceRow for ModelSummary {
    type Id = shared::domain::ModelId;

    fn id(&self) -> Self::Id {
        self.model_id
    }

    fn id_text(&self) -> String {
        self.model_id.0.to_string()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState<R> {
    Idle,
    Loading,
    Loaded(Vec<R>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmState<Id> {
    Idle,
    Confirming { selected: Id, error: Option<String> },
    Submitting { selected: Id, token: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent<R: ResourceRow> {
    ListRequested,
    ListLoaded(Vec<R>),
    ListFailed(String),
    ConfirmOpened(R::Id),
    ConfirmClosed,
    SubmitConfirmed,
    SubmitSucceeded { token: u64 },
    SubmitFailed { token: u64, message: String },
}

/// Side effect requested from the backend bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowCommand<Id> {
    FetchList,
    PerformAction { id: Id, token: u64 },
}

#[derive(Debug)]
pub struct WorkflowState<R: ResourceRow> {
    pub list: ListState<R>,
    pub confirm: ConfirmState<R::Id>,
    refresh_on_success: bool,
    next_token: u64,
}

impl<R: ResourceRow> WorkflowState<R> {
    pub fn new(refresh_on_success: bool) -> Self {
        Self {
            list: ListState::Idle,
            confirm: ConfirmState::Idle,
            refresh_on_success,
            next_token: 0,
        }
    }

    /// Applies one event and returns the commands the caller must dispatch.
    pub fn apply(&mut self, event: WorkflowEvent<R>) -> Vec<WorkflowCommand<R::Id>> {
        match event {
            WorkflowEvent::ListRequested => {
                // One outstanding list request at a time.
                if matches!(self.list, ListState::Loading) {
                    return Vec::new();
                }
                self.list = ListState::Loading;
                vec![WorkflowCommand::FetchList]
            }
            WorkflowEvent::ListLoaded(rows) => {
                self.list = ListState::Loaded(rows);
                Vec::new()
            }
            WorkflowEvent::ListFailed(message) => {
                self.list = ListState::Failed(message);
                Vec::new()
            }
            WorkflowEvent::ConfirmOpened(id) => {
                // The modal gates submission to one at a time; a stray open
                // while a submit is in flight is ignored.
                if matches!(self.confirm, ConfirmState::Submitting { .. }) {
                    return Vec::new();
                }
                self.confirm = ConfirmState::Confirming {
                    selected: id,
                    error: None,
                };
                Vec::new()
            }
            WorkflowEvent::ConfirmClosed => {
                // Closing never cancels an issued request; abandoning the
                // token makes the eventual completion a no-op.
                self.confirm = ConfirmState::Idle;
                Vec::new()
            }
            WorkflowEvent::SubmitConfirmed => {
                let selected = match &self.confirm {
                    ConfirmState::Confirming { selected, .. } => *selected,
                    _ => return Vec::new(),
                };
                self.next_token += 1;
                let token = self.next_token;
                self.confirm = ConfirmState::Submitting { selected, token };
                vec![WorkflowCommand::PerformAction { id: selected, token }]
            }
            WorkflowEvent::SubmitSucceeded { token } => {
                match &self.confirm {
                    ConfirmState::Submitting { token: current, .. } if *current == token => {}
                    _ => return Vec::new(),
                }
                self.confirm = ConfirmState::Idle;
                if self.refresh_on_success {
                    self.list = ListState::Loading;
                    vec![WorkflowCommand::FetchList]
                } else {
                    Vec::new()
                }
            }
            WorkflowEvent::SubmitFailed { token, message } => {
                let selected = match &self.confirm {
                    ConfirmState::Submitting {
                        selected,
                        token: current,
                    } if *current == token => *selected,
                    _ => return Vec::new(),
                };
                self.confirm = ConfirmState::Confirming {
                    selected,
                    error: Some(message),
                };
                Vec::new()
            }
        }
    }

    pub fn rows(&self) -> &[R] {
        match &self.list {
            ListState::Loaded(rows) => rows,
            _ => &[],
        }
    }

    pub fn modal_open(&self) -> bool {
        !matches!(self.confirm, ConfirmState::Idle)
    }

    pub fn selected_id(&self) -> Option<R::Id> {
        match &self.confirm {
            ConfirmState::Idle => None,
            ConfirmState::Confirming { selected, .. }
            | ConfirmState::Submitting { selected, .. } => Some(*selected),
        }
    }

    /// Looks the selection up in the current list. `None` either when the
    /// modal is closed or when the selection is stale after a reload; callers
    /// render a placeholder in the latter case instead of panicking.
    pub fn selected_row(&self) -> Option<&R> {
        let id = self.selected_id()?;
        self.rows().iter().find(|row| row.id() == id)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.confirm, ConfirmState::Submitting { .. })
    }

    pub fn submit_error(&self) -> Option<&str> {
        match &self.confirm {
            ConfirmState::Confirming { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}
