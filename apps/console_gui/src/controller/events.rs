//! Worker/UI events and error modeling for the console controller.

use backend_client::BackendError;
use shared::domain::CorpusId;
use shared::protocol::{CorpusDetail, CorpusSummary, ModelSummary};

pub enum UiEvent {
    WorkerReady,
    CorporaLoaded(Vec<CorpusSummary>),
    CorporaLoadFailed(UiError),
    ModelsLoaded(Vec<ModelSummary>),
    ModelsLoadFailed(UiError),
    CorpusDetailLoaded(Box<CorpusDetail>),
    CorpusDetailLoadFailed {
        corpus_id: CorpusId,
        error: UiError,
    },
    PreprocessSucceeded {
        token: u64,
    },
    PreprocessFailed {
        token: u64,
        error: UiError,
    },
    TrainSucceeded {
        token: u64,
    },
    TrainFailed {
        token: u64,
        error: UiError,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    NotFound,
    Transport,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    WorkerStartup,
    CorpusList,
    ModelList,
    CorpusDetail,
    Preprocess,
    Train,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Backend => "Backend",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Classifies a typed client error by its variant.
    pub fn from_backend(context: UiErrorContext, err: &BackendError) -> Self {
        let category = match err {
            BackendError::NotFound => UiErrorCategory::NotFound,
            BackendError::Rejected(_) | BackendError::Message { .. } => UiErrorCategory::Backend,
            BackendError::Transport(_) => UiErrorCategory::Transport,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Keyword classification for plain messages (worker startup paths that
    /// never produce a typed error).
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("not found") || message_lower.contains("404") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("dns")
            || message_lower.contains("unreachable")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("backend") {
            UiErrorCategory::Backend
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::{ApiError, ErrorCode};

    #[test]
    fn typed_errors_classify_by_variant() {
        let err = UiError::from_backend(UiErrorContext::CorpusDetail, &BackendError::NotFound);
        assert_eq!(err.category(), UiErrorCategory::NotFound);
        assert_eq!(err.context(), UiErrorContext::CorpusDetail);

        let rejected = BackendError::Rejected(ApiError::new(
            ErrorCode::Conflict,
            "corpus is already preprocessing",
        ));
        let err = UiError::from_backend(UiErrorContext::Preprocess, &rejected);
        assert_eq!(err.category(), UiErrorCategory::Backend);
        assert!(err.message().contains("corpus is already preprocessing"));
    }

    #[test]
    fn plain_messages_classify_by_keyword() {
        let err = UiError::from_message(
            UiErrorContext::WorkerStartup,
            "backend worker startup failure: failed to build runtime",
        );
        assert_eq!(err.category(), UiErrorCategory::Backend);

        let err = UiError::from_message(UiErrorContext::CorpusList, "connection refused");
        assert_eq!(err.category(), UiErrorCategory::Transport);

        let err = UiError::from_message(UiErrorContext::Train, "something odd happened");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
    }
}
