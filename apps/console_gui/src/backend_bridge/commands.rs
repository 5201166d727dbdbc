//! Backend commands queued from UI to backend worker.
//!
//! Action commands carry the submission token assigned by the workflow
//! reducer; the worker echoes it back with the completion so late responses
//! can be recognized as stale.

use shared::domain::{CorpusId, ModelId};

pub enum BackendCommand {
    LoadCorpora,
    LoadModels,
    LoadCorpusDetail { corpus_id: CorpusId },
    PreprocessCorpus { corpus_id: CorpusId, token: u64 },
    TrainModel { model_id: ModelId, token: u64 },
}
