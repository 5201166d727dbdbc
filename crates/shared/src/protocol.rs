use serde::{Deserialize, Serialize};

use crate::domain::{CorpusId, ModelId, UtteranceId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub corpus_id: CorpusId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_id: ModelId,
    pub name: String,
    pub corpus_id: CorpusId,
}

/// Assignment of utterances to training/validation/testing roles. The three
/// collections may overlap and may repeat an id; order within each collection
/// is preserved as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub training: Vec<UtteranceId>,
    pub validation: Vec<UtteranceId>,
    pub testing: Vec<UtteranceId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDetail {
    pub corpus_id: CorpusId,
    pub name: String,
    pub feature_type: String,
    pub label_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_samples: Option<u32>,
    pub partition: Partition,
}
