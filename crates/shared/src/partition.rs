use std::collections::HashSet;

use crate::domain::UtteranceId;
use crate::protocol::Partition;

/// One table row per distinct utterance, with a flag per partition collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRow {
    pub utterance_id: UtteranceId,
    pub in_training: bool,
    pub in_validation: bool,
    pub in_testing: bool,
}

/// Collapses the three (possibly overlapping) partition collections into one
/// deduplicated sequence. Rows keep first-seen order across training, then
/// validation, then testing; a flag is set iff the utterance occurs at least
/// once in that collection. Duplicate ids within a collection yield one row.
pub fn membership_rows(partition: &Partition) -> Vec<MembershipRow> {
    let training: HashSet<&UtteranceId> = partition.training.iter().collect();
    let validation: HashSet<&UtteranceId> = partition.validation.iter().collect();
    let testing: HashSet<&UtteranceId> = partition.testing.iter().collect();

    let mut seen: HashSet<&UtteranceId> = HashSet::new();
    let mut rows = Vec::new();
    for utterance_id in partition
        .training
        .iter()
        .chain(partition.validation.iter())
        .chain(partition.testing.iter())
    {
        if !seen.insert(utterance_id) {
            continue;
        }
        rows.push(MembershipRow {
            utterance_id: utterance_id.clone(),
            in_training: training.contains(utterance_id),
            in_validation: validation.contains(utterance_id),
            in_testing: testing.contains(utterance_id),
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{membership_rows, MembershipRow};
    use crate::domain::UtteranceId;
    use crate::protocol::Partition;

    fn ids(raw: &[&str]) -> Vec<UtteranceId> {
        raw.iter().map(|s| UtteranceId(s.to_string())).collect()
    }

    fn row(id: &str, training: bool, validation: bool, testing: bool) -> MembershipRow {
        MembershipRow {
            utterance_id: UtteranceId(id.to_string()),
            in_training: training,
            in_validation: validation,
            in_testing: testing,
        }
    }

    #[test]
    fn flags_follow_collection_membership_in_first_seen_order() {
        let partition = Partition {
            training: ids(&["utt-1", "utt-2"]),
            validation: ids(&["utt-2", "utt-3"]),
            testing: Vec::new(),
        };

        assert_eq!(
            membership_rows(&partition),
            vec![
                row("utt-1", true, false, false),
                row("utt-2", true, true, false),
                row("utt-3", false, true, false),
            ]
        );
    }

    #[test]
    fn empty_partition_yields_no_rows() {
        assert!(membership_rows(&Partition::default()).is_empty());
    }

    #[test]
    fn utterance_in_all_three_collections_yields_one_fully_flagged_row() {
        let partition = Partition {
            training: ids(&["utt-9"]),
            validation: ids(&["utt-9"]),
            testing: ids(&["utt-9"]),
        };

        assert_eq!(
            membership_rows(&partition),
            vec![row("utt-9", true, true, true)]
        );
    }

    #[test]
    fn duplicates_within_one_collection_collapse_to_one_row() {
        let partition = Partition {
            training: ids(&["utt-4", "utt-4", "utt-4"]),
            validation: Vec::new(),
            testing: ids(&["utt-5", "utt-5"]),
        };

        assert_eq!(
            membership_rows(&partition),
            vec![
                row("utt-4", true, false, false),
                row("utt-5", false, false, true),
            ]
        );
    }

    #[test]
    fn row_count_equals_distinct_ids_and_never_exceeds_total_input_length() {
        let partition = Partition {
            training: ids(&["a", "b", "c", "a"]),
            validation: ids(&["b", "d"]),
            testing: ids(&["d", "e", "a"]),
        };

        let rows = membership_rows(&partition);
        let distinct: std::collections::HashSet<_> = partition
            .training
            .iter()
            .chain(partition.validation.iter())
            .chain(partition.testing.iter())
            .collect();

        assert_eq!(rows.len(), distinct.len());
        assert!(
            rows.len()
                <= partition.training.len() + partition.validation.len() + partition.testing.len()
        );
        for entry in &rows {
            assert_eq!(entry.in_training, partition.training.contains(&entry.utterance_id));
            assert_eq!(
                entry.in_validation,
                partition.validation.contains(&entry.utterance_id)
            );
            assert_eq!(entry.in_testing, partition.testing.contains(&entry.utterance_id));
        }
    }

    #[test]
    fn rerunning_on_the_same_partition_is_stable() {
        let partition = Partition {
            training: ids(&["x", "y"]),
            validation: ids(&["y", "z"]),
            testing: ids(&["x"]),
        };

        assert_eq!(membership_rows(&partition), membership_rows(&partition));
    }
}
