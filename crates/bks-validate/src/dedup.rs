//! Identity-key deduplication.
//!
//! Rows sharing an identity key collapse to one. The row with the highest
//! read index wins; it takes the output position of the key's first
//! occurrence. Every superseded row is reported as a `DuplicateKey`
//! rejection.

use std::collections::HashMap;

use bks_model::{NormalizedRecord, RejectReason, RejectedRow};

/// Surviving rows and the rows they replaced.
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    pub rows: Vec<NormalizedRecord>,
    pub superseded: Vec<RejectedRow>,
}

pub fn deduplicate(mut records: Vec<NormalizedRecord>) -> DedupOutcome {
    records.sort_by_key(|record| record.index);

    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();
    let mut outcome = DedupOutcome::default();
    for record in records {
        let key = record.identity_key();
        match positions.get(&key) {
            Some(&position) => {
                let previous = std::mem::replace(&mut outcome.rows[position], record);
                let winner = outcome.rows[position].index;
                outcome.superseded.push(RejectedRow::new(
                    previous.source,
                    previous.index,
                    RejectReason::DuplicateKey,
                    format!("key ({}) superseded by row {winner}", key.join(", ")),
                ));
            }
            None => {
                positions.insert(key, outcome.rows.len());
                outcome.rows.push(record);
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use bks_model::{Field, NormalizedValue, SourceKind};

    fn user(index: usize, id: &str, name: &str) -> NormalizedRecord {
        let mut record = NormalizedRecord::new(SourceKind::Users, index);
        record.set(Field::UserId, NormalizedValue::Text(id.to_string()));
        record.set(Field::Name, NormalizedValue::Text(name.to_string()));
        record
    }

    #[test]
    fn latest_read_wins_at_first_position() {
        let outcome = deduplicate(vec![
            user(0, "U1", "Ann"),
            user(1, "U2", "Bo"),
            user(2, "U1", "Ann Reader"),
        ]);
        let names: Vec<_> = outcome
            .rows
            .iter()
            .map(|r| r.text(Field::Name).unwrap())
            .collect();
        assert_eq!(names, vec!["Ann Reader", "Bo"]);
        assert_eq!(outcome.superseded.len(), 1);
        assert_eq!(outcome.superseded[0].index, 0);
        assert_eq!(outcome.superseded[0].reason, RejectReason::DuplicateKey);
    }

    #[test]
    fn input_order_does_not_matter() {
        let outcome = deduplicate(vec![user(5, "U1", "Later"), user(1, "U1", "Earlier")]);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].text(Field::Name), Some("Later"));
    }
}
