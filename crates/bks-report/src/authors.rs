//! Author sets: the unordered group of authors credited on a book.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use bks_model::{Dataset, SalesRow};

pub type AuthorSet = BTreeSet<String>;

pub fn author_set(row: &SalesRow) -> AuthorSet {
    row.authors.iter().cloned().collect()
}

/// Distinct author sets across all sold books.
pub fn count_author_sets(dataset: &Dataset) -> usize {
    dataset.iter().map(author_set).collect::<BTreeSet<_>>().len()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSetSales {
    /// Sorted author names.
    pub authors: Vec<String>,
    pub quantity: u64,
}

impl AuthorSetSales {
    pub fn label(&self) -> String {
        self.authors.join(", ")
    }
}

/// The author set with the most copies sold. Ties go to the set sold first.
pub fn most_popular_author_set(dataset: &Dataset) -> Option<AuthorSetSales> {
    let mut order: Vec<AuthorSet> = Vec::new();
    let mut sold: HashMap<AuthorSet, u64> = HashMap::new();
    for row in dataset {
        let set = author_set(row);
        if !sold.contains_key(&set) {
            order.push(set.clone());
        }
        *sold.entry(set).or_insert(0) += u64::from(row.quantity);
    }

    let mut best: Option<(AuthorSet, u64)> = None;
    for set in order {
        let quantity = sold.get(&set).copied().unwrap_or(0);
        if best.as_ref().is_none_or(|(_, top)| quantity > *top) {
            best = Some((set, quantity));
        }
    }
    best.map(|(set, quantity)| AuthorSetSales {
        authors: set.into_iter().collect(),
        quantity,
    })
}
