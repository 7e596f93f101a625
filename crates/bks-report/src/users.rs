//! Buyer identity across user ids.
//!
//! The same person can appear under several user ids with slightly
//! different profiles. Two profiles that differ in at most one of name,
//! email, phone and address are treated as one real user.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bks_model::{Dataset, SalesRow};

use crate::revenue::add_revenue;

/// Largest number of differing profile fields for two ids to be one user.
pub const MAX_PROFILE_DIFFERENCES: usize = 1;

/// Identifying attributes of a buyer. Absent values compare as empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl UserProfile {
    pub fn from_row(row: &SalesRow) -> Self {
        Self {
            name: row.user_name.clone(),
            email: row.user_email.clone().unwrap_or_default(),
            phone: row.user_phone.clone().unwrap_or_default(),
            address: row.user_address.clone().unwrap_or_default(),
        }
    }

    fn fields(&self) -> [&str; 4] {
        [&self.name, &self.email, &self.phone, &self.address]
    }

    /// Number of fields that differ from `other`.
    pub fn differences(&self, other: &UserProfile) -> usize {
        self.fields()
            .iter()
            .zip(other.fields())
            .filter(|(a, b)| **a != *b)
            .count()
    }
}

/// One profile per user id, in first-order order.
fn profiles(dataset: &Dataset) -> Vec<(&str, UserProfile)> {
    let mut seen = BTreeSet::new();
    dataset
        .iter()
        .filter(|row| seen.insert(row.user_id.as_str()))
        .map(|row| (row.user_id.as_str(), UserProfile::from_row(row)))
        .collect()
}

/// Counts buyers after merging near-identical profiles.
///
/// Each profile joins the first group whose first member it is close to.
pub fn count_real_users(dataset: &Dataset) -> usize {
    let mut representatives: Vec<UserProfile> = Vec::new();
    for (_, profile) in profiles(dataset) {
        let matched = representatives
            .iter()
            .any(|rep| rep.differences(&profile) <= MAX_PROFILE_DIFFERENCES);
        if !matched {
            representatives.push(profile);
        }
    }
    representatives.len()
}

/// The highest-spending user id and every id that shares a contact detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestBuyer {
    pub user_id: String,
    pub name: String,
    pub revenue: Decimal,
    /// Sorted, including `user_id` itself.
    pub linked_user_ids: Vec<String>,
}

fn shares_detail(a: &SalesRow, b: &SalesRow) -> bool {
    let same = |x: &Option<String>, y: &Option<String>| x.is_some() && x == y;
    a.user_name == b.user_name
        || same(&a.user_email, &b.user_email)
        || same(&a.user_phone, &b.user_phone)
        || same(&a.user_address, &b.user_address)
}

/// Ties go to the user who ordered first.
pub fn best_buyer(dataset: &Dataset) -> Option<BestBuyer> {
    let mut order: Vec<&SalesRow> = Vec::new();
    let mut spending: HashMap<&str, Decimal> = HashMap::new();
    for row in dataset {
        let total = spending.entry(row.user_id.as_str()).or_insert_with(|| {
            order.push(row);
            Decimal::ZERO
        });
        add_revenue(total, row.revenue);
    }

    let mut best: Option<(&SalesRow, Decimal)> = None;
    for row in order {
        let total = spending[row.user_id.as_str()];
        if best.is_none_or(|(_, top)| total > top) {
            best = Some((row, total));
        }
    }
    let (best, revenue) = best?;

    let linked: BTreeSet<&str> = dataset
        .iter()
        .filter(|row| shares_detail(row, best))
        .map(|row| row.user_id.as_str())
        .collect();

    Some(BestBuyer {
        user_id: best.user_id.clone(),
        name: best.user_name.clone(),
        revenue,
        linked_user_ids: linked.into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sale;

    #[test]
    fn one_differing_field_is_the_same_user() {
        let dataset = Dataset::new(vec![
            sale("O1", "U1", "Ann Reader", Some("ann@example.com"), Some("555-1"), 100),
            sale("O2", "U2", "Ann Reader", Some("ann@example.com"), Some("555-2"), 100),
            sale("O3", "U3", "Bo Lee", Some("bo@example.com"), None, 100),
            sale("O4", "U1", "Ann Reader", Some("ann@example.com"), Some("555-1"), 100),
        ])
        .unwrap();
        assert_eq!(count_real_users(&dataset), 2);
    }

    #[test]
    fn two_differing_fields_are_different_users() {
        let dataset = Dataset::new(vec![
            sale("O1", "U1", "Ann Reader", Some("ann@example.com"), Some("555-1"), 100),
            sale("O2", "U2", "Ann Reader", Some("ann@other.example"), Some("555-2"), 100),
        ])
        .unwrap();
        assert_eq!(count_real_users(&dataset), 2);
    }

    #[test]
    fn best_buyer_links_ids_by_contact() {
        let dataset = Dataset::new(vec![
            sale("O1", "U1", "Ann Reader", Some("ann@example.com"), None, 1000),
            sale("O2", "U2", "A. Reader", Some("ann@example.com"), None, 500),
            sale("O3", "U3", "Bo Lee", None, None, 1200),
            sale("O4", "U1", "Ann Reader", Some("ann@example.com"), None, 800),
        ])
        .unwrap();
        let best = best_buyer(&dataset).unwrap();
        assert_eq!(best.user_id, "U1");
        assert_eq!(best.revenue.to_string(), "18.00");
        assert_eq!(best.linked_user_ids, vec!["U1", "U2"]);
    }

    #[test]
    fn best_buyer_total_saturates() {
        let mut first = sale("O1", "U1", "Ann Reader", None, None, 100);
        first.revenue = Decimal::MAX;
        let mut second = sale("O2", "U1", "Ann Reader", None, None, 100);
        second.revenue = Decimal::MAX;
        let buyer = best_buyer(&Dataset::new(vec![first, second]).unwrap()).unwrap();
        assert_eq!(buyer.user_id, "U1");
        assert_eq!(buyer.revenue, Decimal::MAX);
    }

    #[test]
    fn absent_contacts_do_not_link() {
        let dataset = Dataset::new(vec![
            sale("O1", "U1", "Ann Reader", None, None, 1000),
            sale("O2", "U2", "Bo Lee", None, None, 500),
        ])
        .unwrap();
        assert_eq!(best_buyer(&dataset).unwrap().linked_user_ids, vec!["U1"]);
        assert!(best_buyer(&Dataset::default()).is_none());
    }
}
