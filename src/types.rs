use std::collections::HashMap;

use chrono::{DateTime, Utc};

pub type Amount = f64;
pub type MemberId = String;
pub type GroupId = String;
pub type ExpenseId = i64;

/// Largest difference tolerated between the sum of the split and the expense amount.
pub const SPLIT_TOLERANCE: Amount = 0.01;

/// Categories offered by the entry form. Any non-empty category is accepted.
pub const CATEGORY_OPTIONS: [&str; 5] = [
    "Food",
    "Accommodation",
    "Transport",
    "Entertainment",
    "Miscellaneous",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

/// Member ID to display name, iterated in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Members {
    entries: Vec<Member>,
}

/// Raw text of the expense entry form, as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct ExpenseForm {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub paid_by: MemberId,
    pub split_detail: HashMap<MemberId, String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitShare {
    pub member_id: MemberId,
    pub amount: Amount,
}

/// An expense form that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedExpense {
    pub title: String,
    pub amount: Amount,
    pub category: String,
    pub paid_by: MemberId,
    pub split_detail: Vec<SplitShare>,
}

/// An expense ready to be persisted. Never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseRecord {
    pub title: String,
    pub amount: Amount,
    pub category: String,
    pub paid_by: MemberId,
    pub split_detail: Vec<SplitShare>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SavedExpense {
    pub id: ExpenseId,
    pub record: ExpenseRecord,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub members: Members,
    /// In the order the store appended them.
    pub expenses: Vec<SavedExpense>,
}

/// A fully materialized read of all groups at one instant.
pub type Snapshot = Vec<GroupSnapshot>;

/// One of the current user's groups, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupExpenses {
    pub group_id: GroupId,
    pub members: Members,
    /// Most recent first.
    pub expenses: Vec<SavedExpense>,
    pub total: Amount,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserGroups {
    pub groups: Vec<GroupExpenses>,
    pub grand_total: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub uid: MemberId,
    pub display_name: String,
    pub email: Option<String>,
}

/// How the current user is matched against the members of a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Membership {
    /// Match a member display name. Two members sharing a name are indistinguishable.
    DisplayName(String),
    /// Match a member ID.
    MemberId(MemberId),
}

impl Member {
    pub fn new(id: &str, name: &str) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

impl Members {
    pub fn new() -> Members {
        Members::default()
    }

    /// Insert a member, or rename it if the ID is already present (keeping its position).
    pub fn insert(&mut self, id: &str, name: &str) {
        match self.entries.iter_mut().find(|m| m.id == id) {
            Some(member) => member.name = name.to_string(),
            None => self.entries.push(Member::new(id, name)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.as_str())
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|m| m.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Member> for Members {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        let mut members = Members::new();
        for member in iter {
            members.insert(&member.id, &member.name);
        }
        members
    }
}

impl ExpenseForm {
    pub fn new(title: &str, amount: &str, category: &str, paid_by: &str) -> ExpenseForm {
        ExpenseForm {
            title: title.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            paid_by: paid_by.to_string(),
            split_detail: HashMap::new(),
        }
    }

    pub fn with_split(mut self, member_id: &str, amount: &str) -> ExpenseForm {
        self.split_detail
            .insert(member_id.to_string(), amount.to_string());
        self
    }
}

impl SplitShare {
    pub fn new(member_id: &str, amount: Amount) -> SplitShare {
        SplitShare {
            member_id: member_id.to_string(),
            amount,
        }
    }
}

impl SavedExpense {
    pub fn new(id: ExpenseId, record: ExpenseRecord) -> SavedExpense {
        SavedExpense { id, record }
    }
}

impl GroupSnapshot {
    pub fn new(id: &str, members: Members, expenses: Vec<SavedExpense>) -> GroupSnapshot {
        GroupSnapshot {
            id: id.to_string(),
            members,
            expenses,
        }
    }
}

impl CurrentUser {
    pub fn membership(&self, match_by_id: bool) -> Membership {
        if match_by_id {
            Membership::MemberId(self.uid.clone())
        } else {
            Membership::DisplayName(self.display_name.clone())
        }
    }
}

impl Membership {
    pub fn matches(&self, members: &Members) -> bool {
        match self {
            Membership::DisplayName(name) => members.contains_name(name),
            Membership::MemberId(id) => members.contains_id(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_keep_insertion_order() {
        let mut members = Members::new();
        members.insert("m2", "Bob");
        members.insert("m1", "Alice");
        members.insert("m2", "Robert");

        let ids: Vec<_> = members.ids().collect();
        assert_eq!(ids, vec!["m2", "m1"]);
        assert_eq!(members.get("m2"), Some("Robert"));
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn test_membership_matches() {
        let members: Members = vec![Member::new("m1", "Alice"), Member::new("m2", "Bob")]
            .into_iter()
            .collect();

        assert!(Membership::DisplayName("Alice".to_string()).matches(&members));
        assert!(!Membership::DisplayName("m1".to_string()).matches(&members));
        assert!(Membership::MemberId("m1".to_string()).matches(&members));
        assert!(!Membership::MemberId("Alice".to_string()).matches(&members));
    }
}
