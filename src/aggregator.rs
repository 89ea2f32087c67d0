//! Rebuild the current user's groups and their totals from a snapshot of
//! all groups.
//!
//! The functions here are pure: they are re-run on every new snapshot and
//! never modify it.

use log::debug;

use crate::types::{
    Amount, GroupExpenses, GroupSnapshot, Membership, SavedExpense, Snapshot, UserGroups,
};

/// Get the groups the user with the given display name belongs to, with their
/// expenses sorted most recent first, plus the total spent across those groups.
///
/// Membership is matched against member display names: two members sharing a
/// display name both see the group. Use [aggregate_groups] with
/// [Membership::MemberId] to match by member ID instead.
pub fn aggregate_groups_for_user(snapshot: &Snapshot, display_name: &str) -> UserGroups {
    aggregate_groups(snapshot, &Membership::DisplayName(display_name.to_string()))
}

/// Get the groups matching `membership`, in snapshot order.
///
/// The algorithm works as follows:
/// - keep the groups whose members match `membership`
/// - sort each group's expenses by timestamp, most recent first; expenses with the
///   same timestamp keep the order in which they were saved
/// - sum the amounts of each group, then sum the group totals
///
/// A user without groups gets an empty list and a zero total.
pub fn aggregate_groups(snapshot: &Snapshot, membership: &Membership) -> UserGroups {
    let groups: Vec<_> = snapshot
        .iter()
        .filter(|g| membership.matches(&g.members))
        .map(group_expenses)
        .collect();

    let grand_total = groups.iter().map(|g| g.total).sum();

    debug!(
        "{} of {} groups match {:?}",
        groups.len(),
        snapshot.len(),
        membership
    );

    UserGroups {
        groups,
        grand_total,
    }
}

fn group_expenses(group: &GroupSnapshot) -> GroupExpenses {
    let expenses = sort_most_recent_first(&group.expenses);
    let total = total_amount(&expenses);

    GroupExpenses {
        group_id: group.id.clone(),
        members: group.members.clone(),
        expenses,
        total,
    }
}

/// `sort_by` is stable, so ties keep their original order.
fn sort_most_recent_first(expenses: &[SavedExpense]) -> Vec<SavedExpense> {
    let mut expenses = expenses.to_vec();
    expenses.sort_by(|e1, e2| e2.record.timestamp.cmp(&e1.record.timestamp));
    expenses
}

fn total_amount(expenses: &[SavedExpense]) -> Amount {
    expenses.iter().map(|e| e.record.amount).sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    use crate::types::{ExpenseRecord, Member, Members, SplitShare};

    use super::*;

    fn make_expense(id: i64, amount: Amount, paid_by: &str, ts_millis: i64) -> SavedExpense {
        SavedExpense::new(
            id,
            ExpenseRecord {
                title: format!("expense {id}"),
                amount,
                category: "Food".to_string(),
                paid_by: paid_by.to_string(),
                split_detail: vec![SplitShare::new(paid_by, amount)],
                timestamp: Utc.timestamp_millis_opt(ts_millis).unwrap(),
            },
        )
    }

    fn make_members(members: &[(&str, &str)]) -> Members {
        members
            .iter()
            .map(|(id, name)| Member::new(id, name))
            .collect()
    }

    fn make_snapshot() -> Snapshot {
        vec![
            GroupSnapshot::new(
                "nepal",
                make_members(&[("m1", "Alice"), ("m2", "Bob")]),
                vec![
                    make_expense(1, 100.0, "m1", 1000),
                    make_expense(2, 50.5, "m2", 3000),
                    make_expense(3, 20.0, "m1", 2000),
                ],
            ),
            GroupSnapshot::new(
                "bhutan",
                make_members(&[("m3", "Carol"), ("m4", "Dave")]),
                vec![make_expense(4, 999.0, "m1", 4000)],
            ),
            GroupSnapshot::new("india", make_members(&[("m5", "Alice")]), vec![]),
        ]
    }

    #[test]
    fn test_aggregate_groups_for_user() {
        let snapshot = make_snapshot();
        let result = aggregate_groups_for_user(&snapshot, "Alice");

        assert_eq!(result.groups.len(), 2);
        assert_eq!(result.groups[0].group_id, "nepal");
        assert_eq!(result.groups[1].group_id, "india");

        let ids: Vec<_> = result.groups[0].expenses.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_abs_diff_eq!(result.groups[0].total, 170.5);

        assert!(result.groups[1].expenses.is_empty());
        assert_abs_diff_eq!(result.groups[1].total, 0.0);

        assert_abs_diff_eq!(result.grand_total, 170.5);
    }

    #[test]
    fn test_membership_by_name_ignores_payer() {
        // Alice's ID paid in "bhutan", but she is not one of its members.
        let snapshot = make_snapshot();
        let result = aggregate_groups_for_user(&snapshot, "Alice");
        assert!(result.groups.iter().all(|g| g.group_id != "bhutan"));
    }

    #[test]
    fn test_membership_by_id() {
        let snapshot = make_snapshot();
        let result = aggregate_groups(&snapshot, &Membership::MemberId("m5".to_string()));

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].group_id, "india");
        assert_abs_diff_eq!(result.grand_total, 0.0);
    }

    #[test]
    fn test_user_without_groups() {
        let snapshot = make_snapshot();
        let result = aggregate_groups_for_user(&snapshot, "Mallory");
        assert_eq!(result, UserGroups::default());

        let result = aggregate_groups_for_user(&vec![], "Alice");
        assert!(result.groups.is_empty());
        assert_abs_diff_eq!(result.grand_total, 0.0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let snapshot = vec![GroupSnapshot::new(
            "g1",
            make_members(&[("m1", "Alice")]),
            vec![
                make_expense(1, 1.0, "m1", 1000),
                make_expense(2, 2.0, "m1", 2000),
                make_expense(3, 3.0, "m1", 1000),
                make_expense(4, 4.0, "m1", 2000),
            ],
        )];

        let result = aggregate_groups_for_user(&snapshot, "Alice");
        let ids: Vec<_> = result.groups[0].expenses.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let snapshot = make_snapshot();
        let before = snapshot.clone();

        let first = aggregate_groups_for_user(&snapshot, "Alice");
        let second = aggregate_groups_for_user(&snapshot, "Alice");

        assert_eq!(first, second);
        assert_eq!(snapshot, before);
    }
}
