//! Produce the text shown to the user.

use crate::types::{Amount, GroupExpenses, Members, SavedExpense, UserGroups, CATEGORY_OPTIONS};

pub fn format_user_groups(user_groups: &UserGroups) -> String {
    if user_groups.groups.is_empty() {
        return "You are not part of any group yet.".to_string();
    }

    let groups = user_groups
        .groups
        .iter()
        .map(format_group)
        .fold(String::new(), |a, b| a + &b + "\n");

    format!(
        "{}Total across groups: {}",
        groups,
        format_amount(user_groups.grand_total)
    )
}

fn format_group(group: &GroupExpenses) -> String {
    let names: Vec<_> = group.members.iter().map(|m| m.name.as_str()).collect();
    let header = format!(
        "🧳 {} ({}): {}",
        group.group_id,
        names.join(", "),
        format_amount(group.total)
    );

    if group.expenses.is_empty() {
        format!("{header}\n   No expenses yet.")
    } else {
        group
            .expenses
            .iter()
            .map(|e| format_expense(e, &group.members))
            .fold(header, |a, b| a + "\n" + &b)
    }
}

fn format_expense(expense: &SavedExpense, members: &Members) -> String {
    let record = &expense.record;
    let split = record
        .split_detail
        .iter()
        .map(|s| format!("{} {}", member_name(members, &s.member_id), format_amount(s.amount)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "   💰 {}: {} [{}] {} paid by {} ({}) on {}",
        expense.id,
        record.title,
        record.category,
        format_amount(record.amount),
        member_name(members, &record.paid_by),
        split,
        record.timestamp.format("%Y-%m-%d %H:%M")
    )
}

/// Fall back to the ID when the member is no longer part of the group.
fn member_name<'a>(members: &'a Members, member_id: &'a str) -> &'a str {
    members.get(member_id).unwrap_or(member_id)
}

pub fn format_members(members: &Members) -> String {
    if members.is_empty() {
        "No members found. Please add members before adding expenses.".to_string()
    } else {
        members
            .iter()
            .map(|m| format!("- {}: {}", m.id, m.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn format_categories() -> String {
    CATEGORY_OPTIONS
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}
