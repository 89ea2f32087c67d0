//! Turn a validated expense into the record handed to the database.

use chrono::{DateTime, Utc};

use crate::types::{ExpenseRecord, ValidatedExpense};

/// Build the record to persist, stamping it with the time returned by `now`.
///
/// The input is trusted: validation happens in [crate::validator::validate_expense_form].
pub fn build_expense_record<F>(validated: ValidatedExpense, now: F) -> ExpenseRecord
where
    F: FnOnce() -> DateTime<Utc>,
{
    ExpenseRecord {
        title: validated.title,
        amount: validated.amount,
        category: validated.category,
        paid_by: validated.paid_by,
        split_detail: validated.split_detail,
        timestamp: now(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::types::SplitShare;

    use super::*;

    #[test]
    fn test_build_expense_record() {
        let validated = ValidatedExpense {
            title: "Bus to Pokhara".to_string(),
            amount: 1500.0,
            category: "Transport".to_string(),
            paid_by: "m2".to_string(),
            split_detail: vec![SplitShare::new("m1", 750.0), SplitShare::new("m2", 750.0)],
        };
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let record = build_expense_record(validated.clone(), || ts);

        assert_eq!(record.title, validated.title);
        assert_eq!(record.amount, validated.amount);
        assert_eq!(record.category, validated.category);
        assert_eq!(record.paid_by, validated.paid_by);
        assert_eq!(record.split_detail, validated.split_detail);
        assert_eq!(record.timestamp, ts);
    }
}
