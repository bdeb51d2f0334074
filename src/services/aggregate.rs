use rust_decimal::Decimal;

use crate::database::models::Expense;

/// Live spend figures for one category, folded from its expenses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpendSummary {
    pub current_spend: Decimal,
    pub expense_count: usize,
}

impl SpendSummary {
    /// Exact decimal sum, no rounding. Empty input gives zero; `None` when
    /// the total does not fit in a `Decimal`.
    pub fn of<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Option<Self> {
        expenses
            .into_iter()
            .try_fold(Self::default(), |acc, expense| {
                Some(Self {
                    current_spend: acc.current_spend.checked_add(expense.value)?,
                    expense_count: acc.expense_count + 1,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn expense(value: &str) -> Expense {
        expense_of(Decimal::from_str(value).unwrap())
    }

    fn expense_of(value: Decimal) -> Expense {
        let now = Utc::now();
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: "alice".to_string(),
            name: "item".to_string(),
            description: None,
            value,
            category_id: "c1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_category_has_zero_spend() {
        let summary = SpendSummary::of(&Vec::<Expense>::new()).unwrap();
        assert_eq!(summary.current_spend, Decimal::ZERO);
        assert_eq!(summary.expense_count, 0);
    }

    #[test]
    fn sums_without_float_drift() {
        let expenses: Vec<_> = ["0.10", "0.20", "12.50"].iter().map(|v| expense(v)).collect();
        let summary = SpendSummary::of(&expenses).unwrap();
        assert_eq!(summary.current_spend, Decimal::from_str("12.80").unwrap());
        assert_eq!(summary.expense_count, 3);
    }

    #[test]
    fn order_does_not_matter() {
        let mut expenses: Vec<_> = ["3.33", "0.01", "100"].iter().map(|v| expense(v)).collect();
        let forward = SpendSummary::of(&expenses);
        expenses.reverse();
        assert_eq!(SpendSummary::of(&expenses), forward);
    }

    #[test]
    fn total_beyond_decimal_range_is_none() {
        let huge = Decimal::from_str("50000000000000000000000000000").unwrap();
        let expenses = vec![expense_of(huge), expense_of(huge)];
        assert_eq!(SpendSummary::of(&expenses), None);
    }
}
