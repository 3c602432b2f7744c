//! Spend summary: groups stored transactions by type and account.

use serde::Serialize;
use std::collections::HashMap;

use crate::transaction::{KeyedTransaction, TransactionType};

/// Totals for one (transaction type, account) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendGroup {
    pub transaction_type: TransactionType,
    pub account_ref: String,
    pub count: usize,
    /// Money spent, reported as a positive number
    pub outflow: f64,
    pub inflow: f64,
}

impl SpendGroup {
    pub fn net(&self) -> f64 {
        self.inflow - self.outflow
    }

    pub fn line(&self) -> String {
        let account = if self.account_ref.is_empty() {
            "-"
        } else {
            self.account_ref.as_str()
        };
        format!(
            "{} | {} | count={} | out={:.2} | in={:.2}",
            self.transaction_type, account, self.count, self.outflow, self.inflow
        )
    }
}

/// Group by (type, account) and sort by outflow, largest first.
pub fn summarize(records: &[KeyedTransaction]) -> Vec<SpendGroup> {
    let mut groups: HashMap<(TransactionType, String), SpendGroup> = HashMap::new();

    for rec in records {
        let t = &rec.transaction;
        let group = groups
            .entry((t.transaction_type, t.account_ref.clone()))
            .or_insert_with(|| SpendGroup {
                transaction_type: t.transaction_type,
                account_ref: t.account_ref.clone(),
                count: 0,
                outflow: 0.0,
                inflow: 0.0,
            });
        group.count += 1;
        if t.is_expense() {
            group.outflow += -t.amount;
        } else if t.is_income() {
            group.inflow += t.amount;
        }
    }

    let mut out: Vec<SpendGroup> = groups.into_values().collect();
    out.sort_by(|a, b| {
        b.outflow
            .total_cmp(&a.outflow)
            .then_with(|| a.transaction_type.cmp(&b.transaction_type))
            .then_with(|| a.account_ref.cmp(&b.account_ref))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    fn rec(id: &str, tt: TransactionType, account: &str, amount: f64) -> KeyedTransaction {
        KeyedTransaction::new(
            id,
            Transaction {
                amount,
                account_ref: account.to_string(),
                transaction_type: tt,
                ..Transaction::empty()
            },
        )
    }

    #[test]
    fn test_groups_and_sorts_by_outflow() {
        let records = vec![
            rec("1", TransactionType::CreditCard, "4321", -100.0),
            rec("2", TransactionType::Upi, "XX1234", -500.0),
            rec("3", TransactionType::CreditCard, "4321", -50.0),
            rec("4", TransactionType::Upi, "XX1234", 200.0),
        ];
        let groups = summarize(&records);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].transaction_type, TransactionType::Upi);
        assert_eq!(groups[0].outflow, 500.0);
        assert_eq!(groups[0].inflow, 200.0);
        assert_eq!(groups[0].net(), -300.0);

        assert_eq!(groups[1].count, 2);
        assert_eq!(groups[1].outflow, 150.0);
    }

    #[test]
    fn test_zero_amount_counts_without_moving_totals() {
        let records = vec![
            rec("1", TransactionType::Undefined, "", 0.0),
            rec("2", TransactionType::Undefined, "", -20.0),
        ];
        let groups = summarize(&records);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].outflow, 20.0);
        assert_eq!(groups[0].inflow, 0.0);
    }

    #[test]
    fn test_line_marks_missing_account() {
        let groups = summarize(&[rec("1", TransactionType::Undefined, "", 0.0)]);
        assert!(groups[0].line().starts_with("undefined | - | count=1"));
    }
}
