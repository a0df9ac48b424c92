use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// The aggregate the transaction service computes over all of a user's transactions.
///
/// The client never derives these values itself. Depending on the service, `expenses` may be a
/// negative sum or a positive magnitude; it is stored exactly as received.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub(crate) balance: Amount,
    pub(crate) income: Amount,
    pub(crate) expenses: Amount,
}

impl Summary {
    pub fn new(balance: Amount, income: Amount, expenses: Amount) -> Self {
        Self {
            balance,
            income,
            expenses,
        }
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn income(&self) -> Amount {
        self.income
    }

    pub fn expenses(&self) -> Amount {
        self.expenses
    }
}
