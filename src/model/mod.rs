//! Types that represent the core data model, such as `Transaction` and `Summary`.
mod amount;
mod category;
mod summary;
mod transaction;

pub use amount::{Amount, AmountError, AmountRepr};
pub use category::Category;
pub use summary::Summary;
pub use transaction::{NewTransaction, Transaction, TransactionId};
