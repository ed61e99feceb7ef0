//! View-models for the four sections plus the summary.
//!
//! Each view-model owns its loaded list, a filter string and a
//! [`Feedback`] banner pair. Every successful mutation reloads the whole
//! list from the server; nothing is merged locally.
//!
//! Role checks and form validation run before any request is built, so a
//! rejected action never reaches the network.

pub mod context;
pub mod flash;
pub mod inventory;
pub mod loans;
pub mod requests;
pub mod summary;
pub mod users;

pub use context::ViewContext;
pub use flash::{error_text, Feedback, Flash, FlashKind};
pub use inventory::{InventoryView, ItemForm};
pub use loans::{LoanForm, LoanRow, LoansView, ReturnOutcome};
pub use requests::{RequestForm, RequestsView};
pub use summary::Summary;
pub use users::{UserForm, UsersView};

/// Case-insensitive substring match of `query` against any field. A blank
/// query matches everything.
pub fn matches_filter(query: &str, fields: &[&str]) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&q))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter("", &["x"]));
        assert!(matches_filter("  ", &[]));
        assert!(matches_filter("MULTI", &["Multímetro", "Lab"]));
        assert!(matches_filter("lab", &["Multímetro", "Laboratorio"]));
        assert!(!matches_filter("osc", &["Multímetro", "Laboratorio"]));
    }
}
