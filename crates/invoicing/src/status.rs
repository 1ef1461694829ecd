//! Invoice status lifecycle.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Issued,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Legal transitions: `issued -> paid | overdue | cancelled` and
    /// `overdue -> cancelled`. `paid` and `cancelled` are terminal.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        matches!(
            (self, next),
            (Issued, Paid) | (Issued, Overdue) | (Issued, Cancelled) | (Overdue, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            InvoiceStatus::Issued => "issued",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InvoiceStatus::*;

    #[test]
    fn allows_exactly_the_legal_edges() {
        let all = [Issued, Paid, Overdue, Cancelled];
        let legal = [
            (Issued, Paid),
            (Issued, Overdue),
            (Issued, Cancelled),
            (Overdue, Cancelled),
        ];

        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    legal.contains(&(from, to)),
                    "{from:?} -> {to:?}"
                );
            }
        }
    }

    #[test]
    fn paid_and_cancelled_are_terminal() {
        assert!(Paid.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Issued.is_terminal());
        assert!(!Overdue.is_terminal());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Overdue).unwrap(), "\"overdue\"");
        let status: InvoiceStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, Cancelled);
    }
}
