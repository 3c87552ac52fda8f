use serde::{Deserialize, Serialize};

use crate::permission::action::{MANAGE, VIEW};

/// Navigable areas of the administrative console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleSection {
    /// Landing dashboard.
    Dashboard,
    /// Property listings.
    Properties,
    /// Investor accounts.
    Investors,
    /// Investment transactions.
    Transactions,
    /// KYC document review queue.
    KycReview,
    /// Notification center.
    Notifications,
    /// Users, roles and groups administration.
    AccessControl,
}

impl ConsoleSection {
    /// Returns a stable identifier for this section.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Properties => "properties",
            Self::Investors => "investors",
            Self::Transactions => "transactions",
            Self::KycReview => "kyc_review",
            Self::Notifications => "notifications",
            Self::AccessControl => "access_control",
        }
    }

    /// Returns all sections in navigation order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ConsoleSection] = &[
            ConsoleSection::Dashboard,
            ConsoleSection::Properties,
            ConsoleSection::Investors,
            ConsoleSection::Transactions,
            ConsoleSection::KycReview,
            ConsoleSection::Notifications,
            ConsoleSection::AccessControl,
        ];

        ALL
    }

    /// Returns the `(resource, action)` pairs that unlock this section.
    ///
    /// Holding any one of them is enough.
    #[must_use]
    pub fn required_checks(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Dashboard => &[("dashboard", VIEW)],
            Self::Properties => &[("properties", VIEW)],
            Self::Investors => &[("investors", VIEW)],
            Self::Transactions => &[("transactions", VIEW)],
            Self::KycReview => &[("kyc", VIEW), ("kyc:approval", VIEW)],
            Self::Notifications => &[("notifications", VIEW)],
            Self::AccessControl => &[
                ("users", MANAGE),
                ("roles", MANAGE),
                ("groups", MANAGE),
            ],
        }
    }
}
