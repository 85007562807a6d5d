//! Financial-aid questions the engine produces answers for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A known financial-aid question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Question {
    StudentLegalName,
    StudentSsn,
    StudentDob,
    ParentAgi,
    ParentWages,
    ParentUsTaxPaid,
    ParentUntaxedIncome,
    HouseholdSize,
    NumberInCollege,
}

/// Which aid application a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldCategory {
    #[serde(rename = "Federal Aid")]
    FederalAid,
    #[serde(rename = "CSS Profile")]
    CssProfile,
    Other,
}

impl Question {
    pub const ALL: [Question; 9] = [
        Question::StudentLegalName,
        Question::StudentSsn,
        Question::StudentDob,
        Question::ParentAgi,
        Question::ParentWages,
        Question::ParentUsTaxPaid,
        Question::ParentUntaxedIncome,
        Question::HouseholdSize,
        Question::NumberInCollege,
    ];

    /// Stable question identifier carried by extracted fields.
    pub fn id(&self) -> &'static str {
        match self {
            Question::StudentLegalName => "student-legal-name",
            Question::StudentSsn => "student-ssn",
            Question::StudentDob => "student-dob",
            Question::ParentAgi => "parent-agi",
            Question::ParentWages => "parent-wages",
            Question::ParentUsTaxPaid => "parent-us-tax-paid",
            Question::ParentUntaxedIncome => "parent-untaxed-income",
            Question::HouseholdSize => "household-size",
            Question::NumberInCollege => "number-in-college",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.id() == id)
    }

    /// Federal Aid questions take precedence over CSS Profile ones.
    pub fn category(&self) -> FieldCategory {
        if FieldCategory::FederalAid.required().contains(self) {
            FieldCategory::FederalAid
        } else if FieldCategory::CssProfile.required().contains(self) {
            FieldCategory::CssProfile
        } else {
            FieldCategory::Other
        }
    }

    /// Whether answers are dollar amounts.
    pub fn is_money(&self) -> bool {
        matches!(
            self,
            Question::ParentAgi
                | Question::ParentWages
                | Question::ParentUsTaxPaid
                | Question::ParentUntaxedIncome
        )
    }
}

impl FieldCategory {
    /// Questions an application needs answered.
    pub fn required(&self) -> &'static [Question] {
        match self {
            FieldCategory::FederalAid => &[
                Question::ParentWages,
                Question::ParentAgi,
                Question::ParentUsTaxPaid,
                Question::HouseholdSize,
                Question::NumberInCollege,
                Question::StudentSsn,
                Question::StudentDob,
                Question::StudentLegalName,
            ],
            FieldCategory::CssProfile => &[
                Question::ParentWages,
                Question::ParentAgi,
                Question::ParentUsTaxPaid,
                Question::ParentUntaxedIncome,
                Question::HouseholdSize,
                Question::NumberInCollege,
            ],
            FieldCategory::Other => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::FederalAid => "Federal Aid",
            FieldCategory::CssProfile => "CSS Profile",
            FieldCategory::Other => "Other",
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
