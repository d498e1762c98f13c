//! The fixed set of document slots a company record can hold.
//!
//! Per-slot behavior is table-driven: each summarized slot carries a
//! descriptor naming its wire key and the semantic field the summarizer
//! must produce. No per-field branches anywhere else in the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven named document categories a company record can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSlot {
    IntendedCompanyName,
    AlternativeCompanyName1,
    AlternativeCompanyName2,
    CompanyActivities,
    IntendedRegisteredAddress,
    FinancialYearEnd,
    Constitution,
}

/// Static descriptor for a summarized slot: its wire key and the semantic
/// field the summarizer is asked to extract.
#[derive(Debug, Clone, Copy)]
pub struct SlotDescriptor {
    pub slot: DocumentSlot,
    pub wire_name: &'static str,
    pub semantic_field: &'static str,
}

/// The six slots whose value is AI-derived from the uploaded document.
/// Constitution is the seventh; it carries an explicit option and is
/// processed separately.
pub static SUMMARIZED_SLOTS: [SlotDescriptor; 6] = [
    SlotDescriptor {
        slot: DocumentSlot::IntendedCompanyName,
        wire_name: "intendedCompanyName",
        semantic_field: "name",
    },
    SlotDescriptor {
        slot: DocumentSlot::AlternativeCompanyName1,
        wire_name: "alternativeCompanyName1",
        semantic_field: "name",
    },
    SlotDescriptor {
        slot: DocumentSlot::AlternativeCompanyName2,
        wire_name: "alternativeCompanyName2",
        semantic_field: "name",
    },
    SlotDescriptor {
        slot: DocumentSlot::CompanyActivities,
        wire_name: "companyActivities",
        semantic_field: "description",
    },
    SlotDescriptor {
        slot: DocumentSlot::IntendedRegisteredAddress,
        wire_name: "intendedRegisteredAddress",
        semantic_field: "address",
    },
    SlotDescriptor {
        slot: DocumentSlot::FinancialYearEnd,
        wire_name: "financialYearEnd",
        semantic_field: "date",
    },
];

impl DocumentSlot {
    /// Every slot, constitution included.
    pub const ALL: [DocumentSlot; 7] = [
        DocumentSlot::IntendedCompanyName,
        DocumentSlot::AlternativeCompanyName1,
        DocumentSlot::AlternativeCompanyName2,
        DocumentSlot::CompanyActivities,
        DocumentSlot::IntendedRegisteredAddress,
        DocumentSlot::FinancialYearEnd,
        DocumentSlot::Constitution,
    ];

    /// The multipart field / JSON key for this slot.
    pub fn wire_name(&self) -> &'static str {
        match self {
            DocumentSlot::IntendedCompanyName => "intendedCompanyName",
            DocumentSlot::AlternativeCompanyName1 => "alternativeCompanyName1",
            DocumentSlot::AlternativeCompanyName2 => "alternativeCompanyName2",
            DocumentSlot::CompanyActivities => "companyActivities",
            DocumentSlot::IntendedRegisteredAddress => "intendedRegisteredAddress",
            DocumentSlot::FinancialYearEnd => "financialYearEnd",
            DocumentSlot::Constitution => "constitution",
        }
    }

    /// Resolve a multipart field name to a slot.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.wire_name() == name)
    }

    /// Descriptor for summarized slots; `None` for the constitution slot.
    pub fn descriptor(&self) -> Option<&'static SlotDescriptor> {
        SUMMARIZED_SLOTS.iter().find(|d| d.slot == *self)
    }
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// The constitution choice a user makes alongside (or without) a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ConstitutionOption {
    Option1,
    Option2,
    Option3,
}

impl ConstitutionOption {
    /// Parse the form-field string value ("1" | "2" | "3").
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1" => Some(Self::Option1),
            "2" => Some(Self::Option2),
            "3" => Some(Self::Option3),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Option1 => 1,
            Self::Option2 => 2,
            Self::Option3 => 3,
        }
    }
}

impl TryFrom<u8> for ConstitutionOption {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Option1),
            2 => Ok(Self::Option2),
            3 => Ok(Self::Option3),
            other => Err(format!("invalid constitution option: {other}")),
        }
    }
}

impl From<ConstitutionOption> for u8 {
    fn from(value: ConstitutionOption) -> Self {
        value.as_u8()
    }
}

impl fmt::Display for ConstitutionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
