//! Procurement record entity type - the tracked unit

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::entity::{Entity, ProcurementType, ProgressStatus, RecordStatus};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::prnumber::{PrNumber, PrNumberError};

/// Shelf-path location: shelf → cabinet → folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfPath {
    pub shelf: EntityId,
    pub cabinet: EntityId,
    pub folder: EntityId,
}

/// Box-path location: box → folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxPath {
    #[serde(rename = "box")]
    pub storage_box: EntityId,
    pub folder: EntityId,
}

/// Physical location of a record - exactly one of the two paths
///
/// Untagged on the wire: a shelf path carries `shelf`/`cabinet`/`folder`
/// keys, a box path carries `box`/`folder`. The enum makes "never both"
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Shelf(ShelfPath),
    Box(BoxPath),
}

impl Location {
    /// The folder this record is filed in, on either path
    pub fn folder(&self) -> &EntityId {
        match self {
            Location::Shelf(p) => &p.folder,
            Location::Box(p) => &p.folder,
        }
    }

    /// Box id when on the box path
    pub fn storage_box(&self) -> Option<&EntityId> {
        match self {
            Location::Box(p) => Some(&p.storage_box),
            Location::Shelf(_) => None,
        }
    }
}

/// Document checklist for a procurement file
///
/// Keys are the standard RA 9184 supporting documents; values track whether
/// the physical copy is present in the folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist(BTreeMap<String, bool>);

impl Checklist {
    /// The standard document set tracked per file
    pub const ITEMS: [&'static str; 22] = [
        "Purchase Request",
        "Market Study",
        "Request for Quotation",
        "Abstract of Quotations",
        "BAC Resolution",
        "Notice of Award",
        "Purchase Order",
        "Obligation Request",
        "Notice to Proceed",
        "Delivery Receipt",
        "Sales Invoice",
        "Inspection and Acceptance Report",
        "Certificate of Acceptance",
        "Property Acknowledgement Receipt",
        "Disbursement Voucher",
        "Official Receipt",
        "Omnibus Sworn Statement",
        "Mayor's Permit",
        "PhilGEPS Registration",
        "Income/Business Tax Return",
        "Performance Security",
        "Warranty Certificate",
    ];

    /// Create a checklist with every standard document unchecked
    pub fn standard() -> Self {
        Self(Self::ITEMS.iter().map(|item| (item.to_string(), false)).collect())
    }

    /// Mark a document as present or missing
    pub fn set(&mut self, item: &str, present: bool) {
        self.0.insert(item.to_string(), present);
    }

    /// Whether a document is marked present
    pub fn is_present(&self, item: &str) -> bool {
        self.0.get(item).copied().unwrap_or(false)
    }

    /// Number of documents marked present
    pub fn complete_count(&self) -> usize {
        self.0.values().filter(|&&v| v).count()
    }

    /// Total number of tracked documents
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no documents are tracked at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate (document, present) pairs in stable order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A procurement record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier
    pub id: EntityId,

    /// Business key, format "{DIV}-{MMM}-{YY}-{NNN}"
    pub pr_number: String,

    /// What was procured
    pub description: String,

    /// Project the procurement belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Physical custody state
    #[serde(default)]
    pub status: RecordStatus,

    /// Procurement modality
    #[serde(default)]
    pub procurement_type: ProcurementType,

    /// End-user division
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<EntityId>,

    /// Physical location (shelf path or box path)
    pub location: Location,

    /// Date the file entered storage
    pub date_added: NaiveDate,

    /// Earliest disposal date (date_added + 5 years)
    pub disposal_date: NaiveDate,

    /// Supporting-document checklist
    #[serde(default)]
    pub checklist: Checklist,

    /// Approved budget for the contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abc_amount: Option<f64>,

    /// Winning bid amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_amount: Option<f64>,

    /// Who currently holds the file, when borrowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed_by: Option<String>,

    /// Borrower's division
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_division: Option<EntityId>,

    /// When the file was checked out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed_date: Option<NaiveDate>,

    /// When the file last came back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,

    /// 1-based position in the folder stack; only meaningful when archived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_number: Option<u32>,

    /// Outcome of the procurement process
    #[serde(default)]
    pub progress_status: ProgressStatus,

    /// Tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Audit: creator username
    pub created_by: String,

    /// Audit: creator display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by_name: String,

    /// Audit: last editor username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<String>,

    /// Audit: last editor display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_by_name: Option<String>,

    /// Audit: last edit timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last-write timestamp
    pub updated: DateTime<Utc>,
}

/// Retention period before a file may be disposed of
pub fn disposal_date_for(date_added: NaiveDate) -> NaiveDate {
    // Months::new(60) clamps Feb 29 to Feb 28 in non-leap target years
    date_added
        .checked_add_months(Months::new(60))
        .unwrap_or(date_added)
}

impl Entity for Record {
    const PREFIX: &'static str = "REC";
    const COLLECTION: &'static str = "records";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.pr_number
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.created_by
    }
}

impl Record {
    /// Create a new archived record at the given location
    pub fn new(
        pr_number: String,
        description: String,
        location: Location,
        date_added: NaiveDate,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityPrefix::Rec),
            pr_number,
            description,
            project_name: None,
            status: RecordStatus::Archived,
            procurement_type: ProcurementType::default(),
            division: None,
            location,
            date_added,
            disposal_date: disposal_date_for(date_added),
            checklist: Checklist::standard(),
            abc_amount: None,
            bid_amount: None,
            borrowed_by: None,
            borrower_division: None,
            borrowed_date: None,
            return_date: None,
            stack_number: None,
            progress_status: ProgressStatus::default(),
            tags: Vec::new(),
            notes: None,
            created_by: created_by.clone(),
            created_by_name: created_by,
            edited_by: None,
            edited_by_name: None,
            last_edited_at: None,
            created: now,
            updated: now,
        }
    }

    /// Stamp the audit fields for an edit by the given user
    pub fn touch(&mut self, editor: &str) {
        let now = Utc::now();
        self.edited_by = Some(editor.to_string());
        self.edited_by_name = Some(editor.to_string());
        self.last_edited_at = Some(now);
        self.updated = now;
    }

    /// Validate the record before any write
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.description.trim().is_empty() {
            return Err(RecordValidationError::EmptyDescription);
        }
        self.pr_number.parse::<PrNumber>()?;
        if let (Some(abc), Some(bid)) = (self.abc_amount, self.bid_amount) {
            if bid > abc {
                return Err(RecordValidationError::BidExceedsAbc { bid, abc });
            }
        }
        Ok(())
    }
}

/// Errors found when validating a record before submission
#[derive(Debug, Error)]
pub enum RecordValidationError {
    #[error("description must not be empty")]
    EmptyDescription,

    #[error("malformed PR number: {0}")]
    PrNumber(#[from] PrNumberError),

    #[error("bid amount {bid:.2} exceeds the ABC {abc:.2}")]
    BidExceedsAbc { bid: f64, abc: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_location() -> Location {
        Location::Shelf(ShelfPath {
            shelf: EntityId::new(EntityPrefix::Shf),
            cabinet: EntityId::new(EntityPrefix::Cab),
            folder: EntityId::new(EntityPrefix::Fld),
        })
    }

    fn sample_record() -> Record {
        Record::new(
            "IT-JAN-24-001".to_string(),
            "Desktop computers".to_string(),
            sample_location(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "clerk".to_string(),
        )
    }

    #[test]
    fn test_record_roundtrip() {
        let rec = sample_record();
        let yaml = serde_yml::to_string(&rec).unwrap();
        let parsed: Record = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(rec.id, parsed.id);
        assert_eq!(rec.location, parsed.location);
        assert_eq!(parsed.status, RecordStatus::Archived);
    }

    #[test]
    fn test_box_location_roundtrip() {
        let mut rec = sample_record();
        let box_id = EntityId::new(EntityPrefix::Box);
        let folder = EntityId::new(EntityPrefix::Fld);
        rec.location = Location::Box(BoxPath {
            storage_box: box_id.clone(),
            folder: folder.clone(),
        });
        let yaml = serde_yml::to_string(&rec).unwrap();
        let parsed: Record = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.location.storage_box(), Some(&box_id));
        assert_eq!(parsed.location.folder(), &folder);
    }

    #[test]
    fn test_disposal_date_is_five_years_out() {
        let added = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            disposal_date_for(added),
            NaiveDate::from_ymd_opt(2029, 3, 10).unwrap()
        );
        // Leap-day clamp
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            disposal_date_for(leap),
            NaiveDate::from_ymd_opt(2029, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_validate_rejects_bid_over_abc() {
        let mut rec = sample_record();
        rec.abc_amount = Some(100_000.0);
        rec.bid_amount = Some(120_000.0);
        assert!(matches!(
            rec.validate(),
            Err(RecordValidationError::BidExceedsAbc { .. })
        ));

        rec.bid_amount = Some(95_000.0);
        assert!(rec.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_pr_number() {
        let mut rec = sample_record();
        rec.pr_number = "IT-JAN-24".to_string();
        assert!(matches!(
            rec.validate(),
            Err(RecordValidationError::PrNumber(_))
        ));
    }

    #[test]
    fn test_standard_checklist_has_all_documents() {
        let checklist = Checklist::standard();
        assert_eq!(checklist.len(), 22);
        assert_eq!(checklist.complete_count(), 0);
        assert!(!checklist.is_present("Purchase Request"));
    }
}
