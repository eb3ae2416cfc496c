//! Type-prefixed ULID identifiers
//!
//! Every entity id is `"{PREFIX}-{ULID}"`, e.g. `REC-01HQ3K4N5M6P7R8S9T0UVWXY`.
//! The prefix makes a raw id string self-describing in listings, exports,
//! and YAML documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityPrefix {
    /// Shelf (top storage tier)
    Shf,
    /// Cabinet (second storage tier, under a shelf)
    Cab,
    /// Folder (third storage tier, under a cabinet or a box)
    Fld,
    /// Box (alternate tier holding folders directly)
    Box,
    /// End-user division
    Div,
    /// Procurement record
    Rec,
}

const PREFIX_TABLE: [(EntityPrefix, &str); 6] = [
    (EntityPrefix::Shf, "SHF"),
    (EntityPrefix::Cab, "CAB"),
    (EntityPrefix::Fld, "FLD"),
    (EntityPrefix::Box, "BOX"),
    (EntityPrefix::Div, "DIV"),
    (EntityPrefix::Rec, "REC"),
];

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        PREFIX_TABLE
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, s)| *s)
            .unwrap_or("???")
    }

    pub fn all() -> impl Iterator<Item = EntityPrefix> {
        PREFIX_TABLE.iter().map(|(p, _)| *p)
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        PREFIX_TABLE
            .iter()
            .find(|(_, tag)| *tag == upper)
            .map(|(p, _)| *p)
            .ok_or_else(|| IdParseError::InvalidPrefix(s.to_string()))
    }
}

/// A unique entity identifier: type prefix plus ULID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    prefix: EntityPrefix,
    ulid: Ulid,
}

impl EntityId {
    /// Mint a fresh id for the given entity type
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    pub fn prefix(&self) -> EntityPrefix {
        self.prefix
    }

    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse an id from its string form
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, tail) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;
        Ok(Self {
            prefix: head.parse()?,
            ulid: Ulid::from_string(tail)
                .map_err(|e| IdParseError::InvalidUlid(tail.to_string(), e.to_string()))?,
        })
    }
}

impl TryFrom<String> for EntityId {
    type Error = IdParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.to_string()
    }
}

/// Errors that can occur when parsing entity IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid entity prefix: '{0}' (valid: SHF, CAB, FLD, BOX, DIV, REC)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in entity ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id = EntityId::new(EntityPrefix::Rec);
        assert!(id.to_string().starts_with("REC-"));
        assert_eq!(id.to_string().len(), 30); // REC- (4) + ULID (26) = 30
    }

    #[test]
    fn test_entity_id_roundtrip() {
        let original = EntityId::new(EntityPrefix::Fld);
        let parsed = EntityId::parse(&original.to_string()).unwrap();
        assert_eq!(parsed.prefix(), EntityPrefix::Fld);
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_entity_id_invalid_prefix() {
        let err = EntityId::parse("XXX-01HQ3K4N5M6P7R8S9T0UVWXYZ").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidPrefix(_)));
    }

    #[test]
    fn test_entity_id_missing_delimiter() {
        let err = EntityId::parse("REC01HQ3K4N5M6P7R8S9T0UVWXYZ").unwrap_err();
        assert!(matches!(err, IdParseError::MissingDelimiter(_)));
    }

    #[test]
    fn test_entity_id_invalid_ulid() {
        let err = EntityId::parse("REC-notaulid").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidUlid(_, _)));
    }

    #[test]
    fn test_all_prefixes_parse() {
        for prefix in EntityPrefix::all() {
            let id = EntityId::new(prefix);
            let parsed = EntityId::parse(&id.to_string()).unwrap();
            assert_eq!(parsed.prefix(), prefix);
        }
    }
}
