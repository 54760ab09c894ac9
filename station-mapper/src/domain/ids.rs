//! Entity identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a station in the registry.
///
/// Identifiers are allocated once and never reused, so a stale id can only
/// ever miss, never alias a different station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(u64);

impl StationId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station#{}", self.0)
    }
}

/// The two kinds of station dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependentKind {
    Employee,
    Carrier,
}

impl DependentKind {
    pub const ALL: [DependentKind; 2] = [DependentKind::Employee, DependentKind::Carrier];

    /// Tag shown in front of the name on map labels.
    pub fn tag(self) -> &'static str {
        match self {
            DependentKind::Employee => "Employee",
            DependentKind::Carrier => "Carrier",
        }
    }

    /// Human name of the kind-specific attribute.
    pub fn attribute_label(self) -> &'static str {
        match self {
            DependentKind::Employee => "position",
            DependentKind::Carrier => "fleet type",
        }
    }
}

impl fmt::Display for DependentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependentKind::Employee => f.write_str("employee"),
            DependentKind::Carrier => f.write_str("carrier"),
        }
    }
}

/// Key of an employee or carrier. The kind is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependentId {
    kind: DependentKind,
    seq: u64,
}

impl DependentId {
    pub fn new(kind: DependentKind, seq: u64) -> Self {
        Self { kind, seq }
    }

    pub fn kind(self) -> DependentKind {
        self.kind
    }

    pub fn seq(self) -> u64 {
        self.seq
    }
}

impl fmt::Display for DependentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.seq)
    }
}

/// Anything that can carry a marker. Bound to every marker as its click target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum EntityRef {
    Station(StationId),
    Dependent(DependentId),
}

impl From<StationId> for EntityRef {
    fn from(id: StationId) -> Self {
        EntityRef::Station(id)
    }
}

impl From<DependentId> for EntityRef {
    fn from(id: DependentId) -> Self {
        EntityRef::Dependent(id)
    }
}
