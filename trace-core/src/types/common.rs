//! Shared Traceability Types
//!
//! Naming conventions:
//! - `_id` suffix: Primary key identifiers
//! - `_ref` suffix: References held against an external system
//! - weights are kilograms carried as `Decimal`

use crate::error::{TraceError, TraceResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================
// ID Types (newtype pattern, non-interchangeable)
// ============================================================

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh id with the kind prefix
            pub fn generate() -> Self {
                Self(format!("{}:{}", $prefix, uuid::Uuid::new_v4()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Farm ID
    FarmId, "farm"
);
string_id!(
    /// Harvest ID
    HarvestId, "harvest"
);
string_id!(
    /// Batch ID
    BatchId, "batch"
);
string_id!(
    /// Lot ID
    LotId, "lot"
);
string_id!(
    /// Consignment ID
    ConsignmentId, "consignment"
);
string_id!(
    /// User ID (any role)
    UserId, "user"
);

// ============================================================
// Roles
// ============================================================

/// Closed set of platform roles.
///
/// "admin" is accepted as an alias of the extension worker role; the
/// original product used the two names interchangeably.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Farmer,
    Processor,
    Exporter,
    #[serde(alias = "admin")]
    ExtensionWorker,
    Regulator,
}

impl Role {
    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Processor => "processor",
            Role::Exporter => "exporter",
            Role::ExtensionWorker => "extension_worker",
            Role::Regulator => "regulator",
        }
    }

    /// Parse a role name, failing closed on anything outside the set
    pub fn parse(name: &str) -> TraceResult<Self> {
        match name {
            "farmer" => Ok(Role::Farmer),
            "processor" => Ok(Role::Processor),
            "exporter" => Ok(Role::Exporter),
            "extension_worker" | "extension-worker" | "admin" => Ok(Role::ExtensionWorker),
            "regulator" => Ok(Role::Regulator),
            other => Err(TraceError::unknown_role(other)),
        }
    }

    /// All roles in the closed set
    pub fn all() -> [Role; 5] {
        [
            Role::Farmer,
            Role::Processor,
            Role::Exporter,
            Role::ExtensionWorker,
            Role::Regulator,
        ]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

// ============================================================
// Entity Kinds
// ============================================================

/// The five traceable entity kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Farm,
    Harvest,
    Batch,
    Lot,
    Consignment,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Farm => "farm",
            EntityKind::Harvest => "harvest",
            EntityKind::Batch => "batch",
            EntityKind::Lot => "lot",
            EntityKind::Consignment => "consignment",
        }
    }

    /// Parse a kind name; `None` for anything unrecognized so callers can
    /// fail closed under schema drift
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "farm" => Some(EntityKind::Farm),
            "harvest" => Some(EntityKind::Harvest),
            "batch" => Some(EntityKind::Batch),
            "lot" => Some(EntityKind::Lot),
            "consignment" => Some(EntityKind::Consignment),
            _ => None,
        }
    }

    pub fn all() -> [EntityKind; 5] {
        [
            EntityKind::Farm,
            EntityKind::Harvest,
            EntityKind::Batch,
            EntityKind::Lot,
            EntityKind::Consignment,
        ]
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================
// Geolocation
// ============================================================

/// A WGS84 coordinate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Farm geometry: a single point or a polygon ring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeoShape {
    Point { point: GeoPoint },
    Polygon { ring: Vec<GeoPoint> },
}

// ============================================================
// Blockchain Anchors
// ============================================================

/// Status of an on-chain anchoring transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorStatus {
    Pending,
    Confirmed,
    Failed,
}

impl AnchorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorStatus::Pending => "pending",
            AnchorStatus::Confirmed => "confirmed",
            AnchorStatus::Failed => "failed",
        }
    }
}

/// Reference to an external blockchain transaction.
///
/// A batch carries two of these, anchored independently: one written at
/// farmer submission, one at processor confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAnchor {
    /// Transaction reference on the external chain
    pub tx_ref: String,
    /// Anchoring status
    pub status: AnchorStatus,
}

impl ChainAnchor {
    pub fn pending(tx_ref: impl Into<String>) -> Self {
        Self {
            tx_ref: tx_ref.into(),
            status: AnchorStatus::Pending,
        }
    }

    pub fn confirm(&mut self) {
        self.status = AnchorStatus::Confirmed;
    }
}

// ============================================================
// Weights
// ============================================================

/// Weight in kilograms
pub type WeightKg = Decimal;
