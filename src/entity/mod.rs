//! Entity module - records of the organization structure
//!
//! Flat, immutable records; trees and graphs are derived from them on demand.

pub mod division;
pub mod functional_relation;
pub mod organization;
pub mod staff;

pub use division::Division;
pub use functional_relation::{FunctionalRelation, RelationKind};
pub use organization::{OrgType, Organization};
pub use staff::Staff;
