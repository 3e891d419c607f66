//! Archive layout.
//!
//! Products are filed under a root directory, optionally partitioned by
//! acquisition date (`root/YYYY/MM/DD`). The acquisition date comes from the
//! product identifier, read with a per-mission rule.

mod error;
mod mission;
mod resolver;

pub use error::ResolveError;
pub use mission::{
    AcquisitionTimeRule, MissionRules, Sentinel1Rule, Sentinel2Rule, Sentinel3Rule,
    IDENTIFIER_TIME_FORMAT,
};
pub use resolver::{ArchiveResolver, ArchiveTarget};
