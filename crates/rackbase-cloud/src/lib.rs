//! Rackbase cloud inventory
//!
//! Cloud-side asset records layered on the `rackbase-core` base-object
//! store: providers, instance-type flavors with derived resource
//! accessors, projects with child-host tag reconciliation, provisioned
//! hosts with IP set reconciliation, and the thin database/VIP/virtual
//! server existence records.
//!
//! All entity tables live in one [`CloudInventory`] aggregate; each
//! entity module contributes its operations as an `impl CloudInventory`
//! block.

pub mod error;
pub mod flavor;
pub mod host;
pub mod inventory;
pub mod project;
pub mod provider;
pub mod records;

// Re-exports
pub use error::{CloudError, Result};
pub use flavor::CloudFlavor;
pub use host::{CloudHost, IpSyncReport, NewCloudHost};
pub use inventory::CloudInventory;
pub use project::CloudProject;
pub use provider::{CloudProvider, ProviderId};
pub use records::{Database, Vip, VirtualServer};
