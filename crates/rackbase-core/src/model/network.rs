//! IP address ownership records

use super::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// One IP address and its current owner
///
/// At most one record exists per address; the owner is optional so an
/// address can be released without deleting the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRecord {
    pub address: IpAddr,

    /// Owning base object, `None` when unassigned
    pub base_object: Option<ObjectId>,

    pub created_at: DateTime<Utc>,
}

impl IpRecord {
    pub fn new(address: IpAddr, base_object: Option<ObjectId>) -> Self {
        Self {
            address,
            base_object,
            created_at: Utc::now(),
        }
    }
}
