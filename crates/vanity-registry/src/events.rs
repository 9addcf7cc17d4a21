//! Notifications emitted by successful operations

use std::fmt;

use serde::{Deserialize, Serialize};
use vanity_crypto::{Address, NameHash, NameKey};

use crate::types::{BlockHeight, Timestamp};

/// Registry notifications, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    NameCommitted {
        name_hash: NameHash,
        block_height: BlockHeight,
    },
    NameRegistered {
        owner: Address,
        name: NameKey,
        timestamp: Timestamp,
    },
    NameRenewed {
        owner: Address,
        name: NameKey,
        timestamp: Timestamp,
    },
}

impl RegistryEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::NameCommitted { .. } => "NameCommitted",
            RegistryEvent::NameRegistered { .. } => "NameRegistered",
            RegistryEvent::NameRenewed { .. } => "NameRenewed",
        }
    }
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::NameCommitted { name_hash, block_height } => {
                write!(f, "NameCommitted({}, {})", name_hash, block_height)
            }
            RegistryEvent::NameRegistered { owner, name, timestamp } => {
                write!(f, "NameRegistered({}, {}, {})", owner, name, timestamp)
            }
            RegistryEvent::NameRenewed { owner, name, timestamp } => {
                write!(f, "NameRenewed({}, {}, {})", owner, name, timestamp)
            }
        }
    }
}
