// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod admin;
mod batch;
mod decryption;
mod ledger_error;
mod shutdown;

pub use admin::*;
pub use batch::*;
pub use decryption::*;
pub use ledger_error::*;
pub use shutdown::*;

use crate::{BatchId, ErrorEvent, Event, EventId};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for LedgerEvent {
                fn from(data: $variant) -> Self {
                    LedgerEvent::$variant {
                        id: EventId::hash(&data),
                        data,
                    }
                }
            }
        )*
    };
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub enum LedgerEvent {
    BatchOpened {
        id: EventId,
        data: BatchOpened,
    },
    BatchClosed {
        id: EventId,
        data: BatchClosed,
    },
    DonationSubmitted {
        id: EventId,
        data: DonationSubmitted,
    },
    DecryptionRequested {
        id: EventId,
        data: DecryptionRequested,
    },
    DecryptionCompleted {
        id: EventId,
        data: DecryptionCompleted,
    },
    PauseChanged {
        id: EventId,
        data: PauseChanged,
    },
    CooldownChanged {
        id: EventId,
        data: CooldownChanged,
    },
    OwnershipTransferred {
        id: EventId,
        data: OwnershipTransferred,
    },
    ProviderAdded {
        id: EventId,
        data: ProviderAdded,
    },
    ProviderRemoved {
        id: EventId,
        data: ProviderRemoved,
    },
    LedgerError {
        id: EventId,
        data: LedgerError,
    },
    Shutdown {
        id: EventId,
        data: Shutdown,
    },
    /// This is a test event to use in testing
    TestEvent {
        id: EventId,
        data: TestEvent,
    },
}

impl LedgerEvent {
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn get_id(&self) -> EventId {
        match self {
            LedgerEvent::BatchOpened { id, .. } => id.clone(),
            LedgerEvent::BatchClosed { id, .. } => id.clone(),
            LedgerEvent::DonationSubmitted { id, .. } => id.clone(),
            LedgerEvent::DecryptionRequested { id, .. } => id.clone(),
            LedgerEvent::DecryptionCompleted { id, .. } => id.clone(),
            LedgerEvent::PauseChanged { id, .. } => id.clone(),
            LedgerEvent::CooldownChanged { id, .. } => id.clone(),
            LedgerEvent::OwnershipTransferred { id, .. } => id.clone(),
            LedgerEvent::ProviderAdded { id, .. } => id.clone(),
            LedgerEvent::ProviderRemoved { id, .. } => id.clone(),
            LedgerEvent::LedgerError { id, .. } => id.clone(),
            LedgerEvent::Shutdown { id, .. } => id.clone(),
            LedgerEvent::TestEvent { id, .. } => id.clone(),
        }
    }

    /// Batch the event refers to, used by observers correlating campaign records.
    pub fn get_batch_id(&self) -> Option<BatchId> {
        match self {
            LedgerEvent::BatchOpened { data, .. } => Some(data.batch_id),
            LedgerEvent::BatchClosed { data, .. } => Some(data.batch_id),
            LedgerEvent::DonationSubmitted { data, .. } => Some(data.batch_id),
            LedgerEvent::DecryptionRequested { data, .. } => Some(data.batch_id),
            LedgerEvent::DecryptionCompleted { data, .. } => Some(data.batch_id),
            _ => None,
        }
    }

    pub fn get_data(&self) -> String {
        match self {
            LedgerEvent::BatchOpened { data, .. } => format!("{}", data),
            LedgerEvent::BatchClosed { data, .. } => format!("{}", data),
            LedgerEvent::DonationSubmitted { data, .. } => format!("{}", data),
            LedgerEvent::DecryptionRequested { data, .. } => format!("{}", data),
            LedgerEvent::DecryptionCompleted { data, .. } => format!("{}", data),
            LedgerEvent::PauseChanged { data, .. } => format!("{}", data),
            LedgerEvent::CooldownChanged { data, .. } => format!("{}", data),
            LedgerEvent::OwnershipTransferred { data, .. } => format!("{}", data),
            LedgerEvent::ProviderAdded { data, .. } => format!("{}", data),
            LedgerEvent::ProviderRemoved { data, .. } => format!("{}", data),
            LedgerEvent::LedgerError { data, .. } => format!("{}", data),
            LedgerEvent::Shutdown { data, .. } => format!("{}", data),
            LedgerEvent::TestEvent { data, .. } => format!("{}", data),
        }
    }
}

impl Event for LedgerEvent {
    type Id = EventId;

    fn event_type(&self) -> String {
        let s = format!("{:?}", self);
        extract_event_name(&s).to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.get_id()
    }
}

impl ErrorEvent for LedgerEvent {
    type Error = LedgerError;
    type ErrorType = LedgerErrorType;

    fn as_error(&self) -> Option<&Self::Error> {
        match self {
            LedgerEvent::LedgerError { data, .. } => Some(data),
            _ => None,
        }
    }

    fn from_error(err_type: Self::ErrorType, error: impl Into<anyhow::Error>) -> Self {
        LedgerEvent::from(LedgerError::from_error(err_type, error))
    }
}

impl_from_event!(
    BatchOpened,
    BatchClosed,
    DonationSubmitted,
    DecryptionRequested,
    DecryptionCompleted,
    PauseChanged,
    CooldownChanged,
    OwnershipTransferred,
    ProviderAdded,
    ProviderRemoved,
    LedgerError,
    Shutdown,
    TestEvent
);

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.event_type(), self.get_data())
    }
}

fn extract_event_name(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &item) in bytes.iter().enumerate() {
        if item == b' ' || item == b'(' || item == b'{' {
            return &s[..i];
        }
    }
    s
}
