use waybill_types::{IndexKey, MessageId};

/// Wire type tag of indexation (tagged data) payloads.
pub const INDEXATION_PAYLOAD_TYPE: u32 = 2;

/// Payload carried by a ledger message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Generic tagged data; the only kind audit records are written as.
    Indexation { index: IndexKey, data: Vec<u8> },
    /// Any other payload kind (transactions, milestones, ...).
    Other { kind: u32 },
}

impl Payload {
    pub fn kind(&self) -> u32 {
        match self {
            Self::Indexation { .. } => INDEXATION_PAYLOAD_TYPE,
            Self::Other { kind } => *kind,
        }
    }

    pub fn is_indexation(&self) -> bool {
        matches!(self, Self::Indexation { .. })
    }
}

/// One message as fetched from the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerRecord {
    pub id: MessageId,
    pub payload: Option<Payload>,
}

impl LedgerRecord {
    /// The indexation data, if this record carries any.
    pub fn indexation_data(&self) -> Option<&[u8]> {
        match &self.payload {
            Some(Payload::Indexation { data, .. }) => Some(data),
            _ => None,
        }
    }
}
