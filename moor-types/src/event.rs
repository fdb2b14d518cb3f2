use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::primitives::*;

/// A single decoded record from a per-chain event log.
///
/// `height` is the chain height at which the record was written. The wire
/// tag that produced the record is not part of the in-memory type — legacy
/// tag pairs (`N`/`M`, `K`/`T`) decode to one logical variant each, and the
/// tag table lives with the codec.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Event {
    /// Chain height at which this record was written.
    pub height: Height,
    /// The typed payload.
    pub body: EventBody,
}

/// The closed set of logical record types.
///
/// Adding a record type is a compile-time-checked variant addition here plus
/// a new wire tag in the codec — never a reinterpretation of an existing tag.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum EventBody {
    /// Wholesale replacement of the chain's notary key set.
    PubkeySet(PubkeySet),
    /// A notarization of this chain into the root chain, with or without
    /// MoM extension fields.
    Notarized(Notarized),
    /// A root-chain height checkpoint, with or without a timestamp.
    KmdHeight(KmdHeight),
    /// An opreturn payload retained for downstream contract logic.
    OpReturn(OpReturn),
    /// A batch of price-feed samples retained for downstream contract logic.
    PriceFeed(PriceFeed),
    /// A historical record shape. Parsed to keep stream offsets exact,
    /// never folded into state.
    Deprecated(Deprecated),
}

/// Replacement notary key set, at most [`crate::constants::MAX_NOTARIES`] keys.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct PubkeySet {
    /// Ordered 33-byte compressed public keys.
    #[serde(with = "crate::primitives::serde_pubkey_vec")]
    pub pubkeys: Vec<NotaryPubkey>,
}

/// A notarization record.
///
/// The MoM fields are `Some` when the record was written in the
/// MoM-extended wire shape and `None` for the plain shape; both shapes are
/// the same logical event.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Notarized {
    /// The asset-chain height being attested.
    pub notarized_height: Height,
    /// Block hash at `notarized_height`.
    pub notarized_hash: Hash,
    /// Txid of the notarization transaction on the destination chain.
    pub dest_txid: Txid,
    /// Merkle root over the notarized block span, if recorded.
    pub mom: Option<Hash>,
    /// Number of leaves under `mom`, if recorded.
    pub mom_depth: Option<u32>,
}

/// A root-chain height checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct KmdHeight {
    /// Root-chain height observed at this record's own height.
    pub kmd_height: Height,
    /// Unix timestamp, present only for the timestamped wire shape.
    pub timestamp: Option<u32>,
}

/// An opreturn output retained for contract logic built atop this state.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct OpReturn {
    /// Txid of the carrying transaction.
    pub txid: Txid,
    /// Output index of the opreturn within the transaction.
    pub vout: u16,
    /// Output value in satoshis.
    pub value: u64,
    /// Raw opreturn payload, at most
    /// [`crate::constants::MAX_OPRETURN_PAYLOAD`] bytes.
    pub payload: Vec<u8>,
}

/// A batch of price-feed samples.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct PriceFeed {
    /// Ordered samples, at most [`crate::constants::MAX_PRICE_SAMPLES`].
    pub samples: Vec<u32>,
}

/// The historical "U" record.
///
/// All fields are retained so re-encoding reproduces the original bytes,
/// but folding skips this variant entirely.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Deprecated {
    pub n: u8,
    pub nid: u8,
    pub mask: [u8; 8],
    pub hash: Hash,
}

impl Event {
    /// Whether folding this event mutates chain state.
    pub fn is_folded(&self) -> bool {
        !matches!(self.body, EventBody::Deprecated(_))
    }
}
