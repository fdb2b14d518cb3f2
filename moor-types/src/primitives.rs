/// 32-byte BLAKE3 hash.
pub type Hash = [u8; 32];

/// 32-byte transaction id.
pub type Txid = [u8; 32];

/// 33-byte compressed secp256k1 public key as carried in notary records.
///
/// Opaque bytes to this layer — script and signature interpretation happen
/// in the node's validation pipeline, not here.
pub type NotaryPubkey = [u8; 33];

/// Block height on a chain.
pub type Height = u32;

/// Ticker symbol identifying a chain ("KMD", "TXSCLPOD", ...).
pub type ChainSymbol = String;

/// Category id (CCid) grouping chains whose MoMs are combined into one MoMoM.
pub type CategoryId = u16;

/// Serde helper for [u8; 33] fields.
pub mod serde_pubkey {
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &[u8; 33], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize as a byte slice
        value.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 33], D::Error>
    where
        D: Deserializer<'de>,
    {
        let v: Vec<u8> = Vec::deserialize(deserializer)?;
        v.try_into()
            .map_err(|_| serde::de::Error::custom("expected 33 bytes for pubkey"))
    }
}

/// Serde helper for Vec<[u8; 33]> fields (notary key sets).
pub mod serde_pubkey_vec {
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &[[u8; 33]], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let byte_vecs: Vec<&[u8]> = value.iter().map(|k| k.as_slice()).collect();
        byte_vecs.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<[u8; 33]>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let vecs: Vec<Vec<u8>> = Vec::deserialize(deserializer)?;
        vecs.into_iter()
            .map(|v| {
                v.try_into()
                    .map_err(|_| serde::de::Error::custom("expected 33 bytes for pubkey"))
            })
            .collect()
    }
}
