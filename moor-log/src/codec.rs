use moor_types::constants::{
    MAX_NOTARIES, MAX_OPRETURN_PAYLOAD, MAX_PRICE_SAMPLES, RECORD_HEADER_LEN,
};
use moor_types::event::{
    Deprecated, Event, EventBody, KmdHeight, Notarized, OpReturn, PriceFeed, PubkeySet,
};

use crate::cursor::Cursor;
use crate::error::CodecError;

/// The wire-level record tags.
///
/// This table is permanently binary-stable: a new record type gets a new
/// tag, never a reinterpretation of an existing tag's payload. Tags map
/// onto the logical [`EventBody`] variants — two tags per variant where a
/// legacy shape and an extended shape coexist (`N`/`M`, `K`/`T`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    /// `P`: notary pubkey set replacement.
    Pubkeys,
    /// `N`: notarization, plain shape.
    Notarized,
    /// `M`: notarization with MoM extension.
    NotarizedMom,
    /// `U`: deprecated historical record.
    Deprecated,
    /// `K`: root-chain height checkpoint, plain shape.
    KmdHeight,
    /// `T`: root-chain height checkpoint with timestamp.
    KmdHeightTimed,
    /// `R`: opreturn record.
    OpReturn,
    /// `V`: price-feed samples.
    PriceFeed,
}

impl RecordTag {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'P' => Some(Self::Pubkeys),
            b'N' => Some(Self::Notarized),
            b'M' => Some(Self::NotarizedMom),
            b'U' => Some(Self::Deprecated),
            b'K' => Some(Self::KmdHeight),
            b'T' => Some(Self::KmdHeightTimed),
            b'R' => Some(Self::OpReturn),
            b'V' => Some(Self::PriceFeed),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Pubkeys => b'P',
            Self::Notarized => b'N',
            Self::NotarizedMom => b'M',
            Self::Deprecated => b'U',
            Self::KmdHeight => b'K',
            Self::KmdHeightTimed => b'T',
            Self::OpReturn => b'R',
            Self::PriceFeed => b'V',
        }
    }
}

/// Decode one record at the cursor.
///
/// Wire layout: 1-byte tag, 4-byte LE height, tag-specific payload. A
/// cursor sitting exactly on a record boundary with nothing left yields
/// [`CodecError::EndOfStream`]; any shortfall inside a record yields
/// `Truncated`. Declared lengths are checked against their protocol caps
/// before any allocation.
pub fn decode_record(cursor: &mut Cursor) -> Result<Event, CodecError> {
    if cursor.remaining() == 0 {
        return Err(CodecError::EndOfStream);
    }
    let offset = cursor.position();
    let tag_byte = cursor.read_u8()?;
    let tag = RecordTag::from_byte(tag_byte).ok_or(CodecError::UnknownTag {
        tag: tag_byte,
        offset,
    })?;
    let height = cursor.read_u32_le()?;

    let body = match tag {
        RecordTag::Pubkeys => {
            let count = cursor.read_u8()? as usize;
            if count > MAX_NOTARIES {
                return Err(CodecError::LimitExceeded {
                    what: "notary key set",
                    got: count,
                    cap: MAX_NOTARIES,
                    offset,
                });
            }
            let mut pubkeys = Vec::with_capacity(count);
            for _ in 0..count {
                pubkeys.push(cursor.read_array::<33>()?);
            }
            EventBody::PubkeySet(PubkeySet { pubkeys })
        }
        RecordTag::Notarized => EventBody::Notarized(Notarized {
            notarized_height: cursor.read_u32_le()?,
            notarized_hash: cursor.read_array::<32>()?,
            dest_txid: cursor.read_array::<32>()?,
            mom: None,
            mom_depth: None,
        }),
        RecordTag::NotarizedMom => EventBody::Notarized(Notarized {
            notarized_height: cursor.read_u32_le()?,
            notarized_hash: cursor.read_array::<32>()?,
            dest_txid: cursor.read_array::<32>()?,
            mom: Some(cursor.read_array::<32>()?),
            mom_depth: Some(cursor.read_u32_le()?),
        }),
        RecordTag::Deprecated => EventBody::Deprecated(Deprecated {
            n: cursor.read_u8()?,
            nid: cursor.read_u8()?,
            mask: cursor.read_array::<8>()?,
            hash: cursor.read_array::<32>()?,
        }),
        RecordTag::KmdHeight => EventBody::KmdHeight(KmdHeight {
            kmd_height: cursor.read_u32_le()?,
            timestamp: None,
        }),
        RecordTag::KmdHeightTimed => EventBody::KmdHeight(KmdHeight {
            kmd_height: cursor.read_u32_le()?,
            timestamp: Some(cursor.read_u32_le()?),
        }),
        RecordTag::OpReturn => {
            let txid = cursor.read_array::<32>()?;
            let vout = cursor.read_u16_le()?;
            let value = cursor.read_u64_le()?;
            let len = cursor.read_u16_le()? as usize;
            if len > MAX_OPRETURN_PAYLOAD {
                return Err(CodecError::LimitExceeded {
                    what: "opreturn payload",
                    got: len,
                    cap: MAX_OPRETURN_PAYLOAD,
                    offset,
                });
            }
            let payload = cursor.read_bytes(len)?.to_vec();
            EventBody::OpReturn(OpReturn {
                txid,
                vout,
                value,
                payload,
            })
        }
        RecordTag::PriceFeed => {
            let count = cursor.read_u8()? as usize;
            let mut samples = Vec::with_capacity(count);
            for _ in 0..count {
                samples.push(cursor.read_u32_le()?);
            }
            EventBody::PriceFeed(PriceFeed { samples })
        }
    };

    Ok(Event { height, body })
}

/// Encode one record, appending to `out`.
///
/// Exact inverse of [`decode_record`]: a `Notarized` with MoM fields
/// encodes as `M` and without as `N`; a `KmdHeight` with a timestamp as
/// `T` and without as `K`; `Deprecated` reproduces its retained bytes.
/// Decode-then-encode is byte-identical.
pub fn encode_record(event: &Event, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let offset = out.len();
    match &event.body {
        EventBody::PubkeySet(set) => {
            if set.pubkeys.len() > MAX_NOTARIES {
                return Err(CodecError::LimitExceeded {
                    what: "notary key set",
                    got: set.pubkeys.len(),
                    cap: MAX_NOTARIES,
                    offset,
                });
            }
            push_header(out, RecordTag::Pubkeys, event.height);
            out.push(set.pubkeys.len() as u8);
            for key in &set.pubkeys {
                out.extend_from_slice(key);
            }
        }
        EventBody::Notarized(n) => match (&n.mom, n.mom_depth) {
            (Some(mom), Some(depth)) => {
                push_header(out, RecordTag::NotarizedMom, event.height);
                out.extend_from_slice(&n.notarized_height.to_le_bytes());
                out.extend_from_slice(&n.notarized_hash);
                out.extend_from_slice(&n.dest_txid);
                out.extend_from_slice(mom);
                out.extend_from_slice(&depth.to_le_bytes());
            }
            (None, None) => {
                push_header(out, RecordTag::Notarized, event.height);
                out.extend_from_slice(&n.notarized_height.to_le_bytes());
                out.extend_from_slice(&n.notarized_hash);
                out.extend_from_slice(&n.dest_txid);
            }
            _ => {
                return Err(CodecError::Unencodable {
                    reason: "notarization must carry both MoM fields or neither",
                })
            }
        },
        EventBody::KmdHeight(k) => match k.timestamp {
            Some(timestamp) => {
                push_header(out, RecordTag::KmdHeightTimed, event.height);
                out.extend_from_slice(&k.kmd_height.to_le_bytes());
                out.extend_from_slice(&timestamp.to_le_bytes());
            }
            None => {
                push_header(out, RecordTag::KmdHeight, event.height);
                out.extend_from_slice(&k.kmd_height.to_le_bytes());
            }
        },
        EventBody::OpReturn(r) => {
            if r.payload.len() > MAX_OPRETURN_PAYLOAD {
                return Err(CodecError::LimitExceeded {
                    what: "opreturn payload",
                    got: r.payload.len(),
                    cap: MAX_OPRETURN_PAYLOAD,
                    offset,
                });
            }
            push_header(out, RecordTag::OpReturn, event.height);
            out.extend_from_slice(&r.txid);
            out.extend_from_slice(&r.vout.to_le_bytes());
            out.extend_from_slice(&r.value.to_le_bytes());
            out.extend_from_slice(&(r.payload.len() as u16).to_le_bytes());
            out.extend_from_slice(&r.payload);
        }
        EventBody::PriceFeed(feed) => {
            if feed.samples.len() > MAX_PRICE_SAMPLES {
                return Err(CodecError::LimitExceeded {
                    what: "price samples",
                    got: feed.samples.len(),
                    cap: MAX_PRICE_SAMPLES,
                    offset,
                });
            }
            push_header(out, RecordTag::PriceFeed, event.height);
            out.push(feed.samples.len() as u8);
            for sample in &feed.samples {
                out.extend_from_slice(&sample.to_le_bytes());
            }
        }
        EventBody::Deprecated(d) => {
            push_header(out, RecordTag::Deprecated, event.height);
            out.push(d.n);
            out.push(d.nid);
            out.extend_from_slice(&d.mask);
            out.extend_from_slice(&d.hash);
        }
    }
    Ok(())
}

fn push_header(out: &mut Vec<u8>, tag: RecordTag, height: u32) {
    out.push(tag.as_byte());
    out.extend_from_slice(&height.to_le_bytes());
}
