use moor_types::event::Event;

use crate::codec::decode_record;
use crate::cursor::Cursor;
use crate::error::CodecError;

/// Outcome of replaying a log byte stream.
///
/// `offset` is the byte position just past the last fully decoded record —
/// the resume point for incremental replay once more bytes arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// Decoded events, in log order.
    pub events: Vec<Event>,
    /// Number of records consumed.
    pub records: usize,
    /// Byte offset of the last good record boundary.
    pub offset: usize,
    /// Why replay stopped short of the stream end, if it did.
    pub stopped: Option<CodecError>,
}

impl Replay {
    /// Whether the whole stream decoded cleanly.
    pub fn is_complete(&self) -> bool {
        self.stopped.is_none()
    }
}

/// Replay a log stream from the start.
pub fn replay(bytes: &[u8]) -> Replay {
    resume(bytes, 0)
}

/// Resume replay at a previously returned [`Replay::offset`].
///
/// Records before `from` are not re-decoded; records appended after a prior
/// pass are picked up. A corrupt or still-being-written tail stops the pass
/// at the last good boundary with everything decoded so far intact — the
/// caller retries from `offset` once more bytes are available.
pub fn resume(bytes: &[u8], from: usize) -> Replay {
    let mut cursor = Cursor::at(bytes, from);
    let mut events = Vec::new();
    let mut records = 0;
    let mut offset = cursor.position();

    loop {
        match decode_record(&mut cursor) {
            Ok(event) => {
                events.push(event);
                records += 1;
                offset = cursor.position();
            }
            Err(CodecError::EndOfStream) => {
                return Replay {
                    events,
                    records,
                    offset,
                    stopped: None,
                };
            }
            Err(err) => {
                tracing::warn!(
                    offset,
                    records,
                    error = %err,
                    "event log replay stopped before end of stream"
                );
                return Replay {
                    events,
                    records,
                    offset,
                    stopped: Some(err),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_record;
    use moor_types::event::{
        Deprecated, EventBody, KmdHeight, Notarized, OpReturn, PriceFeed, PubkeySet,
    };

    fn sample_events() -> Vec<Event> {
        vec![
            Event {
                height: 1,
                body: EventBody::PubkeySet(PubkeySet {
                    pubkeys: vec![[0x01; 33], [0x02; 33]],
                }),
            },
            Event {
                height: 1,
                body: EventBody::Notarized(Notarized {
                    notarized_height: 2,
                    notarized_hash: [0x01; 32],
                    dest_txid: [0x02; 32],
                    mom: None,
                    mom_depth: None,
                }),
            },
            Event {
                height: 1,
                body: EventBody::Notarized(Notarized {
                    notarized_height: 3,
                    notarized_hash: [0x01; 32],
                    dest_txid: [0x02; 32],
                    mom: Some([0x03; 32]),
                    mom_depth: Some(4),
                }),
            },
            Event {
                height: 1,
                body: EventBody::KmdHeight(KmdHeight {
                    kmd_height: 1,
                    timestamp: None,
                }),
            },
            Event {
                height: 1,
                body: EventBody::KmdHeight(KmdHeight {
                    kmd_height: 1,
                    timestamp: Some(2),
                }),
            },
            Event {
                height: 1,
                body: EventBody::Deprecated(Deprecated {
                    n: b'N',
                    nid: b'I',
                    mask: [0x01; 8],
                    hash: [0x02; 32],
                }),
            },
            Event {
                height: 1,
                body: EventBody::OpReturn(OpReturn {
                    txid: [0x04; 32],
                    vout: 0,
                    value: 10_000,
                    payload: vec![0xEE, 0x01],
                }),
            },
            Event {
                height: 1,
                body: EventBody::PriceFeed(PriceFeed {
                    samples: vec![100, 200],
                }),
            },
        ]
    }

    fn encode_all(events: &[Event]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for event in events {
            encode_record(event, &mut bytes).unwrap();
        }
        bytes
    }

    #[test]
    fn test_replay_preserves_order() {
        let events = sample_events();
        let bytes = encode_all(&events);
        let result = replay(&bytes);
        assert!(result.is_complete());
        assert_eq!(result.records, events.len());
        assert_eq!(result.events, events);
        assert_eq!(result.offset, bytes.len());
        // One of the eight is deprecated and must not count as foldable.
        let folded = result.events.iter().filter(|e| e.is_folded()).count();
        assert_eq!(folded, events.len() - 1);
    }

    #[test]
    fn test_replay_empty_stream() {
        let result = replay(&[]);
        assert!(result.is_complete());
        assert_eq!(result.records, 0);
        assert_eq!(result.offset, 0);
    }

    #[test]
    fn test_corrupt_tail_keeps_decoded_prefix() {
        let events = sample_events();
        let mut bytes = encode_all(&events);
        let clean_len = bytes.len();
        // Append half a record.
        bytes.extend_from_slice(&[b'K', 9, 0]);

        let result = replay(&bytes);
        assert_eq!(result.records, events.len());
        assert_eq!(result.events, events);
        assert_eq!(result.offset, clean_len);
        assert!(matches!(result.stopped, Some(CodecError::Truncated { .. })));
    }

    #[test]
    fn test_unknown_tag_stops_at_last_good_offset() {
        let events = sample_events();
        let mut bytes = encode_all(&events[..3]);
        let clean_len = bytes.len();
        bytes.push(0xFF);

        let result = replay(&bytes);
        assert_eq!(result.records, 3);
        assert_eq!(result.offset, clean_len);
        assert!(matches!(
            result.stopped,
            Some(CodecError::UnknownTag { tag: 0xFF, .. })
        ));
    }

    #[test]
    fn test_resume_picks_up_appended_records() {
        let events = sample_events();
        let first_half = encode_all(&events[..4]);
        let full = encode_all(&events);

        let pass1 = replay(&first_half);
        assert!(pass1.is_complete());
        assert_eq!(pass1.records, 4);

        // The log grows; resume from the prior offset.
        let pass2 = resume(&full, pass1.offset);
        assert!(pass2.is_complete());
        assert_eq!(pass2.records, events.len() - 4);
        assert_eq!(pass2.events, events[4..]);
        assert_eq!(pass2.offset, full.len());
    }

    #[test]
    fn test_resume_is_idempotent_at_stream_end() {
        let bytes = encode_all(&sample_events());
        let pass1 = replay(&bytes);
        // Resuming at the end re-emits nothing and stays put.
        let pass2 = resume(&bytes, pass1.offset);
        assert!(pass2.is_complete());
        assert_eq!(pass2.records, 0);
        assert_eq!(pass2.offset, pass1.offset);
    }

    #[test]
    fn test_truncated_tail_completes_after_append() {
        let events = sample_events();
        let full = encode_all(&events);
        // First pass sees a torn write of the final record.
        let torn = &full[..full.len() - 7];

        let pass1 = replay(torn);
        assert_eq!(pass1.records, events.len() - 1);
        assert!(!pass1.is_complete());

        // The write completes; resume finishes the stream.
        let pass2 = resume(&full, pass1.offset);
        assert!(pass2.is_complete());
        assert_eq!(pass2.records, 1);
        assert_eq!(pass2.events, events[events.len() - 1..]);
    }

    #[test]
    fn test_split_replay_equals_full_replay() {
        // Splitting the stream at any byte position and resuming from the
        // first pass's offset yields exactly the events of a single full
        // pass: nothing re-emitted, nothing skipped.
        let events = sample_events();
        let bytes = encode_all(&events);
        let full = replay(&bytes);

        for split in 0..=bytes.len() {
            let pass1 = replay(&bytes[..split]);
            let pass2 = resume(&bytes, pass1.offset);
            let mut combined = pass1.events;
            combined.extend(pass2.events);
            assert_eq!(combined, full.events, "split at byte {}", split);
            assert_eq!(pass2.offset, bytes.len(), "split at byte {}", split);
        }
    }
}
