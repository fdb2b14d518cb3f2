use std::collections::BTreeMap;

use moor_types::constants::NOTARIZATION_SCAN_WINDOW;
use moor_types::event::{Event, EventBody, OpReturn, PriceFeed};
use moor_types::primitives::*;

/// One notarization as folded into chain state: the decoded payload plus
/// the chain height the record was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotarizationEntry {
    /// Chain height at which the record was written.
    pub height: Height,
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

/// The latest root-chain checkpoint seen in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub kmd_height: Height,
    pub timestamp: Option<u32>,
}

/// Folded per-chain state, owned exclusively by one chain symbol.
///
/// Built by replaying that chain's event log in order and extended
/// incrementally as new blocks connect. Mutation happens only through
/// [`ChainState::apply`]; everything else is a read accessor.
#[derive(Debug, Clone)]
pub struct ChainState {
    symbol: ChainSymbol,
    category: CategoryId,
    notaries: Vec<NotaryPubkey>,
    notarizations: Vec<NotarizationEntry>,
    /// Index over each entry's own `notarized_height`; on duplicates the
    /// last write wins, matching replay order.
    by_height: BTreeMap<Height, usize>,
    checkpoint: Option<Checkpoint>,
    opreturns: Vec<OpReturn>,
    price_feeds: Vec<PriceFeed>,
    /// Count of folded (non-deprecated) events.
    applied: u64,
}

impl ChainState {
    pub fn new(symbol: impl Into<ChainSymbol>, category: CategoryId) -> Self {
        Self {
            symbol: symbol.into(),
            category,
            notaries: Vec::new(),
            notarizations: Vec::new(),
            by_height: BTreeMap::new(),
            checkpoint: None,
            opreturns: Vec::new(),
            price_feeds: Vec::new(),
            applied: 0,
        }
    }

    /// Fold one event into the state.
    ///
    /// Policies per variant: `PubkeySet` replaces the notary set wholesale;
    /// `Notarized` appends to history and indexes by its own
    /// `notarized_height`; `KmdHeight` replaces the checkpoint; `OpReturn`
    /// and `PriceFeed` append to their retained sequences; `Deprecated`
    /// mutates nothing. Strictly sequential — no reordering, no merging of
    /// concurrent writers.
    pub fn apply(&mut self, event: &Event) {
        match &event.body {
            EventBody::PubkeySet(set) => {
                self.notaries = set.pubkeys.clone();
            }
            EventBody::Notarized(n) => {
                let entry = NotarizationEntry {
                    height: event.height,
                    notarized_height: n.notarized_height,
                    notarized_hash: n.notarized_hash,
                    dest_txid: n.dest_txid,
                    mom: n.mom,
                    mom_depth: n.mom_depth,
                };
                self.by_height
                    .insert(entry.notarized_height, self.notarizations.len());
                self.notarizations.push(entry);
            }
            EventBody::KmdHeight(k) => {
                self.checkpoint = Some(Checkpoint {
                    kmd_height: k.kmd_height,
                    timestamp: k.timestamp,
                });
            }
            EventBody::OpReturn(r) => {
                self.opreturns.push(r.clone());
            }
            EventBody::PriceFeed(feed) => {
                self.price_feeds.push(feed.clone());
            }
            EventBody::Deprecated(_) => return,
        }
        self.applied += 1;
    }

    /// Fold a replayed event sequence in order.
    pub fn apply_all(&mut self, events: &[Event]) {
        for event in events {
            self.apply(event);
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    /// The current notary key set (last `PubkeySet` wins).
    pub fn notaries(&self) -> &[NotaryPubkey] {
        &self.notaries
    }

    /// Full notarization history in log order.
    pub fn notarizations(&self) -> &[NotarizationEntry] {
        &self.notarizations
    }

    /// Look up the notarization attesting exactly `notarized_height`.
    pub fn notarization_at(&self, notarized_height: Height) -> Option<&NotarizationEntry> {
        self.by_height
            .get(&notarized_height)
            .map(|&i| &self.notarizations[i])
    }

    /// The most recently recorded notarization, if any.
    pub fn latest_notarization(&self) -> Option<&NotarizationEntry> {
        self.notarizations.last()
    }

    /// The most recent MoM-bearing notarization recorded at `height <= bound`.
    ///
    /// The backward scan never walks more than
    /// [`NOTARIZATION_SCAN_WINDOW`] heights below the bound.
    pub fn latest_mom_notarization(&self, bound: Height) -> Option<&NotarizationEntry> {
        self.notarizations
            .iter()
            .rev()
            .filter(|e| e.height <= bound)
            .take_while(|e| bound - e.height <= NOTARIZATION_SCAN_WINDOW)
            .find(|e| e.mom.is_some())
    }

    /// The latest root-chain checkpoint (last `KmdHeight` wins).
    pub fn checkpoint(&self) -> Option<Checkpoint> {
        self.checkpoint
    }

    /// Opreturn records retained for downstream contract logic.
    pub fn opreturns(&self) -> &[OpReturn] {
        &self.opreturns
    }

    /// Price-feed records retained for downstream contract logic.
    pub fn price_feeds(&self) -> &[PriceFeed] {
        &self.price_feeds
    }

    /// Number of folded (non-deprecated) events.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

/// Whether `events` is monotonically non-decreasing in height.
///
/// A well-formed log is — the producer guarantees it, and this layer does
/// not enforce it while folding. Diagnostic use only.
pub fn is_height_ordered(events: &[Event]) -> bool {
    events.windows(2).all(|w| w[0].height <= w[1].height)
}
