/// Ticker symbol of the root chain all asset chains notarize into.
pub const ROOT_SYMBOL: &str = "KMD";

/// Maximum number of notary public keys in a key set or authority set.
pub const MAX_NOTARIES: usize = 64;

/// Maximum number of u32 samples in a single price-feed record.
pub const MAX_PRICE_SAMPLES: usize = 255;

/// Maximum opreturn payload length in bytes.
///
/// The wire format reserves the all-ones length value, so the cap is one
/// below the u16 maximum.
pub const MAX_OPRETURN_PAYLOAD: usize = 65534;

/// Fixed length of every record header: 1-byte tag + 4-byte LE height.
pub const RECORD_HEADER_LEN: usize = 5;

/// Default number of chain slots in a state registry.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 64;

/// Height window bounding backward scans over notarization history.
///
/// Roughly one day of one-minute blocks. Proof lookups never walk further
/// back than this from their upper bound.
pub const NOTARIZATION_SCAN_WINDOW: u32 = 1440;
