//! The fixed battery of commands replayed into a support dump.

/// Commands captured by `dump support`, in transcript order.
///
/// The order is contract: downstream tooling locates sections by
/// position, so entries must not be reordered or removed.
pub const SUPPORT_CATALOG: [&str; 8] = [
    "version",
    "show memory-resources",
    "show dimms --all",
    "show system --all",
    "show topology --all",
    "show sensors --all",
    "start diagnostic",
    "show events",
];
