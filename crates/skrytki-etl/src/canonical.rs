//! Canonical mailbox selection.
//!
//! An entity may have several mailbox URIs. The one with the lowest rank is
//! shown in search results; ties go to the address seen first.

/// Marker of the primary ePUAP mailbox.
pub const PREFERRED_MARKER: &str = "SkrytkaESP";

/// Marker of any other ePUAP mailbox.
pub const SECONDARY_MARKER: &str = "skrytka";

/// Marker of test and sentinel mailboxes.
pub const TEST_MARKER: &str = "test";

pub const PREFERRED_RANK: u32 = 0;
pub const SECONDARY_RANK: u32 = 1;
pub const FALLBACK_RANK: u32 = 998;
pub const TEST_RANK: u32 = 999;

/// Rank a mailbox URI; lower is better.
///
/// The test marker is checked first so a test mailbox never outranks a real
/// one, whatever else its URI contains.
pub fn rank(uri: &str) -> u32 {
    if uri.contains(TEST_MARKER) {
        TEST_RANK
    } else if uri.contains(PREFERRED_MARKER) {
        PREFERRED_RANK
    } else if uri.contains(SECONDARY_MARKER) {
        SECONDARY_RANK
    } else {
        FALLBACK_RANK
    }
}

/// Pick the best-ranked URI, keeping the first one on ties.
pub fn pick<'a, I>(uris: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    // `min_by_key` keeps the first minimum.
    uris.into_iter().min_by_key(|uri| rank(uri))
}
