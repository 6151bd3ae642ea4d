//! Packets captured from a running simulator
//!
//! Replayed by [`SampleSource`](crate::providers::SampleSource) when no
//! simulator is available, and used as fixtures throughout the tests.

/// Groundspeed dataref, sent without a NUL terminator.
pub const GROUNDSPEED_DREF: &[u8] = b"DREF+\xC0\xBB\xB0\x35fake/flightmodel/position/groundspeed[0]";

/// Six DATA records: groups 0, 2, 3, 13, 14 and 34.
pub const DATA_GROUPS: &[u8; 221] = &[
    // DATA*
    0x44, 0x41, 0x54, 0x41, 0x2A,
    // group 0
    0x00, 0x00, 0x00, 0x00, 0x0E, 0x88, 0x62, 0x41, 0x33, 0x33, 0x9F, 0x41,
    0x00, 0xC0, 0x79, 0xC4, 0xA7, 0xA6, 0x90, 0x3D, 0x4C, 0x43, 0x90, 0x3D,
    0xA7, 0x8D, 0x8F, 0x3D, 0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x80, 0x3F,
    // group 2
    0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x5C, 0x42, 0x00, 0x00, 0xA6, 0x42,
    0x80, 0x45, 0xB1, 0x4A, 0x00, 0xC0, 0x79, 0xC4, 0x00, 0xC0, 0x79, 0xC4,
    0x00, 0xC0, 0x79, 0xC4, 0x00, 0xC0, 0x79, 0xC4, 0x00, 0xC0, 0x79, 0xC4,
    // group 3
    0x03, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0xAC, 0x66, 0x0B, 0x35,
    0x61, 0x81, 0x0B, 0x35, 0x62, 0x81, 0x0B, 0x35, 0x00, 0xC0, 0x79, 0xC4,
    0x0A, 0x00, 0x00, 0x00, 0x3A, 0x8A, 0x20, 0x35, 0x3B, 0x8A, 0x20, 0x35,
    // group 13
    0x0D, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x80, 0x3F,
    0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // group 14
    0x0E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3F, 0xA0, 0xC7, 0x99, 0x3E,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x79, 0xC4,
    0x00, 0xC0, 0x79, 0xC4, 0x00, 0xC0, 0x79, 0xC4, 0x00, 0xC0, 0x79, 0xC4,
    // group 34
    0x22, 0x00, 0x00, 0x00, 0x6E, 0xD8, 0x97, 0x43, 0x6E, 0xD8, 0x97, 0x43,
    0x4F, 0xFA, 0xA4, 0x43, 0x4F, 0xFA, 0xA4, 0x43, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
