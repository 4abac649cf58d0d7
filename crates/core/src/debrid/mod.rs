//! Debrid provider protocol.
//!
//! A debrid provider fetches torrent content server-side and exposes it
//! as a direct HTTP download. This module provides the `DebridClient`
//! trait the resolver drives (submit magnet, inspect, select files, poll,
//! unrestrict) plus a Real-Debrid implementation.

mod real_debrid;
mod types;

pub use real_debrid::RealDebridClient;
pub use types::{
    AddedMagnet, DebridClient, DebridError, FileChoice, TorrentFileInfo, TorrentInfo,
    TorrentStatus, UnrestrictedLink,
};
