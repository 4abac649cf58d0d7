//! Episode-aware parsing and scoring.
//!
//! Pure functions over content ids, release titles and file listings.
//! No I/O and no caching; cheap enough to recompute per request.
//!
//! Release names tag episodes in a handful of shapes (`S06E03`, `6x03`,
//! `Season 6 Episode 3`, ...). Matching is a boolean OR over the shapes;
//! scoring orders them by specificity so the pipeline can prefer exact
//! tags over loose ones.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// A season/episode pair parsed from a composite content id.
///
/// Both components are >= 1 by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonEpisode {
    pub season: u32,
    pub episode: u32,
}

// Pattern specificity, most exact first. Only relative order matters.
const SCORE_PADDED_SE: i32 = 100; // S06E03
const SCORE_PADDED_X: i32 = 90; // 6x03 / 06x03
const SCORE_VERBOSE: i32 = 80; // Season 6 Episode 3
const SCORE_SHORT_SE: i32 = 70; // S6E3
const SCORE_SHORT_X: i32 = 60; // 6x3
const SCORE_BARE_EPISODE: i32 = 10; // E03
const FOREIGN_TAG_PENALTY: i32 = 50;

// Generic tag shapes, used to spot multi-episode packs and wrong-episode
// files regardless of which episode they encode.
static SE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bs(\d{1,2})[\s._-]*e(\d{1,3})\b").unwrap());
static X_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{1,3})\b").unwrap());
static VERBOSE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bseason[\s._-]*(\d{1,2})[\s._-]*episode[\s._-]*(\d{1,3})\b").unwrap()
});

/// Parse the `:season:episode` suffix of a composite content id.
///
/// Returns `None` for movies and malformed ids; this is the sole gate for
/// episode-aware behavior downstream.
pub fn extract_season_episode(content_id: &str) -> Option<SeasonEpisode> {
    let mut parts = content_id.split(':');
    let base = parts.next()?;
    if base.is_empty() {
        return None;
    }
    let season = parts.next()?.trim().parse::<u32>().ok()?;
    let episode = parts.next()?.trim().parse::<u32>().ok()?;
    if season == 0 || episode == 0 {
        return None;
    }
    Some(SeasonEpisode { season, episode })
}

/// Strip the season/episode suffix from a composite id.
///
/// Ids without a well-formed suffix are returned unchanged. Deterministic
/// and side-effect-free; used for metadata cache keys.
pub fn base_id(content_id: &str) -> &str {
    if extract_season_episode(content_id).is_some() {
        content_id.split(':').next().unwrap_or(content_id)
    } else {
        content_id
    }
}

fn is_match(pattern: String, text: &str) -> bool {
    Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

fn padded_se(se: SeasonEpisode) -> String {
    format!(r"(?i)\bs{:02}e{:02}\b", se.season, se.episode)
}

fn padded_x(se: SeasonEpisode) -> String {
    format!(r"(?i)\b0?{}x{:02}\b", se.season, se.episode)
}

fn verbose(se: SeasonEpisode) -> String {
    format!(
        r"(?i)\bseason[\s._-]*0*{}[\s._-]*episode[\s._-]*0*{}\b",
        se.season, se.episode
    )
}

fn short_se(se: SeasonEpisode) -> String {
    format!(r"(?i)\bs0*{}e0*{}\b", se.season, se.episode)
}

fn short_x(se: SeasonEpisode) -> String {
    format!(r"(?i)\b{}x{}\b", se.season, se.episode)
}

fn bare_episode(se: SeasonEpisode) -> String {
    format!(r"(?i)\be0*{}\b", se.episode)
}

/// Whether free text names the given episode in any recognized shape.
///
/// Case-insensitive; any single pattern match is sufficient.
pub fn matches_episode(text: &str, se: SeasonEpisode) -> bool {
    is_match(padded_se(se), text)
        || is_match(padded_x(se), text)
        || is_match(verbose(se), text)
        || is_match(short_se(se), text)
        || is_match(short_x(se), text)
        || is_match(bare_episode(se), text)
}

/// True when the text carries a season/episode tag for a *different*
/// episode than the requested one (multi-episode pack, adjacent episode).
fn has_foreign_tag(text: &str, se: SeasonEpisode) -> bool {
    for re in [&*SE_TAG, &*X_TAG, &*VERBOSE_TAG] {
        for caps in re.captures_iter(text) {
            let season: u32 = caps[1].parse().unwrap_or(0);
            let episode: u32 = caps[2].parse().unwrap_or(0);
            if season != 0 && episode != 0 && (season != se.season || episode != se.episode) {
                return true;
            }
        }
    }
    false
}

/// Score how specifically the text names the given episode.
///
/// Exact zero-padded tags rank above loose ones, and a penalty applies
/// when the text also tags a different episode. Only relative order and
/// sign are meaningful; scores can be negative.
pub fn episode_match_score(text: &str, se: SeasonEpisode) -> i32 {
    let mut score = 0;
    let patterns = [
        (padded_se(se), SCORE_PADDED_SE),
        (padded_x(se), SCORE_PADDED_X),
        (verbose(se), SCORE_VERBOSE),
        (short_se(se), SCORE_SHORT_SE),
        (short_x(se), SCORE_SHORT_X),
        (bare_episode(se), SCORE_BARE_EPISODE),
    ];
    for (pattern, value) in patterns {
        if is_match(pattern, text) {
            score = value;
            break;
        }
    }

    if has_foreign_tag(text, se) {
        score -= FOREIGN_TAG_PENALTY;
    }

    score
}

/// Pick the file in a torrent listing that best matches the episode.
///
/// Returns the position of the highest-scoring path; ties keep the first
/// file (no reordering on equal score). Without episode context, without
/// any positive score, or on an empty listing the first position wins.
/// Never panics.
pub fn find_matching_file<S: AsRef<str>>(paths: &[S], episode: Option<SeasonEpisode>) -> usize {
    let Some(se) = episode else {
        return 0;
    };

    let mut best_index = 0;
    let mut best_score = 0;
    for (index, path) in paths.iter().enumerate() {
        let score = episode_match_score(path.as_ref(), se);
        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }
    best_index
}
