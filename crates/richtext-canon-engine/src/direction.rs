//! Text-direction classification for mixed-script content.
//!
//! Words are classified as left-to-right, right-to-left, or neutral by the
//! first strongly-directional script range they contain; the verdict is the
//! direction of the first directional word, optionally overridden by a
//! strong enough minority of opposite-direction words.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// How many non-neutral classifications make up the sample window.
const SAMPLE_WINDOW: usize = 100;
/// Below this many directional words the heuristic is skipped entirely.
const MIN_DIRECTIONAL_WORDS: usize = 10;
/// Candidate-to-opposite ratio at which the first-strong verdict holds.
const MIN_RATIO: f64 = 0.4;

static LTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "[A-Za-z\u{c0}-\u{d6}\u{d8}-\u{f6}\u{f8}-\u{2b8}\u{300}-\u{590}\
         \u{800}-\u{1fff}\u{2c00}-\u{fb1c}\u{fe00}-\u{fe6f}\u{fefd}-\u{ffff}]",
    )
    .expect("valid LTR character class")
});

static RTL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{591}-\u{7ff}\u{fb1d}-\u{fdff}\u{fe70}-\u{fefc}]")
        .expect("valid RTL character class")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Ltr,
    Rtl,
    Neutral,
}

impl Direction {
    /// The layout side content flows from; neutral content lays out LTR.
    pub fn layout(&self) -> &'static str {
        match self {
            Direction::Rtl => "rtl",
            Direction::Ltr | Direction::Neutral => "ltr",
        }
    }

    fn opposite(self) -> Direction {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
            Direction::Neutral => Direction::Neutral,
        }
    }
}

fn word_direction(word: &str) -> Direction {
    if LTR_RE.is_match(word) {
        Direction::Ltr
    } else if RTL_RE.is_match(word) {
        Direction::Rtl
    } else {
        Direction::Neutral
    }
}

/// Classify a text sample.
///
/// With `heuristic` off (or fewer than 10 directional words sampled) the
/// verdict is the direction of the first directional word. With it on, a
/// minority of opposite-direction words overrides first-strong when the
/// candidate falls below the fixed ratio.
pub fn classify(text: &str, heuristic: bool) -> Direction {
    let directional: Vec<Direction> = text
        .split_whitespace()
        .map(word_direction)
        .filter(|d| *d != Direction::Neutral)
        .take(SAMPLE_WINDOW)
        .collect();

    let Some(&candidate) = directional.first() else {
        return Direction::Neutral;
    };
    if !heuristic || directional.len() < MIN_DIRECTIONAL_WORDS {
        return candidate;
    }

    let candidate_count = directional.iter().filter(|d| **d == candidate).count();
    let other_count = directional.len() - candidate_count;
    if other_count == 0 {
        return candidate;
    }
    let ratio = candidate_count as f64 / other_count as f64;
    if ratio >= MIN_RATIO {
        candidate
    } else {
        candidate.opposite()
    }
}
