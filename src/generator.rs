//! Template commentary generator.
//!
//! The local fallback producer for AI-origin items: picks a category
//! appropriate to the current match phase, then a phrase from that
//! category's table. The engine ingests the result exactly like any other
//! producer's text.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Broad category of a commentary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Offense,
    Defense,
    Tactics,
    Technique,
    Highlight,
    Encouragement,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offense => "offense",
            Self::Defense => "defense",
            Self::Tactics => "tactics",
            Self::Technique => "technique",
            Self::Highlight => "highlight",
            Self::Encouragement => "encouragement",
        }
    }
}

/// Phase of the match, derived from elapsed playback seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Opening,
    Midgame,
    Critical,
    Closing,
}

impl MatchPhase {
    /// Thresholds: under 60s opening, under 180s midgame, under 300s
    /// critical, then closing.
    pub fn at(elapsed_secs: u64) -> Self {
        match elapsed_secs {
            0..60 => Self::Opening,
            60..180 => Self::Midgame,
            180..300 => Self::Critical,
            _ => Self::Closing,
        }
    }

    /// Categories that fit this phase.
    fn categories(self) -> &'static [Category] {
        use Category::*;
        match self {
            Self::Opening => &[Technique, Encouragement],
            Self::Midgame => &[Offense, Defense, Tactics, Technique],
            Self::Critical => &[Highlight, Tactics, Technique],
            Self::Closing => &[Encouragement, Tactics, Technique],
        }
    }
}

fn phrases(category: Category) -> &'static [&'static str] {
    match category {
        Category::Offense => &[
            "Sharp attack!",
            "Perfect timing on that thrust",
            "The feint set that up beautifully",
            "Relentless pressure",
            "What an opening strike",
            "The compound attack paid off",
        ],
        Category::Defense => &[
            "Rock-solid defense",
            "Parried right on time",
            "Quick reactions there",
            "Kept the distance perfectly",
            "Great footwork to escape",
            "The counter came instantly",
        ],
        Category::Tactics => &[
            "Smart tactical choice",
            "Controlling the tempo well",
            "Reading the opponent like a book",
            "Clever change of rhythm",
            "That setup was planned moves ago",
            "Adapting on the fly",
        ],
        Category::Technique => &[
            "Textbook execution",
            "Such clean technique",
            "Fundamentals on full display",
            "Every motion is precise",
            "Consistent form throughout",
            "That took years of practice",
        ],
        Category::Highlight => &[
            "Incredible!",
            "What a move!",
            "Absolutely flawless!",
            "Replay that one!",
            "Unbelievable skill!",
            "That was world class!",
        ],
        Category::Encouragement => &[
            "Keep pushing",
            "Stay focused",
            "Still anyone's match",
            "Shake it off",
            "Trust your training",
            "One touch at a time",
        ],
    }
}

/// Keyword scan for tagging commentary text with a category.
pub fn categorize(text: &str) -> Option<Category> {
    let lower = text.to_lowercase();
    let table: &[(&[&str], Category)] = &[
        (&["attack", "thrust", "strike", "lunge"], Category::Offense),
        (&["defense", "parry", "block", "dodge"], Category::Defense),
        (&["tactic", "tempo", "rhythm", "strategy"], Category::Tactics),
        (&["technique", "form", "footwork", "precise"], Category::Technique),
        (&["incredible", "amazing", "flawless", "world class"], Category::Highlight),
        (&["keep", "stay", "trust", "focus"], Category::Encouragement),
    ];
    for (keywords, category) in table {
        if keywords.iter().any(|k| lower.contains(k)) {
            return Some(*category);
        }
    }
    None
}

/// Commentary generator with its own RNG stream.
pub struct CommentaryGenerator {
    rng: StdRng,
}

impl CommentaryGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One commentary line appropriate to the given playback position.
    pub fn generate(&mut self, elapsed_secs: u64) -> String {
        let phase = MatchPhase::at(elapsed_secs);
        let category = *phase
            .categories()
            .choose(&mut self.rng)
            .unwrap_or(&Category::Technique);
        phrases(category)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Nice move!")
            .to_string()
    }
}

impl Default for CommentaryGenerator {
    fn default() -> Self {
        Self::new()
    }
}
