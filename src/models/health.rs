use serde::Serialize;

/// Feeding-frequency classification against a pet's ideal interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedHealth {
    None,    // no interval configured
    TooSoon, // fewer days than ideal_min_days
    TooLate, // more days than ideal_max_days
    Ideal,
}

impl FeedHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedHealth::None => "none",
            FeedHealth::TooSoon => "too-soon",
            FeedHealth::TooLate => "too-late",
            FeedHealth::Ideal => "ideal",
        }
    }

    /// Short human label for the list view.
    pub fn label(&self) -> &'static str {
        match self {
            FeedHealth::None => "",
            FeedHealth::TooSoon => "too soon",
            FeedHealth::TooLate => "overdue",
            FeedHealth::Ideal => "on time",
        }
    }
}

/// Tri-state aggregate over all pets for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateState {
    All,
    None,
    Some,
}

impl AggregateState {
    /// State of a list where `fed` of `total` pets were fed today.
    /// An empty list counts as `None`.
    pub fn from_counts(fed: usize, total: usize) -> Self {
        match fed {
            0 => AggregateState::None,
            n if n >= total => AggregateState::All,
            _ => AggregateState::Some,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateState::All => "all",
            AggregateState::None => "none",
            AggregateState::Some => "some",
        }
    }

    /// Checkbox glyph: checked, unchecked, indeterminate.
    pub fn glyph(&self) -> &'static str {
        match self {
            AggregateState::All => "[x]",
            AggregateState::None => "[ ]",
            AggregateState::Some => "[-]",
        }
    }
}
