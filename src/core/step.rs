//! Wizard steps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One stage of the linear wizard flow.
///
/// Steps are strictly ordered: `Intro < Face < Deconstruct < Release < Cope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    /// Welcome screen
    #[default]
    Intro,
    /// Free-text confrontation of what is causing stress
    Face,
    /// Categorized breakdown of the stressors
    Deconstruct,
    /// Breathing pause before planning
    Release,
    /// Action plan and resources
    Cope,
}

impl Step {
    /// All steps in flow order.
    pub const ALL: [Self; 5] = [Self::Intro, Self::Face, Self::Deconstruct, Self::Release, Self::Cope];

    /// The steps shown in the header tracker (everything after the intro).
    pub const TRACKED: [Self; 4] = [Self::Face, Self::Deconstruct, Self::Release, Self::Cope];

    /// The step that directly follows this one, if any.
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Intro => Some(Self::Face),
            Self::Face => Some(Self::Deconstruct),
            Self::Deconstruct => Some(Self::Release),
            Self::Release => Some(Self::Cope),
            Self::Cope => None,
        }
    }

    /// Short label used in the step tracker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Intro => "Welcome",
            Self::Face => "Confront",
            Self::Deconstruct => "Analyze",
            Self::Release => "Release",
            Self::Cope => "Resolve",
        }
    }

    /// 1-based position in the tracker, `None` for the intro.
    pub fn tracker_index(self) -> Option<usize> {
        Self::TRACKED.iter().position(|s| *s == self).map(|i| i + 1)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Intro => "INTRO",
            Self::Face => "FACE",
            Self::Deconstruct => "DECONSTRUCT",
            Self::Release => "RELEASE",
            Self::Cope => "COPE",
        };
        f.write_str(name)
    }
}
