use serde::{Deserialize, Serialize};

/// Stable identifiers for every personality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeId {
    WeekendWarrior,
    StreakMaster,
    Polyglot,
    PrMachine,
    CodeReviewer,
    IssueHunter,
    ConsistentCoder,
    ProlificPusher,
    OpenSourceHero,
    MondayMotivator,
    FridayFinisher,
    /// Default persona only, never awarded as a badge.
    Collaborator,
    /// Default persona only, never awarded as a badge.
    SoloArtist,
}

impl BadgeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeId::WeekendWarrior => "weekendWarrior",
            BadgeId::StreakMaster => "streakMaster",
            BadgeId::Polyglot => "polyglot",
            BadgeId::PrMachine => "prMachine",
            BadgeId::CodeReviewer => "codeReviewer",
            BadgeId::IssueHunter => "issueHunter",
            BadgeId::ConsistentCoder => "consistentCoder",
            BadgeId::ProlificPusher => "prolificPusher",
            BadgeId::OpenSourceHero => "openSourceHero",
            BadgeId::MondayMotivator => "mondayMotivator",
            BadgeId::FridayFinisher => "fridayFinisher",
            BadgeId::Collaborator => "collaborator",
            BadgeId::SoloArtist => "soloArtist",
        }
    }
}

impl std::fmt::Display for BadgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityLabel {
    pub id: BadgeId,
    pub label: String,
    pub emoji: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityResult {
    pub primary: PersonalityLabel,
    /// Up to four secondary badges, in evaluation order.
    pub badges: Vec<PersonalityLabel>,
}

impl PersonalityResult {
    pub fn badge_ids(&self) -> Vec<BadgeId> {
        self.badges.iter().map(|b| b.id).collect()
    }
}
