use std::collections::HashMap;
use once_cell::sync::Lazy;

use crate::models::personality::{BadgeId, PersonalityLabel};

static CATALOG: Lazy<BadgeCatalog> = Lazy::new(BadgeCatalog::new);

/// Read-only registry of every personality label, keyed by id.
pub struct BadgeCatalog {
    labels: HashMap<BadgeId, PersonalityLabel>,
}

/// The process-wide catalog.
pub fn catalog() -> &'static BadgeCatalog {
    &CATALOG
}

impl BadgeCatalog {
    fn new() -> Self {
        let entries = [
            (BadgeId::WeekendWarrior, "Weekend Warrior", "⚔️", "Weekends are for coding, not resting", "#ef4444"),
            (BadgeId::StreakMaster, "Streak Master", "🔥", "Consistency is your superpower", "#f97316"),
            (BadgeId::Polyglot, "Polyglot", "🌍", "You speak many programming languages fluently", "#10b981"),
            (BadgeId::OpenSourceHero, "Open Source Hero", "🦸", "Contributing to the community, one commit at a time", "#8b5cf6"),
            (BadgeId::IssueHunter, "Issue Hunter", "🎯", "Finding and fixing bugs is your calling", "#ec4899"),
            (BadgeId::PrMachine, "PR Machine", "🤖", "Pull requests flow through your keyboard", "#06b6d4"),
            (BadgeId::CodeReviewer, "Code Reviewer", "👀", "Your keen eye makes every PR better", "#84cc16"),
            (BadgeId::ConsistentCoder, "Consistent Coder", "📅", "You show up day after day, commit after commit", "#3b82f6"),
            (BadgeId::ProlificPusher, "Prolific Pusher", "🚀", "Your commit count is legendary", "#a855f7"),
            (BadgeId::MondayMotivator, "Monday Motivator", "💪", "You start the week strong", "#14b8a6"),
            (BadgeId::FridayFinisher, "Friday Finisher", "🎉", "You wrap up the week with a bang", "#f43f5e"),
            (BadgeId::SoloArtist, "Solo Artist", "🎸", "Your repos are your masterpieces", "#6366f1"),
            (BadgeId::Collaborator, "Team Player", "🤝", "You thrive when working with others", "#22c55e"),
        ];

        let labels = entries
            .into_iter()
            .map(|(id, label, emoji, description, color)| {
                (
                    id,
                    PersonalityLabel {
                        id,
                        label: label.to_string(),
                        emoji: emoji.to_string(),
                        description: description.to_string(),
                        color: color.to_string(),
                    },
                )
            })
            .collect();

        Self { labels }
    }

    /// Every id has an entry, so lookups cannot miss.
    pub fn get(&self, id: BadgeId) -> &PersonalityLabel {
        &self.labels[&id]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonalityLabel> {
        self.labels.values()
    }
}
