//! Persona classification.
//!
//! [`classify_persona`] is a pure decision tree over aggregate figures. The
//! resulting [`PersonaKind`] is turned into display text separately through
//! [`PersonaKind::persona`].

use std::fmt;

use crate::data::{AnalysisResult, Persona};

/// Minimum commits before behavioural personas are considered.
const MIN_BEHAVIOUR_COMMITS: u64 = 10;
/// Share of late-hour commits that makes a night owl.
const NIGHT_OWL_SHARE: f64 = 0.4;
/// Deletions per insertion that make a code surgeon.
const SURGEON_RATIO: f64 = 0.8;
const MARATHON_STREAK: u32 = 30;
const MACHINE_COMMITS: u64 = 1000;
const ARCHITECT_NET_LINES: i64 = 50_000;

/// Figures the persona decision tree reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonaInputs {
    /// Number of commits.
    pub total_commits: u64,
    /// Insertions minus deletions.
    pub net_lines: i64,
    /// Longest streak in days.
    pub longest_streak: u32,
    /// Most used language, excluding the unmapped bucket.
    pub top_language: Option<String>,
    /// Deletions per insertion.
    pub deletion_ratio: f64,
    /// Commits made from 22:00 to 04:59 local time.
    pub late_hour_commits: u64,
}

impl PersonaInputs {
    /// Reads the inputs from a result's aggregates.
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            total_commits: result.totals.commits,
            net_lines: result.totals.net_lines,
            longest_streak: result.streaks.longest,
            top_language: result.top_language().map(str::to_string),
            deletion_ratio: result.totals.deletion_ratio(),
            late_hour_commits: result.time.commits_in_hours(22..)
                + result.time.commits_in_hours(..5),
        }
    }

    fn late_hour_share(&self) -> f64 {
        if self.total_commits == 0 {
            0.0
        } else {
            self.late_hour_commits as f64 / self.total_commits as f64
        }
    }
}

/// Outcome of persona classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaKind {
    /// No commits yet.
    Newcomer,
    /// Most commits land late at night.
    NightOwl,
    /// Deletes nearly as much as they write.
    CodeSurgeon,
    /// Long unbroken streaks.
    Marathoner,
    /// Very high commit volume.
    Machine,
    /// Large net growth of the codebase.
    Architect,
    /// Focused on one language.
    Specialist {
        /// The dominant language.
        language: String,
    },
    /// Fallback when no file was classified.
    Tinkerer,
    /// Spread across many projects.
    Multiverse {
        /// Projects on record.
        projects: usize,
    },
}

/// Classifies aggregate behaviour into a persona.
///
/// Rules are checked in order and the first match wins.
pub fn classify_persona(inputs: &PersonaInputs) -> PersonaKind {
    let commits = inputs.total_commits;
    if commits == 0 {
        return PersonaKind::Newcomer;
    }
    if commits >= MIN_BEHAVIOUR_COMMITS && inputs.late_hour_share() >= NIGHT_OWL_SHARE {
        return PersonaKind::NightOwl;
    }
    if commits >= MIN_BEHAVIOUR_COMMITS && inputs.deletion_ratio >= SURGEON_RATIO {
        return PersonaKind::CodeSurgeon;
    }
    if inputs.longest_streak >= MARATHON_STREAK {
        return PersonaKind::Marathoner;
    }
    if commits >= MACHINE_COMMITS {
        return PersonaKind::Machine;
    }
    if inputs.net_lines >= ARCHITECT_NET_LINES {
        return PersonaKind::Architect;
    }
    match &inputs.top_language {
        Some(language) => PersonaKind::Specialist {
            language: language.clone(),
        },
        None => PersonaKind::Tinkerer,
    }
}

impl PersonaKind {
    /// Short display title.
    pub fn title(&self) -> String {
        match self {
            Self::Newcomer => "The Newcomer".to_string(),
            Self::NightOwl => "The Night Owl".to_string(),
            Self::CodeSurgeon => "The Code Surgeon".to_string(),
            Self::Marathoner => "The Marathoner".to_string(),
            Self::Machine => "The Machine".to_string(),
            Self::Architect => "The Architect".to_string(),
            Self::Specialist { language } => format!("The {language} Specialist"),
            Self::Tinkerer => "The Tinkerer".to_string(),
            Self::Multiverse { .. } => "The Multiverse Developer".to_string(),
        }
    }

    /// One-sentence narrative.
    pub fn description(&self) -> String {
        match self {
            Self::Newcomer => "Every journey starts with a first commit.".to_string(),
            Self::NightOwl => "Your best ideas arrive after dark.".to_string(),
            Self::CodeSurgeon => "You cut away as much code as you write.".to_string(),
            Self::Marathoner => "You keep showing up, day after day.".to_string(),
            Self::Machine => "Commits flow from you at an industrial pace.".to_string(),
            Self::Architect => "You build large systems from the ground up.".to_string(),
            Self::Specialist { language } => {
                format!("{language} is where you feel most at home.")
            }
            Self::Tinkerer => "You poke at a bit of everything.".to_string(),
            Self::Multiverse { projects } => {
                format!("You juggle {projects} projects across your universe.")
            }
        }
    }

    /// Title and narrative as a [`Persona`].
    pub fn persona(&self) -> Persona {
        Persona {
            title: self.title(),
            description: self.description(),
        }
    }
}

impl fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn inputs(total_commits: u64) -> PersonaInputs {
        PersonaInputs {
            total_commits,
            ..PersonaInputs::default()
        }
    }

    #[test]
    fn no_commits_is_newcomer() {
        assert_eq!(classify_persona(&inputs(0)), PersonaKind::Newcomer);
    }

    #[test]
    fn late_hours_win_over_volume() {
        let night = PersonaInputs {
            late_hour_commits: 800,
            ..inputs(2000)
        };
        assert_eq!(classify_persona(&night), PersonaKind::NightOwl);

        let few = PersonaInputs {
            late_hour_commits: 9,
            ..inputs(9)
        };
        assert_ne!(classify_persona(&few), PersonaKind::NightOwl);
    }

    #[test]
    fn deletion_heavy_history_is_surgeon() {
        let surgeon = PersonaInputs {
            deletion_ratio: 0.9,
            ..inputs(50)
        };
        assert_eq!(classify_persona(&surgeon), PersonaKind::CodeSurgeon);
    }

    #[test]
    fn decision_order() {
        let marathon = PersonaInputs {
            longest_streak: 30,
            ..inputs(1500)
        };
        assert_eq!(classify_persona(&marathon), PersonaKind::Marathoner);
        assert_eq!(classify_persona(&inputs(1000)), PersonaKind::Machine);

        let architect = PersonaInputs {
            net_lines: 60_000,
            top_language: Some("Rust".to_string()),
            ..inputs(200)
        };
        assert_eq!(classify_persona(&architect), PersonaKind::Architect);
    }

    #[test]
    fn language_or_fallback() {
        let rust = PersonaInputs {
            top_language: Some("Rust".to_string()),
            ..inputs(5)
        };
        assert_eq!(
            classify_persona(&rust),
            PersonaKind::Specialist {
                language: "Rust".to_string()
            }
        );
        assert_eq!(classify_persona(&inputs(5)), PersonaKind::Tinkerer);
    }

    #[test]
    fn same_inputs_same_persona() {
        let a = PersonaInputs {
            net_lines: 120,
            longest_streak: 4,
            top_language: Some("Go".to_string()),
            deletion_ratio: 0.3,
            late_hour_commits: 2,
            ..inputs(40)
        };
        assert_eq!(
            classify_persona(&a).persona(),
            classify_persona(&a.clone()).persona()
        );
    }

    #[test]
    fn narrative_text() {
        let specialist = PersonaKind::Specialist {
            language: "Python".to_string(),
        };
        assert_snapshot!(specialist.title(), @"The Python Specialist");
        assert_snapshot!(
            PersonaKind::Multiverse { projects: 7 }.description(),
            @"You juggle 7 projects across your universe."
        );
        assert_snapshot!(PersonaKind::NightOwl.to_string(), @"The Night Owl");
    }
}
