//! Core data models for the skill sphere.
//! Skill records are page configuration: the sphere only reads them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Upper bound on markers placed on the sphere; extra skills are dropped.
pub const MAX_DISPLAY_SKILLS: usize = 10;

const DEFAULT_ROSTER: &str = include_str!("../assets/skills.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCategory {
    Language,
    Technology,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillItem {
    pub name: String,
    /// Icon key from the roster; brand logos are resolved by name in `icons`.
    pub icon: String,
    /// Self-assessed level, 0..=100.
    #[serde(deserialize_with = "clamped_level")]
    pub level: u8,
    pub category: SkillCategory,
    pub proficiency: Proficiency,
}

fn clamped_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, 100) as u8)
}

/// Parse a JSON roster. Out-of-range levels are clamped, not rejected.
pub fn parse_roster(raw: &str) -> Result<Vec<SkillItem>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Roster shipped with the page. A broken asset leaves the sphere empty.
pub fn default_skills() -> Vec<SkillItem> {
    match parse_roster(DEFAULT_ROSTER) {
        Ok(items) => items,
        Err(e) => {
            crate::util::cwarn(&format!("skill roster unreadable: {}", e));
            Vec::new()
        }
    }
}

/// Skills actually placed on the sphere: first occurrence of each name, in
/// roster order, capped at `MAX_DISPLAY_SKILLS`.
pub fn display_skills(items: &[SkillItem]) -> Vec<SkillItem> {
    let mut seen: HashSet<&str> = HashSet::new();
    items
        .iter()
        .filter(|s| seen.insert(s.name.as_str()))
        .take(MAX_DISPLAY_SKILLS)
        .cloned()
        .collect()
}
