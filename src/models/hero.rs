//! Heroes and lane roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{EntityId, HeroId};

/// Lane role a hero is drafted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    DarkSlayer,
    Jungle,
    Mid,
    AbyssalDragon,
    Roam,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::DarkSlayer,
        Role::Jungle,
        Role::Mid,
        Role::AbyssalDragon,
        Role::Roam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::DarkSlayer => "dark_slayer",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::AbyssalDragon => "abyssal_dragon",
            Role::Roam => "roam",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase().replace([' ', '-'], "_");
        match norm.as_str() {
            "dark_slayer" | "darkslayer" | "dsl" | "slayer" | "top" => Ok(Role::DarkSlayer),
            "jungle" | "jg" | "jungler" => Ok(Role::Jungle),
            "mid" | "middle" => Ok(Role::Mid),
            "abyssal_dragon" | "abyssal" | "adl" | "carry" | "adc" => Ok(Role::AbyssalDragon),
            "roam" | "support" | "sp" | "sup" => Ok(Role::Roam),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

/// A playable hero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,

    /// Roles the hero is usually played in
    #[serde(default)]
    pub roles: Vec<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Hero {
    pub fn new(name: String, roles: Vec<Role>) -> Self {
        Self {
            id: EntityId::random(),
            name,
            roles,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn plays(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_aliases() {
        assert_eq!("DSL".parse::<Role>().unwrap(), Role::DarkSlayer);
        assert_eq!("Dark Slayer".parse::<Role>().unwrap(), Role::DarkSlayer);
        assert_eq!("jg".parse::<Role>().unwrap(), Role::Jungle);
        assert_eq!("middle".parse::<Role>().unwrap(), Role::Mid);
        assert_eq!("ADL".parse::<Role>().unwrap(), Role::AbyssalDragon);
        assert_eq!("support".parse::<Role>().unwrap(), Role::Roam);
        assert!("feeder".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_roundtrips_through_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&Role::AbyssalDragon).unwrap();
        assert_eq!(json, "\"abyssal_dragon\"");
    }

    #[test]
    fn test_hero_plays() {
        let hero = Hero::new("Florentino".to_string(), vec![Role::DarkSlayer]);
        assert!(hero.plays(Role::DarkSlayer));
        assert!(!hero.plays(Role::Roam));
    }
}
