use std::collections::HashSet;

use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::{LocationId, StarId};

/// Number of wheels on the Riddle 2 combination lock.
pub const WHEEL_COUNT: usize = 4;

/// A map panel on the Riddle 1 screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Stable key used by the host to mount the map (e.g. "paris17").
    pub key: String,
    pub title: String,
    /// Map centre: x = longitude, y = latitude.
    pub center: DVec2,
    pub zoom: u8,
}

/// A clickable location on one of the zone maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// Masked name shown until the location is found (e.g. "Le T________").
    pub hint_name: String,
    pub full_name: String,
    /// The memory revealed once the location is found.
    pub memory: String,
    /// x = longitude, y = latitude.
    pub coord: DVec2,
    /// Key of the owning [`Zone`].
    pub zone: String,
}

/// A named star on the Riddle 3 canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: StarId,
    pub name: String,
    /// Position on the 800×600 canvas.
    pub pos: Vec2,
}

/// Content and tunables for the whole experience.
///
/// `Default` carries the shipped content; hosts may override any subset
/// through [`ExperienceConfig::from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// The single accepted visitor name (compared trimmed and case-insensitively).
    pub accepted_name: String,
    pub intro_title: String,
    /// Skip the intro entirely when a stored name passes the gate on load.
    pub auto_advance_on_resume: bool,

    pub zones: Vec<Zone>,
    pub locations: Vec<Location>,
    pub location_order: Vec<LocationId>,

    pub lock_code: [u8; WHEEL_COUNT],
    /// Failed checks after which the hint stays visible.
    pub hint_after_attempts: u32,
    pub hint_text: String,

    pub phrase: String,
    pub lives: u8,
    pub keyboard_rows: Vec<String>,

    pub stars: Vec<Star>,
    pub constellation_edges: Vec<[StarId; 2]>,

    pub seal_clicks: u32,
    pub letter: String,

    /// Seconds the Riddle 1 error message stays up.
    pub sequence_error_secs: f32,
    /// Seconds a freshly found marker keeps its enlarged radius.
    pub marker_pulse_secs: f32,
    /// Seconds both stars of a wrong connection show the rejection state.
    pub star_reject_secs: f32,
    /// Seconds the "out of lives" notice stays up after a phrase reset.
    pub phrase_reset_secs: f32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("accepted name must not be blank")]
    BlankName,
    #[error("location {0} is declared more than once")]
    DuplicateLocation(LocationId),
    #[error("location {id} refers to unknown zone '{zone}'")]
    UnknownZone { id: LocationId, zone: String },
    #[error("location order names unknown location {0}")]
    UnknownLocation(LocationId),
    #[error("location order repeats location {0}")]
    RepeatedLocation(LocationId),
    #[error("location order must not be empty")]
    EmptyOrder,
    #[error("lock digit {digit} at wheel {index} is out of range 0-9")]
    DigitOutOfRange { index: usize, digit: u8 },
    #[error("phrase must contain at least one letter")]
    PhraseWithoutLetters,
    #[error("lives must be at least 1")]
    NoLives,
    #[error("star '{0}' is declared more than once")]
    DuplicateStar(StarId),
    #[error("constellation edge names unknown star '{0}'")]
    UnknownStar(StarId),
    #[error("constellation edge connects '{0}' to itself")]
    SelfEdge(StarId),
    #[error("constellation needs at least one edge")]
    NoEdges,
    #[error("seal needs at least one click to open")]
    NoSealClicks,
}

impl ExperienceConfig {
    /// Parse an override document. Missing fields keep their default content.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ExperienceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-references between content tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accepted_name.trim().is_empty() {
            return Err(ConfigError::BlankName);
        }

        let zone_keys: HashSet<&str> = self.zones.iter().map(|z| z.key.as_str()).collect();
        let mut location_ids = HashSet::new();
        for location in &self.locations {
            if !location_ids.insert(location.id) {
                return Err(ConfigError::DuplicateLocation(location.id));
            }
            if !zone_keys.contains(location.zone.as_str()) {
                return Err(ConfigError::UnknownZone {
                    id: location.id,
                    zone: location.zone.clone(),
                });
            }
        }

        if self.location_order.is_empty() {
            return Err(ConfigError::EmptyOrder);
        }
        let mut seen = HashSet::new();
        for &id in &self.location_order {
            if !location_ids.contains(&id) {
                return Err(ConfigError::UnknownLocation(id));
            }
            if !seen.insert(id) {
                return Err(ConfigError::RepeatedLocation(id));
            }
        }

        for (index, &digit) in self.lock_code.iter().enumerate() {
            if digit > 9 {
                return Err(ConfigError::DigitOutOfRange { index, digit });
            }
        }

        if !self.phrase.chars().any(char::is_alphabetic) {
            return Err(ConfigError::PhraseWithoutLetters);
        }
        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }

        let mut star_ids = HashSet::new();
        for star in &self.stars {
            if !star_ids.insert(&star.id) {
                return Err(ConfigError::DuplicateStar(star.id.clone()));
            }
        }
        if self.constellation_edges.is_empty() {
            return Err(ConfigError::NoEdges);
        }
        for [a, b] in &self.constellation_edges {
            for id in [a, b] {
                if !star_ids.contains(id) {
                    return Err(ConfigError::UnknownStar(id.clone()));
                }
            }
            if a == b {
                return Err(ConfigError::SelfEdge(a.clone()));
            }
        }

        if self.seal_clicks == 0 {
            return Err(ConfigError::NoSealClicks);
        }
        Ok(())
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }
}

fn zone(key: &str, title: &str, lat: f64, lng: f64, zoom: u8) -> Zone {
    Zone {
        key: key.to_string(),
        title: title.to_string(),
        center: DVec2::new(lng, lat),
        zoom,
    }
}

fn location(id: u32, hint: &str, full: &str, lat: f64, lng: f64, memory: &str, zone: &str) -> Location {
    Location {
        id: LocationId(id),
        hint_name: hint.to_string(),
        full_name: full.to_string(),
        memory: memory.to_string(),
        coord: DVec2::new(lng, lat),
        zone: zone.to_string(),
    }
}

fn star(id: &str, name: &str, x: f32, y: f32) -> Star {
    Star {
        id: StarId::new(id),
        name: name.to_string(),
        pos: Vec2::new(x, y),
    }
}

fn edge(a: &str, b: &str) -> [StarId; 2] {
    [StarId::new(a), StarId::new(b)]
}

const DEFAULT_LETTER: &str = "Tu as complété toutes les énigmes pour enfin trouver cette lettre. \
J'espère tout d'abord que ce cadeau interactif t'a plu.\n\n\
Toutes les choses marquantes que tu as pu croiser au fil de ces énigmes sont des moments \
que tu as marqués dans mon cœur, par ton amitié, par ton intérêt et par ton amour.\n\n\
Joyeuse première saint Valentin mon cœur, en espérant en vivre d'autres à tes côtés ❤️";

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            accepted_name: "victoria".to_string(),
            intro_title: "Un voyage pour toi".to_string(),
            auto_advance_on_resume: true,

            zones: vec![
                zone("versailles", "Versailles", 48.8009, 2.1161, 13),
                zone("paris17", "Paris 17ème", 48.8861, 2.3161, 14),
                zone("paris16", "Paris 16ème", 48.8684, 2.2839, 13),
                zone("gennevilliers", "Gennevilliers", 48.9191, 2.2971, 15),
            ],
            locations: vec![
                location(1, "Les j______ p______ du c______", "Les jardins partagés du château", 48.8009, 2.1161, "Le premier pique nique", "versailles"),
                location(2, "Le L____ C______", "Le Louis Château", 48.8021, 2.1287, "Notre premier week-end en amoureux", "versailles"),
                location(3, "Y_____", "Yamato", 48.8833, 2.3255, "Le premier restaurant japonais", "paris17"),
                location(4, "Le H____ d'A____", "Le Havre d'Arman", 48.8888, 2.3076, "Notre premier baiser sous l'action d'un grand homme", "paris17"),
                location(5, "Le j_____ d'a____________", "Le jardin d'acclimatation", 48.8779, 2.2697, "Notre première sortie à deux", "paris16"),
                location(6, "Le T________", "Le Trocadéro", 48.8634, 2.2892, "La balade où j'ai pris la place d'un autre", "paris16"),
                location(7, "Le M_______", "Le Midpoint", 48.9198, 2.2981, "Notre première discussion en tête à tête", "gennevilliers"),
                location(8, "Le d_____ vers S____", "Le départ vers Sargé", 48.9188, 2.2971, "Là où on est parti avec tous nos amis", "gennevilliers"),
            ],
            location_order: [7, 3, 1, 8, 6, 4, 5, 2].into_iter().map(LocationId).collect(),

            lock_code: [1, 6, 9, 3],
            hint_after_attempts: 3,
            hint_text: "Tous les chiffres sont inférieurs à 10".to_string(),

            phrase: "tu es la plus belle personne qui m'a été donné de rencontrer".to_string(),
            lives: 5,
            keyboard_rows: vec![
                "azertyuiop".to_string(),
                "qsdfghjklm".to_string(),
                "wxcvbn".to_string(),
            ],

            stars: vec![
                star("betelgeuse", "Bételgeuse", 280.0, 120.0),
                star("bellatrix", "Bellatrix", 520.0, 130.0),
                star("alnitak", "Alnitak", 350.0, 290.0),
                star("alnilam", "Alnilam", 400.0, 285.0),
                star("mintaka", "Mintaka", 450.0, 280.0),
                star("saiph", "Saiph", 320.0, 470.0),
                star("rigel", "Rigel", 500.0, 460.0),
            ],
            constellation_edges: vec![
                edge("bellatrix", "betelgeuse"),
                edge("alnitak", "betelgeuse"),
                edge("bellatrix", "mintaka"),
                edge("alnilam", "alnitak"),
                edge("alnilam", "mintaka"),
                edge("alnitak", "saiph"),
                edge("mintaka", "rigel"),
            ],

            seal_clicks: 3,
            letter: DEFAULT_LETTER.to_string(),

            sequence_error_secs: 2.0,
            marker_pulse_secs: 1.0,
            star_reject_secs: 0.4,
            phrase_reset_secs: 0.6,
        }
    }
}
