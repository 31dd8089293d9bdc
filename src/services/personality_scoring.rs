use crate::models::candidate::{Candidate, Category};
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: u8 = 60;
pub const MAX_SCORE: u8 = 100;
const DEFAULT_RATING: f32 = 4.0;

const LIVELY_VENUES: [&str; 3] = ["night_club", "amusement_park", "shopping_mall"];
const QUIET_VENUES: [&str; 4] = ["museum", "library", "park", "garden"];
const LIVELY_DINING: [&str; 2] = ["bar", "night_club"];
const QUIET_DINING: [&str; 2] = ["cafe", "bakery"];
const PRACTICAL_VENUES: [&str; 4] = ["restaurant", "store", "market", "food"];
const CONCEPTUAL_VENUES: [&str; 3] = ["museum", "art_gallery", "university"];
const EMPATHETIC_VENUES: [&str; 4] = ["zoo", "aquarium", "park", "place_of_worship"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitBonuses {
    /// Extroverts at lively venues, introverts at quiet ones
    pub energy_bonus: i32,
    /// Same split applied to dining venues
    pub dining_energy_bonus: i32,
    pub sensing_bonus: i32,
    pub intuition_bonus: i32,
    pub feeling_bonus: i32,
    /// Added to every candidate
    pub participation_bonus: i32,
}

impl Default for TraitBonuses {
    fn default() -> Self {
        Self {
            energy_bonus: 10,
            dining_energy_bonus: 5,
            sensing_bonus: 5,
            intuition_bonus: 5,
            feeling_bonus: 5,
            participation_bonus: 10,
        }
    }
}

/// Trait flags read from a four-letter personality code.
///
/// A missing marker selects the opposite trait, so an empty code reads as
/// introverted and intuitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonalityProfile {
    pub extroverted: bool,
    pub sensing: bool,
    pub feeling: bool,
}

impl PersonalityProfile {
    pub fn from_code(code: &str) -> Self {
        let code = code.to_uppercase();
        Self {
            extroverted: code.contains('E'),
            sensing: code.contains('S'),
            feeling: code.contains('F'),
        }
    }
}

#[derive(Default)]
pub struct PersonalityScorer {
    pub bonuses: TraitBonuses,
}

impl PersonalityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bonuses(bonuses: TraitBonuses) -> Self {
        Self { bonuses }
    }

    /// Score a candidate against a personality code. Pure and clamped to
    /// `[MIN_SCORE, MAX_SCORE]`; meals use the dining variant.
    pub fn score(&self, candidate: &Candidate, profile: &PersonalityProfile) -> u8 {
        let rating = candidate.rating.unwrap_or(DEFAULT_RATING);
        let base = ((rating - 1.0) * 20.0).round() as i32;

        let bonus = match candidate.category {
            Category::Activity => self.activity_bonus(candidate, profile),
            Category::Meal => self.restaurant_bonus(candidate, profile),
        };

        let total = base + bonus + self.bonuses.participation_bonus;
        total.clamp(MIN_SCORE as i32, MAX_SCORE as i32) as u8
    }

    fn activity_bonus(&self, candidate: &Candidate, profile: &PersonalityProfile) -> i32 {
        let energy_venues: &[&str] = if profile.extroverted {
            &LIVELY_VENUES
        } else {
            &QUIET_VENUES
        };

        let mut bonus = 0;
        if candidate.has_type(energy_venues) {
            bonus += self.bonuses.energy_bonus;
        }
        bonus + self.cognitive_bonus(candidate, profile)
    }

    fn restaurant_bonus(&self, candidate: &Candidate, profile: &PersonalityProfile) -> i32 {
        let dining_venues: &[&str] = if profile.extroverted {
            &LIVELY_DINING
        } else {
            &QUIET_DINING
        };

        let mut bonus = 0;
        if candidate.has_type(dining_venues) {
            bonus += self.bonuses.dining_energy_bonus;
        }
        bonus + self.cognitive_bonus(candidate, profile)
    }

    /// Sensing/intuition and feeling bonuses, shared by both variants
    fn cognitive_bonus(&self, candidate: &Candidate, profile: &PersonalityProfile) -> i32 {
        let mut bonus = 0;

        if profile.sensing {
            if candidate.has_type(&PRACTICAL_VENUES) {
                bonus += self.bonuses.sensing_bonus;
            }
        } else if candidate.has_type(&CONCEPTUAL_VENUES) {
            bonus += self.bonuses.intuition_bonus;
        }

        if profile.feeling && candidate.has_type(&EMPATHETIC_VENUES) {
            bonus += self.bonuses.feeling_bonus;
        }

        bonus
    }

    /// Score every candidate in place
    pub fn score_all<'a, I>(&self, candidates: I, profile: &PersonalityProfile)
    where
        I: IntoIterator<Item = &'a mut Candidate>,
    {
        for candidate in candidates {
            candidate.score = Some(self.score(candidate, profile));
        }
    }
}
