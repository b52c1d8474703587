use serde::{Serialize, Serializer};

use super::domain::Product;

pub const PACKAGING_WEIGHT: f64 = 0.35;
pub const TRANSPORT_WEIGHT: f64 = 0.30;
pub const DISPOSAL_WEIGHT: f64 = 0.35;

pub const UNKNOWN_PACKAGING_SCORE: u8 = 40;
pub const UNKNOWN_TRANSPORT_SCORE: u8 = 50;
pub const UNKNOWN_DISPOSAL_SCORE: u8 = 40;

/// Stateless scorer for the packaging, transport, and disposal attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, product: &Product) -> ScoreBreakdown {
        self.breakdown(
            &product.packaging_material,
            &product.manufacturing_location,
            &product.disposal_method,
        )
    }

    pub fn breakdown(
        &self,
        packaging_material: &str,
        manufacturing_location: &str,
        disposal_method: &str,
    ) -> ScoreBreakdown {
        let packaging = packaging_score(packaging_material);
        let transport = transport_score(manufacturing_location);
        let disposal = disposal_score(disposal_method);

        // Evaluated left to right in f64 so truncation lands where the reference tables expect.
        let overall = (f64::from(packaging) * PACKAGING_WEIGHT)
            + (f64::from(transport) * TRANSPORT_WEIGHT)
            + (f64::from(disposal) * DISPOSAL_WEIGHT);

        ScoreBreakdown {
            packaging,
            transport,
            disposal,
            overall,
        }
    }
}

/// Component sub-scores and the weighted overall value before truncation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub packaging: u8,
    pub transport: u8,
    pub disposal: u8,
    pub overall: f64,
}

impl ScoreBreakdown {
    /// Overall score truncated toward zero.
    pub fn score(&self) -> u8 {
        self.overall.clamp(0.0, 100.0) as u8
    }

    pub fn rating(&self) -> ScoreRating {
        ScoreRating::for_score(self.score())
    }
}

/// Human-readable band for an integer score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreRating {
    NotRated,
    HighImpact,
    ModerateImpact,
    GoodChoice,
    ExcellentChoice,
}

impl ScoreRating {
    pub fn for_score(score: u8) -> Self {
        match score {
            0 => Self::NotRated,
            1..=30 => Self::HighImpact,
            31..=60 => Self::ModerateImpact,
            61..=80 => Self::GoodChoice,
            _ => Self::ExcellentChoice,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotRated => "Not Rated",
            Self::HighImpact => "High Impact",
            Self::ModerateImpact => "Moderate Impact",
            Self::GoodChoice => "Good Choice",
            Self::ExcellentChoice => "Excellent Choice",
        }
    }
}

impl Serialize for ScoreRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

pub fn packaging_score(material: &str) -> u8 {
    match material {
        "none" | "compostable_paper" => 100,
        "glass" | "paper" | "cardboard" => 80,
        "aluminum" | "recyclable_plastic" => 60,
        "plastic" | "mixed_materials" => 20,
        _ => UNKNOWN_PACKAGING_SCORE,
    }
}

pub fn transport_score(location: &str) -> u8 {
    match location {
        "local" | "regional" => 95,
        "national" => 70,
        "international" => 30,
        _ => UNKNOWN_TRANSPORT_SCORE,
    }
}

pub fn disposal_score(method: &str) -> u8 {
    match method {
        "compostable" | "reusable" => 100,
        "recyclable" => 85,
        "minimal_impact" => 70,
        "landfill" => 10,
        _ => UNKNOWN_DISPOSAL_SCORE,
    }
}
