use async_trait::async_trait;

use crate::products::{Product, ScoreRating};

/// External text-generation service producing the motivational message.
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, prompt: &MessagePrompt) -> Result<String, GenerationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation transport failed: {0}")]
    Transport(String),
    #[error("generation service returned status {0}")]
    Status(u16),
    #[error("generation response malformed: {0}")]
    Malformed(String),
    #[error("generation response contained no text")]
    Empty,
}

/// Scores below this ask the generator for an encouraging rather than celebratory tone.
pub const ENCOURAGING_TONE_BELOW: u8 = 60;

/// Inputs the generator needs to write a message for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagePrompt {
    pub product_name: String,
    pub brand_name: String,
    pub packaging_material: String,
    pub score: u8,
    pub rating: ScoreRating,
    pub language: String,
}

impl MessagePrompt {
    pub fn new(product: &Product, score: u8, language: &str) -> Self {
        Self {
            product_name: product.name.clone(),
            brand_name: product.brand_name.clone(),
            packaging_material: product.packaging_material.clone(),
            score,
            rating: ScoreRating::for_score(score),
            language: language.to_string(),
        }
    }

    pub fn render(&self) -> String {
        if self.score < ENCOURAGING_TONE_BELOW {
            format!(
                "Context: The user is scanning a product ({name} by {brand}) with a low eco-score ({score}, {rating}). \
                 Its packaging is {packaging}. \
                 Task: Write a 3-line, empathetic and encouraging message in {language}. \
                 Tone: respectful, friendly, light-hearted and non-judgmental. \
                 Say something about the product first, then suggest checking the listed alternatives \
                 and estimate how much waste a greener choice would avoid. End with an eco emoji.",
                name = self.product_name,
                brand = self.brand_name,
                score = self.score,
                rating = self.rating.label(),
                packaging = self.packaging_material,
                language = self.language,
            )
        } else {
            format!(
                "Context: The user is scanning a product ({name} by {brand}) with a good eco-score ({score}, {rating}). \
                 Task: Write a 3-line, celebratory message in {language}. \
                 Tone: respectful, enthusiastic, positive and reinforcing. \
                 Mention what makes the product a sustainable pick and estimate the waste it avoids. \
                 Rewrite in your own words each time.",
                name = self.product_name,
                brand = self.brand_name,
                score = self.score,
                rating = self.rating.label(),
                language = self.language,
            )
        }
    }
}
