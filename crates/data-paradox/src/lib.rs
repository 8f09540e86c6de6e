//! Claim analysis core: feature extraction, fallacy matching, challenge formatting and
//! risk comparison, plus the campaign-data verification collaborator used by the service.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod telemetry;

pub use analysis::{
    render_text, CatalogError, ChallengeSection, ClaimAnalyzer, ClaimResponse, Comparison,
    Confidence, FallacyCatalog, FallacyMatch, RiskLevel, RiskScore, Winner,
};
pub use data::{CampaignDataset, DataVerification, DatasetError};
pub use error::AppError;
