//! Plant health analysis from a photo.
//!
//! This crate takes an image picked by the user through validation and
//! encoding ([`ingest`]), submits it to a generative AI service
//! ([`inference`], [`gemini`]), checks the structured answer against the
//! expected schema ([`schema`]) and tracks every attempt with the
//! [`analyzer::PlantHealthAnalyzer`] state machine.

pub mod analyzer;
pub mod gemini;
pub mod inference;
pub mod ingest;
pub mod schema;

pub use crate::{
    analyzer::{AnalysisSnapshot, AnalyzerBusy, AttemptOutcome, PlantHealthAnalyzer},
    gemini::GeminiClient,
    ingest::{EncodedImage, ImageFile, ImageIngest},
};
