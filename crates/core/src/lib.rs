//! Core types and traits for kiosk log reconstruction
//!
//! This crate provides foundational types used across all other crates:
//! - Parsed log events
//! - Reconstructed interactions and their latency breakdown
//! - Language, topic, sensitivity and anomaly enums
//! - Sessions and session-level anomalies
//! - Local wall-clock helpers
//! - Collaborator traits (translation, generative classification)
//! - Error types

pub mod anomaly;
pub mod classification;
pub mod error;
pub mod event;
pub mod interaction;
pub mod language;
pub mod session;
pub mod time;
pub mod traits;

pub use anomaly::{AnomalyCode, Severity};
pub use classification::{ClassificationLabels, Sensitivity, ThankYou, Topic};
pub use error::{Error, Result};
pub use event::{
    ClassificationPayload, Event, EventKind, FragmentPayload, ResponseEvent, SubEvent,
    SUCCESS_CODE,
};
pub use interaction::{Interaction, LatencyBreakdown, Markers, ORPHAN_ID_PREFIX};
pub use language::{Language, Script};
pub use session::{Session, SessionAnomaly};

pub use traits::{InteractionClassifier, NoopClassifier, NoopTranslator, Translator};
