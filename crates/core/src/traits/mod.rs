//! Traits for the external collaborators
//!
//! The reconstruction itself is pure; the translation and generative
//! classification services sit behind these traits so they can be swapped,
//! mocked in tests, or disabled.
//!
//! ```text
//! Text processing:
//!   - Translator: question/answer text -> English
//!   - InteractionClassifier: question/answer -> ClassificationLabels
//! ```

mod text_processing;

pub use text_processing::{InteractionClassifier, NoopClassifier, NoopTranslator, Translator};
