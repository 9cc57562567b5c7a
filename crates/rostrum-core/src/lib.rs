//! # Rostrum Core
//!
//! Core types and pure logic for viewing and judging debates:
//! - [`Transcript`] - rounds, answers and debater names, with [`Transcript::reversed`]
//!   for hiding which side is correct behind a random A/B placement
//! - [`quote::tokenize`] - splits arguments into plain and quoted segments
//! - [`swap::swap_substrings`] - simultaneous name swapping
//! - [`policy`] - what may be revealed to the viewer
//! - [`scoring::quadratic_score`] - judge reward over a set of confidences
//! - [`layout`] and [`judgement`] - A/B placement of messages and confidences
//!
//! ## Quick Start
//!
//! ```rust
//! use rostrum_core::{Names, Round, Transcript};
//!
//! let transcript = Transcript {
//!     question: "Who opened the door?".to_string(),
//!     names: Names {
//!         correct: Some("Alice".to_string()),
//!         incorrect: Some("Bob".to_string()),
//!         ..Names::default()
//!     },
//!     rounds: vec![Round {
//!         correct: Some("Hi Alice".to_string()),
//!         incorrect: Some("Hi Bob".to_string()),
//!         ..Round::default()
//!     }],
//!     ..Transcript::default()
//! };
//!
//! let reversed = transcript.reversed();
//! assert!(reversed.swap);
//! assert_eq!(reversed.rounds[0].correct.as_deref(), Some("Hi Bob"));
//! assert_eq!(reversed.reversed(), transcript);
//! ```

pub mod debate;
pub mod files;
pub mod format;
pub mod judgement;
pub mod layout;
pub mod policy;
pub mod quote;
pub mod scoring;
pub mod swap;
pub mod timestamp;
pub mod transcript;

pub use debate::{
    group_by_experiment, Debate, DebateDetail, Experiment, ExperimentGroup, HumanJudgement,
    Method, User,
};
pub use files::{File, FileDetail, FileRow, FileSummary, FileTree, ModelJudgement, Question, RowDetail};
pub use judgement::{ConfidenceSplit, JudgementDraft, JudgementRejection, JudgementRules};
pub use layout::{Accent, Position, RoundLayout};
pub use policy::{DebateType, Shading};
pub use quote::{Segment, SegmentKind};
pub use scoring::{quadratic_score, ScoreError};
pub use transcript::{Answers, Names, Round, RoundKind, Transcript};
