//! Pagemend Core - analysis and repair pipeline for web page artifacts
//!
//! This crate provides the deterministic heart of pagemend: analyzers
//! that find layout, content, and script defects, fix synthesis with
//! canned fallbacks, best-practice optimization over an injected
//! knowledge base, approval staging, and patch application, all driven
//! by a strictly sequential pipeline.

pub mod analyze;
pub mod approval;
pub mod completer;
pub mod config;
pub mod error;
pub mod fix;
pub mod optimize;
pub mod patch;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod types;

pub use completer::{Completer, KnowledgeBase, Snippet, StaticCompleter};
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineStage, PipelineState};
pub use report::Report;
pub use types::{
    ApprovalStatus, ArtifactSet, ChangeSet, Edit, FixedArtifacts, Impact, Issue, IssueKind,
    Suggestion, TargetKind,
};
