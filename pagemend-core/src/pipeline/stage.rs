//! Pipeline stage definitions
//!
//! The pipeline is a strictly linear chain with no branching and no
//! orchestration-level retries. Retries, where present, live inside
//! individual stage implementations.

use serde::{Deserialize, Serialize};

/// One stage of the bug-fixing pipeline, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Scan markup inline styles and style rules for layout defects
    #[default]
    ValidateLayout,
    /// Scan markup content and scripts for content defects
    HealContent,
    /// Synthesize edits for the found issues
    GenerateFixes,
    /// Query the knowledge base for best-practice suggestions
    OptimizeCode,
    /// Stage everything into a pending change set
    GetApproval,
    /// Apply patches and assemble the final report
    ProcessApproval,
}

impl PipelineStage {
    /// Get the stage name used in logs and transition records
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::ValidateLayout => "validate_layout",
            PipelineStage::HealContent => "heal_content",
            PipelineStage::GenerateFixes => "generate_fixes",
            PipelineStage::OptimizeCode => "optimize_code",
            PipelineStage::GetApproval => "get_approval",
            PipelineStage::ProcessApproval => "process_approval",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            PipelineStage::ValidateLayout => "Validating layout",
            PipelineStage::HealContent => "Checking content and scripts",
            PipelineStage::GenerateFixes => "Generating fixes",
            PipelineStage::OptimizeCode => "Collecting optimization suggestions",
            PipelineStage::GetApproval => "Staging changes for approval",
            PipelineStage::ProcessApproval => "Assembling the final report",
        }
    }

    /// Get the next stage in the chain
    pub fn next(&self) -> Option<PipelineStage> {
        match self {
            PipelineStage::ValidateLayout => Some(PipelineStage::HealContent),
            PipelineStage::HealContent => Some(PipelineStage::GenerateFixes),
            PipelineStage::GenerateFixes => Some(PipelineStage::OptimizeCode),
            PipelineStage::OptimizeCode => Some(PipelineStage::GetApproval),
            PipelineStage::GetApproval => Some(PipelineStage::ProcessApproval),
            PipelineStage::ProcessApproval => None,
        }
    }

    /// Check if this is the terminal stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::ProcessApproval)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
