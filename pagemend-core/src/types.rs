//! Shared data model for the Pagemend pipeline
//!
//! Everything the pipeline stages exchange lives here:
//! - Issue: a typed defect record emitted by the analyzers
//! - Edit: a proposed before/after text replacement
//! - Suggestion: an Edit backed by a best-practice citation
//! - ChangeSet: the aggregate awaiting an approval decision
//! - ArtifactSet / FixedArtifacts: the page bodies under repair

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which artifact body an edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// The HTML body
    #[default]
    Markup,
    /// The CSS body
    Style,
    /// The JavaScript body
    Script,
}

impl TargetKind {
    /// Get all target kinds in apply order
    pub fn all() -> &'static [TargetKind] {
        &[TargetKind::Markup, TargetKind::Style, TargetKind::Script]
    }

    /// Get the short name for this target
    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Markup => "markup",
            TargetKind::Style => "style",
            TargetKind::Script => "script",
        }
    }

    /// Keyword used to match best-practice snippets for this target
    pub fn keyword(&self) -> &'static str {
        match self {
            TargetKind::Markup => "HTML",
            TargetKind::Style => "CSS",
            TargetKind::Script => "JavaScript",
        }
    }

    /// File extension for written-out artifacts
    pub fn file_extension(&self) -> &'static str {
        match self {
            TargetKind::Markup => "html",
            TargetKind::Style => "css",
            TargetKind::Script => "js",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markup" | "html" => Ok(TargetKind::Markup),
            "style" | "css" => Ok(TargetKind::Style),
            "script" | "javascript" | "js" => Ok(TargetKind::Script),
            _ => Err(format!("Unknown target kind: {}", s)),
        }
    }
}

/// The catalogue of defect patterns the analyzers recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Lorem-ipsum placeholder text left in the markup
    Placeholder,
    /// An img element with a missing or `#` source
    MissingImage,
    /// An anchor with a missing, `#`, or javascript:void(0) href
    BrokenLink,
    /// An element carrying an inline on* event handler (informational)
    EventCheck,
    /// An element positioned with absolute/relative/fixed
    Positioning,
    /// A fixed pixel width that will not adapt to viewport size
    Responsive,
    /// A style rule that declares z-index
    ZIndex,
    /// The script failed lexical validation
    SyntaxError,
    /// The script mentions null/undefined literals
    PotentialNull,
}

impl IssueKind {
    /// Get all issue kinds
    pub fn all() -> &'static [IssueKind] {
        &[
            IssueKind::Placeholder,
            IssueKind::MissingImage,
            IssueKind::BrokenLink,
            IssueKind::EventCheck,
            IssueKind::Positioning,
            IssueKind::Responsive,
            IssueKind::ZIndex,
            IssueKind::SyntaxError,
            IssueKind::PotentialNull,
        ]
    }

    /// Get the short name for this issue kind
    pub fn name(&self) -> &'static str {
        match self {
            IssueKind::Placeholder => "placeholder",
            IssueKind::MissingImage => "missing_image",
            IssueKind::BrokenLink => "broken_link",
            IssueKind::EventCheck => "event_check",
            IssueKind::Positioning => "positioning",
            IssueKind::Responsive => "responsive",
            IssueKind::ZIndex => "z_index",
            IssueKind::SyntaxError => "syntax_error",
            IssueKind::PotentialNull => "potential_null",
        }
    }

    /// Whether this kind comes from the layout inspectors
    ///
    /// Layout kinds get a medium approval impact, everything else
    /// found by the analyzers is a content kind and gets low.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            IssueKind::Positioning | IssueKind::Responsive | IssueKind::ZIndex
        )
    }

    /// Approval impact tier for a fix addressing this kind
    pub fn impact(&self) -> Impact {
        if self.is_layout() {
            Impact::Medium
        } else {
            Impact::Low
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for IssueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "placeholder" => Ok(IssueKind::Placeholder),
            "missing_image" => Ok(IssueKind::MissingImage),
            "broken_link" => Ok(IssueKind::BrokenLink),
            "event_check" => Ok(IssueKind::EventCheck),
            "positioning" => Ok(IssueKind::Positioning),
            "responsive" => Ok(IssueKind::Responsive),
            "z_index" | "z-index" => Ok(IssueKind::ZIndex),
            "syntax_error" => Ok(IssueKind::SyntaxError),
            "potential_null" => Ok(IssueKind::PotentialNull),
            _ => Err(format!("Unknown issue kind: {}", s)),
        }
    }
}

/// Approval impact tier for a proposed change
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Content-level change, safe to apply
    #[default]
    Low,
    /// Layout-level change, may shift rendering
    Medium,
    /// Optimization suggestion, review carefully
    High,
}

impl Impact {
    /// Get the short name for this tier
    pub fn name(&self) -> &'static str {
        match self {
            Impact::Low => "low",
            Impact::Medium => "medium",
            Impact::High => "high",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A defect record produced by the analyzers
///
/// Issues are immutable once created and never deduplicated: two
/// inspectors may flag the same underlying defect and both records
/// are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// What kind of defect was found
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Where it was found (matched snippet, or "line N" for scripts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Human-readable description
    pub description: String,
}

impl Issue {
    /// Create a new issue without a location
    pub fn new(kind: IssueKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            location: None,
            description: description.into(),
        }
    }

    /// Attach a location to this issue
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A proposed exact-substring text replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Which artifact body this edit applies to
    pub target: TargetKind,
    /// Exact substring to replace; must match the artifact literally
    pub before: String,
    /// Replacement text
    pub after: String,
    /// Why this change is proposed
    pub explanation: String,
}

impl Edit {
    /// Create a new edit
    pub fn new(
        target: TargetKind,
        before: impl Into<String>,
        after: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            target,
            before: before.into(),
            after: after.into(),
            explanation: explanation.into(),
        }
    }

    /// Whether this edit can be applied at all
    ///
    /// An edit with an empty before or after is a no-op and must be
    /// skipped, never applied.
    pub fn is_applicable(&self) -> bool {
        !self.before.is_empty() && !self.after.is_empty()
    }

    /// Whether this edit matches the given text right now
    pub fn applies_to(&self, text: &str) -> bool {
        self.is_applicable() && text.contains(&self.before)
    }
}

/// An optimization suggestion: an edit plus the best-practice
/// snippet it is based on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The proposed edit
    #[serde(flatten)]
    pub edit: Edit,
    /// Category the knowledge base was queried for
    pub category: TargetKind,
    /// The best-practice snippet backing this suggestion
    pub citation: String,
}

impl Suggestion {
    /// Create a new suggestion
    pub fn new(edit: Edit, category: TargetKind, citation: impl Into<String>) -> Self {
        Self {
            edit,
            category,
            citation: citation.into(),
        }
    }
}

/// Approval state of a change set
///
/// The pipeline only ever produces Pending; the external approver
/// moves it to one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Awaiting an external accept/reject decision
    #[default]
    Pending,
    /// Approved; edits may be applied
    Accepted,
    /// Declined; nothing is applied
    Rejected,
}

impl ApprovalStatus {
    /// Get the short name for this status
    pub fn name(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Accepted => "accepted",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    /// Whether this status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApprovalStatus::Accepted | ApprovalStatus::Rejected)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The three original text bodies under analysis
///
/// Field names follow the HTTP request shape. Originals are never
/// mutated; fixed artifacts are derived as new values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    /// HTML body
    #[serde(rename = "html", alias = "html_content", default)]
    pub markup: String,
    /// CSS body
    #[serde(rename = "css", default)]
    pub style: String,
    /// JavaScript body
    #[serde(rename = "javascript", alias = "js", default)]
    pub script: String,
}

impl ArtifactSet {
    /// Create an artifact set from the three bodies
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    /// Get the body for a target kind
    pub fn get(&self, target: TargetKind) -> &str {
        match target {
            TargetKind::Markup => &self.markup,
            TargetKind::Style => &self.style,
            TargetKind::Script => &self.script,
        }
    }

    /// Whether all three bodies are empty
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.style.is_empty() && self.script.is_empty()
    }
}

/// The fixed artifact bodies derived by patch application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedArtifacts {
    /// HTML body after accepted edits
    #[serde(rename = "html_fixed")]
    pub markup: String,
    /// CSS body after accepted edits
    #[serde(rename = "css_fixed")]
    pub style: String,
    /// JavaScript body after accepted edits
    #[serde(rename = "js_fixed")]
    pub script: String,
}

impl FixedArtifacts {
    /// Get the fixed body for a target kind
    pub fn get(&self, target: TargetKind) -> &str {
        match target {
            TargetKind::Markup => &self.markup,
            TargetKind::Style => &self.style,
            TargetKind::Script => &self.script,
        }
    }
}

/// Everything one pipeline run proposes, awaiting a decision
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    /// All issues found by the analyzers
    pub issues: Vec<Issue>,
    /// Edits synthesized from the issues
    pub fixes: Vec<Edit>,
    /// Best-practice suggestions from the optimizer
    pub suggestions: Vec<Suggestion>,
    /// Current approval state
    pub status: ApprovalStatus,
}

impl ChangeSet {
    /// Create a pending change set
    pub fn new(issues: Vec<Issue>, fixes: Vec<Edit>, suggestions: Vec<Suggestion>) -> Self {
        Self {
            issues,
            fixes,
            suggestions,
            status: ApprovalStatus::Pending,
        }
    }

    /// Total number of proposed edits
    pub fn edit_count(&self) -> usize {
        self.fixes.len() + self.suggestions.len()
    }

    /// All edits in apply order: synthesized fixes first, then
    /// optimizer suggestions
    ///
    /// The order is significant. Later edits operate on the output of
    /// earlier ones, so a defined order is required for
    /// reproducibility.
    pub fn edits_in_order(&self) -> impl Iterator<Item = &Edit> {
        self.fixes
            .iter()
            .chain(self.suggestions.iter().map(|s| &s.edit))
    }

    /// Record the external approval decision
    ///
    /// Returns false if the change set already reached a terminal
    /// state and the decision is ignored.
    pub fn decide(&mut self, status: ApprovalStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }
}
