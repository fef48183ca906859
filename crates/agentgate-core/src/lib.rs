//! agentgate core library
//!
//! Pure decision logic shared by the agentgate binaries:
//! - CI status aggregation and the enforcement policy for agent pull requests
//! - Baseline name normalization and cross-platform snapshot parity matching
//!
//! Nothing here performs I/O; collaborators (hosting API, filesystem) live
//! in `agentgate-hosting` and `agentgate-parity`.

pub mod agent;
pub mod aggregate;
pub mod checks;
pub mod error;
pub mod ledger;
pub mod obs;
pub mod parity;
pub mod policy;
pub mod snapshot;
pub mod tasks;
pub mod telemetry;
pub mod templates;

pub use agent::{is_agent_author, AgentKind, AgentProfile, PlatformScope};
pub use aggregate::{
    aggregate, aggregate_outcome, describe_outcome, AggregateStatus, INCONCLUSIVE_WORDING,
};
pub use checks::{CheckResult, ChecksOutcome, Conclusion};
pub use error::{CoreError, MalformedInput, Result};
pub use ledger::{DecisionKey, DecisionLedger, MemoryDecisionLedger, NoopDecisionLedger};
pub use parity::{match_indices, ParityClassification, ParityCounts, ParityMatch, ParityRow};
pub use policy::{action_for, evaluate, EnforcementAction, EnforcementDecision};
pub use snapshot::{
    build_index, canonical_id, normalize, CanonicalId, Platform, SnapshotEntry, SnapshotIndex,
    VARIANT_TOKENS,
};
pub use tasks::{parse_task_file, TaskBatch};
pub use telemetry::init_tracing;
pub use templates::{enforcement_comment, preview, IssueDraft, DEFAULT_LABEL_COLOR};

/// agentgate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
