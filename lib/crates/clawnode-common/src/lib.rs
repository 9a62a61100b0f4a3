pub mod approval;
pub mod process;
pub mod status;

pub use approval::{ApprovalDecision, ApprovalPolicy, ExecApprovalHistoryEntry, ExecApprovalRequest};
pub use process::ProcessResult;
pub use status::{ConnectionState, NodeIssue, NodeStatus};
