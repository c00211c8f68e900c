//! Static-method repositories, one per table family.

mod attachment_repo;
mod audit_repo;
mod comment_repo;
mod defect_repo;
mod project_repo;
mod report_repo;
mod session_repo;
mod task_repo;
mod user_repo;

pub use attachment_repo::AttachmentRepo;
pub use audit_repo::AuditLogRepo;
pub use comment_repo::CommentRepo;
pub use defect_repo::DefectRepo;
pub use project_repo::ProjectRepo;
pub use report_repo::ReportRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
