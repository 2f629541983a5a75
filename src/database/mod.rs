pub mod activist_repo;
pub mod attendance_repo;
pub mod merge_audit_repo;
pub mod schema;
