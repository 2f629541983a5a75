pub mod activist_service;
pub mod field_merge;
pub mod merge_service;
pub mod query;
