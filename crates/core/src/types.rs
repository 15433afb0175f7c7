/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Companies are identified by the opaque string key the upstream API hands out.
pub type CompanyId = String;

/// Persisted workflow identifier assigned by the upstream API.
pub type WorkflowId = String;
