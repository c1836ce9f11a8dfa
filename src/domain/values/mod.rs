pub mod endpoint;
pub mod query_limit;
pub mod tool_status;
pub mod upload_format;
