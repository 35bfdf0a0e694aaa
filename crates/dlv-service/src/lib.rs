//! Request handlers for debug-log-viewer.
//!
//! [`DebugLogService`] joins the log engine, the settings store and the
//! access policy behind one method per operation. It knows nothing about
//! transports: callers map [`ServiceError::status`] onto whatever status
//! scheme they speak.

#![forbid(unsafe_code)]

pub mod error;
pub mod service;
pub mod types;

pub use error::{Result, ServiceError, StatusClass};
pub use service::DebugLogService;
pub use types::{
    ClearResponse, GrantResponse, RequestContext, StatsResponse, TailQuery, TailResponse,
};
