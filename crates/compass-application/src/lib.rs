//! Application layer for COMPASS.
//!
//! [`SessionController`] owns the state of one coaching session plus the
//! persisted history lists and exposes the commands and queries the
//! front-ends drive.

pub mod session;

pub use session::{
    RejectReason, ReportStatus, SendOutcome, SessionController, SessionSnapshot, View,
};
