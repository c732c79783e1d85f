//! Capture-and-submit workflows.
//!
//! Each screen keeps an immutable state snapshot. Pure `reduce` functions
//! move a snapshot forward in response to an action, and the async drivers
//! (`RegistrationFlow`, `AttendanceFlow`) sequence validation, encoding, the
//! network call and the resulting state changes. Every failure is settled
//! inside the driver: callers always get back a state the user can act on.

pub mod attendance;
pub mod registration;

pub use attendance::{
    AttendanceAction, AttendanceFlow, AttendancePhase, AttendanceState,
};
pub use registration::{
    RegistrationAction, RegistrationFlow, RegistrationOutcome,
    RegistrationState,
};
