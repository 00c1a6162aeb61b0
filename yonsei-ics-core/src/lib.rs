//! Yonsei ICS Core Library
//!
//! Converts the tab-separated course-schedule export into weekly recurring
//! ICS calendar events.

pub mod convert;
pub mod error;
pub mod ics;
pub mod location;
pub mod meeting;
pub mod record;
pub mod semester;
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Product identifier written as PRODID
pub const DEFAULT_PRODUCT_ID: &str = "yonsei-cal/ics";

/// Time zone the period clock runs in
pub const DEFAULT_TIMEZONE: chrono_tz::Tz = chrono_tz::Asia::Seoul;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        convert::*, ics::*, location::*, meeting::*, record::*, semester::*, types::*,
    };
}
