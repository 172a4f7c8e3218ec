//! Domain value types.
//!
//! - [`Date`]: Calendar date used by every calendar and planning call
//! - [`CalendarDate`]: Lenient date input accepted by classification calls

mod date;

pub use date::{CalendarDate, Date};
