//! Application layer: one service per content entity.
//!
//! Each mutating operation runs the same lifecycle: load (404 when
//! absent), ownership guard (401 when present but not owner/admin),
//! domain transition, persist, re-read with relations expanded.

pub mod blogs;
pub mod books;
pub mod mentors;
pub mod pyqs;

pub use blogs::{BlogService, BlogUpdate};
pub use books::{BookService, BookUpdate};
pub use mentors::{MentorService, MentorUpdate};
pub use pyqs::{PyqInput, PyqService, PyqUpdate};
