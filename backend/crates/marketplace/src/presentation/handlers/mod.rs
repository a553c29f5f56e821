//! HTTP handlers, generic over the repository implementations.

pub mod blogs;
pub mod books;
pub mod mentors;
pub mod pyqs;

pub use blogs::BlogsState;
pub use books::BooksState;
pub use mentors::MentorsState;
pub use pyqs::PyqsState;
