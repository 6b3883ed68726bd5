pub mod entry;
pub mod experience;
pub mod selection;
pub mod session;

pub use entry::{Entry, Track};
pub use experience::Experience;
pub use selection::Selection;
pub use session::{EmptyReason, ExperienceSession, LoadState, LoadTicket, SessionFrame};
