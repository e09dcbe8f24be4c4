//! Authentication session store
//!
//! [`SessionStore`] owns the answer to "who is signed in". It restores the
//! persisted session at startup, revalidates it against the server, and is
//! the only writer of session state afterwards. Every operation reports an
//! [`Outcome`] carrying the message a UI would show.

pub mod messages;
pub mod outcome;
pub mod session;
pub mod store;

pub use outcome::Outcome;
pub use session::{Session, SessionState};
pub use store::SessionStore;
