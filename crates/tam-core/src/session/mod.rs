//! Chat session bookkeeping.
//!
//! A session is nothing more than a client-minted id; the server keys its
//! conversation history on it and forgets it on `/new-chat`.

mod id;

pub use id::SessionId;
