//! Record types of the three collections, as they travel on the wire.
//!
//! Each entity has a full record, a create payload and a patch. Foreign keys
//! are optional on the full record because list queries do not always select
//! them; joined relations are optional because the related record may be gone.

pub mod comment;
pub mod form;
pub mod post;
pub mod user;

pub use comment::*;
pub use form::*;
pub use post::*;
pub use user::*;
