//! sea-orm entities
pub mod history;
