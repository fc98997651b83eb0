//! Domain records for HBnB.
//!
//! # Core Concepts
//!
//! - [`BaseModel`]: identity (`id`) and the `created_at`/`updated_at`
//!   bookkeeping shared by every record.
//! - [`Record`]: a live object. It pairs a [`BaseModel`] with a typed
//!   [`Body`] (one of the variants below) and an `extra` bag holding
//!   fields outside the variant's declared schema.
//! - [`ModelKind`]: the fixed set of variant type tags. It doubles as the
//!   factory that resolves a persisted tag to an empty body.
//!
//! ## Variants
//!
//! [`User`], [`State`], [`City`], [`Amenity`], [`Place`], [`Review`]. Each
//! adds only flat string fields that default to the empty string.

mod amenity;
mod base;
mod city;
mod kind;
mod place;
mod record;
mod review;
mod state;
mod user;

pub use amenity::*;
pub use base::*;
pub use city::*;
pub use kind::*;
pub use place::*;
pub use record::*;
pub use review::*;
pub use state::*;
pub use user::*;
