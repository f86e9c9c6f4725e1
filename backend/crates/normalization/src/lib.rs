//! Total normalisers for scalar fields arriving from the legacy membership
//! database.
//!
//! Every function here is total: malformed input never panics and never
//! yields an error. Contact validators return an empty string when the input
//! fails validation, so a record with bad sub-fields still reconciles into a
//! valid (if sparse) canonical record.
//!
//! - [`validate_url`], [`validate_email`], [`validate_phone`] clean contact
//!   fields.
//! - [`strip_punctuation`] removes the fixed punctuation set from free text.
//! - [`decompose_name`] extracts titles and suffixes embedded in raw name
//!   parts.

mod contact;
mod names;
mod text;

pub use contact::{validate_email, validate_phone, validate_url};
pub use names::{
    NAME_SUFFIXES, NAME_TITLES, PersonName, RawName, decompose_name, split_prefix, split_suffix,
};
pub use text::{PUNCTUATION, strip_punctuation};
