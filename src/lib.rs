// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! KAS Rich-Text overlay library
//!
//! This library adds interactive highlighting to a host text widget: it
//! finds `@mentions`, `#topics`, links and caller-defined patterns, styles
//! them, resolves taps on them, clamps long texts to a number of lines with
//! a tappable "... More" marker, keeps highlighted spans atomic under
//! deletion and tracks `#topic` tokens while they are typed.
//!
//! The host widget supplies text layout via [`layout::LayoutOracle`]; the
//! library never shapes or draws text itself. The entry point is
//! [`RichText`].
//!
//! All text offsets are in UTF-16 code units (see [`Range`]).

#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod env;
pub use env::*;

mod data;
pub use data::*;

mod style;
pub use style::*;

mod styled;
pub use styled::*;

mod highlight;
pub use highlight::*;

mod wrap;
pub use wrap::*;

mod rich_text;
pub use rich_text::*;

pub mod clamp;
pub mod compose;
pub mod conv;
pub mod edit_guard;
pub mod layout;
pub mod range_style;
pub mod util;
