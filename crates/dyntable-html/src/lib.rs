// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Static HTML adapter: reads a table out of a parsed document into the
//! engine's [`Table`](dyntable_app::Table) model and renders the model back
//! into enhanced markup.

mod document;
mod extract;
mod markup;
mod render;

pub use document::*;
pub use markup::*;
