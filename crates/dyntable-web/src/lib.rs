// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Browser adapter. `makeTableDynamic(id)` binds a live table's header
//! controls to the engine; [`patch`] holds the page-independent half so it
//! can be exercised off the browser.

pub mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
pub mod patch;

#[cfg(target_arch = "wasm32")]
pub use dom::{make_table_dynamic, make_table_dynamic_with_options};
