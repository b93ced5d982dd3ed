// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! `log` records written to the browser console.

use log::Level;

/// Console method a record is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

pub const fn console_method(level: Level) -> ConsoleMethod {
    match level {
        Level::Error => ConsoleMethod::Error,
        Level::Warn => ConsoleMethod::Warn,
        Level::Info => ConsoleMethod::Info,
        Level::Debug | Level::Trace => ConsoleMethod::Debug,
    }
}

pub fn format_message(target: &str, args: std::fmt::Arguments<'_>) -> String {
    format!("{target}: {args}")
}

#[cfg(target_arch = "wasm32")]
mod sink {
    use log::{LevelFilter, Log, Metadata, Record};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    use super::{ConsoleMethod, console_method, format_message};

    struct ConsoleLogger;

    static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let message = JsValue::from_str(&format_message(record.target(), *record.args()));
            match console_method(record.level()) {
                ConsoleMethod::Error => console::error_1(&message),
                ConsoleMethod::Warn => console::warn_1(&message),
                ConsoleMethod::Info => console::info_1(&message),
                ConsoleMethod::Debug => console::debug_1(&message),
            }
        }

        fn flush(&self) {}
    }

    /// Installs the console logger unless the page already has one.
    pub fn install(level: LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use sink::install;
