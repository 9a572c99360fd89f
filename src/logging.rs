//! A minimal stderr logger for narrating freeze-pipeline milestones. It
//! never runs in release builds and never affects the frozen output — it
//! exists purely to make a slow or surprising `freeze()` call diagnosable.

use std::io::{self, Write};

pub struct Logger(pub Box<dyn Write + Send>);

pub fn stderr() -> Logger {
    Logger(Box::new(io::stderr()))
}

#[macro_export]
#[allow(clippy::unused_io_amount)]
macro_rules! trie_log {
    ($l:expr, $fmt:expr) => {
        if cfg!(debug_assertions) {
            let _ = $l.0.write_fmt(format_args!(concat!("[cptrie] ", $fmt, "\n")));
        }
    };
    ($l:expr, $fmt:expr, $($arg:tt)*) => {
        if cfg!(debug_assertions) {
            let _ = $l
                .0
                .write_fmt(format_args!(concat!("[cptrie] ", $fmt, "\n"), $($arg)*));
        }
    };
}
