// src/utils/log.rs

//! A thin structured-logging facade for the encoder.
//!
//! Library code only ever calls the `log` crate's macros directly — it never
//! installs a subscriber itself. This crate's own tests that want output on
//! stderr call `init_logger`, which wires up `env_logger`'s default format.
//!
//! ```ignore
//! use chromagif::utils::log::{init_logger, LevelFilter};
//!
//! init_logger(LevelFilter::Debug);
//! log::debug!("quantizer starting");
//! ```

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Installs a default stderr logger at the given level. Calling this more
/// than once is harmless; later calls are no-ops.
///
/// `env_logger` is a dev-dependency only — this crate never installs a
/// global logger on its own — so this helper only exists for this crate's
/// own tests.
#[cfg(test)]
pub fn init_logger(max_level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(max_level)
        .is_test(true)
        .try_init();
}
