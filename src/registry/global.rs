//! Process-wide registry.
//!
//! Most code should own a `Hooks` and pass it where it is needed. Callers
//! that want one registry shared by the whole process (plugins registering
//! into a host, for instance) use `Hooks::global()`.

use std::sync::OnceLock;

use tracing::debug;

use crate::config::HooksConfig;

use super::hooks::Hooks;

static GLOBAL: OnceLock<Hooks> = OnceLock::new();

impl Hooks {
    /// The shared registry, created with the default configuration on first
    /// use unless [`Hooks::install_global`] ran earlier.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::default)
    }

    /// Creates the shared registry with `config`.
    ///
    /// Returns `false` (and leaves the existing registry untouched) if it was
    /// already created. Use [`Hooks::reset`] to empty it between scenarios.
    pub fn install_global(config: HooksConfig) -> bool {
        let installed = GLOBAL.set(Self::new(config)).is_ok();
        if !installed {
            debug!("global hook registry already initialized, config ignored");
        }
        installed
    }
}
