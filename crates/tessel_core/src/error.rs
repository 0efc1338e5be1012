//! Error types for tessel_core

use std::fmt;

use thiserror::Error;

/// Phase of the update pipeline in which a user callback ran
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Reactive derivations (`Component::derive`)
    Derive,
    /// Pre-update (`before_update`) hooks
    BeforeUpdate,
    /// Building the render fragment (`Component::render`)
    Render,
    /// Render fragment patch step
    Patch,
    /// Two-way binding callbacks
    Binding,
    /// Post-update (`after_update`) hooks and mount callbacks
    AfterUpdate,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Derive => "derive",
            Phase::BeforeUpdate => "before_update",
            Phase::Render => "render",
            Phase::Patch => "patch",
            Phase::Binding => "binding",
            Phase::AfterUpdate => "after_update",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the runtime
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A component callback failed; the flush was halted
    #[error("{phase} callback failed in `{component}`: {source}")]
    Hook {
        component: &'static str,
        phase: Phase,
        #[source]
        source: anyhow::Error,
    },

    /// The flush needed more rounds than the configured limit
    #[error("flush exceeded the limit of {0} rounds")]
    FlushRoundLimit(u32),

    /// Runtime configuration could not be parsed
    #[error("invalid runtime config: {0}")]
    Config(#[from] toml::de::Error),
}

impl RuntimeError {
    pub(crate) fn hook(component: &'static str, phase: Phase, source: anyhow::Error) -> Self {
        RuntimeError::Hook {
            component,
            phase,
            source,
        }
    }
}

/// Result type for tessel_core operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
