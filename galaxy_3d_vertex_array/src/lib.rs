/*!
# Galaxy 3D Vertex Array

Client vertex array core for the Galaxy 3D fixed-function front end.

Applications describe vertex attributes living in their own memory (position,
normal, color, color index, edge flag and per-unit texture coordinates) and
draw from them in bulk. The core validates and records array descriptors,
converts attributes into a canonical working buffer (or aliases client memory
in place when it is already canonical), chunks large draws to the working
buffer capacity, and hands each chunk to a downstream pipeline.

## Architecture

- **Context**: Owns the array descriptors, the working buffer and the lock state
- **ArrayStore**: Validated client array descriptors and enablement
- **ArraySummary**: Flag masks derived from the enabled arrays
- **VertexPipeline**: Downstream transform/render collaborator
- **ImmediateSink**: Downstream immediate-mode collaborator for indexed draws

The downstream collaborators are traits: the core never transforms,
lights or rasterizes anything itself.
*/

// Internal modules
mod error;
mod engine;
mod config;
mod draw;
pub mod log;
pub mod array;
pub mod pipeline;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result, GL_INVALID_ENUM, GL_INVALID_OPERATION, GL_INVALID_VALUE};

    // Diagnostics singleton
    pub use crate::engine::Engine;

    // Rendering context
    pub use crate::config::{ContextConfig, CurrentValues};
    pub use crate::draw::{Context, CvaState, DrawStats, LockPhase, PendingElements, RecordingMode};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger, Verbosity, VERBOSE_ENV_VAR};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Client array sub-module
    pub mod array {
        pub use crate::array::*;
    }

    // Downstream pipeline sub-module
    pub mod pipeline {
        pub use crate::pipeline::*;
    }
}

// Re-export math library at crate root
pub use glam;
