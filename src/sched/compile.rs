// src/sched/compile.rs

//! Source-to-bytecode compilation with a fixed set of compiler options.

use mlua::Compiler;
use tracing::debug;

use crate::config::CompilerSection;
use crate::errors::{Result, TaskError};
use crate::sched::thread::lua_message;

/// Compiles script text for the scheduler.
///
/// Every script goes through the same options: optimization level, debug
/// level, and the allow-list of globals that scripts may rebind (the
/// compiler must not fold lookups of those names).
#[derive(Debug, Clone)]
pub struct ScriptCompiler {
    optimization_level: u8,
    debug_level: u8,
    mutable_globals: Vec<String>,
    chunk_name: String,
}

impl ScriptCompiler {
    pub fn from_config(cfg: &CompilerSection) -> Self {
        Self {
            optimization_level: cfg.optimization_level,
            debug_level: cfg.debug_level,
            mutable_globals: cfg.mutable_globals.clone(),
            chunk_name: cfg.chunk_name.clone(),
        }
    }

    /// Name given to every chunk loaded from compiled scripts.
    pub fn chunk_name(&self) -> &str {
        &self.chunk_name
    }

    pub fn mutable_globals(&self) -> &[String] {
        &self.mutable_globals
    }

    /// Compile `source` into Luau bytecode.
    ///
    /// A syntax error yields [`TaskError::Compile`] carrying the compiler's
    /// message.
    pub fn compile(&self, source: &str) -> Result<Vec<u8>> {
        let bytecode = self
            .compiler()
            .compile(source)
            .map_err(|e| TaskError::Compile(lua_message(&e)))?;

        if bytecode.is_empty() {
            return Err(TaskError::Compile("compiler produced no bytecode".to_string()));
        }

        debug!(bytes = bytecode.len(), "compiled script");
        Ok(bytecode)
    }

    fn compiler(&self) -> Compiler {
        Compiler::new()
            .set_optimization_level(self.optimization_level)
            .set_debug_level(self.debug_level)
            .set_mutable_globals(self.mutable_globals.clone())
    }
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::from_config(&CompilerSection::default())
    }
}
