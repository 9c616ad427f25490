/// MeshBatch Engine - singleton manager for engine subsystems
///
/// Holds the named renderer registry and the global logger. Mesh compilation
/// itself takes its renderer explicitly; the registry is how applications hand
/// the same backend to every model load.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use rustc_hash::FxHashMap;
use crate::renderer::Renderer;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Renderers keyed by name ("main", "shadow", ...)
    renderers: RwLock<FxHashMap<String, Arc<Mutex<dyn Renderer>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            renderers: RwLock::new(FxHashMap::default()),
        }
    }
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```text
/// Engine::initialize()?;
/// let renderer = Engine::create_renderer("main", MyBackend::new(config)?)?;
/// let mesh = Mesh::from_asset(&renderer, &loader, &mut pipelines, &asset, &MeshBuildConfig::default())?;
/// Engine::shutdown();
/// ```
pub struct Engine;

impl Engine {
    /// Log errors before returning them
    fn log_and_return_error(error: Error) -> Error {
        crate::engine_error!("meshbatch::Engine", "{}", error);
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get().ok_or_else(|| Self::log_and_return_error(
            Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
        ))
    }

    /// Initialize the engine (idempotent)
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Drop every registered renderer
    ///
    /// Meshes still holding a renderer keep it alive until they are dropped.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut renderers) = state.renderers.write() {
                renderers.clear();
            }
        }
    }

    // ===== RENDERER API =====

    /// Register a renderer under `name` and return the shared handle
    ///
    /// # Errors
    ///
    /// - The engine is not initialized
    /// - A renderer with this name already exists
    /// - The registry lock is poisoned
    pub fn create_renderer<R: Renderer + 'static>(name: &str, renderer: R) -> Result<Arc<Mutex<dyn Renderer>>> {
        let state = Self::state()?;

        let mut lock = state.renderers.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Renderer registry lock poisoned".to_string())
            ))?;

        if lock.contains_key(name) {
            return Err(Self::log_and_return_error(Error::InitializationFailed(format!(
                "Renderer '{}' already exists. Call Engine::destroy_renderer() first.", name
            ))));
        }

        let shared: Arc<Mutex<dyn Renderer>> = Arc::new(Mutex::new(renderer));
        lock.insert(name.to_string(), Arc::clone(&shared));

        crate::engine_info!("meshbatch::Engine", "Renderer '{}' created", name);

        Ok(shared)
    }

    /// Get a registered renderer by name
    pub fn renderer(name: &str) -> Result<Arc<Mutex<dyn Renderer>>> {
        let state = Self::state()?;

        let lock = state.renderers.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Renderer registry lock poisoned".to_string())
            ))?;

        lock.get(name)
            .cloned()
            .ok_or_else(|| Self::log_and_return_error(Error::InitializationFailed(format!(
                "Renderer '{}' not found. Call Engine::create_renderer() first.", name
            ))))
    }

    /// Remove a renderer from the registry (unknown names are ignored)
    pub fn destroy_renderer(name: &str) -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.renderers.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Renderer registry lock poisoned".to_string())
            ))?;

        if lock.remove(name).is_some() {
            crate::engine_info!("meshbatch::Engine", "Renderer '{}' destroyed", name);
        }

        Ok(())
    }

    /// Number of registered renderers (0 when not initialized)
    pub fn renderer_count() -> usize {
        ENGINE_STATE.get()
            .and_then(|state| state.renderers.read().ok().map(|lock| lock.len()))
            .unwrap_or(0)
    }

    /// Names of registered renderers, sorted
    pub fn renderer_names() -> Vec<String> {
        let mut names: Vec<String> = ENGINE_STATE.get()
            .and_then(|state| state.renderers.read().ok().map(|lock| lock.keys().cloned().collect()))
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut renderers) = state.renderers.write() {
                renderers.clear();
            }
        }
        Self::reset_logger();
    }

    // ===== LOGGING API =====

    /// Replace the global logger
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset the global logger to `DefaultLogger::default()`
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger::default());
        }
    }

    /// Log without file:line (used by engine_trace! .. engine_warn!)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log with file:line (used by engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
