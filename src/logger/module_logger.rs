//! Per-module log level filtering on top of a shared sink.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::{Mutex, RwLock};

use crate::config::AgentConfig;
use crate::error::Result;

/// The process-wide log destination.
///
/// Wraps a concrete `log::Log` implementation with a level of its own. Module
/// loggers that have no configured level follow this level and are told when
/// it changes.
pub struct SinkLogger {
    inner: Box<dyn Log>,
    level: RwLock<LevelFilter>,
    observers: Mutex<Vec<Weak<ModuleLogger>>>,
}

impl SinkLogger {
    pub fn new(inner: Box<dyn Log>, level: LevelFilter) -> Arc<Self> {
        Arc::new(Self {
            inner,
            level: RwLock::new(level),
            observers: Mutex::new(Vec::new()),
        })
    }

    pub fn level(&self) -> LevelFilter {
        *self.level.read()
    }

    /// Change the sink level and notify every live module logger.
    pub fn set_level(&self, level: LevelFilter) {
        *self.level.write() = level;
        let observers: Vec<Arc<ModuleLogger>> = {
            let mut observers = self.observers.lock();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in observers {
            observer.on_sink_level_changed(level);
        }
    }

    /// Write a record that has already passed a module logger's filter.
    fn emit(&self, record: &Record<'_>) {
        self.inner.log(record);
    }

    fn add_observer(&self, observer: Weak<ModuleLogger>) {
        let mut observers = self.observers.lock();
        observers.retain(|o| o.strong_count() > 0);
        observers.push(observer);
    }
}

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.emit(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl fmt::Debug for SinkLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkLogger")
            .field("level", &self.level())
            .finish()
    }
}

/// Logger for one component, filtered by its own level and forwarding to a
/// [`SinkLogger`].
///
/// The level comes from `<config_key>.logLevel` in the configuration. Without
/// one, the logger follows the sink's level until [`ModuleLogger::set_level`]
/// is called.
pub struct ModuleLogger {
    config_key: String,
    sink: Arc<SinkLogger>,
    level: RwLock<LevelFilter>,
    use_sink_level: AtomicBool,
}

impl ModuleLogger {
    pub fn new(
        config_key: impl Into<String>,
        sink: Arc<SinkLogger>,
        config: &AgentConfig,
    ) -> Result<Arc<Self>> {
        let config_key = config_key.into();
        let configured = config.log_level_for(&config_key)?;
        let logger = Arc::new(Self {
            level: RwLock::new(configured.unwrap_or_else(|| sink.level())),
            use_sink_level: AtomicBool::new(configured.is_none()),
            config_key,
            sink: Arc::clone(&sink),
        });
        sink.add_observer(Arc::downgrade(&logger));
        Ok(logger)
    }

    pub fn level(&self) -> LevelFilter {
        *self.level.read()
    }

    /// Whether the level still tracks the sink.
    pub fn follows_sink(&self) -> bool {
        self.use_sink_level.load(Ordering::Acquire)
    }

    /// Pin this logger to `level`; sink level changes no longer apply.
    pub fn set_level(&self, level: LevelFilter) {
        self.use_sink_level.store(false, Ordering::Release);
        *self.level.write() = level;
    }

    fn on_sink_level_changed(&self, level: LevelFilter) {
        if self.follows_sink() {
            *self.level.write() = level;
        }
    }
}

impl Log for ModuleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.sink.emit(record);
        }
    }

    fn flush(&self) {
        self.sink.flush();
    }
}

impl fmt::Debug for ModuleLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLogger")
            .field("config_key", &self.config_key)
            .field("level", &self.level())
            .field("follows_sink", &self.follows_sink())
            .finish()
    }
}
