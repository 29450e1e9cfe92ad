//! Registration entry point
//!
//! `Runtime::configure(options)` returns a [`ModuleRegistrar`]; module authors
//! call [`ModuleRegistrar::register`] (or [`ModuleRegistrar::define`] when
//! there are no dependencies) once per module. The same call works under every
//! host mode:
//!
//! - **async definer**: the definition is handed to the host; with
//!   `options.global` the module is also required immediately so it can be
//!   registered and published in the shared namespace
//! - **package loader**: the factory runs now and its result becomes the host
//!   module's export value
//! - **shared namespace**: the factory runs now and its result is registered
//!   and, with `options.global`, published

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, warn};

use crate::module::host::Mode;
use crate::module::options::Options;
use crate::module::registry::{resolve_all, DependencyRef, Specials};
use crate::module::runtime::Runtime;
use crate::module::traits::{Definition, Factory, RegistrationError};
use crate::module::value::{Object, Value};

/// Registers modules with a fixed set of options
#[derive(Debug, Clone)]
pub struct ModuleRegistrar {
    runtime: Runtime,
    options: Options,
}

impl ModuleRegistrar {
    pub(crate) fn new(runtime: Runtime, options: Options) -> Self {
        Self { runtime, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Register a module without declared dependencies
    ///
    /// The factory receives the `require`, `exports` and `module` specials.
    pub fn define(&self, name: &str, factory: impl Into<Factory>) -> Result<Value, RegistrationError> {
        self.register(name, None, factory)
    }

    /// Register a module
    ///
    /// Returns the factory result under the package loader and shared
    /// namespace modes, and `Value::Undefined` under an async definer (the
    /// host evaluates the factory).
    pub fn register(
        &self,
        name: &str,
        dependencies: Option<Vec<DependencyRef>>,
        factory: impl Into<Factory>,
    ) -> Result<Value, RegistrationError> {
        let factory = factory.into();
        match self.runtime.mode() {
            Mode::AsyncDefiner => self.register_async(name, dependencies, factory),
            Mode::PackageLoader => self.register_package(name, dependencies, factory),
            Mode::SharedNamespace => self.register_shared(name, dependencies, factory),
        }
    }

    fn register_async(
        &self,
        name: &str,
        dependencies: Option<Vec<DependencyRef>>,
        factory: Factory,
    ) -> Result<Value, RegistrationError> {
        let sink = self.runtime.sink();
        sink.log("define", format_args!("async definer loading {}, options: {:?}", name, self.options));

        let host = self.runtime.host();
        let definer = host
            .async_definer
            .clone()
            .ok_or_else(|| RegistrationError::Host("async definer disappeared".to_string()))?;

        // Checked before defining so a failed registration leaves no trace in the host.
        let require = if self.options.global.is_enabled() {
            Some(
                host.async_require
                    .clone()
                    .ok_or_else(|| RegistrationError::MissingAsyncResolver(name.to_string()))?,
            )
        } else {
            None
        };

        let index = self.runtime.mode().disambiguation_index();
        let id = if self.options.anonymous {
            None
        } else {
            Some(self.options.amd_id.clone().unwrap_or_else(|| name.to_string()))
        };
        definer.define(Definition {
            id,
            dependencies: dependencies.map(|deps| deps.iter().map(|d| d.disambiguate(index)).collect()),
            factory,
        })?;

        let Some(require) = require else {
            return Ok(Value::Undefined);
        };

        // Force evaluation so the shared-namespace side effect happens now
        // rather than whenever something else requires the module.
        let outcome: Arc<Mutex<Option<Result<(), RegistrationError>>>> = Arc::new(Mutex::new(None));
        let callback_outcome = Arc::clone(&outcome);
        // Weak: the host owning this callback is itself owned by the runtime.
        let runtime = self.runtime.downgrade();
        let options = self.options.clone();
        let module_name = name.to_string();
        require.require(
            vec![name.to_string()],
            Box::new(move |values| {
                let exports = values.into_iter().next().unwrap_or_default();
                let result = match runtime.upgrade() {
                    Some(runtime) => runtime.publish_module(&module_name, exports, &options).map(|_| ()),
                    None => Err(RegistrationError::Host(format!(
                        "runtime dropped before {} could be published",
                        module_name
                    ))),
                };
                if let Err(e) = &result {
                    error!("Publication of {} after async require failed: {}", module_name, e);
                }
                *callback_outcome.lock() = Some(result);
            }),
        )?;

        let settled = outcome.lock().take();
        match settled {
            Some(result) => result?,
            None => warn!(
                "Async require of {} did not complete synchronously; shared-namespace publication is deferred",
                name
            ),
        }
        Ok(Value::Undefined)
    }

    fn register_package(
        &self,
        name: &str,
        dependencies: Option<Vec<DependencyRef>>,
        factory: Factory,
    ) -> Result<Value, RegistrationError> {
        let sink = self.runtime.sink();
        sink.log("define", format_args!("package loader loading {}", name));

        let host = self
            .runtime
            .host()
            .package
            .clone()
            .ok_or_else(|| RegistrationError::Host("package host disappeared".to_string()))?;

        let function = match factory {
            Factory::Callable(f) => f,
            Factory::Value(value) => {
                if value.is_truthy() {
                    host.set_exports(value.clone());
                }
                return Ok(value);
            }
        };

        let strategy = self
            .runtime
            .strategy()
            .ok_or_else(|| RegistrationError::Host("no package resolution strategy".to_string()))?;
        let specials = Specials {
            require: Value::Function(strategy.require_function()),
            exports: Value::Object(host.exports()),
            module: host.module_handle(),
        };
        let args = resolve_all(
            dependencies.as_deref(),
            self.runtime.mode().disambiguation_index(),
            &specials,
            &strategy,
        )?;

        let result = function.call(&args)?;
        if result.is_truthy() {
            // Replaces whatever was accumulated through the exports special
            host.set_exports(result.clone());
        }
        Ok(result)
    }

    fn register_shared(
        &self,
        name: &str,
        dependencies: Option<Vec<DependencyRef>>,
        factory: Factory,
    ) -> Result<Value, RegistrationError> {
        let sink = self.runtime.sink();
        sink.log("define", format_args!("standalone loading {}, options: {:?}", name, self.options));

        let function = match factory {
            Factory::Callable(f) => f,
            Factory::Value(value) => {
                self.runtime.publish_module(name, value.clone(), &self.options)?;
                return Ok(value);
            }
        };

        let strategy = self
            .runtime
            .strategy()
            .ok_or_else(|| RegistrationError::Host("no shared-namespace resolution strategy".to_string()))?;
        let specials = Specials {
            require: Value::Function(strategy.require_function()),
            exports: Value::Object(Object::new()),
            module: self.runtime.namespace().as_value(),
        };
        let args = resolve_all(
            dependencies.as_deref(),
            self.runtime.mode().disambiguation_index(),
            &specials,
            &strategy,
        )?;

        let result = function.call(&args)?;
        self.runtime.publish_module(name, result.clone(), &self.options)?;
        Ok(result)
    }
}
