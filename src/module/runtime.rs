//! Runtime context
//!
//! A `Runtime` owns everything registrations share: the host capabilities,
//! the mode detected from them, the module registry, the diagnostic sink and
//! the resolution policy. It is built once at startup and handed out by
//! reference (or cheap clone); every registrar it configures works against the
//! same registry and namespace.

use std::sync::{Arc, Weak};
use tracing::info;

use crate::config::RuntimeConfig;
use crate::module::diagnostics::DiagnosticSink;
use crate::module::host::{detect, HostCapabilities, Mode};
use crate::module::namespace::Namespace;
use crate::module::options::Options;
use crate::module::registrar::ModuleRegistrar;
use crate::module::registry::{
    publish_to_shared_namespace, resolve_all, DependencyRef, ModuleRegistry, Publication,
    ResolutionPolicy, ResolutionStrategy, Specials,
};
use crate::module::traits::{Factory, RegistrationError};
use crate::module::value::{Object, Value};

/// Process-wide module runtime
#[derive(Debug, Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

/// Non-owning handle to a [`Runtime`]
///
/// Held by callbacks the host may keep indefinitely, since the host itself is
/// owned by the runtime.
#[derive(Debug, Clone)]
pub(crate) struct WeakRuntime {
    inner: Weak<RuntimeInner>,
}

impl WeakRuntime {
    pub(crate) fn upgrade(&self) -> Option<Runtime> {
        self.inner.upgrade().map(|inner| Runtime { inner })
    }
}

#[derive(Debug)]
struct RuntimeInner {
    host: HostCapabilities,
    mode: Mode,
    registry: ModuleRegistry,
    sink: DiagnosticSink,
    policy: ResolutionPolicy,
    defaults: Options,
}

impl Runtime {
    /// Create a runtime with default configuration
    pub fn new(host: HostCapabilities) -> Self {
        Self::with_config(host, &RuntimeConfig::default())
    }

    /// Create a runtime from configuration
    ///
    /// Detects the host mode once; it does not change for the lifetime of
    /// the runtime. Configured constants are not registered here, see
    /// [`Runtime::register_constants`].
    pub fn with_config(host: HostCapabilities, config: &RuntimeConfig) -> Self {
        let mode = detect(&host);
        let sink = DiagnosticSink::from_env(config.diagnostics);

        match mode {
            Mode::AsyncDefiner => sink.log("detect", "cooperating with async module definer"),
            Mode::PackageLoader => sink.log("detect", "loaded by package loader"),
            Mode::SharedNamespace => sink.log("detect", "standalone, shared namespace"),
        }
        info!("Module runtime started in {} mode", mode);

        Self {
            inner: Arc::new(RuntimeInner {
                host,
                mode,
                registry: ModuleRegistry::new(),
                sink,
                policy: config.resolution,
                defaults: config.defaults.clone(),
            }),
        }
    }

    /// Build a runtime and register the configured constant modules
    pub fn from_config(host: HostCapabilities, config: &RuntimeConfig) -> Result<Self, RegistrationError> {
        let runtime = Self::with_config(host, config);
        runtime.register_constants(config)?;
        Ok(runtime)
    }

    pub fn mode(&self) -> Mode {
        self.inner.mode
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.inner.registry
    }

    pub fn namespace(&self) -> &Namespace {
        &self.inner.host.namespace
    }

    pub fn host(&self) -> &HostCapabilities {
        &self.inner.host
    }

    pub fn sink(&self) -> DiagnosticSink {
        self.inner.sink
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.inner.policy
    }

    pub(crate) fn downgrade(&self) -> WeakRuntime {
        WeakRuntime {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Create a registrar applying `options` to every registration
    pub fn configure(&self, options: Options) -> ModuleRegistrar {
        ModuleRegistrar::new(self.clone(), options)
    }

    /// Create a registrar with the configured default options
    pub fn configure_default(&self) -> ModuleRegistrar {
        self.configure(self.inner.defaults.clone())
    }

    /// Register every constant module listed in `config`
    ///
    /// Constants go through the default registrar, so they are published in
    /// the shared namespace when the default options ask for it.
    pub fn register_constants(&self, config: &RuntimeConfig) -> Result<(), RegistrationError> {
        let registrar = self.configure_default();
        for (name, json) in &config.constants {
            let value = Value::from(json.clone());
            self.inner
                .sink
                .log("constant", format_args!("{} = {}", name, value.to_json()));
            registrar.define(name, value)?;
        }
        Ok(())
    }

    /// Resolve dependencies and run `factory` without registering anything
    ///
    /// The standalone `require(dependencies, factory)` entry point of hosts
    /// without a module system. Unavailable under an async definer, whose
    /// host provides its own require.
    pub fn require(
        &self,
        dependencies: Option<Vec<DependencyRef>>,
        factory: impl Into<Factory>,
    ) -> Result<Value, RegistrationError> {
        let function = match factory.into() {
            Factory::Callable(f) => f,
            Factory::Value(value) => return Ok(value),
        };
        let strategy = self.strategy().ok_or_else(|| {
            RegistrationError::Host("standalone require is unavailable under an async definer".to_string())
        })?;

        let specials = Specials {
            require: Value::Function(strategy.require_function()),
            exports: Value::Object(Object::new()),
            module: self.namespace().as_value(),
        };
        let args = resolve_all(
            dependencies.as_deref(),
            self.mode().disambiguation_index(),
            &specials,
            &strategy,
        )?;
        function.call(&args)
    }

    /// Resolution strategy of the active mode
    ///
    /// `None` under an async definer: the host resolves dependencies itself.
    pub(crate) fn strategy(&self) -> Option<ResolutionStrategy> {
        match self.inner.mode {
            Mode::AsyncDefiner => None,
            Mode::PackageLoader => self
                .inner
                .host
                .package
                .clone()
                .map(|host| ResolutionStrategy::PackageLoader { host }),
            Mode::SharedNamespace => Some(ResolutionStrategy::SharedNamespace {
                registry: self.inner.registry.clone(),
                namespace: self.inner.host.namespace.clone(),
                policy: self.inner.policy,
                sink: self.inner.sink,
            }),
        }
    }

    /// Insert into the registry, then publish in the shared namespace
    pub(crate) fn publish_module(
        &self,
        name: &str,
        exports: Value,
        options: &Options,
    ) -> Result<Option<Publication>, RegistrationError> {
        self.inner.sink.log(
            "set_private_module",
            format_args!("{} ({}), options: {:?}", name, exports.type_name(), options),
        );
        self.inner.registry.insert(name, exports.clone())?;
        let publication = publish_to_shared_namespace(self.namespace(), name, &exports, options);
        if let Some(publication) = &publication {
            let previous = publication.previous.as_ref().map_or("none", |v| v.type_name());
            self.inner.sink.log(
                "publish",
                format_args!(
                    "{} as {} (previous: {}, no_conflict: {})",
                    name, publication.slot, previous, publication.restore_attached
                ),
            );
        }
        Ok(publication)
    }
}
