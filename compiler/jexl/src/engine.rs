//! The embedding surface: engine, builder, expressions and scripts.

use std::fmt;
use std::sync::Arc;

use jexl_eval::{Interpreter, JexlUberspect, ObjectContext, Options, Permissions, SandboxUberspect, Uberspect};
use jexl_ir::{Features, Lambda, Node, Pragma};
use jexl_value::{Arithmetic, Closure, JexlArithmetic, SharedContext, Value};
use tracing::debug;

use crate::cache::{AstCache, CacheKey, SourceKind};
use crate::error::Result;

const DEFAULT_CACHE_CAPACITY: usize = 512;
const DEFAULT_CACHE_THRESHOLD: usize = 4096;

/// Builder for [`Engine`].
///
/// Every collaborator is passed in explicitly; unset ones get defaults
/// (`JexlArithmetic` matching the `strict` flag, `JexlUberspect`, no
/// sandbox).
#[must_use]
pub struct EngineBuilder {
    arithmetic: Option<Arc<dyn Arithmetic>>,
    uberspect: Option<Arc<dyn Uberspect>>,
    permissions: Option<Permissions>,
    cache_capacity: usize,
    cache_threshold: usize,
    features: Features,
    options: Options,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder {
            arithmetic: None,
            uberspect: None,
            permissions: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_threshold: DEFAULT_CACHE_THRESHOLD,
            features: Features::default(),
            options: Options::default(),
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arithmetic(mut self, arithmetic: impl Arithmetic + 'static) -> Self {
        self.arithmetic = Some(Arc::new(arithmetic));
        self
    }

    pub fn uberspect(mut self, uberspect: impl Uberspect + 'static) -> Self {
        self.uberspect = Some(Arc::new(uberspect));
        self
    }

    /// Filter member access through a [`SandboxUberspect`].
    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Maximum number of cached compilations; zero disables the cache.
    pub fn cache(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Longest source (in bytes) that is cached.
    pub fn cache_threshold(mut self, threshold: usize) -> Self {
        self.cache_threshold = threshold;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    pub fn features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    pub fn safe(mut self, safe: bool) -> Self {
        self.options.safe = safe;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.options.silent = silent;
        self
    }

    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.options.cancellable = cancellable;
        self
    }

    pub fn build(self) -> Engine {
        let arithmetic = self
            .arithmetic
            .unwrap_or_else(|| Arc::new(JexlArithmetic::new(self.options.strict)));
        let uberspect = self
            .uberspect
            .unwrap_or_else(|| Arc::new(JexlUberspect::new()));
        let uberspect: Arc<dyn Uberspect> = match self.permissions {
            Some(permissions) => Arc::new(SandboxUberspect::new(uberspect, permissions)),
            None => uberspect,
        };
        Engine {
            inner: Arc::new(EngineInner {
                arithmetic,
                uberspect,
                features: self.features,
                options: self.options,
                cache: AstCache::new(self.cache_capacity, self.cache_threshold),
            }),
        }
    }
}

struct EngineInner {
    arithmetic: Arc<dyn Arithmetic>,
    uberspect: Arc<dyn Uberspect>,
    features: Features,
    options: Options,
    cache: Option<AstCache>,
}

/// Compiles sources and evaluates them.
///
/// Cheap to clone and safe to share across threads; each evaluation
/// brings its own context.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("features", &self.inner.features)
            .field("options", &self.inner.options)
            .field("cached", &self.cached_count())
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    pub fn features(&self) -> Features {
        self.inner.features
    }

    /// Compile a single expression.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn create_expression(&self, source: &str) -> Result<Expression> {
        let lambda = self.compile(SourceKind::Expression, source, &[])?;
        Ok(Expression {
            engine: self.clone(),
            source: Arc::from(source),
            lambda,
        })
    }

    /// Compile a script without parameters.
    pub fn create_script(&self, source: &str) -> Result<Script> {
        self.create_script_with_params::<&str>(source, &[])
    }

    /// Compile a script whose arguments bind to `params` in order.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len(), params = params.len()))]
    pub fn create_script_with_params<S: AsRef<str>>(&self, source: &str, params: &[S]) -> Result<Script> {
        let params: Vec<String> = params.iter().map(|p| p.as_ref().to_string()).collect();
        let lambda = self.compile(SourceKind::Script, source, &params)?;
        Ok(Script {
            engine: self.clone(),
            source: Arc::from(source),
            closure: Closure::new(lambda, None),
        })
    }

    /// A context whose variables are the properties of `object`, resolved
    /// through this engine's uberspect.
    pub fn object_context(&self, object: Value) -> SharedContext {
        Arc::new(ObjectContext::new(object, Arc::clone(&self.inner.uberspect)))
    }

    /// Number of cached compilations.
    pub fn cached_count(&self) -> usize {
        self.inner.cache.as_ref().map_or(0, AstCache::len)
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.clear();
        }
    }

    fn compile(&self, kind: SourceKind, source: &str, params: &[String]) -> Result<Arc<Lambda>> {
        let cache = self.inner.cache.as_ref().filter(|c| c.accepts(source));
        let key = cache.map(|_| CacheKey {
            kind,
            source: source.to_string(),
            params: params.to_vec(),
        });
        if let (Some(cache), Some(key)) = (cache, key.as_ref()) {
            if let Some(lambda) = cache.get(key) {
                return Ok(lambda);
            }
        }

        let tokens = jexl_lexer::tokenize(source);
        let features = self.inner.features;
        let body = match kind {
            SourceKind::Expression => jexl_parse::parse_expression(&tokens, features)?,
            SourceKind::Script => jexl_parse::parse_script(&tokens, features, params)?,
        };
        let lambda = Arc::new(Lambda::new(params.to_vec(), body));
        debug!(kind = ?kind, "compiled source");

        if let (Some(cache), Some(key)) = (cache, key) {
            cache.insert(key, Arc::clone(&lambda));
        }
        Ok(lambda)
    }

    fn interpreter(&self, options: Options) -> Interpreter<'_> {
        Interpreter::new(&*self.inner.arithmetic, &*self.inner.uberspect, options)
    }
}

/// A compiled expression.
#[derive(Clone)]
pub struct Expression {
    engine: Engine,
    source: Arc<str>,
    lambda: Arc<Lambda>,
}

impl Expression {
    pub fn evaluate(&self, ctx: &SharedContext) -> Result<Value> {
        let mut interpreter = self.engine.interpreter(self.engine.inner.options);
        Ok(interpreter.interpret(&self.lambda.body, ctx)?)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed tree.
    pub fn ast(&self) -> &Node {
        &self.lambda.body
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expression").field(&self.source).finish()
    }
}

/// A compiled script: a closure over the script body, possibly with
/// curried arguments.
#[derive(Clone)]
pub struct Script {
    engine: Engine,
    source: Arc<str>,
    closure: Closure,
}

impl Script {
    /// Run with `args` bound to the unbound parameters in order.
    ///
    /// `jexl.*` pragmas of the script override the engine options for this
    /// run.
    pub fn execute(&self, ctx: &SharedContext, args: &[Value]) -> Result<Value> {
        let options = self.engine.inner.options.with_pragmas(self.pragmas());
        let mut interpreter = self.engine.interpreter(options);
        Ok(interpreter.call(&self.closure, args, ctx)?)
    }

    /// A script with `args` bound to the next unbound parameters.
    #[must_use]
    pub fn curry(&self, args: &[Value]) -> Script {
        Script {
            engine: self.engine.clone(),
            source: Arc::clone(&self.source),
            closure: self.closure.curry(args),
        }
    }

    /// Every declared parameter.
    pub fn parameters(&self) -> &[String] {
        self.closure.params()
    }

    /// Parameters not yet bound by [`Script::curry`].
    pub fn unbound_parameters(&self) -> &[String] {
        self.closure.unbound_params()
    }

    pub fn pragmas(&self) -> &[Pragma] {
        self.closure.lambda().pragmas()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Node {
        &self.closure.lambda().body
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("source", &self.source)
            .field("unbound", &self.unbound_parameters())
            .finish_non_exhaustive()
    }
}
