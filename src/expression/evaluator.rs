//! Expression evaluation against a render context
//!
//! Text made only of letters, digits, underscores and whitespace is a scope
//! lookup: the key is searched in the current context's scope object, then in
//! each enclosing context up to the root. A key found nowhere evaluates to
//! [`Value::Empty`].
//!
//! Anything else is compiled against the type vocabulary. Compiled
//! expressions are cached in the tag map of the context's parent (the root
//! context caches for itself), so sibling contexts created by one component
//! share compilations. Compiled expressions resolve field references against
//! the current scope object only.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use super::compiler::{CompiledExpression, ExpressionCompiler};
use super::error::ExpressionResult;
use super::types::TypeVocabulary;
use crate::model::Value;
use crate::render::RenderContext;

/// Tag key of the compiled-expression table in a render context
pub const EXPRESSION_CACHE_TAG: &str = "bi_report.expression_cache";

type ExpressionCache = FxHashMap<String, Arc<CompiledExpression>>;

static SIMPLE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{Nd}_\s]+$").expect("simple identifier pattern is valid"));

/// Check if text is a bare scope lookup rather than an expression
pub fn is_simple_identifier(text: &str) -> bool {
    SIMPLE_IDENTIFIER.is_match(text)
}

/// Evaluates expression text against render contexts
#[derive(Debug)]
pub struct ExpressionEvaluator {
    vocabulary: Arc<TypeVocabulary>,
    caching: bool,
    compilations: AtomicUsize,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(TypeVocabulary::standard()))
    }
}

impl ExpressionEvaluator {
    /// Create an evaluator over a vocabulary
    pub fn new(vocabulary: Arc<TypeVocabulary>) -> Self {
        Self {
            vocabulary,
            caching: true,
            compilations: AtomicUsize::new(0),
        }
    }

    /// Enable or disable the per-context compilation cache
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        self
    }

    /// The type vocabulary
    pub fn vocabulary(&self) -> &Arc<TypeVocabulary> {
        &self.vocabulary
    }

    /// Number of compilations performed
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    /// Evaluate `text` in `context`
    pub fn evaluate(&self, context: &RenderContext<'_>, text: &str) -> ExpressionResult<Value> {
        if is_simple_identifier(text) {
            return Ok(self.lookup(context, text));
        }

        let compiled = if self.caching {
            let owner = context.parent().unwrap_or(context);
            self.cached(owner, text)?
        } else {
            Arc::new(self.compile(text)?)
        };
        compiled.evaluate(context.scope())
    }

    /// Search the scope chain for `key`, innermost first
    pub fn lookup(&self, context: &RenderContext<'_>, key: &str) -> Value {
        let mut current = Some(context);
        while let Some(ctx) = current {
            if let Some(value) = ctx.scope().try_get(key) {
                return value;
            }
            current = ctx.parent();
        }
        log::trace!("'{key}' is not bound in any enclosing scope");
        Value::Empty
    }

    /// Compile expression text without caching
    pub fn compile(&self, text: &str) -> ExpressionResult<CompiledExpression> {
        self.compilations.fetch_add(1, Ordering::Relaxed);
        log::trace!("compiling expression '{text}'");
        ExpressionCompiler::new(&self.vocabulary).compile(text)
    }

    fn cached(
        &self,
        owner: &RenderContext<'_>,
        text: &str,
    ) -> ExpressionResult<Arc<CompiledExpression>> {
        let hit = owner.with_tag(EXPRESSION_CACHE_TAG, |cache: &mut ExpressionCache| {
            cache.get(text).cloned()
        });
        if let Some(compiled) = hit {
            return Ok(compiled);
        }

        let compiled = Arc::new(self.compile(text)?);
        owner.with_tag(EXPRESSION_CACHE_TAG, |cache: &mut ExpressionCache| {
            cache.insert(text.to_string(), Arc::clone(&compiled));
        });
        Ok(compiled)
    }
}
