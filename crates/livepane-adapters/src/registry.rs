//! Adapter registry: maps verdict kinds to the adapter that renders them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::alpine::AlpineAdapter;
use crate::angular::AngularAdapter;
use crate::html::HtmlAdapter;
use crate::react::ReactAdapter;
use crate::shell::ensure_doctype;
use crate::traits::FrameworkAdapter;
use crate::vanilla::VanillaAdapter;
use crate::verdict::{FrameworkKind, FrameworkVerdict};
use crate::vue::VueAdapter;

/// A registry of framework adapters.
///
/// Kinds without a registered adapter render through the fallback, which is
/// the vanilla adapter unless replaced.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<FrameworkKind, Arc<dyn FrameworkAdapter>>,
    fallback: Arc<dyn FrameworkAdapter>,
}

impl AdapterRegistry {
    /// Create a registry with no adapters; everything renders through vanilla.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            fallback: Arc::new(VanillaAdapter::new()),
        }
    }

    /// Create a registry with every built-in adapter registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HtmlAdapter::new());
        registry.register(ReactAdapter::new());
        registry.register(VueAdapter::new());
        registry.register(AngularAdapter::new());
        registry.register(AlpineAdapter::new());
        registry.register(VanillaAdapter::new());
        registry
    }

    /// Register an adapter for every kind it claims, replacing earlier ones.
    pub fn register<A: FrameworkAdapter + 'static>(&mut self, adapter: A) {
        let adapter: Arc<dyn FrameworkAdapter> = Arc::new(adapter);
        for kind in adapter.kinds() {
            if let Some(previous) = self.adapters.insert(*kind, Arc::clone(&adapter)) {
                tracing::debug!(
                    "Adapter '{}' replaces '{}' for {}",
                    adapter.name(),
                    previous.name(),
                    kind
                );
            }
        }
    }

    /// Adapter registered for `kind`, if any.
    pub fn get(&self, kind: FrameworkKind) -> Option<&dyn FrameworkAdapter> {
        self.adapters.get(&kind).map(|a| a.as_ref())
    }

    /// Kinds with a registered adapter, in classification priority order.
    pub fn kinds(&self) -> Vec<FrameworkKind> {
        FrameworkKind::ALL
            .into_iter()
            .filter(|k| self.adapters.contains_key(k))
            .collect()
    }

    /// Render `source` with the adapter for `verdict.kind`.
    ///
    /// The result always starts with exactly one doctype.
    pub fn render(&self, source: &str, verdict: &FrameworkVerdict) -> String {
        let adapter = match self.adapters.get(&verdict.kind) {
            Some(adapter) => adapter.as_ref(),
            None => {
                tracing::debug!(
                    "No adapter for {}, falling back to '{}'",
                    verdict.kind,
                    self.fallback.name()
                );
                self.fallback.as_ref()
            }
        };

        ensure_doctype(&adapter.render(source, verdict))
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("kinds", &self.kinds())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use pretty_assertions::assert_eq;

    struct Upper;

    impl FrameworkAdapter for Upper {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn kinds(&self) -> &[FrameworkKind] {
            &[FrameworkKind::Html]
        }

        fn render(&self, source: &str, _verdict: &FrameworkVerdict) -> String {
            source.to_uppercase()
        }
    }

    #[test]
    fn defaults_cover_every_kind() {
        let registry = AdapterRegistry::with_defaults();

        assert_eq!(registry.kinds(), FrameworkKind::ALL.to_vec());
        assert_eq!(registry.get(FrameworkKind::Svelte).unwrap().name(), "vanilla");
        assert_eq!(registry.get(FrameworkKind::Html).unwrap().name(), "html");
    }

    #[test]
    fn unregistered_kinds_use_vanilla() {
        let registry = AdapterRegistry::new();
        let html = registry.render("console.log(1);", &FrameworkVerdict::for_kind(FrameworkKind::React));

        assert!(html.contains("<script>\nconsole.log(1);\n</script>"));
        assert!(!html.contains("react"));
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = AdapterRegistry::with_defaults();
        registry.register(Upper);

        let html = registry.render("<!doctype html><p>x</p>", &FrameworkVerdict::for_kind(FrameworkKind::Html));

        assert_eq!(html, "<!DOCTYPE HTML><P>X</P>");
    }

    #[test]
    fn pass_through_gains_a_doctype() {
        let registry = AdapterRegistry::with_defaults();
        let source = "<html><body><p>x</p></body></html>";

        let html = registry.render(source, &classify(source));

        assert_eq!(html, format!("<!DOCTYPE html>\n{source}"));
    }

    #[test]
    fn every_output_has_one_doctype() {
        let registry = AdapterRegistry::with_defaults();
        let inputs = [
            "",
            "<p>plain</p>",
            "function App() { return <div />; }",
            "<template><p>{{ a }}</p></template><script>export default { data() { return { a: 1 }; } }</script>",
            "@Component({ template: `<p>{{title}}</p>` })\nexport class A { title = 'x'; }",
            "<div x-data=\"{ a: 1 }\" x-show=\"a\"></div>",
            "<script>export let name;</script><style>p {}</style>",
        ];

        for input in inputs {
            let html = registry.render(input, &classify(input));
            assert_eq!(html.to_lowercase().matches("<!doctype").count(), 1, "{input}");
        }
    }

    #[test]
    fn complete_documents_are_stable() {
        let registry = AdapterRegistry::with_defaults();
        let doc = "<!DOCTYPE html>\n<html><body><p>x</p></body></html>";

        let once = registry.render(doc, &classify(doc));
        let twice = registry.render(&once, &classify(&once));

        assert_eq!(once, doc);
        assert_eq!(twice, once);
    }
}
