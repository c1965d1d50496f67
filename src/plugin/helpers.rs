//! The seam plugins use to reach the engine.

use super::error::PluginError;
use super::loader::Loader;
use super::validation::Validator;
use crate::resmap::{ResMap, ResMapFactory};

/// PluginHelpers bundles what a plugin may need during configuration:
/// a loader for referenced files, a validator and a collection factory.
pub struct PluginHelpers {
    loader: Box<dyn Loader>,
    validator: Box<dyn Validator>,
    factory: ResMapFactory,
}

impl PluginHelpers {
    pub fn new(loader: Box<dyn Loader>, validator: Box<dyn Validator>, factory: ResMapFactory) -> Self {
        PluginHelpers {
            loader,
            validator,
            factory,
        }
    }

    pub fn loader(&self) -> &dyn Loader {
        self.loader.as_ref()
    }

    pub fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }

    pub fn res_map_factory(&self) -> &ResMapFactory {
        &self.factory
    }
}

/// Configurable plugins accept a YAML configuration blob.
pub trait Configurable {
    fn config(&mut self, helpers: &PluginHelpers, config: &[u8]) -> Result<(), PluginError>;
}

/// Generator makes new resources.
pub trait Generator {
    fn generate(&self) -> Result<ResMap, PluginError>;
}

/// Transformer modifies a collection in place.
pub trait Transformer {
    fn transform(&self, m: &mut ResMap) -> Result<(), PluginError>;
}

/// A configurable [`Generator`].
pub trait GeneratorPlugin: Generator + Configurable {}

impl<T: Generator + Configurable> GeneratorPlugin for T {}

/// A configurable [`Transformer`].
pub trait TransformerPlugin: Transformer + Configurable {}

impl<T: Transformer + Configurable> TransformerPlugin for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{MemoryLoader, MetadataValidator};
    use crate::resource::Behavior;
    use pretty_assertions::assert_eq;

    /// Emits whatever resources its config holds, with a fixed behavior.
    #[derive(Default)]
    struct InlineGenerator {
        resources: Vec<u8>,
        factory: ResMapFactory,
        behavior: Behavior,
    }

    impl Configurable for InlineGenerator {
        fn config(&mut self, helpers: &PluginHelpers, config: &[u8]) -> Result<(), PluginError> {
            self.resources = config.to_vec();
            self.factory = helpers.res_map_factory().clone();
            self.behavior = Behavior::Merge;
            Ok(())
        }
    }

    impl Generator for InlineGenerator {
        fn generate(&self) -> Result<ResMap, PluginError> {
            let m = self.factory.from_bytes(&self.resources)?;
            for r in m.resources() {
                r.borrow_mut().set_behavior(self.behavior);
            }
            Ok(m)
        }
    }

    fn helpers() -> PluginHelpers {
        PluginHelpers::new(
            Box::new(MemoryLoader::new("base")),
            Box::new(MetadataValidator),
            ResMapFactory::default(),
        )
    }

    fn run(plugin: &mut dyn GeneratorPlugin, h: &PluginHelpers, cfg: &[u8]) -> ResMap {
        plugin.config(h, cfg).unwrap();
        plugin.generate().unwrap()
    }

    #[test]
    fn test_generator_pipeline_absorbs_into_base() {
        let h = helpers();
        let mut base = h
            .res_map_factory()
            .from_bytes(b"apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm\ndata:\n  a: '1'\n")
            .unwrap();

        let mut generator = InlineGenerator::default();
        let generated = run(
            &mut generator,
            &h,
            b"apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm\ndata:\n  b: '2'\n",
        );
        base.absorb_all(generated).unwrap();

        let cm = base.get_by_index(0).unwrap();
        assert_eq!(cm.borrow().node().get_data_map().unwrap().len(), 2);
        assert_eq!(h.loader().root(), "base");
    }
}
