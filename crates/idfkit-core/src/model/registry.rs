use crate::{
    model::{SchemaError, object::ObjectModel},
    traits::SchemaProvider,
};
use std::{collections::BTreeMap, sync::Arc};

///
/// SchemaRegistry
///
/// In-memory schema provider keyed by object type.
/// Lookups ignore ASCII case, matching how IDF object types are written.
///

#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    models: BTreeMap<String, Arc<ObjectModel>>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON array of object models.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let models: Vec<ObjectModel> =
            serde_json::from_str(json).map_err(|err| SchemaError::Decode(err.to_string()))?;

        let mut registry = Self::new();
        for model in models {
            registry.register(model)?;
        }

        Ok(registry)
    }

    /// Register one model after validating it.
    pub fn register(&mut self, model: ObjectModel) -> Result<Arc<ObjectModel>, SchemaError> {
        model.validate()?;

        let key = model.name.to_ascii_lowercase();
        if self.models.contains_key(&key) {
            return Err(SchemaError::DuplicateObjectType(model.name));
        }

        let model = Arc::new(model);
        self.models.insert(key, Arc::clone(&model));

        Ok(model)
    }

    #[must_use]
    pub fn get(&self, object_type: &str) -> Option<&Arc<ObjectModel>> {
        self.models.get(&object_type.to_ascii_lowercase())
    }

    /// Iterate registered models in case-folded type order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ObjectModel>> {
        self.models.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl SchemaProvider for SchemaRegistry {
    fn model(&self, object_type: &str) -> Option<Arc<ObjectModel>> {
        self.get(object_type).cloned()
    }
}

///
/// TESTS
///
