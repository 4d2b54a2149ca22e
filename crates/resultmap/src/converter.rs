use by_address::ByAddress;
use resultmap_core::{
    schema::db,
    stmt::{self, Value},
    Result,
};
use std::{
    any::TypeId,
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

/// Converts values between their relational and domain representations.
pub trait ValueConverter: fmt::Debug + Send + Sync + 'static {
    /// Type of the converted value
    fn domain_type(&self) -> stmt::Type;

    /// Type of the column the value is stored in
    fn relational_type(&self) -> db::Type;

    fn to_domain(&self, value: Value) -> Result<Value>;

    fn to_relational(&self, value: Value) -> Result<Value>;
}

/// A shared converter instance.
///
/// Converters compare by identity: two builders are equal only if they hold
/// the same instance.
pub type Converter = ByAddress<Arc<dyn ValueConverter>>;

/// Instantiates converters by type and hands out shared instances.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    instances: RwLock<HashMap<TypeId, Arc<dyn ValueConverter>>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry's instance of `C`, creating it on first use.
    pub fn get_or_create<C>(&self) -> Converter
    where
        C: ValueConverter + Default,
    {
        let type_id = TypeId::of::<C>();

        if let Some(instance) = self
            .instances
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&type_id)
        {
            return ByAddress(instance.clone());
        }

        let mut instances = self
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let instance = instances.entry(type_id).or_insert_with(|| {
            tracing::trace!(converter = std::any::type_name::<C>(), "instantiated converter");
            let instance: Arc<dyn ValueConverter> = Arc::new(C::default());
            instance
        });

        ByAddress(instance.clone())
    }

    /// Registers an instance built by the caller, replacing any previous
    /// instance of the same type.
    pub fn register<C: ValueConverter>(&self, converter: C) -> Converter {
        let instance: Arc<dyn ValueConverter> = Arc::new(converter);
        self.instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(TypeId::of::<C>(), instance.clone());
        ByAddress(instance)
    }

    pub fn len(&self) -> usize {
        self.instances
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wraps a converter instance that did not come from a registry.
pub fn converter(instance: impl ValueConverter) -> Converter {
    let instance: Arc<dyn ValueConverter> = Arc::new(instance);
    ByAddress(instance)
}
