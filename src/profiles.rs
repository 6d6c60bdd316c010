//! Named, reusable fragments of a fluent validation chain.

use crate::builder::ValidationBuilder;
use crate::metadata::Validatable;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A chain fragment for targets of type `T`.
pub type Profile<T> =
    Arc<dyn for<'a> Fn(ValidationBuilder<'a, T>) -> ValidationBuilder<'a, T> + Send + Sync>;

struct Entry {
    target: TypeId,
    target_name: &'static str,
    profile: Arc<dyn Any + Send + Sync>,
}

/// Profiles by name. Each profile is bound to one target type; asking
/// for it with another type finds nothing.
///
/// ```
/// use veritas::{Validate, Validator};
///
/// #[derive(Validate)]
/// struct Signup {
///     email: String,
///     password: String,
/// }
///
/// let validator = Validator::new();
/// validator.profiles().register::<Signup, _>("signup", |builder| {
///     builder
///         .is_email("email", "")
///         .has_length_between("password", 8, 64, "")
/// });
///
/// let signup = Signup { email: "x".into(), password: "hunter2".into() };
/// let result = validator.check(&signup).apply_profile("signup").validate();
/// assert_eq!(result.len(), 2);
/// ```
#[derive(Default)]
pub struct ProfileRegistry {
    profiles: RwLock<HashMap<String, Entry>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `profile` for targets of type `T`, replacing any profile of
    /// the same name.
    pub fn register<T, F>(&self, name: impl Into<String>, profile: F)
    where
        T: Validatable,
        F: for<'a> Fn(ValidationBuilder<'a, T>) -> ValidationBuilder<'a, T> + Send + Sync + 'static,
    {
        let profile: Profile<T> = Arc::new(profile);
        let entry = Entry {
            target: TypeId::of::<T>(),
            target_name: std::any::type_name::<T>(),
            profile: Arc::new(profile),
        };
        self.profiles.write().insert(name.into(), entry);
    }

    /// Profile `name` if it was registered for `T`.
    pub fn get<T: Validatable>(&self, name: &str) -> Option<Profile<T>> {
        let profiles = self.profiles.read();
        let entry = profiles.get(name)?;
        if entry.target != TypeId::of::<T>() {
            return None;
        }
        entry.profile.downcast_ref::<Profile<T>>().cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

impl fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profiles = self.profiles.read();
        let mut map = f.debug_map();
        for (name, entry) in profiles.iter() {
            map.entry(name, &entry.target_name);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TypeMetadata, Validator};

    struct First;
    struct Second;

    impl Validatable for First {
        fn describe() -> TypeMetadata {
            TypeMetadata::of::<Self>()
        }
    }

    impl Validatable for Second {
        fn describe() -> TypeMetadata {
            TypeMetadata::of::<Self>()
        }
    }

    #[test]
    fn test_profile_is_typed() {
        let registry = ProfileRegistry::new();
        registry.register::<First, _>("p", |builder| builder.custom_rule(|_| false, "first"));

        assert!(registry.contains("p"));
        assert!(registry.get::<First>("p").is_some());
        assert!(registry.get::<Second>("p").is_none());
        assert!(registry.get::<First>("q").is_none());
    }

    #[test]
    fn test_apply_profile() {
        let validator = Validator::new();
        validator
            .profiles()
            .register::<First, _>("p", |builder| builder.custom_rule(|_| false, "from profile"));

        let result = validator.check(&First).apply_profile("p").validate();
        assert_eq!(result.messages(), ["from profile"]);

        let result = validator.check(&Second).apply_profile("p").validate();
        assert_eq!(result.messages(), ["No profile found for: p"]);
    }

    #[test]
    fn test_profiles_can_nest() {
        let validator = Validator::new();
        validator
            .profiles()
            .register::<First, _>("inner", |builder| builder.custom_rule(|_| false, "inner"));
        validator
            .profiles()
            .register::<First, _>("outer", |builder| builder.apply_profile("inner"));

        let result = validator.check(&First).apply_profile("outer").validate();
        assert_eq!(result.messages(), ["inner"]);
    }
}
