//! Per-type field tables and the cache that memoizes them.

use crate::constraint::{Constraint, ConstraintKind};
use crate::errors::FieldAccessError;
use crate::value::Value;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A type whose fields carry declared constraints.
///
/// Usually derived with `#[derive(Validate)]`. A hand-written
/// implementation lists each field with an accessor and its constraints:
///
/// ```
/// use veritas::{Constraint, FieldDescriptor, Reflect, TypeMetadata, Validatable, Value};
///
/// struct Tag {
///     label: String,
/// }
///
/// impl Validatable for Tag {
///     fn describe() -> TypeMetadata {
///         TypeMetadata::of::<Self>().field(
///             FieldDescriptor::new("label", |target| {
///                 target.downcast_ref::<Tag>().map(|tag| tag.label.reflect())
///             }),
///             vec![Constraint::size(1, 16)],
///         )
///     }
/// }
/// ```
pub trait Validatable: Any {
    /// Build the field table for this type. Called at most once per cache.
    fn describe() -> TypeMetadata
    where
        Self: Sized;
}

/// Object-safe view of a [`Validatable`] value.
///
/// Lets the engine handle nested objects without knowing their types.
pub trait Inspect: Any {
    /// Cache key of the concrete type.
    fn type_key(&self) -> TypeId;

    /// Name of the concrete type.
    fn type_name(&self) -> &'static str;

    /// Build the concrete type's field table.
    fn describe_type(&self) -> TypeMetadata;

    /// The value as `Any`, for field accessors.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Validatable> Inspect for T {
    fn type_key(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn describe_type(&self) -> TypeMetadata {
        T::describe()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Reads one field off an instance of the owning type.
///
/// Returns `None` when handed an instance of another type.
pub type FieldAccessor = for<'a> fn(&'a dyn Any) -> Option<Value<'a>>;

/// Name of a field plus a way to read it.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    name: &'static str,
    owner: &'static str,
    accessor: FieldAccessor,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, accessor: FieldAccessor) -> Self {
        Self {
            name,
            owner: "",
            accessor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the type declaring the field.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Read the field from `target`.
    pub fn read<'a>(&self, target: &'a dyn Any) -> Result<Value<'a>, FieldAccessError> {
        (self.accessor)(target).ok_or(FieldAccessError::TypeMismatch {
            field: self.name,
            expected: self.owner,
        })
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// A field with its declared constraints, in declaration order.
#[derive(Debug, Clone)]
pub struct FieldMetadata {
    descriptor: FieldDescriptor,
    constraints: Vec<Constraint>,
}

impl FieldMetadata {
    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether a not-null constraint is declared, which also turns on
    /// cascading into the value.
    pub fn requires_presence(&self) -> bool {
        self.constraints
            .iter()
            .any(|constraint| matches!(constraint.kind(), ConstraintKind::NotNull))
    }

    pub fn read<'a>(&self, target: &'a dyn Any) -> Result<Value<'a>, FieldAccessError> {
        self.descriptor.read(target)
    }
}

/// Field table of one type. Immutable once built.
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    type_name: &'static str,
    fields: Vec<FieldMetadata>,
    index: HashMap<&'static str, usize>,
}

impl TypeMetadata {
    /// Empty table for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a field. A repeated name replaces the index entry but keeps
    /// both fields in the ordered list.
    pub fn field(mut self, descriptor: FieldDescriptor, constraints: Vec<Constraint>) -> Self {
        let descriptor = FieldDescriptor {
            owner: self.type_name,
            ..descriptor
        };
        self.index.insert(descriptor.name, self.fields.len());
        self.fields.push(FieldMetadata {
            descriptor,
            constraints,
        });
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }

    /// Field by name.
    pub fn get(&self, name: &str) -> Option<&FieldMetadata> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    /// Total number of declared constraints.
    pub fn constraint_count(&self) -> usize {
        self.fields.iter().map(|field| field.constraints.len()).sum()
    }
}

/// Memoized field tables, keyed by type.
///
/// Each type is described at most once per cache, even when several threads
/// validate it for the first time concurrently. Entries are never evicted.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: DashMap<TypeId, Arc<TypeMetadata>>,
    scans: AtomicUsize,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field table for the runtime type of `target`, scanning it on first use.
    pub fn get(&self, target: &dyn Inspect) -> Arc<TypeMetadata> {
        self.get_or_scan(target.type_key(), || target.describe_type())
    }

    /// Field table for `T`, scanning it on first use.
    pub fn get_for<T: Validatable>(&self) -> Arc<TypeMetadata> {
        self.get_or_scan(TypeId::of::<T>(), T::describe)
    }

    fn get_or_scan(&self, key: TypeId, scan: impl FnOnce() -> TypeMetadata) -> Arc<TypeMetadata> {
        if let Some(entry) = self.entries.get(&key) {
            return Arc::clone(entry.value());
        }

        // The entry guard holds the shard lock, so racing callers wait here
        // and find the populated entry instead of scanning again.
        let entry = self.entries.entry(key).or_insert_with(|| {
            let metadata = scan();
            self.scans.fetch_add(1, Ordering::Relaxed);
            veritas_log::debug!(
                target: "veritas::metadata",
                "scanned {}: {} fields, {} constraints",
                metadata.type_name(),
                metadata.fields().len(),
                metadata.constraint_count()
            );
            Arc::new(metadata)
        });
        Arc::clone(entry.value())
    }

    /// Whether `T` has been scanned.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many scans this cache has performed.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }
}
