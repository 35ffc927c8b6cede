// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property declarations.
//!
//! A [`Property<T>`] is a typed handle to an immutable [`PropertyDef`]. The
//! definition carries everything the engine needs (value type, default,
//! validators, trimming policy and alias requests); names are not part of it
//! and are derived later from the group the property is registered in.
//!
//! Identity is reference identity: every definition gets a process-unique
//! [`PropertyId`] when it is built, and two definitions are equal only if they
//! share that id.

use crate::domain::name::AliasRequest;
use crate::domain::validator::Validator;
use crate::domain::value::{Trimmer, Value, ValueType};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_PROPERTY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a property definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(u64);

impl PropertyId {
    fn next() -> Self {
        PropertyId(NEXT_PROPERTY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The untyped definition of a property.
#[derive(Debug)]
pub struct PropertyDef {
    id: PropertyId,
    value_type: ValueType,
    default: Option<Value>,
    required: bool,
    validators: Vec<Arc<dyn Validator>>,
    trimmer: Trimmer,
    aliases: Vec<AliasRequest>,
    description: Option<String>,
}

impl PropertyDef {
    /// Returns the identity of this definition.
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// Returns the parse/serialize contract.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns true if the property must end up with a value.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the attached validators.
    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    /// Returns the whitespace policy for raw text.
    pub fn trimmer(&self) -> Trimmer {
        self.trimmer
    }

    /// Returns the requested aliases.
    pub fn aliases(&self) -> &[AliasRequest] {
        &self.aliases
    }

    /// Returns the human readable description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns a label usable before the property has a name.
    pub fn label(&self) -> String {
        match &self.description {
            Some(description) => format!("{} ({})", self.id, description),
            None => format!("property {}", self.id),
        }
    }
}

impl PartialEq for PropertyDef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PropertyDef {}

/// A Rust type a property can hold.
pub trait PropertyType: Sized + Send + Sync + 'static {
    /// The value type used for parsing.
    const VALUE_TYPE: ValueType;

    /// Extracts the typed value.
    fn from_value(value: &Value) -> Option<Self>;

    /// Wraps the typed value.
    fn into_value(self) -> Value;
}

impl PropertyType for String {
    const VALUE_TYPE: ValueType = ValueType::Str;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl PropertyType for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl PropertyType for i32 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i32()
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl PropertyType for i64 {
    const VALUE_TYPE: ValueType = ValueType::Long;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Long(self)
    }
}

impl PropertyType for f64 {
    const VALUE_TYPE: ValueType = ValueType::Double;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

/// A typed handle to a property definition.
///
/// Cloning a handle is cheap and keeps the identity.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::property::Property;
/// use hexprop::domain::validator::NumberBound;
///
/// let port: Property<i32> = Property::builder()
///     .default_value(8080)
///     .validator(NumberBound::greater_than(0))
///     .alias("port")
///     .description("Listening port")
///     .build();
///
/// assert!(!port.is_required());
/// assert_eq!(port.typed_default(), Some(8080));
/// ```
pub struct Property<T> {
    def: Arc<PropertyDef>,
    _type: PhantomData<fn() -> T>,
}

impl<T: PropertyType> Property<T> {
    /// Starts declaring a property.
    pub fn builder() -> PropertyBuilder<T> {
        PropertyBuilder::new(T::VALUE_TYPE)
    }

    /// Declares a property with no default, validators or aliases.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns the default value converted to `T`.
    pub fn typed_default(&self) -> Option<T> {
        self.def.default_value().and_then(T::from_value)
    }
}

impl Property<bool> {
    /// Starts declaring a flag: a boolean that defaults to false and is set
    /// to true by its mere presence in sources that support flags.
    pub fn flag() -> PropertyBuilder<bool> {
        let mut builder = PropertyBuilder::new(ValueType::Flag);
        builder.default = Some(Value::Bool(false));
        builder
    }
}

impl<T> Property<T> {
    /// Returns the shared definition.
    pub fn def(&self) -> &Arc<PropertyDef> {
        &self.def
    }
}

impl<T: PropertyType> Default for Property<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            def: Arc::clone(&self.def),
            _type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.def.id)
            .field("value_type", &self.def.value_type)
            .finish()
    }
}

impl<T> Deref for Property<T> {
    type Target = PropertyDef;

    fn deref(&self) -> &PropertyDef {
        &self.def
    }
}

impl<T> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        self.def.id == other.def.id
    }
}

impl<T> Eq for Property<T> {}

/// Builder for [`Property`].
#[derive(Debug)]
pub struct PropertyBuilder<T> {
    value_type: ValueType,
    default: Option<Value>,
    required: bool,
    validators: Vec<Arc<dyn Validator>>,
    trimmer: Option<Trimmer>,
    aliases: Vec<AliasRequest>,
    description: Option<String>,
    _type: PhantomData<fn() -> T>,
}

impl<T: PropertyType> PropertyBuilder<T> {
    fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            default: None,
            required: false,
            validators: Vec::new(),
            trimmer: None,
            aliases: Vec::new(),
            description: None,
            _type: PhantomData,
        }
    }

    /// Sets the value used when no loader supplies one.
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(value.into_value());
        self
    }

    /// Marks the property as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a validator.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Overrides the whitespace policy.
    pub fn trimmer(mut self, trimmer: Trimmer) -> Self {
        self.trimmer = Some(trimmer);
        self
    }

    /// Requests an alias used both to read and to export values.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(AliasRequest::new(name, true, true));
        self
    }

    /// Requests an alias used only to read values.
    pub fn alias_in(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(AliasRequest::new(name, true, false));
        self
    }

    /// Requests an alias used only to export values.
    pub fn alias_out(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(AliasRequest::new(name, false, true));
        self
    }

    /// Sets a human readable description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the property, assigning it a new identity.
    pub fn build(self) -> Property<T> {
        let def = PropertyDef {
            id: PropertyId::next(),
            value_type: self.value_type,
            default: self.default,
            required: self.required,
            validators: self.validators,
            trimmer: self
                .trimmer
                .unwrap_or_else(|| self.value_type.default_trimmer()),
            aliases: self.aliases,
            description: self.description,
        };
        Property {
            def: Arc::new(def),
            _type: PhantomData,
        }
    }
}
