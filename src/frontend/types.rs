use std::collections::HashMap;

/// Name of the built-in boolean type.
pub const BOOLEAN: &str = "boolean";
/// Name of the built-in 32-bit integer type.
pub const INTEGER: &str = "integer";
/// Name of the built-in 64-bit integer type.
pub const LONG: &str = "long";
/// Name of the built-in single precision type.
pub const SINGLE: &str = "single";
/// Name of the built-in double precision type.
pub const DOUBLE: &str = "double";
/// Name of the built-in string type.
pub const STRING: &str = "string";

/// Rank of types that take no part in arithmetic promotion.
pub const NOT_NUMERIC: i32 = -1;

const BUILTINS: [(&str, i32); 13] = [(BOOLEAN, NOT_NUMERIC),
                                     ("char", NOT_NUMERIC),
                                     ("sbyte", 0),
                                     ("byte", 1),
                                     ("short", 2),
                                     ("ushort", 3),
                                     (INTEGER, 4),
                                     ("uinteger", 5),
                                     (LONG, 6),
                                     ("ulong", 7),
                                     (SINGLE, 8),
                                     (DOUBLE, 9),
                                     (STRING, NOT_NUMERIC)];

/// Whether a type is built into the language or composed from others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    /// A built-in scalar.
    Primitive,
    /// A user-defined composite.
    Aggregate,
}

/// A named datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    /// Unique, lowercase name.
    pub name:  String,
    /// Promotion rank; [`NOT_NUMERIC`] for non-arithmetic types.
    pub rank:  i32,
    /// Primitive or aggregate.
    pub class: TypeClass,
}

impl Type {
    /// A primitive type with the given promotion rank.
    #[must_use]
    pub fn primitive(name: &str, rank: i32) -> Self {
        Self { name: name.to_ascii_lowercase(),
               rank,
               class: TypeClass::Primitive }
    }

    /// An aggregate type; aggregates never take part in arithmetic.
    #[must_use]
    pub fn aggregate(name: &str) -> Self {
        Self { name:  name.to_ascii_lowercase(),
               rank:  NOT_NUMERIC,
               class: TypeClass::Aggregate, }
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.rank >= 0
    }
}

/// Outcome of registering a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The name is now registered.
    Added,
    /// The name was already taken; nothing changed.
    Exists,
    /// An alias named a target that is not registered; nothing changed.
    UnknownTarget,
}

/// Which operand of a binary node receives a cast annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The left operand.
    Left,
    /// The right operand.
    Right,
}

/// Result of arithmetic promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// Type of the arithmetic result.
    pub result: String,
    /// Operand to widen to `result`, if the ranks differ.
    pub cast:   Option<Side>,
}

/// Whether a value may be stored into a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignability {
    /// Both numeric, or the same type.
    Accept,
    /// The target has no type yet and takes the value's type.
    Infer,
    /// Incompatible.
    Reject,
}

/// Every datatype known to one translation session.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Type>,
}

impl TypeRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the thirteen built-in primitives.
    ///
    /// ```
    /// use transbasic::frontend::types::TypeRegistry;
    ///
    /// let types = TypeRegistry::with_builtins();
    /// assert!(types.validate("Integer"));
    /// assert!(!types.validate("variant"));
    /// assert_eq!(types.lookup("double").map(|t| t.rank), Some(9));
    /// ```
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, rank) in BUILTINS {
            registry.register(Type::primitive(name, rank));
        }
        registry
    }

    /// Registers `ty` under its own name. Never overwrites.
    pub fn register(&mut self, ty: Type) -> Registration {
        if self.types.contains_key(&ty.name) {
            return Registration::Exists;
        }
        tracing::debug!(name = %ty.name, rank = ty.rank, "registered type");
        self.types.insert(ty.name.clone(), ty);
        Registration::Added
    }

    /// Registers `name` as an alias sharing the rank and class of `target`.
    ///
    /// ```
    /// use transbasic::frontend::types::{Registration, TypeRegistry};
    ///
    /// let mut types = TypeRegistry::with_builtins();
    /// assert_eq!(types.alias("int32", "integer"), Registration::Added);
    /// assert_eq!(types.alias("int32", "long"), Registration::Exists);
    /// assert_eq!(types.alias("text", "varchar"), Registration::UnknownTarget);
    /// ```
    pub fn alias(&mut self, name: &str, target: &str) -> Registration {
        let Some(base) = self.lookup(target) else {
            return Registration::UnknownTarget;
        };
        let ty = Type { name:  name.to_ascii_lowercase(),
                        rank:  base.rank,
                        class: base.class, };
        self.register(ty)
    }

    /// Finds a type by case-insensitive name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.types.get(&name.to_ascii_lowercase())
    }

    /// Returns `true` when `name` is a registered type.
    #[must_use]
    pub fn validate(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Promotion rank of `name`; unknown or empty names are not numeric.
    #[must_use]
    pub fn rank(&self, name: &str) -> i32 {
        self.lookup(name).map_or(NOT_NUMERIC, |t| t.rank)
    }

    #[must_use]
    pub fn is_numeric(&self, name: &str) -> bool {
        self.rank(name) >= 0
    }

    /// Resolves the type of an arithmetic operation.
    ///
    /// # Errors
    /// Returns the name of the first operand type that is not numeric.
    ///
    /// ```
    /// use transbasic::frontend::types::{Side, TypeRegistry};
    ///
    /// let types = TypeRegistry::with_builtins();
    /// let p = types.promote("integer", "single").unwrap();
    /// assert_eq!(p.result, "single");
    /// assert_eq!(p.cast, Some(Side::Left));
    /// assert_eq!(types.promote("string", "integer").unwrap_err(), "string");
    /// ```
    pub fn promote(&self, left: &str, right: &str) -> Result<Promotion, String> {
        let left_rank = self.rank(left);
        let right_rank = self.rank(right);
        if left_rank < 0 {
            return Err(left.to_string());
        }
        if right_rank < 0 {
            return Err(right.to_string());
        }
        Ok(match left_rank.cmp(&right_rank) {
               std::cmp::Ordering::Equal => Promotion { result: left.to_string(),
                                                        cast:   None, },
               std::cmp::Ordering::Less => Promotion { result: right.to_string(),
                                                       cast:   Some(Side::Left), },
               std::cmp::Ordering::Greater => Promotion { result: left.to_string(),
                                                          cast:   Some(Side::Right), },
           })
    }

    /// Returns `true` when two operand types may be compared.
    ///
    /// Any two numeric types compare without casts; other types only compare
    /// with themselves.
    #[must_use]
    pub fn comparable(&self, left: &str, right: &str) -> bool {
        (self.is_numeric(left) && self.is_numeric(right)) || left.eq_ignore_ascii_case(right)
    }

    /// Decides whether a value of type `value` may be stored into `target`.
    ///
    /// ```
    /// use transbasic::frontend::types::{Assignability, TypeRegistry};
    ///
    /// let types = TypeRegistry::with_builtins();
    /// assert_eq!(types.assignability("byte", "double"), Assignability::Accept);
    /// assert_eq!(types.assignability("string", "string"), Assignability::Accept);
    /// assert_eq!(types.assignability("", "string"), Assignability::Infer);
    /// assert_eq!(types.assignability("integer", "string"), Assignability::Reject);
    /// ```
    #[must_use]
    pub fn assignability(&self, target: &str, value: &str) -> Assignability {
        if self.is_numeric(target) && self.is_numeric(value) {
            Assignability::Accept
        } else if !target.is_empty() && target.eq_ignore_ascii_case(value) {
            Assignability::Accept
        } else if target.is_empty() && !value.is_empty() {
            Assignability::Infer
        } else {
            Assignability::Reject
        }
    }
}

/// Type of an integer literal: `integer` when it fits in 32 bits, else
/// `long`.
#[must_use]
pub fn integer_literal_type(value: i64) -> &'static str {
    if i32::try_from(value).is_ok() { INTEGER } else { LONG }
}
