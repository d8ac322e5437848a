//! The checker's internal type representation.
//!
//! A [`TypeRepr`] is a linear sequence of modifiers over a terminal base,
//! rather than a boxed chain of nodes, so equality and cloning stay trivial.
//! A reference modifier, when present, appears exactly once at position 0;
//! pointer and array modifiers may nest arbitrarily behind it.

use std::collections::VecDeque;
use std::fmt;

/// One layer wrapped around a base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeModifier {
    /// `&`
    Ref,
    /// `&mut`
    MutRef,
    /// `*`
    Ptr,
    /// `*mut`
    MutPtr,
    /// `[]`
    Array,
}

/// The terminal base of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeBase {
    Bool,
    Int,
    Uint,
    Float,
    UserDefined,
    Implied,
    Void,
    Error,
}

/// Payload of the base: a precision in bits for builtins, a name for
/// user-defined types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeData {
    Precision(u32),
    Name(String),
}

/// A resolved type: modifiers, base, and the base's data.
#[derive(Debug, Clone)]
pub struct TypeRepr {
    modifiers: VecDeque<TypeModifier>,
    base: TypeBase,
    data: TypeData,
}

impl TypeRepr {
    fn bare(base: TypeBase, data: TypeData) -> Self {
        TypeRepr {
            modifiers: VecDeque::new(),
            base,
            data,
        }
    }

    /// The canonical `bool` type.
    pub fn boolean() -> Self {
        Self::bare(TypeBase::Bool, TypeData::Precision(1))
    }

    /// A signed integer of the given width.
    pub fn int(bits: u32) -> Self {
        Self::bare(TypeBase::Int, TypeData::Precision(bits))
    }

    /// An unsigned integer of the given width.
    pub fn uint(bits: u32) -> Self {
        Self::bare(TypeBase::Uint, TypeData::Precision(bits))
    }

    /// A float of the given width.
    pub fn float(bits: u32) -> Self {
        Self::bare(TypeBase::Float, TypeData::Precision(bits))
    }

    /// A user-defined type known only by name.
    pub fn user(name: impl Into<String>) -> Self {
        Self::bare(TypeBase::UserDefined, TypeData::Name(name.into()))
    }

    /// The inference placeholder.
    pub fn implied() -> Self {
        Self::bare(TypeBase::Implied, TypeData::Precision(0))
    }

    /// The type of things that have no value.
    pub fn void() -> Self {
        Self::bare(TypeBase::Void, TypeData::Precision(0))
    }

    /// The poison type. Compares equal to everything so one root cause does
    /// not re-report at every ancestor.
    pub fn error() -> Self {
        Self::bare(TypeBase::Error, TypeData::Precision(0))
    }

    /// Build a type from parts.
    pub fn with_parts(modifiers: VecDeque<TypeModifier>, base: TypeBase, data: TypeData) -> Self {
        TypeRepr {
            modifiers,
            base,
            data,
        }
    }

    /// The modifier sequence, outermost first.
    pub fn modifiers(&self) -> &VecDeque<TypeModifier> {
        &self.modifiers
    }

    /// The terminal base.
    pub fn base(&self) -> TypeBase {
        self.base
    }

    /// The base's data.
    pub fn data(&self) -> &TypeData {
        &self.data
    }

    /// Precision in bits; zero for non-builtin bases.
    pub fn precision(&self) -> u32 {
        match self.data {
            TypeData::Precision(bits) => bits,
            TypeData::Name(_) => 0,
        }
    }

    /// The user-defined name, when the base has one.
    pub fn name(&self) -> Option<&str> {
        match &self.data {
            TypeData::Name(name) => Some(name),
            TypeData::Precision(_) => None,
        }
    }

    /// The outermost modifier, if any.
    pub fn leading(&self) -> Option<TypeModifier> {
        self.modifiers.front().copied()
    }

    /// This type wrapped in one more outer modifier.
    pub fn with_leading(mut self, modifier: TypeModifier) -> Self {
        self.modifiers.push_front(modifier);
        self
    }

    /// This type with its outermost modifier stripped.
    pub fn without_leading(mut self) -> Self {
        self.modifiers.pop_front();
        self
    }

    pub fn is_error(&self) -> bool {
        self.base == TypeBase::Error
    }

    pub fn is_implied(&self) -> bool {
        self.base == TypeBase::Implied
    }

    pub fn is_void(&self) -> bool {
        self.base == TypeBase::Void && self.modifiers.is_empty()
    }

    /// Whether this is an unmodified integer type.
    pub fn is_integer(&self) -> bool {
        self.modifiers.is_empty() && matches!(self.base, TypeBase::Int | TypeBase::Uint)
    }
}

impl PartialEq for TypeRepr {
    fn eq(&self, other: &Self) -> bool {
        // the poison type compares equal to everything, halting cascades
        if self.is_error() || other.is_error() {
            return true;
        }

        self.modifiers == other.modifiers && self.base == other.base && self.data == other.data
    }
}

/// Widening conversion: allowed only between identical base kinds, only for
/// numeric bases, only with matching modifiers, and only towards a
/// greater-or-equal precision. Returns the target type on success.
pub fn promote(from: &TypeRepr, to: &TypeRepr) -> Option<TypeRepr> {
    if from == to {
        return Some(to.clone());
    }

    if from.modifiers != to.modifiers {
        return None;
    }

    let numeric = matches!(from.base, TypeBase::Int | TypeBase::Uint | TypeBase::Float);

    if numeric && from.base == to.base && from.precision() <= to.precision() {
        Some(to.clone())
    } else {
        None
    }
}

impl fmt::Display for TypeRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            match modifier {
                TypeModifier::Ref => write!(f, "&")?,
                TypeModifier::MutRef => write!(f, "&mut ")?,
                TypeModifier::Ptr => write!(f, "*")?,
                TypeModifier::MutPtr => write!(f, "*mut ")?,
                TypeModifier::Array => write!(f, "[]")?,
            }
        }

        match self.base {
            TypeBase::Bool => write!(f, "bool"),
            TypeBase::Int => write!(f, "i{}", self.precision()),
            TypeBase::Uint => write!(f, "u{}", self.precision()),
            TypeBase::Float => write!(f, "f{}", self.precision()),
            TypeBase::UserDefined => write!(f, "{}", self.name().unwrap_or("<unnamed>")),
            TypeBase::Implied => write!(f, "<implied>"),
            TypeBase::Void => write!(f, "void"),
            TypeBase::Error => write!(f, "<error-type>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_memberwise() {
        assert_eq!(TypeRepr::int(32), TypeRepr::int(32));
        assert_ne!(TypeRepr::int(32), TypeRepr::int(64));
        assert_ne!(TypeRepr::int(32), TypeRepr::uint(32));
        assert_ne!(
            TypeRepr::int(32),
            TypeRepr::int(32).with_leading(TypeModifier::Ptr)
        );
    }

    #[test]
    fn test_error_compares_equal_to_everything() {
        assert_eq!(TypeRepr::error(), TypeRepr::int(32));
        assert_eq!(TypeRepr::boolean(), TypeRepr::error());
        assert_eq!(TypeRepr::error(), TypeRepr::error());
        assert_eq!(
            TypeRepr::error(),
            TypeRepr::user("point").with_leading(TypeModifier::MutPtr)
        );
    }

    #[test]
    fn test_promotion_widens_within_base() {
        assert_eq!(
            promote(&TypeRepr::int(8), &TypeRepr::int(64)),
            Some(TypeRepr::int(64))
        );
        assert_eq!(
            promote(&TypeRepr::float(32), &TypeRepr::float(64)),
            Some(TypeRepr::float(64))
        );
        assert_eq!(
            promote(&TypeRepr::int(32), &TypeRepr::int(32)),
            Some(TypeRepr::int(32))
        );
    }

    #[test]
    fn test_promotion_rejects_narrowing_and_cross_base() {
        assert_eq!(promote(&TypeRepr::int(64), &TypeRepr::int(32)), None);
        assert_eq!(promote(&TypeRepr::float(32), &TypeRepr::int(64)), None);
        assert_eq!(promote(&TypeRepr::uint(8), &TypeRepr::int(8)), None);
        assert_eq!(promote(&TypeRepr::boolean(), &TypeRepr::int(8)), None);
    }

    #[test]
    fn test_promotion_requires_matching_modifiers() {
        let ptr_i8 = TypeRepr::int(8).with_leading(TypeModifier::Ptr);
        let ptr_i64 = TypeRepr::int(64).with_leading(TypeModifier::Ptr);

        // same modifiers widen together
        assert_eq!(promote(&ptr_i8, &ptr_i64), Some(ptr_i64.clone()));

        // mismatched modifiers do not
        assert_eq!(promote(&TypeRepr::int(8), &ptr_i64), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeRepr::int(32).to_string(), "i32");
        assert_eq!(TypeRepr::boolean().to_string(), "bool");
        assert_eq!(TypeRepr::void().to_string(), "void");
        assert_eq!(
            TypeRepr::int(8)
                .with_leading(TypeModifier::Array)
                .with_leading(TypeModifier::MutRef)
                .to_string(),
            "&mut []i8"
        );
        assert_eq!(
            TypeRepr::user("vec3").with_leading(TypeModifier::MutPtr).to_string(),
            "*mut vec3"
        );
    }

    #[test]
    fn test_leading_modifier_round_trip() {
        let ty = TypeRepr::int(32)
            .with_leading(TypeModifier::Ptr)
            .with_leading(TypeModifier::MutPtr);

        assert_eq!(ty.leading(), Some(TypeModifier::MutPtr));

        let stripped = ty.without_leading();
        assert_eq!(stripped.leading(), Some(TypeModifier::Ptr));
        assert_eq!(stripped.without_leading(), TypeRepr::int(32));
    }
}
