//! Coercion from script values to enumerants
//!
//! Built once per enumeration type. Text is matched case-insensitively
//! against the declared constant names; numbers select by ordinal.

use hostwire_sdk::{HostType, HostValue, InteropError, InteropResult};
use rustc_hash::FxHashMap;

use super::CoercionFactory;

/// Name/ordinal lookup tables for one enumeration type
pub struct EnumCoercion {
    ty: HostType,
    /// Constants in ordinal order
    constants: Vec<HostValue>,
    /// Lower-cased names in ordinal order
    names: Vec<String>,
    by_name: FxHashMap<String, usize>,
    strict: bool,
}

impl EnumCoercion {
    /// Build the tables for `ty`; fails if `ty` is not an enumeration
    pub fn of(ty: &HostType) -> InteropResult<Self> {
        if !ty.is_enum() {
            return Err(InteropError::Configuration(format!(
                "Type {} is not an enum!",
                ty.name()
            )));
        }
        Ok(Self::build(ty))
    }

    pub(crate) fn build(ty: &HostType) -> Self {
        let constants: Vec<HostValue> = ty
            .enum_constants()
            .iter()
            .cloned()
            .map(HostValue::Enum)
            .collect();
        let names: Vec<String> = ty
            .enum_constants()
            .iter()
            .map(|c| c.name().to_lowercase())
            .collect();

        let mut by_name = FxHashMap::default();
        for (ordinal, name) in names.iter().enumerate() {
            by_name.entry(name.clone()).or_insert(ordinal);
        }

        tracing::debug!(ty = %ty, constants = constants.len(), "built enum coercion");
        Self {
            ty: ty.clone(),
            constants,
            names,
            by_name,
            strict: false,
        }
    }

    /// Reject inputs that are neither text, numbers, null, nor own enumerants
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enumeration type
    pub fn host_type(&self) -> &HostType {
        &self.ty
    }

    /// Number of constants
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Whether the enumeration declares no constants
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Lower-cased constant names in ordinal order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Constant at `ordinal`
    pub fn get(&self, ordinal: usize) -> Option<&HostValue> {
        self.constants.get(ordinal)
    }

    /// Constant whose name matches `name` ignoring case
    pub fn value_of(&self, name: &str) -> Option<&HostValue> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&ordinal| &self.constants[ordinal])
    }

    /// Lower-cased name of an enumerant of this type
    pub fn name_of(&self, value: &HostValue) -> Option<&str> {
        match value {
            HostValue::Enum(e) if e.belongs_to(&self.ty) => {
                self.names.get(e.ordinal() as usize).map(String::as_str)
            }
            _ => None,
        }
    }

    /// Convert `value` to an enumerant.
    ///
    /// - text: empty gives null, otherwise a case-insensitive name match
    /// - number: ordinal, truncated toward zero, must be in range
    /// - null and enumerants of this type pass through
    /// - anything else passes through unchanged unless strict
    pub fn wrap(&self, value: &HostValue) -> InteropResult<HostValue> {
        match value {
            HostValue::String(s) => {
                let lower = s.to_lowercase();
                if lower.is_empty() {
                    return Ok(HostValue::Null);
                }
                match self.by_name.get(&lower) {
                    Some(&ordinal) => Ok(self.constants[ordinal].clone()),
                    None => Err(InteropError::Value(format!(
                        "'{}' is not a valid enum constant! Valid values are: {}",
                        lower,
                        self.names
                            .iter()
                            .map(|n| format!("'{}'", n))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))),
                }
            }
            HostValue::Int(i) => self.by_ordinal(*i),
            HostValue::Number(f) => self.by_ordinal(*f as i64),
            HostValue::Null => Ok(HostValue::Null),
            HostValue::Enum(e) if e.belongs_to(&self.ty) => Ok(value.clone()),
            other if self.strict => Err(InteropError::Value(format!(
                "Cannot convert {} to {}",
                other.kind_name(),
                self.ty
            ))),
            other => Ok(other.clone()),
        }
    }

    fn by_ordinal(&self, index: i64) -> InteropResult<HostValue> {
        if index < 0 || index as usize >= self.constants.len() {
            return Err(InteropError::Value(if self.constants.is_empty() {
                format!("{} is not a valid enum index! {} has no constants", index, self.ty)
            } else {
                format!(
                    "{} is not a valid enum index! Valid values are: 0 - {}",
                    index,
                    self.constants.len() - 1
                )
            }));
        }
        Ok(self.constants[index as usize].clone())
    }
}

impl CoercionFactory for EnumCoercion {
    fn wrap(&self, value: &HostValue, _target: &HostType) -> InteropResult<HostValue> {
        EnumCoercion::wrap(self, value)
    }
}

impl std::fmt::Debug for EnumCoercion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumCoercion")
            .field("type", &self.ty)
            .field("names", &self.names)
            .field("strict", &self.strict)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostwire_sdk::TypeBuilder;

    fn color() -> HostType {
        TypeBuilder::enumeration("demo.Color")
            .constant("RED")
            .constant("GREEN")
            .constant("BLUE")
            .build()
    }

    #[test]
    fn test_wrap_by_name() {
        let ty = color();
        let coercion = EnumCoercion::of(&ty).unwrap();

        let green = coercion.wrap(&"green".into()).unwrap();
        assert_eq!(green, HostValue::Enum(ty.enum_constants()[1].clone()));
        assert_eq!(coercion.wrap(&"GREEN".into()).unwrap(), green);
        assert_eq!(coercion.wrap(&"GrEeN".into()).unwrap(), green);
        assert!(coercion.wrap(&"".into()).unwrap().is_null());
    }

    #[test]
    fn test_wrap_unknown_name_lists_valid_names() {
        let coercion = EnumCoercion::of(&color()).unwrap();
        let err = coercion.wrap(&"Purple".into()).unwrap_err();
        assert_eq!(
            err,
            InteropError::Value(
                "'purple' is not a valid enum constant! Valid values are: 'red', 'green', 'blue'"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_wrap_by_ordinal() {
        let ty = color();
        let coercion = EnumCoercion::of(&ty).unwrap();

        assert_eq!(
            coercion.wrap(&HostValue::Int(2)).unwrap(),
            HostValue::Enum(ty.enum_constants()[2].clone())
        );
        assert_eq!(
            coercion.wrap(&HostValue::Number(0.9)).unwrap(),
            HostValue::Enum(ty.enum_constants()[0].clone())
        );

        let err = coercion.wrap(&HostValue::Int(3)).unwrap_err();
        assert_eq!(
            err,
            InteropError::Value("3 is not a valid enum index! Valid values are: 0 - 2".to_string())
        );
        assert!(coercion.wrap(&HostValue::Int(-1)).is_err());
    }

    #[test]
    fn test_identity_fallback() {
        let ty = color();
        let lenient = EnumCoercion::of(&ty).unwrap();
        assert_eq!(lenient.wrap(&HostValue::Bool(true)).unwrap(), HostValue::Bool(true));

        let strict = EnumCoercion::of(&ty).unwrap().strict(true);
        assert!(matches!(
            strict.wrap(&HostValue::Bool(true)),
            Err(InteropError::Value(_))
        ));

        let own = HostValue::Enum(ty.enum_constants()[0].clone());
        assert_eq!(strict.wrap(&own).unwrap(), own);
        assert!(strict.wrap(&HostValue::Null).unwrap().is_null());
    }

    #[test]
    fn test_foreign_enumerant_is_not_own() {
        let ty = color();
        let other = TypeBuilder::enumeration("demo.Shade").constant("RED").build();
        let strict = EnumCoercion::of(&ty).unwrap().strict(true);

        let foreign = HostValue::Enum(other.enum_constants()[0].clone());
        assert!(strict.wrap(&foreign).is_err());
        assert_eq!(strict.name_of(&foreign), None);
    }

    #[test]
    fn test_name_lookups() {
        let ty = color();
        let coercion = EnumCoercion::of(&ty).unwrap();

        assert_eq!(coercion.names(), &["red", "green", "blue"]);
        assert_eq!(coercion.len(), 3);
        let blue = coercion.value_of("Blue").unwrap().clone();
        assert_eq!(coercion.name_of(&blue), Some("blue"));
        assert_eq!(coercion.get(0), Some(&HostValue::Enum(ty.enum_constants()[0].clone())));
    }

    #[test]
    fn test_non_enum_type_rejected() {
        let plain = TypeBuilder::class("demo.NotEnum").build();
        assert!(matches!(
            EnumCoercion::of(&plain),
            Err(InteropError::Configuration(_))
        ));
    }
}
