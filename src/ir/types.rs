use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// Coarse shape of a [`Type`], used where only the category matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Int,
    Bool,
    Float,
    Void,
}

/// Scalar type descriptor. Equality is structural: kind, width and
/// signedness must all match, and no conversion between types is implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int { bits: u16, signedness: Signedness },
    Bool,
    Float { bits: u16 },
    Void,
}

impl Type {
    pub fn i32() -> Self {
        Type::Int {
            bits: 32,
            signedness: Signedness::Signed,
        }
    }

    pub fn u32() -> Self {
        Type::Int {
            bits: 32,
            signedness: Signedness::Unsigned,
        }
    }

    pub fn bool() -> Self {
        Type::Bool
    }

    pub fn f32() -> Self {
        Type::Float { bits: 32 }
    }

    pub fn f64() -> Self {
        Type::Float { bits: 64 }
    }

    pub fn void() -> Self {
        Type::Void
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Int { .. } => TypeKind::Int,
            Type::Bool => TypeKind::Bool,
            Type::Float { .. } => TypeKind::Float,
            Type::Void => TypeKind::Void,
        }
    }

    pub fn bits(&self) -> Option<u16> {
        match self {
            Type::Int { bits, .. } | Type::Float { bits } => Some(*bits),
            Type::Bool | Type::Void => None,
        }
    }

    pub fn signedness(&self) -> Option<Signedness> {
        match self {
            Type::Int { signedness, .. } => Some(*signedness),
            _ => None,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int { .. })
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float { .. })
    }

    pub fn is_numeric(&self) -> bool {
        self.is_int() || self.is_float()
    }

    /// Short symbol used in diagnostics and IR dumps: `I32`, `U32`, `Bool`, `F64`, `Void`.
    pub fn short(&self) -> String {
        match self {
            Type::Int { bits, signedness } => {
                let prefix = match signedness {
                    Signedness::Signed => 'I',
                    Signedness::Unsigned => 'U',
                };
                format!("{}{}", prefix, bits)
            }
            Type::Bool => "Bool".to_string(),
            Type::Float { bits } => format!("F{}", bits),
            Type::Void => "Void".to_string(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}
