use super::{LowerError, LowerResult};
use crate::ir::Type;

/// Map C type text to an IR type. Whitespace is normalized and
/// qualifiers are ignored; anything outside the scalar subset fails.
pub fn lower_type(text: &str) -> LowerResult<Type> {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|word| !matches!(*word, "const" | "volatile"))
        .collect();
    let ty = match words.join(" ").as_str() {
        "int" | "signed int" | "signed" | "short" | "short int" | "long" | "long int" => {
            Type::i32()
        }
        "unsigned int" | "unsigned" => Type::u32(),
        "bool" | "_Bool" => Type::bool(),
        "float" => Type::f32(),
        "double" => Type::f64(),
        "void" => Type::void(),
        _ => return Err(LowerError::UnsupportedType(text.trim().to_string())),
    };
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_scalar_spellings() {
        assert_eq!(lower_type("int").unwrap(), Type::i32());
        assert_eq!(lower_type("  signed   int ").unwrap(), Type::i32());
        assert_eq!(lower_type("unsigned").unwrap(), Type::u32());
        assert_eq!(lower_type("const unsigned int").unwrap(), Type::u32());
        assert_eq!(lower_type("_Bool").unwrap(), Type::bool());
        assert_eq!(lower_type("double").unwrap(), Type::f64());
        assert_eq!(lower_type("float").unwrap(), Type::f32());
        assert_eq!(lower_type("void").unwrap(), Type::void());
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(
            lower_type("char *"),
            Err(LowerError::UnsupportedType("char *".to_string()))
        );
        assert!(lower_type("long long").is_err());
    }
}
