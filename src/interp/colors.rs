/// Fixed color table: name → ARGB, read-only after startup.
use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::error::InterpError;
use crate::graphics::Argb;

static COLORS: Lazy<HashMap<&'static str, Argb>> = Lazy::new(|| {
    HashMap::from([
        ("red", [255, 255, 0, 0]),
        ("green", [255, 0, 255, 0]),
        ("blue", [255, 0, 0, 255]),
        ("black", [255, 0, 0, 0]),
        ("white", [255, 255, 255, 255]),
    ])
});

/// Look up a color by name, case-insensitively.
pub fn find(name: &str) -> Result<Argb, InterpError> {
    COLORS
        .get(name.to_lowercase().as_str())
        .copied()
        .ok_or_else(|| InterpError::Argument(format!("the color '{name}' is not defined")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_entries() {
        assert_eq!(find("red").unwrap(), [255, 255, 0, 0]);
        assert_eq!(find("green").unwrap(), [255, 0, 255, 0]);
        assert_eq!(find("blue").unwrap(), [255, 0, 0, 255]);
        assert_eq!(find("black").unwrap(), [255, 0, 0, 0]);
        assert_eq!(find("white").unwrap(), [255, 255, 255, 255]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find("RED").unwrap(), find("red").unwrap());
    }

    #[test]
    fn unknown_color_is_an_argument_error() {
        assert!(matches!(find("magenta"), Err(InterpError::Argument(_))));
    }
}
