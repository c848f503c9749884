use std::fmt;
use num_enum::TryFromPrimitive;

use crate::native::StatusCode;

/// Render a raw discriminant as its variant name, or as hex when unknown.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Display name of a native status code (`BufError`, `NoSwNoHw`, `0x..`).
pub fn status_name(code: &i32) -> String {
    enum_name_or_hex::<StatusCode>(*code)
}

/// Parse an environment value into `T`, trimming whitespace.
/// Returns `Ok(None)` when the variable is unset.
pub fn env_parse<T>(key: &str) -> Result<Option<T>, String>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("{key}={raw:?}: {e}")),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(format!("{key}: {e}")),
    }
}
