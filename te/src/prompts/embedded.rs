//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Per-day edit prompt sent with every chat request
pub const EDIT: &str = include_str!("../../prompts/edit.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "edit" => Some(EDIT),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_edit() {
        let edit = get_embedded("edit").unwrap();
        assert!(edit.contains("{{request}}"));
        assert!(edit.contains("ONLY the fields you changed"));
        assert!(edit.contains("timeSlots"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
