//! SCIM filter expression builders.
//!
//! Only the two shapes this client sends are produced here: equality filters
//! for collection lookups (`displayName eq "Engineers"`) and value-path
//! selectors for member removal (`members[value eq "u-1"]`).
//!
//! Values are inserted verbatim between double quotes. Embedded quotes are
//! not escaped, so a display name containing `"` yields a filter the server
//! may reject or misread.

/// Attribute used to look groups up by name.
pub const ATTR_DISPLAY_NAME: &str = "displayName";

/// Attribute used to look users up by login name.
pub const ATTR_USER_NAME: &str = "userName";

/// Build an equality filter: `<attr> eq "<value>"`.
pub fn eq_filter(attr: &str, value: &str) -> String {
    format!("{attr} eq \"{value}\"")
}

/// Build the canonical member removal path: `members[value eq "<id>"]`.
pub fn member_value_path(id: &str) -> String {
    format!("members[{}]", eq_filter("value", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filter() {
        assert_eq!(
            eq_filter(ATTR_DISPLAY_NAME, "Engineers"),
            r#"displayName eq "Engineers""#
        );
        assert_eq!(eq_filter(ATTR_USER_NAME, "bob"), r#"userName eq "bob""#);
    }

    #[test]
    fn test_eq_filter_does_not_escape_quotes() {
        assert_eq!(
            eq_filter(ATTR_DISPLAY_NAME, r#"a"b"#),
            r#"displayName eq "a"b""#
        );
    }

    #[test]
    fn test_member_value_path() {
        assert_eq!(member_value_path("u-42"), r#"members[value eq "u-42"]"#);
    }
}
