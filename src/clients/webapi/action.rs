//! WebAPI action names.

/// Prefix shared by every WebAPI action.
pub const ACTION_PREFIX: &str = "do";

/// Resolves a method name to the canonical WebAPI action name.
///
/// Names starting with `do` are returned unchanged. Otherwise `do` is
/// prepended and the first letter of the remainder upper-cased.
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::webapi::action_name;
///
/// assert_eq!(action_name("getSession"), "doGetSession");
/// assert_eq!(action_name("doGetSession"), "doGetSession");
/// assert_eq!(action_name(&action_name("getSession")), "doGetSession");
/// ```
#[must_use]
pub fn action_name(name: &str) -> String {
    if name.starts_with(ACTION_PREFIX) {
        return name.to_string();
    }
    format!("{ACTION_PREFIX}{}", upper_first(name))
}

/// Returns the document/literal request element for an action,
/// e.g. `doLogin` → `DoLoginRequest`.
#[must_use]
pub fn request_element(action: &str) -> String {
    format!("{}Request", upper_first(action))
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
