//! Hostname matching for the `host` selector.

/// Returns `true` if any of `names` matches the host `fqdn`.
///
/// The FQDN is compared case-insensitively. A name matches when it is `*`,
/// equals the FQDN, equals the short hostname (the FQDN up to the first
/// `.`), or starts with `.` and is a suffix of the FQDN.
#[must_use]
pub fn matches(names: &[String], fqdn: &str) -> bool {
    let fqdn = fqdn.to_lowercase();
    let short = fqdn.split('.').next().unwrap_or_default();
    names.iter().any(|name| {
        name == "*"
            || *name == fqdn
            || name == short
            || (name.starts_with('.') && fqdn.ends_with(name.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn wildcard_matches_any_host() {
        assert!(matches(&names(&["*"]), "anything.example.org"));
    }

    #[test]
    fn exact_fqdn_matches() {
        assert!(matches(&names(&["box.example.com"]), "box.example.com"));
    }

    #[test]
    fn short_name_matches() {
        assert!(matches(&names(&["box"]), "box.example.com"));
    }

    #[test]
    fn domain_suffix_matches() {
        assert!(matches(&names(&[".example.com"]), "box.example.com"));
        assert!(!matches(&names(&[".example.com"]), "box.example.org"));
    }

    #[test]
    fn fqdn_is_lower_cased() {
        assert!(matches(&names(&["box"]), "BOX.Example.COM"));
    }

    #[test]
    fn partial_name_does_not_match() {
        assert!(!matches(&names(&["bo"]), "box.example.com"));
        assert!(!matches(&names(&["example.com"]), "box.example.com"));
    }

    #[test]
    fn host_without_domain_matches_own_name() {
        assert!(matches(&names(&["laptop"]), "laptop"));
    }

    #[test]
    fn any_name_in_list_suffices() {
        assert!(matches(&names(&["desktop", "laptop"]), "laptop.lan"));
    }

    #[test]
    fn empty_list_never_matches() {
        assert!(!matches(&[], "laptop"));
    }
}
