use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

static EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid interpolation pattern"));

/// Property sources for `${name}` expressions, highest precedence first.
pub struct Interpolator<'a> {
    sources: Vec<&'a BTreeMap<String, String>>,
}

impl<'a> Interpolator<'a> {
    pub fn new(sources: Vec<&'a BTreeMap<String, String>>) -> Self {
        Self { sources }
    }

    fn lookup(&self, name: &str) -> Option<&'a str> {
        self.sources
            .iter()
            .find_map(|source| source.get(name).map(String::as_str))
    }

    /// Single pass; unknown expressions are left as written.
    pub fn interpolate(&self, value: &str) -> String {
        EXPRESSION
            .replace_all(value, |caps: &Captures<'_>| {
                self.lookup(&caps[1])
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_source_wins() {
        let user = props(&[("repo.root", "/user")]);
        let system = props(&[("repo.root", "/system"), ("env.HOME", "/home/dev")]);
        let interpolator = Interpolator::new(vec![&user, &system]);

        assert_eq!(interpolator.interpolate("${repo.root}/repo"), "/user/repo");
        assert_eq!(interpolator.interpolate("${env.HOME}/.m2"), "/home/dev/.m2");
    }

    #[test]
    fn test_unknown_expression_kept() {
        let empty = BTreeMap::new();
        let interpolator = Interpolator::new(vec![&empty]);
        assert_eq!(interpolator.interpolate("${missing}/x"), "${missing}/x");
        assert_eq!(interpolator.interpolate("plain"), "plain");
    }
}
