/// Helpers callable as `{{helper arg}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    KebabCase,
    CamelCase,
}

impl Helper {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "kebabCase" => Some(Self::KebabCase),
            "camelCase" => Some(Self::CamelCase),
            _ => None,
        }
    }

    pub fn apply(self, input: &str) -> String {
        match self {
            Self::KebabCase => kebab_case(input),
            Self::CamelCase => camel_case(input),
        }
    }
}

/// `myProjectName` -> `my-project-name`.
///
/// A dash goes between an ASCII lowercase letter and the ASCII uppercase
/// letter right after it; then the whole string is lowercased.
pub fn kebab_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev = None;
    for c in input.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(|p: char| p.is_ascii_lowercase()) {
            out.push('-');
        }
        out.push(c);
        prev = Some(c);
    }
    out.to_lowercase()
}

/// `my-project-name` -> `myProjectName`.
///
/// Only a dash followed by an ASCII lowercase letter is folded; other
/// dashes survive.
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '-' && next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_splits_lower_upper_pairs() {
        assert_eq!(kebab_case("myProjectName"), "my-project-name");
        assert_eq!(kebab_case("HTTPServer"), "httpserver");
        assert_eq!(kebab_case("aBcD"), "a-bc-d");
        assert_eq!(kebab_case("already-kebab"), "already-kebab");
        assert_eq!(kebab_case("x1Y"), "x1y");
    }

    #[test]
    fn camel_case_folds_dash_lowercase() {
        assert_eq!(camel_case("my-project-name"), "myProjectName");
        assert_eq!(camel_case("a--b"), "a-B");
        assert_eq!(camel_case("trailing-"), "trailing-");
        assert_eq!(camel_case("keep-1"), "keep-1");
        assert_eq!(camel_case("Upper-Case"), "Upper-Case");
    }

    #[test]
    fn helpers_by_name() {
        assert_eq!(Helper::from_name("kebabCase"), Some(Helper::KebabCase));
        assert_eq!(Helper::from_name("snakeCase"), None);
        assert_eq!(Helper::CamelCase.apply("dev-forge"), "devForge");
    }
}
