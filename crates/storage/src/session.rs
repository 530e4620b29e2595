/// Temporary rules that apply to the current run only and are never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionConstraints {
    rules: Vec<String>,
}

impl SessionConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; blank input is ignored.
    pub fn push(&mut self, rule: &str) {
        let rule = rule.trim();
        if !rule.is_empty() {
            self.rules.push(rule.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// All rules joined by newlines, in the order they were added.
    pub fn as_text(&self) -> String {
        self.rules.join("\n")
    }
}

impl<S: AsRef<str>> FromIterator<S> for SessionConstraints {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut session = Self::new();
        for rule in iter {
            session.push(rule.as_ref());
        }
        session
    }
}
