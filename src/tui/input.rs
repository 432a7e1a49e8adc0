//! Masked text entry for the reset secret prompt.

/// State for the secret entry field. Input is append-only with
/// backspace; the rendered form is always masked.
#[derive(Clone, Debug, Default)]
pub struct SecretInput {
    content: String,
}

impl SecretInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a character.
    pub fn push(&mut self, c: char) {
        self.content.push(c);
    }

    /// Removes the last character.
    pub fn backspace(&mut self) {
        self.content.pop();
    }

    /// Takes the content and resets the field.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.content)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// One mask character per entered character.
    pub fn masked(&self) -> String {
        "•".repeat(self.content.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_never_reveals_content() {
        let mut input = SecretInput::new();
        for c in "2025".chars() {
            input.push(c);
        }
        assert_eq!(input.masked(), "••••");
        assert_eq!(input.take(), "2025");
        assert!(input.is_empty());
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut input = SecretInput::new();
        input.backspace();
        assert!(input.is_empty());
    }
}
