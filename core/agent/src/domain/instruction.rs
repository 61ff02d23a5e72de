//! ユーザーの自然言語指示（例: "insert a haiku about cats"）

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for Instruction {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Instruction {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
