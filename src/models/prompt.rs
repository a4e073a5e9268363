/// One round-trip to the text-generation model.
#[derive(Debug, Clone)]
pub struct GenerationPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u64,
    pub temperature: f32,
}

impl GenerationPrompt {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();
        if self.user.trim().is_empty() { issues.push("prompt.user is empty".into()); }
        if self.max_tokens == 0 { issues.push("prompt.max_tokens is zero".into()); }
        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}
