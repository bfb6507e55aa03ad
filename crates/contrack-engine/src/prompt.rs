/// Blocking user interaction: informational alerts and yes/no confirmation
pub trait Prompt {
    fn alert(&mut self, message: &str);

    fn confirm(&mut self, message: &str) -> bool;
}

/// Prompt with a predetermined answer that records everything it was shown.
///
/// Hosts that cannot block on a person (an HTTP request, a scheduled run)
/// decide the answer up front.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answer: bool,
    pub alerts: Vec<String>,
    pub questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn alert(&mut self, message: &str) {
        tracing::info!(%message, "alert");
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        tracing::info!(%message, answer = self.answer, "confirmation requested");
        self.questions.push(message.to_string());
        self.answer
    }
}
