//! Code verification contract.
//!
//! Correctness is judged by an external model. The domain owns the prompt
//! and the reply parsing so adapters only move bytes.

use serde::{Deserialize, Serialize};

use super::Language;

/// Code snapshot submitted for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Source text.
    pub code: String,
    /// Problem statement the code must satisfy.
    pub problem: String,
    /// Language name as chosen in the editor.
    pub language: String,
}

impl VerificationRequest {
    /// Build a request for a catalogue problem.
    pub fn new(code: impl Into<String>, problem: impl Into<String>, language: Language) -> Self {
        Self {
            code: code.into(),
            problem: problem.into(),
            language: language.as_str().to_owned(),
        }
    }
}

/// Prompt sent to the verification model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationPrompt(String);

impl VerificationPrompt {
    /// Render the fixed grading prompt for `request`.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::{Language, VerificationPrompt, VerificationRequest};
    ///
    /// let request = VerificationRequest::new("print(1)", "Print one.", Language::Python);
    /// let prompt = VerificationPrompt::build(&request);
    /// assert!(prompt.as_str().contains("```python\nprint(1)\n```"));
    /// assert!(prompt.as_str().ends_with("Answer:"));
    /// ```
    pub fn build(request: &VerificationRequest) -> Self {
        let VerificationRequest {
            code,
            problem,
            language,
        } = request;
        Self(format!(
            "You are a code verification engine. Your task is to evaluate the provided code \
against a problem statement and return ONLY 'CORRECT' or 'INCORRECT'. Do not add any \
explanation, markdown, or commentary.\n\n\
Problem Statement: \"{problem}\"\n\
Language: {language}\n\
Code to evaluate:\n\
```{language}\n\
{code}\n\
```\n\
Answer:"
        ))
    }

    /// Rendered prompt text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Model verdict on a code snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The model answered exactly `CORRECT`.
    Correct,
    /// Anything else.
    Incorrect,
}

impl Verdict {
    /// Parse a model reply.
    ///
    /// Only a reply that equals `CORRECT` after trimming and upper-casing
    /// counts as correct; a missing reply is incorrect.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::Verdict;
    ///
    /// assert_eq!(Verdict::from_model_reply(Some(" correct\n")), Verdict::Correct);
    /// assert_eq!(Verdict::from_model_reply(Some("CORRECT.")), Verdict::Incorrect);
    /// assert_eq!(Verdict::from_model_reply(None), Verdict::Incorrect);
    /// ```
    pub fn from_model_reply(reply: Option<&str>) -> Self {
        match reply {
            Some(text) if text.trim().to_uppercase() == "CORRECT" => Self::Correct,
            _ => Self::Incorrect,
        }
    }

    /// Whether the verdict is [`Verdict::Correct`].
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("CORRECT"), Verdict::Correct)]
    #[case(Some("correct"), Verdict::Correct)]
    #[case(Some("  Correct \n"), Verdict::Correct)]
    #[case(Some("INCORRECT"), Verdict::Incorrect)]
    #[case(Some("CORRECT!"), Verdict::Incorrect)]
    #[case(Some("The code is CORRECT"), Verdict::Incorrect)]
    #[case(Some(""), Verdict::Incorrect)]
    #[case(None, Verdict::Incorrect)]
    fn parses_model_replies(#[case] reply: Option<&str>, #[case] expected: Verdict) {
        assert_eq!(Verdict::from_model_reply(reply), expected);
    }

    #[test]
    fn prompt_embeds_problem_language_and_code() {
        let request = VerificationRequest {
            code: "int main() {}".to_owned(),
            problem: "Do nothing.".to_owned(),
            language: "cpp".to_owned(),
        };
        let prompt = VerificationPrompt::build(&request);
        let text = prompt.as_str();
        assert!(text.starts_with("You are a code verification engine."));
        assert!(text.contains("return ONLY 'CORRECT' or 'INCORRECT'"));
        assert!(text.contains("\n\nProblem Statement: \"Do nothing.\"\nLanguage: cpp\n"));
        assert!(text.contains("Code to evaluate:\n```cpp\nint main() {}\n```\nAnswer:"));
    }

    #[test]
    fn request_uses_lowercase_language_name() {
        let request = VerificationRequest::new("x", "y", Language::Java);
        assert_eq!(request.language, "java");
    }
}
