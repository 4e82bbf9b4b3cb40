//! Prompt templates and assistant target construction.

use std::fmt;

/// The single substitution marker a template must contain.
pub const TEMPLATE_MARKER: &str = "{product_text}";

/// Content-generation flow the prompt is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Instagram,
    Facebook,
}

impl Channel {
    pub fn label(self) -> &'static str {
        match self {
            Channel::Instagram => "instagram",
            Channel::Facebook => "facebook",
        }
    }
}

/// Opaque prompt text with exactly one [`TEMPLATE_MARKER`].
///
/// The core never inspects template content beyond the marker; wording is
/// data, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    MissingMarker,
    DuplicateMarker,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::MissingMarker => {
                write!(f, "template is missing the {TEMPLATE_MARKER} marker")
            }
            TemplateError::DuplicateMarker => {
                write!(f, "template contains more than one {TEMPLATE_MARKER} marker")
            }
        }
    }
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Result<Self, TemplateError> {
        let text = text.into();
        match text.matches(TEMPLATE_MARKER).count() {
            0 => Err(TemplateError::MissingMarker),
            1 => Ok(Self { text }),
            _ => Err(TemplateError::DuplicateMarker),
        }
    }

    /// Substitutes the product text into the marker.
    pub fn render(&self, product_text: &str) -> String {
        self.text.replacen(TEMPLATE_MARKER, product_text, 1)
    }
}

/// Terminal result of one dispatch attempt. Every dispatch ends in exactly
/// one of these; none of them is silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Rejected before any attempt: nothing selected.
    NoSelection,
    /// Rejected before any attempt: substituted text was blank.
    EmptyInput,
    /// Clipboard write succeeded, assistant opened for a paste.
    CopiedAndOpened,
    /// Assistant opened with the prompt embedded in the request.
    OpenedWithPrompt,
    /// Deep link fired and the web fallback was scheduled; both may open.
    DeepLinkRace,
    /// Manual-copy panel shown with the full prompt text.
    ManualFallback,
    /// Mid-chain inconsistency; assistant opened bare as the last resort.
    BareOpen,
}

impl DispatchOutcome {
    pub fn describe(self) -> &'static str {
        match self {
            DispatchOutcome::NoSelection => "no record selected",
            DispatchOutcome::EmptyInput => "record has no usable text",
            DispatchOutcome::CopiedAndOpened => "prompt copied, assistant opened",
            DispatchOutcome::OpenedWithPrompt => "assistant opened with prompt",
            DispatchOutcome::DeepLinkRace => "assistant app opened, web fallback scheduled",
            DispatchOutcome::ManualFallback => "copy the prompt manually",
            DispatchOutcome::BareOpen => "assistant opened without a prompt",
        }
    }
}

/// Builds the assistant web target, percent-encoding the prompt under the
/// `q` query parameter when one is embedded.
///
/// An unparseable base is returned verbatim; opening it surfaces the
/// problem to the user instead of dropping the dispatch on the floor.
pub fn assistant_web_url(base: &str, prompt: Option<&str>) -> String {
    match url::Url::parse(base) {
        Ok(mut parsed) => {
            if let Some(prompt) = prompt {
                parsed.query_pairs_mut().append_pair("q", prompt);
            }
            parsed.to_string()
        }
        Err(_) => base.to_string(),
    }
}
