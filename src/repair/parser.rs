//! Tolerant parsing of generated suggestion text
//!
//! Generators reply in loose `URL:` / `Confidence:` / `Reason:` lines with
//! prose around them. Parsing never fails a whole reply: every block either
//! becomes a suggestion or a recorded failure, and surrounding prose is
//! ignored.

/// Confidence assigned to suggestions that do not state one
pub const DEFAULT_GENERATED_CONFIDENCE: f32 = 0.5;

/// A well-formed suggestion block from a generator reply
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSuggestion {
    /// Proposed replacement URL
    pub url: String,

    /// Stated confidence, clamped to [0, 1]
    pub confidence: f32,

    /// Free-form justification, empty when not given
    pub reason: String,
}

/// A line that looked like part of a block but could not be used
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// The offending line, trimmed
    pub line: String,

    /// Why it was rejected
    pub reason: String,
}

/// One parsed block or the reason it was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Suggestion(GeneratedSuggestion),
    Failure(ParseFailure),
}

/// Parses generator output line by line
///
/// A `URL:` line opens a block; `Confidence:` and `Reason:` lines fill the
/// open one. Orphan confidence/reason lines, empty URLs, and unusable
/// confidence values are reported as failures instead of being dropped
/// silently; anything else between blocks is prose and is skipped.
pub fn parse_suggestion_text(text: &str) -> Vec<ParseOutcome> {
    let mut outcomes = Vec::new();
    let mut current: Option<GeneratedSuggestion> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("URL:") {
            if let Some(finished) = current.take() {
                outcomes.push(ParseOutcome::Suggestion(finished));
            }

            let url = rest.trim();
            if url.is_empty() {
                outcomes.push(ParseOutcome::Failure(ParseFailure {
                    line: line.to_string(),
                    reason: "empty URL".to_string(),
                }));
            } else {
                current = Some(GeneratedSuggestion {
                    url: url.to_string(),
                    confidence: DEFAULT_GENERATED_CONFIDENCE,
                    reason: String::new(),
                });
            }
        } else if let Some(rest) = line.strip_prefix("Confidence:") {
            match current.as_mut() {
                Some(block) => match rest.trim().parse::<f32>() {
                    Ok(value) if value.is_finite() => {
                        block.confidence = value.clamp(0.0, 1.0);
                    }
                    _ => outcomes.push(ParseOutcome::Failure(ParseFailure {
                        line: line.to_string(),
                        reason: "unusable confidence value".to_string(),
                    })),
                },
                None => outcomes.push(ParseOutcome::Failure(ParseFailure {
                    line: line.to_string(),
                    reason: "confidence outside a suggestion block".to_string(),
                })),
            }
        } else if let Some(rest) = line.strip_prefix("Reason:") {
            match current.as_mut() {
                Some(block) => block.reason = rest.trim().to_string(),
                None => outcomes.push(ParseOutcome::Failure(ParseFailure {
                    line: line.to_string(),
                    reason: "reason outside a suggestion block".to_string(),
                })),
            }
        }
    }

    if let Some(finished) = current.take() {
        outcomes.push(ParseOutcome::Suggestion(finished));
    }

    outcomes
}

/// Keeps the suggestions and logs each failure at debug level
pub fn usable_suggestions(outcomes: Vec<ParseOutcome>) -> Vec<GeneratedSuggestion> {
    let mut suggestions = Vec::new();
    for outcome in outcomes {
        match outcome {
            ParseOutcome::Suggestion(suggestion) => suggestions.push(suggestion),
            ParseOutcome::Failure(failure) => {
                tracing::debug!("Ignoring generator line '{}': {}", failure.line, failure.reason);
            }
        }
    }
    suggestions
}
