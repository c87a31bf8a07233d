//! Fixed-point expansion of text patterns that reference other patterns.

use tracing::{debug, trace};

use crate::domain::{
    entities::pattern_store::{RawPatterns, ResolvedPatterns},
    error::DomainError,
    value_objects::{PatternValue, Token},
};

/// Expand every text pattern until no text value contains a text token.
///
/// Path patterns pass through untouched. A token that (directly or through
/// other tokens) contains itself fails with [`DomainError::PatternCycle`].
pub fn resolve(raw: &RawPatterns) -> Result<ResolvedPatterns, DomainError> {
    let mut resolver = Resolver {
        work: raw.clone(),
        stack: Vec::new(),
    };

    for token in text_tokens(raw) {
        resolver.resolve_token(&token)?;
    }

    debug!(patterns = resolver.work.len(), "patterns resolved");
    Ok(ResolvedPatterns::from_resolved(resolver.work))
}

fn text_tokens(patterns: &RawPatterns) -> Vec<Token> {
    patterns
        .iter()
        .filter(|(_, v)| v.is_text())
        .map(|(t, _)| t.clone())
        .collect()
}

struct Resolver {
    /// Working copy; partially expanded values are written back immediately.
    work: RawPatterns,
    stack: Vec<Token>,
}

impl Resolver {
    fn resolve_token(&mut self, token: &Token) -> Result<String, DomainError> {
        if self.stack.contains(token) {
            let referrer = self.stack.last().unwrap_or(token);
            return Err(DomainError::PatternCycle {
                token: referrer.to_string(),
                back_reference: token.to_string(),
                stack: self.stack.iter().map(ToString::to_string).collect(),
            });
        }

        let mut value = match self.work.get(token.as_str()) {
            Some(PatternValue::Text(text)) => text.clone(),
            // only text tokens are ever scheduled
            _ => return Ok(String::new()),
        };

        self.stack.push(token.clone());
        for sub in text_tokens(&self.work) {
            if !value.contains(sub.as_str()) {
                continue;
            }
            let replacement = self.resolve_token(&sub)?;
            value = value.replace(sub.as_str(), &replacement);
            self.work
                .insert(token.clone(), PatternValue::Text(value.clone()));
        }
        self.stack.pop();

        trace!(%token, %value, "pattern expanded");
        Ok(value)
    }
}
