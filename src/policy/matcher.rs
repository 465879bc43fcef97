use itertools::Itertools;
use wildmatch::WildMatch;

use crate::policy::{Policy, TextRule};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is invalid: {0}")]
    TitleInvalid(String),
    #[error("Description is invalid: {0}")]
    DescriptionInvalid(String),
}

impl Policy {
    /// Returns the release note branch pattern that matches `branch`, if any.
    pub fn match_release_note_branch(&self, branch: &str) -> Option<&str> {
        match_patterns(&self.release_note.branches, branch)
    }

    /// Returns the validation branch pattern that matches `branch`, if any.
    pub fn match_validate_branch(&self, branch: &str) -> Option<&str> {
        match_patterns(&self.validation.branches, branch)
    }

    /// Returns the tag pattern that matches `tag`, if any.
    pub fn match_tag(&self, tag: &str) -> Option<&str> {
        match_patterns(&self.release_note.tags, tag)
    }

    /// Is validation enabled for pull requests targeting `base_branch`?
    pub fn validates(&self, base_branch: &str) -> bool {
        !self.validation.disable && self.match_validate_branch(base_branch).is_some()
    }

    /// Are release notes enabled for pull requests targeting `base_branch`?
    pub fn release_notes_for_branch(&self, base_branch: &str) -> bool {
        !self.release_note.disable && self.match_release_note_branch(base_branch).is_some()
    }

    /// Are release notes enabled for a pushed tag?
    pub fn release_notes_for_tag(&self, tag: &str) -> bool {
        !self.release_note.disable && self.match_tag(tag).is_some()
    }

    pub fn validate_title(&self, title: &str) -> Result<(), ValidationError> {
        check_text(&self.validation.title, title).map_err(ValidationError::TitleInvalid)
    }

    pub fn validate_description(&self, description: &str) -> Result<(), ValidationError> {
        check_text(&self.validation.description, description)
            .map_err(ValidationError::DescriptionInvalid)
    }
}

/// Patterns are either exact names or globs (`*`, `?`).
fn match_patterns<'a>(patterns: &'a [String], name: &str) -> Option<&'a str> {
    patterns
        .iter()
        .find(|pattern| pattern.as_str() == name || WildMatch::new(pattern).matches(name))
        .map(String::as_str)
}

/// Emptiness and length are judged on the trimmed text, prefixes and patterns on the text as written.
fn check_text(rule: &TextRule, text: &str) -> Result<(), String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        if rule.required {
            return Err("must not be empty".to_string());
        }
        // Nothing else to check on an optional, missing text.
        return Ok(());
    }

    let length = trimmed.chars().count();
    if let Some(min) = rule.min_length {
        if length < min {
            return Err(format!("must be at least {min} characters long (has {length})"));
        }
    }
    if let Some(max) = rule.max_length {
        if length > max {
            return Err(format!("must be at most {max} characters long (has {length})"));
        }
    }
    if !rule.prefixes.is_empty() && !rule.prefixes.iter().any(|p| text.starts_with(p.as_str())) {
        return Err(format!(
            "must start with one of {}",
            rule.prefixes.iter().map(|p| format!("`{p}`")).join(", ")
        ));
    }
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(text) {
            return Err(format!("must match pattern `{}`", pattern.as_str()));
        }
    }
    Ok(())
}
