//! Request validation
//!
//! Every rule is checked and every violation is recorded. The primary
//! message is taken from the first rule that fails, in the order the rules
//! are listed below.

use reqwest::Url;
use serde::Serialize;

use crate::types::query::{FOLLOW_UP_SLOT, MAX_TEMPERATURE, MIN_TEMPERATURE};
use crate::types::{ImageQuery, TextQuery};

const MAX_SYSTEM_PROMPT_CHARS: usize = 1000;
const MAX_USER_QUERY_CHARS: usize = 4000;
const MAX_IMAGE_QUERY_CHARS: usize = 1000;

const TEMPERATURE_RANGE: &str = "Temperature must be between 0 and 2";

/// Result of validating a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Message of the first failing rule, empty when valid
    pub primary_message: String,
    /// Every violated rule, in check order
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    fn new() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    fn missing_request() -> Self {
        Self {
            valid: false,
            primary_message: "Request cannot be null".to_string(),
            errors: vec!["Request is null".to_string()],
        }
    }

    fn fail(&mut self, message: &str, error: &str) {
        if self.valid {
            self.valid = false;
            self.primary_message = message.to_string();
        }
        self.errors.push(error.to_string());
    }
}

/// Validate a text query
pub fn validate_text(request: Option<&TextQuery>) -> ValidationOutcome {
    let Some(request) = request else {
        return ValidationOutcome::missing_request();
    };
    let mut outcome = ValidationOutcome::new();

    if is_blank(&request.user_query) {
        outcome.fail(
            "User query is required",
            "UserQuery is required and cannot be empty",
        );
    }

    if !temperature_in_range(request.temperature) {
        outcome.fail(TEMPERATURE_RANGE, TEMPERATURE_RANGE);
    }

    if char_len(&request.user_query) > MAX_USER_QUERY_CHARS {
        outcome.fail(
            "User query is too long",
            "UserQuery cannot exceed 4000 characters",
        );
    }

    check_system_prompt(&request.system_prompt, &mut outcome);

    outcome
}

/// Validate an image query
pub fn validate_image(request: Option<&ImageQuery>) -> ValidationOutcome {
    let Some(request) = request else {
        return ValidationOutcome::missing_request();
    };
    let mut outcome = ValidationOutcome::new();

    if is_blank(&request.image_url) {
        outcome.fail(
            "Image URL is required",
            "ImageUrl is required and cannot be empty",
        );
    } else if !is_absolute_url(&request.image_url) {
        outcome.fail("Invalid image URL format", "ImageUrl must be a valid URL");
    }

    if is_blank(&request.initial_image_query) {
        outcome.fail(
            "Initial image query is required",
            "InitialImageQuery is required and cannot be empty",
        );
    }

    if !temperature_in_range(request.temperature) {
        outcome.fail(TEMPERATURE_RANGE, TEMPERATURE_RANGE);
    }

    if char_len(&request.initial_image_query) > MAX_IMAGE_QUERY_CHARS {
        outcome.fail(
            "Initial image query is too long",
            "InitialImageQuery cannot exceed 1000 characters",
        );
    }

    check_system_prompt(&request.system_prompt, &mut outcome);

    if is_blank(&request.follow_up_template) {
        outcome.fail(
            "Follow-up template is required",
            "FollowUpTemplate is required and cannot be empty",
        );
    } else if !request.follow_up_template.contains(FOLLOW_UP_SLOT) {
        outcome.fail(
            "Invalid follow-up template",
            "FollowUpTemplate must contain a {0} placeholder",
        );
    }

    outcome
}

fn check_system_prompt(system_prompt: &str, outcome: &mut ValidationOutcome) {
    if char_len(system_prompt) > MAX_SYSTEM_PROMPT_CHARS {
        outcome.fail(
            "System prompt is too long",
            "SystemPrompt cannot exceed 1000 characters",
        );
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// NaN and infinities fail the range check
fn temperature_in_range(temperature: f32) -> bool {
    (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature)
}

/// Absolute URI with a scheme and a host
fn is_absolute_url(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|url| url.has_host())
        .unwrap_or(false)
}
