//! Input state machines for the two editable screens
//!
//! `OfferInput` backs the offer field on the scenario screen and `SurveyForm`
//! backs the questionnaire. Both are plain state holders; key events are
//! translated by the app dispatcher.

use crate::session::SurveyAnswers;
use std::fmt;

/// Editable offer amount with clamping and stepping.
///
/// Digits edit a raw buffer so a partially typed amount below the minimum is
/// not clamped away mid-edit; `value()` applies the bounds.
#[derive(Debug, Clone)]
pub struct OfferInput {
    buffer: String,
    min: u32,
    max: u32,
    step: u32,
}

impl OfferInput {
    pub fn new(default: u32, min: u32, max: u32, step: u32) -> Self {
        Self {
            buffer: default.to_string(),
            min,
            max,
            step,
        }
    }

    /// The offer as entered, clamped to the configured bounds.
    pub fn value(&self) -> u32 {
        self.buffer.parse().unwrap_or(self.min).clamp(self.min, self.max)
    }

    /// The raw edit buffer, for display.
    pub fn raw(&self) -> &str {
        &self.buffer
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn increment(&mut self) {
        let v = self.value().saturating_add(self.step).min(self.max);
        self.buffer = v.to_string();
    }

    pub fn decrement(&mut self) {
        let v = self.value().saturating_sub(self.step).max(self.min);
        self.buffer = v.to_string();
    }

    pub fn push_digit(&mut self, c: char) {
        let max_digits = self.max.to_string().len();
        if c.is_ascii_digit() && self.buffer.len() < max_digits {
            // Drop a leading zero so "0450" never shows up
            if self.buffer == "0" {
                self.buffer.clear();
            }
            self.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }
}

/// The questionnaire fields, in form order, plus the submit row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyField {
    Satisfaction,
    Fairness,
    Regret,
    Age,
    Experience,
    Submit,
}

impl SurveyField {
    pub const ALL: &'static [Self] = &[
        Self::Satisfaction,
        Self::Fairness,
        Self::Regret,
        Self::Age,
        Self::Experience,
        Self::Submit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Satisfaction => "How satisfied are you with the outcome? (1-7)",
            Self::Fairness => "How fair was the negotiation? (1-7)",
            Self::Regret => "How much regret do you feel about your offer? (1-7)",
            Self::Age => "Age",
            Self::Experience => "Negotiation experience",
            Self::Submit => "Submit",
        }
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Navigation state of the questionnaire form.
///
/// The answer values themselves live on the session; the form only tracks
/// which field has focus and applies adjustments.
#[derive(Debug, Clone)]
pub struct SurveyForm {
    current: usize,
}

impl Default for SurveyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyForm {
    pub fn new() -> Self {
        Self { current: 0 }
    }

    pub fn current_field(&self) -> SurveyField {
        SurveyField::ALL[self.current]
    }

    pub fn select_next(&mut self) {
        if self.current + 1 < SurveyField::ALL.len() {
            self.current += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    /// Adjust the focused field by `delta` steps, clamped to its scale.
    pub fn adjust(&self, answers: &mut SurveyAnswers, delta: i8) {
        match self.current_field() {
            SurveyField::Satisfaction => {
                answers.satisfaction = step_clamped(answers.satisfaction, delta, 1, 7)
            }
            SurveyField::Fairness => {
                answers.fairness = step_clamped(answers.fairness, delta, 1, 7)
            }
            SurveyField::Regret => answers.regret = step_clamped(answers.regret, delta, 1, 7),
            SurveyField::Age => answers.age = step_clamped(answers.age, delta, 16, 90),
            SurveyField::Experience => {
                answers.experience = if delta >= 0 {
                    answers.experience.next()
                } else {
                    answers.experience.previous()
                }
            }
            SurveyField::Submit => {}
        }
    }

    /// Current value of a field, rendered for the form.
    pub fn value_text(field: SurveyField, answers: &SurveyAnswers) -> String {
        match field {
            SurveyField::Satisfaction => answers.satisfaction.to_string(),
            SurveyField::Fairness => answers.fairness.to_string(),
            SurveyField::Regret => answers.regret.to_string(),
            SurveyField::Age => answers.age.to_string(),
            SurveyField::Experience => answers.experience.to_string(),
            SurveyField::Submit => String::new(),
        }
    }
}

fn step_clamped(value: u8, delta: i8, min: u8, max: u8) -> u8 {
    let stepped = value as i16 + delta as i16;
    stepped.clamp(min as i16, max as i16) as u8
}
