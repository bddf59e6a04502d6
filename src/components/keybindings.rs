//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change based on the current
//! session phase. The nav bar and the help overlay both render from it, so
//! hints and actual handling stay in one place.

#![allow(dead_code)]

use crate::session::Phase;
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    AdjustUp,
    AdjustDown,
    Confirm,
    Quit,
    Help,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }
}

/// A titled group of (key, description) pairs for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Phase-specific keybindings
    phase_bindings: HashMap<Phase, Vec<Keybinding>>,
    /// Global keybindings (available in all phases)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            phase_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    /// Register default keybindings for all phases
    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
            Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
        ];

        self.phase_bindings.insert(
            Phase::Consent,
            vec![Keybinding::new(
                KeyCode::Enter,
                KeyAction::Confirm,
                "Enter",
                "Agree and start",
            )],
        );

        self.phase_bindings.insert(
            Phase::Scenario,
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::AdjustUp, "Up", "Raise offer"),
                Keybinding::new(KeyCode::Down, KeyAction::AdjustDown, "Down", "Lower offer"),
                Keybinding::new(KeyCode::Char('0'), KeyAction::Confirm, "0-9", "Type amount"),
                Keybinding::new(KeyCode::Enter, KeyAction::Confirm, "Enter", "Send offer"),
            ],
        );

        self.phase_bindings.insert(
            Phase::Chat,
            vec![Keybinding::new(
                KeyCode::Enter,
                KeyAction::Confirm,
                "Enter",
                "Continue to questionnaire",
            )],
        );

        self.phase_bindings.insert(
            Phase::Survey,
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Previous field"),
                Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Next field"),
                Keybinding::new(KeyCode::Left, KeyAction::AdjustDown, "Left", "Decrease"),
                Keybinding::new(KeyCode::Right, KeyAction::AdjustUp, "Right", "Increase"),
                Keybinding::new(KeyCode::Enter, KeyAction::Confirm, "Enter", "Next / submit"),
            ],
        );

        self.phase_bindings.insert(
            Phase::Done,
            vec![Keybinding::new(
                KeyCode::Enter,
                KeyAction::Confirm,
                "Enter",
                "Close",
            )],
        );
    }

    /// Get (key, description) pairs for the nav bar in the given phase
    pub fn get_nav_items(&self, phase: Phase) -> Vec<(String, String)> {
        let mut items: Vec<(String, String)> = self
            .phase_bindings
            .get(&phase)
            .map(|bindings| {
                bindings
                    .iter()
                    .map(|b| (b.display.clone(), b.description.clone()))
                    .collect()
            })
            .unwrap_or_default();

        for binding in &self.global_bindings {
            items.push((binding.display.clone(), binding.description.clone()));
        }
        items
    }

    /// Get sectioned help content for the help overlay
    pub fn get_help_content(&self, phase: Phase) -> Vec<HelpSection> {
        let mut sections = Vec::new();

        if let Some(bindings) = self.phase_bindings.get(&phase) {
            sections.push(HelpSection {
                title: phase.description().to_string(),
                items: bindings
                    .iter()
                    .map(|b| (b.display.clone(), b.description.clone()))
                    .collect(),
            });
        }

        sections.push(HelpSection {
            title: "Global".to_string(),
            items: self
                .global_bindings
                .iter()
                .map(|b| (b.display.clone(), b.description.clone()))
                .collect(),
        });

        sections
    }
}
