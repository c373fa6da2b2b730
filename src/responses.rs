/*
 * @file responses.rs
 * @brief Canned reply categories and their loading logic
 * @author Kevin Thomas
 * @date 2025
 *
 * MIT License
 *
 * Copyright (c) 2025 Kevin Thomas
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Response table configuration: reply categories and their templates.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::chooser::{pick, Chooser};

/// Default path of the optional response overrides file.
pub const RESPONSES_FILE: &str = "responses.json";

/// Placeholder substituted with the user's name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// A named group of interchangeable reply templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Greeting,
    Sad,
    Happy,
    Movie,
    Joke,
    Farewell,
}

impl Category {
    /// Every category, in the order the table lists them.
    pub const ALL: [Category; 6] = [
        Category::Greeting,
        Category::Sad,
        Category::Happy,
        Category::Movie,
        Category::Joke,
        Category::Farewell,
    ];
}

/// Immutable mapping from category to candidate reply templates.
///
/// # Details
/// Every category holds at least one template. Tables are either the
/// built-in defaults or defaults merged with a `responses.json` file, so a
/// lookup never comes back empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseTable {
    greeting: Vec<String>,
    sad: Vec<String>,
    happy: Vec<String>,
    movie: Vec<String>,
    joke: Vec<String>,
    farewell: Vec<String>,
}

/// On-disk shape of `responses.json`; every category is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResponseOverrides {
    #[serde(default)]
    greeting: Vec<String>,
    #[serde(default)]
    sad: Vec<String>,
    #[serde(default)]
    happy: Vec<String>,
    #[serde(default)]
    movie: Vec<String>,
    #[serde(default)]
    joke: Vec<String>,
    #[serde(default, alias = "bye")]
    farewell: Vec<String>,
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self {
            greeting: strings(&[
                "Hello {name}! How are you today?",
                "Hey {name}! Good to see you",
                "Hi {name}! How's it going?",
            ]),
            sad: strings(&[
                "I'm sorry to hear that, {name}. Want to talk about it?",
                "Oh no! {name}, hope things get better soon!",
            ]),
            happy: strings(&[
                "Yay! That's awesome, {name}",
                "Great to hear that, {name}! Keep smiling!",
            ]),
            movie: strings(&[
                "I recommend Inception!",
                "Try watching The Pursuit of Happyness.",
                "You might like Interstellar.",
            ]),
            joke: strings(&[
                "Why did the computer go to the doctor? Because it caught a virus!",
                "Why was the math book sad? It had too many problems!",
            ]),
            farewell: strings(&[
                "Goodbye, {name}! Have a great day!",
                "See you later, {name}! Take care!",
            ]),
        }
    }
}

impl ResponseTable {
    /// Returns the templates of `category`.
    pub fn templates(&self, category: Category) -> &[String] {
        match category {
            Category::Greeting => &self.greeting,
            Category::Sad => &self.sad,
            Category::Happy => &self.happy,
            Category::Movie => &self.movie,
            Category::Joke => &self.joke,
            Category::Farewell => &self.farewell,
        }
    }

    /// Picks one template of `category` through the injected chooser.
    ///
    /// # Arguments
    /// * `category` - The category to draw from.
    /// * `chooser` - Source of the random index.
    ///
    /// # Returns
    /// * `&str` - The chosen template, still containing any `{name}` placeholder.
    pub fn choose(&self, category: Category, chooser: &mut dyn Chooser) -> &str {
        pick(chooser, self.templates(category)).map_or("", String::as_str)
    }

    /// Replaces categories that `overrides` provides, keeping the rest.
    fn merged(mut self, overrides: ResponseOverrides) -> Self {
        let replace = |slot: &mut Vec<String>, candidates: Vec<String>| {
            let candidates: Vec<String> = candidates
                .into_iter()
                .map(|template| template.trim().to_string())
                .filter(|template| !template.is_empty())
                .collect();
            if !candidates.is_empty() {
                *slot = candidates;
            }
        };
        replace(&mut self.greeting, overrides.greeting);
        replace(&mut self.sad, overrides.sad);
        replace(&mut self.happy, overrides.happy);
        replace(&mut self.movie, overrides.movie);
        replace(&mut self.joke, overrides.joke);
        replace(&mut self.farewell, overrides.farewell);
        self
    }

    /// Parses a JSON document of overrides on top of the built-in table.
    ///
    /// # Errors
    /// Returns an error when the document is not valid JSON or names an
    /// unknown category.
    pub fn from_json(raw: &str) -> Result<Self> {
        let overrides: ResponseOverrides =
            serde_json::from_str(raw).context("Failed to parse response overrides")?;
        Ok(Self::default().merged(overrides))
    }
}

/// Substitutes `{name}` in `template`.
pub fn fill_template(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

/// Loads the response table from `path`, falling back to the built-in table.
///
/// # Details
/// A missing file is normal and silently yields the defaults. A file that
/// exists but cannot be read or parsed is logged before falling back.
///
/// # Arguments
/// * `path` - Location of the overrides file.
///
/// # Returns
/// * `ResponseTable` - Loaded or default table.
pub fn load_responses(path: &Path) -> ResponseTable {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no response overrides, using built-in table");
        return ResponseTable::default();
    }
    load_responses_from_file(path).unwrap_or_else(|err| {
        tracing::warn!(
            path = %path.display(),
            "failed to load responses: {:#}. Using built-in responses.",
            err
        );
        ResponseTable::default()
    })
}

/// Reads and parses the overrides file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
fn load_responses_from_file(path: &Path) -> Result<ResponseTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ResponseTable::from_json(&content).with_context(|| format!("Invalid {}", path.display()))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chooser::ScriptedChooser;
    use std::io::Write;

    #[test]
    fn default_table_has_every_category() {
        let table = ResponseTable::default();
        for category in Category::ALL {
            assert!(!table.templates(category).is_empty(), "{category:?}");
        }
    }

    #[test]
    fn choose_follows_the_chooser() {
        let table = ResponseTable::default();
        let mut chooser = ScriptedChooser::constant(2);
        assert_eq!(
            table.choose(Category::Movie, &mut chooser),
            "You might like Interstellar."
        );
    }

    #[test]
    fn fill_template_replaces_every_placeholder() {
        assert_eq!(fill_template("{name}, {name}!", "Sam"), "Sam, Sam!");
        assert_eq!(fill_template("no placeholder", "Sam"), "no placeholder");
    }

    #[test]
    fn overrides_replace_only_named_categories() {
        let table = ResponseTable::from_json(r#"{ "joke": ["Knock knock."] }"#).unwrap();
        assert_eq!(table.templates(Category::Joke), ["Knock knock.".to_string()]);
        assert_eq!(
            table.templates(Category::Greeting),
            ResponseTable::default().templates(Category::Greeting)
        );
    }

    #[test]
    fn empty_override_keeps_defaults() {
        let table = ResponseTable::from_json(r#"{ "sad": [], "happy": ["  "] }"#).unwrap();
        let defaults = ResponseTable::default();
        assert_eq!(table.templates(Category::Sad), defaults.templates(Category::Sad));
        assert_eq!(table.templates(Category::Happy), defaults.templates(Category::Happy));
    }

    #[test]
    fn bye_is_accepted_as_farewell_key() {
        let table = ResponseTable::from_json(r#"{ "bye": ["Later, {name}."] }"#).unwrap();
        assert_eq!(table.templates(Category::Farewell), ["Later, {name}.".to_string()]);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(ResponseTable::from_json(r#"{ "weather": ["Sunny!"] }"#).is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let table = load_responses(&dir.path().join(RESPONSES_FILE));
        assert_eq!(table, ResponseTable::default());
    }

    #[test]
    fn invalid_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert_eq!(load_responses(file.path()), ResponseTable::default());
    }

    #[test]
    fn valid_file_is_merged() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "movie": ["Watch Up."] }}"#).unwrap();
        let table = load_responses(file.path());
        assert_eq!(table.templates(Category::Movie), ["Watch Up.".to_string()]);
    }
}
