//! The logical help database: topics plus the context-string map.

use std::collections::BTreeMap;

use super::topic::Topic;

/// A decoded help database.
///
/// Topics are owned by the database and addressed by their position in
/// [`HelpDatabase::topics`].
#[derive(Debug, Clone, Default)]
pub struct HelpDatabase {
    name: String,
    case_sensitive: bool,
    pub file_name: Option<String>,
    pub display_width: u8,
    pub control_character: char,
    pub locked: bool,
    topics: Vec<Topic>,
    /// Keyed by the folded context string; the value keeps the spelling it
    /// was added with.
    contexts: BTreeMap<String, (String, usize)>,
}

impl HelpDatabase {
    pub fn new(name: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            name: name.into(),
            case_sensitive,
            control_character: ':',
            ..Default::default()
        }
    }

    /// The database name. Names are compared case-insensitively.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    pub fn topic_mut(&mut self, index: usize) -> Option<&mut Topic> {
        self.topics.get_mut(index)
    }

    /// Appends an empty topic and returns its index.
    pub fn new_topic(&mut self) -> usize {
        self.topics.push(Topic::new());
        self.topics.len() - 1
    }

    /// Associates a context string with a topic, replacing any previous
    /// association of an equal string.
    pub fn add_context(&mut self, context: impl Into<String>, topic_index: usize) {
        let context = context.into();
        let key = self.fold(&context);
        self.contexts.insert(key, (context, topic_index));
    }

    /// The context strings of this database in sorted order.
    pub fn context_strings(&self) -> impl Iterator<Item = &str> {
        self.contexts.values().map(|(s, _)| s.as_str())
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Context strings that point to `topic_index`.
    pub fn topic_context(&self, topic_index: usize) -> Vec<&str> {
        self.contexts
            .values()
            .filter(|(_, i)| *i == topic_index)
            .map(|(s, _)| s.as_str())
            .collect()
    }

    /// Index of the topic `context` points to, if that topic exists.
    pub fn resolve_context_index(&self, context: &str) -> Option<usize> {
        self.contexts
            .get(&self.fold(context))
            .map(|&(_, i)| i)
            .filter(|&i| i < self.topics.len())
    }

    pub fn resolve_context(&self, context: &str) -> Option<&Topic> {
        self.resolve_context_index(context)
            .and_then(|i| self.topics.get(i))
    }

    fn fold(&self, context: &str) -> String {
        if self.case_sensitive {
            context.to_string()
        } else {
            context.to_lowercase()
        }
    }
}
