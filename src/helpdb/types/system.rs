//! A set of cross-referenced help databases and link resolution.

use log::trace;

use super::database::HelpDatabase;
use super::error::{HelpError, Result};
use super::topic::Topic;
use super::uri::{HelpUri, UriKind};

/// Handle to a topic inside a [`HelpSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicRef {
    /// Position of the database in [`HelpSystem::databases`].
    pub database: usize,
    /// Index of the topic within that database.
    pub topic: usize,
}

/// Owns a list of uniquely named databases in registration order.
#[derive(Debug, Default)]
pub struct HelpSystem {
    databases: Vec<HelpDatabase>,
}

impl HelpSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn databases(&self) -> &[HelpDatabase] {
        &self.databases
    }

    pub fn database(&self, index: usize) -> Option<&HelpDatabase> {
        self.databases.get(index)
    }

    /// Registers a database and returns its position.
    ///
    /// Fails if a database with the same name (ignoring case) is present.
    pub fn add_database(&mut self, database: HelpDatabase) -> Result<usize> {
        if self.find_database(database.name()).is_some() {
            return Err(HelpError::DuplicateDatabase(database.name().to_string()));
        }
        self.databases.push(database);
        Ok(self.databases.len() - 1)
    }

    /// Position of the database called `name`, ignoring case.
    pub fn find_database(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.databases
            .iter()
            .position(|db| db.name().to_lowercase() == name)
    }

    pub fn topic(&self, at: TopicRef) -> Option<&Topic> {
        self.databases.get(at.database)?.topic(at.topic)
    }

    /// Finds the topic `uri` points to.
    ///
    /// `referrer` is the position of the database containing the link, if
    /// any. Command, file and empty targets never resolve. A miss is `None`,
    /// not an error.
    pub fn resolve_uri(&self, referrer: Option<usize>, uri: &HelpUri) -> Option<TopicRef> {
        let referrer = referrer.filter(|&i| i < self.databases.len());
        let found = match uri.kind() {
            UriKind::LocalTopic => {
                let database = referrer?;
                let topic = uri.topic_index()?;
                (topic < self.databases[database].topics().len())
                    .then_some(TopicRef { database, topic })
            }
            UriKind::LocalContext => self.resolve_in(referrer?, uri.context_string()),
            UriKind::GlobalContext => {
                let database = self.find_database(uri.database_name()?)?;
                self.resolve_in(database, uri.context_string())
            }
            UriKind::Context => {
                let context = uri.context_string();
                referrer
                    .and_then(|database| self.resolve_in(database, context))
                    .or_else(|| {
                        (0..self.databases.len())
                            .find_map(|database| self.resolve_in(database, context))
                    })
            }
            UriKind::Command | UriKind::File | UriKind::None => None,
        };
        trace!("Resolved '{}' from {:?}: {:?}", uri, referrer, found);
        found
    }

    fn resolve_in(&self, database: usize, context: &str) -> Option<TopicRef> {
        self.databases[database]
            .resolve_context_index(context)
            .map(|topic| TopicRef { database, topic })
    }
}
