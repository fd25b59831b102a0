use study_together_config::{BotConfig, CapacityRule, QueueConfig, capacity_from_name};

/// A joinable queue and the group size it forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueDefinition {
    pub name: String,
    pub capacity: usize,
}

/// The fixed set of queues, loaded once at start-up.
#[derive(Debug, Clone)]
pub struct QueueBook {
    definitions: Vec<QueueDefinition>,
    rule: CapacityRule,
}

impl QueueBook {
    /// Build a book from queue entries. Later duplicates of a name are dropped.
    pub fn new(queues: impl IntoIterator<Item = QueueConfig>, rule: CapacityRule) -> Self {
        let mut definitions: Vec<QueueDefinition> = Vec::new();
        for queue in queues {
            if definitions.iter().any(|d| d.name == queue.name) {
                continue;
            }
            definitions.push(QueueDefinition {
                name: queue.name,
                capacity: queue.capacity,
            });
        }
        Self { definitions, rule }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.queues.iter().cloned(), config.capacity_rule)
    }

    pub fn get(&self, name: &str) -> Option<&QueueDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Group size for `name`, or `None` if the queue does not exist.
    ///
    /// Existence is always decided by the configured set; the size comes
    /// from the configured value or the legacy name rule, per [`CapacityRule`].
    pub fn capacity(&self, name: &str) -> Option<usize> {
        let definition = self.get(name)?;
        Some(match self.rule {
            CapacityRule::Configured => definition.capacity,
            CapacityRule::NamePrefix => capacity_from_name(name),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueDefinition> {
        self.definitions.iter()
    }

    pub fn rule(&self) -> CapacityRule {
        self.rule
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
