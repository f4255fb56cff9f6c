use std::{collections::HashMap, sync::Arc};

use super::{catalog::Catalog, catalog::TemplateDefinition, errors::PromptError};

/// Resolve a command name to its template: exact, case-sensitive match
#[derive(Debug, Clone)]
pub struct Router {
    catalog: Arc<Catalog>,
    commands: HashMap<String, usize>,
}

impl Router {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let commands = catalog
            .templates()
            .iter()
            .enumerate()
            .map(|(i, t)| (t.command.clone(), i))
            .collect();

        Self { catalog, commands }
    }

    pub fn resolve(&self, command: &str) -> Result<&TemplateDefinition, PromptError> {
        self.commands
            .get(command)
            .and_then(|&i| self.catalog.templates().get(i))
            .ok_or_else(|| PromptError::NotFound(command.to_string()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
