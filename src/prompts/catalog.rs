use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{builtin, engine::placeholders, errors::CatalogError};

/// Commands answered by the bot itself, never by a template
pub const RESERVED_COMMANDS: &[&str] = &["start", "help"];

/// A named, ordered slot of a template. A missing or empty default means the field is required.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FieldSpec {
    /// The default used when the segment is missing or blank
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref().filter(|d| !d.is_empty())
    }

    pub fn is_required(&self) -> bool {
        self.default_value().is_none()
    }
}

/// A prompt template and everything the bot shows around it.
///
/// `body`, `progress`, `header`, `footer` and `failure` may reference any declared
/// field as `{name}`. `usage` answers invalid input, so it is shown verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TemplateDefinition {
    pub id: String,
    pub command: String,
    #[serde(default)]
    pub description: String,
    pub body: String,
    pub fields: Vec<FieldSpec>,
    pub usage: String,
    #[serde(default)]
    pub progress: String,
    #[serde(default)]
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub failure: String,
}

impl TemplateDefinition {
    fn texts(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.body.as_str()),
            Some(self.progress.as_str()),
            Some(self.header.as_str()),
            self.footer.as_deref(),
            Some(self.failure.as_str()),
        ]
        .into_iter()
        .flatten()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.command.is_empty() || self.command.chars().any(|c| c.is_whitespace() || c == '/' || c == '@') {
            return Err(CatalogError::InvalidCommand {
                template: self.id.clone(),
                command: self.command.clone(),
            });
        }

        let (primary, rest) = self
            .fields
            .split_first()
            .ok_or_else(|| CatalogError::NoFields(self.id.clone()))?;

        if !primary.is_required() {
            return Err(CatalogError::DefaultedPrimary {
                template: self.id.clone(),
                field: primary.name.clone(),
            });
        }

        if let Some(field) = rest.iter().find(|f| f.is_required()) {
            return Err(CatalogError::MissingDefault {
                template: self.id.clone(),
                field: field.name.clone(),
            });
        }

        let mut names = HashSet::new();
        for field in self.fields.iter() {
            if !names.insert(field.name.as_str()) {
                return Err(CatalogError::DuplicateField {
                    template: self.id.clone(),
                    field: field.name.clone(),
                });
            }
        }

        for text in self.texts() {
            if let Some(unknown) = placeholders(text).into_iter().find(|p| !names.contains(p)) {
                return Err(CatalogError::UnknownPlaceholder {
                    template: self.id.clone(),
                    placeholder: unknown.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// The validated, immutable set of templates served by the bot
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<TemplateDefinition>,
}

impl Catalog {
    /// Validate the templates and build the catalog
    pub fn new(templates: Vec<TemplateDefinition>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        let mut commands = HashSet::new();

        for template in templates.iter() {
            template.validate()?;

            if !ids.insert(template.id.as_str()) {
                return Err(CatalogError::DuplicateTemplate(template.id.clone()));
            }
            if RESERVED_COMMANDS.contains(&template.command.as_str()) {
                return Err(CatalogError::ReservedCommand(template.command.clone()));
            }
            if !commands.insert(template.command.as_str()) {
                return Err(CatalogError::DuplicateCommand(template.command.clone()));
            }
        }

        Ok(Self { templates })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin::templates())
    }

    /// Read a JSON array of templates
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        debug!(?path, "Reading catalog");
        let content = std::fs::read_to_string(path)?;
        let templates = serde_json::from_str::<Vec<TemplateDefinition>>(&content)?;
        Self::new(templates)
    }

    /// Load the catalog in use: an explicit file, then the user's config file if
    /// it exists, then the built-in one.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        if let Some(path) = path {
            info!(?path, "Loading catalog");
            return Self::from_file(path);
        }

        match default_path() {
            Some(path) if path.exists() => {
                info!(?path, "Loading catalog from config directory");
                Self::from_file(&path)
            }
            _ => {
                debug!("Using built-in catalog");
                Self::builtin()
            }
        }
    }

    pub fn templates(&self) -> &[TemplateDefinition] {
        &self.templates
    }
}

/// `<config_dir>/marketing-bot/catalog.json`
fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("marketing-bot").join("catalog.json"))
}
