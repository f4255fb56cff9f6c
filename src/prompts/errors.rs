use thiserror::Error;

/// The user input cannot be turned into a prompt
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No arguments were provided")]
    EmptyInput,
    #[error("Required field `{field}` is empty")]
    MissingRequiredField { field: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Command not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A template catalog that must not be served; only raised at startup
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Catalog is empty")]
    Empty,
    #[error("Duplicate template id `{0}`")]
    DuplicateTemplate(String),
    #[error("Duplicate command `{0}`")]
    DuplicateCommand(String),
    #[error("Command `{0}` is reserved")]
    ReservedCommand(String),
    #[error("Template `{template}` has an invalid command name `{command}`")]
    InvalidCommand { template: String, command: String },
    #[error("Template `{0}` declares no fields")]
    NoFields(String),
    #[error("Template `{template}` declares field `{field}` twice")]
    DuplicateField { template: String, field: String },
    #[error("Template `{template}`: primary field `{field}` cannot have a default")]
    DefaultedPrimary { template: String, field: String },
    #[error("Template `{template}`: field `{field}` needs a default value")]
    MissingDefault { template: String, field: String },
    #[error("Template `{template}` references unknown placeholder `{{{placeholder}}}`")]
    UnknownPlaceholder { template: String, placeholder: String },
}
