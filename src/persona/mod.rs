use serde::Deserialize;
use std::fmt;
use tracing::warn;

/// Identifier of the persona every unknown lookup degrades to.
pub const DEFAULT_PERSONA_ID: &str = "yaprak";

const BUILTIN_CATALOG: &str = include_str!("builtin.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    Green,
    Blue,
    Yellow,
    Purple,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub id: String,
    pub display_name: String,
    pub emoji: String,
    pub accent: AccentColor,
    pub status_line: String,
    pub welcome_text: String,
    pub reply_pool: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum CatalogError {
    Parse(String),
    EmptyReplyPool(String),
    DuplicateId(String),
    MissingDefault,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "persona catalog parse error: {message}"),
            Self::EmptyReplyPool(id) => write!(f, "persona {id} has an empty reply pool"),
            Self::DuplicateId(id) => write!(f, "duplicate persona id: {id}"),
            Self::MissingDefault => {
                write!(f, "default persona {DEFAULT_PERSONA_ID} missing from catalog")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    personas: Vec<Persona>,
}

/// Read-only persona configuration, parsed once at startup and shared from
/// there on. Lookups never fail: unrecognized identifiers resolve to the
/// default persona.
#[derive(Debug)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
    default_index: usize,
}

impl PersonaCatalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument =
            serde_json::from_str(raw).map_err(|err| CatalogError::Parse(err.to_string()))?;

        for (index, persona) in document.personas.iter().enumerate() {
            if persona.reply_pool.is_empty() {
                return Err(CatalogError::EmptyReplyPool(persona.id.clone()));
            }
            if document.personas[..index].iter().any(|p| p.id == persona.id) {
                return Err(CatalogError::DuplicateId(persona.id.clone()));
            }
        }

        let default_index = document
            .personas
            .iter()
            .position(|persona| persona.id == DEFAULT_PERSONA_ID)
            .ok_or(CatalogError::MissingDefault)?;

        Ok(Self {
            personas: document.personas,
            default_index,
        })
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn default_persona(&self) -> &Persona {
        &self.personas[self.default_index]
    }

    /// Total lookup: unknown identifiers fall back to the default persona
    /// instead of failing.
    pub fn resolve(&self, id: &str) -> &Persona {
        if let Some(persona) = self.personas.iter().find(|persona| persona.id == id) {
            return persona;
        }

        warn!("unknown persona id {id:?}, falling back to {DEFAULT_PERSONA_ID}");
        self.default_persona()
    }
}
