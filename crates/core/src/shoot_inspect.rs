//! Shoot-inspection payload: the photo-capture step list and its rules.
//!
//! Each step describes one photo the inspector must capture, with
//! localized titles and help, retry/quality flags, an image-type
//! discriminant and an optional framing overlay.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block_list::move_item;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// ImageType
// ---------------------------------------------------------------------------

/// What part of the vehicle a step captures.
///
/// Serialized as its numeric code (`0`, `1`, `3`); code `2` is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ImageType {
    Standard,
    Additional,
    Interior,
}

impl ImageType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Additional => 1,
            Self::Interior => 3,
        }
    }
}

impl TryFrom<u8> for ImageType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Standard),
            1 => Ok(Self::Additional),
            3 => Ok(Self::Interior),
            other => Err(format!(
                "Invalid imageType {other}. Must be one of: 0 (standard), 1 (additional), 3 (interior)"
            )),
        }
    }
}

impl From<ImageType> for u8 {
    fn from(kind: ImageType) -> Self {
        kind.code()
    }
}

// ---------------------------------------------------------------------------
// Localized text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedTitle {
    pub locale: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedHelp {
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// Placement of the framing overlay for one screen orientation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConstraint {
    pub position: i32,
    pub scale_type: i32,
    pub margin_start: i32,
    pub margin_end: i32,
}

/// Framing overlay shown over the camera preview. Portrait and landscape
/// are constrained independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub portrait: OverlayConstraint,
    pub landscape: OverlayConstraint,
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One photo capture in a shoot-inspection block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub quality: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub retry: u32,
    #[serde(default)]
    pub angle: i32,
    image_type: ImageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_exterior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_additional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_interior: Option<String>,
    pub titles: Vec<LocalizedTitle>,
    pub helps: Vec<LocalizedHelp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,
}

impl Step {
    /// Create a step with one title and one help entry in `locale`.
    pub fn new(
        image_type: ImageType,
        type_value: impl Into<String>,
        locale: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let locale = locale.into();
        let mut step = Self {
            quality: false,
            optional: false,
            retry: 0,
            angle: 0,
            image_type,
            type_exterior: None,
            type_additional: None,
            type_interior: None,
            titles: vec![LocalizedTitle {
                locale: locale.clone(),
                title: title.into(),
            }],
            helps: vec![LocalizedHelp {
                locale,
                title: None,
                content: None,
            }],
            overlay: None,
        };
        step.set_image_type(image_type, type_value);
        step
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// The sub-field value matching the current discriminant.
    pub fn type_value(&self) -> Option<&str> {
        match self.image_type {
            ImageType::Standard => self.type_exterior.as_deref(),
            ImageType::Additional => self.type_additional.as_deref(),
            ImageType::Interior => self.type_interior.as_deref(),
        }
    }

    /// Switch the image type; the matching sub-field is set and the other
    /// two are cleared.
    pub fn set_image_type(&mut self, image_type: ImageType, value: impl Into<String>) {
        let value = Some(value.into());
        self.image_type = image_type;
        self.type_exterior = None;
        self.type_additional = None;
        self.type_interior = None;
        match image_type {
            ImageType::Standard => self.type_exterior = value,
            ImageType::Additional => self.type_additional = value,
            ImageType::Interior => self.type_interior = value,
        }
    }

    /// Add a title localization. Locales are unique within the list.
    pub fn add_title(
        &mut self,
        locale: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<(), CoreError> {
        let locale = locale.into();
        if self.titles.iter().any(|t| t.locale == locale) {
            return Err(CoreError::Validation(format!(
                "A title for locale '{locale}' already exists"
            )));
        }
        self.titles.push(LocalizedTitle {
            locale,
            title: title.into(),
        });
        Ok(())
    }

    /// Add a help localization. Locales are unique within the list.
    pub fn add_help(&mut self, help: LocalizedHelp) -> Result<(), CoreError> {
        if self.helps.iter().any(|h| h.locale == help.locale) {
            return Err(CoreError::Validation(format!(
                "A help entry for locale '{}' already exists",
                help.locale
            )));
        }
        self.helps.push(help);
        Ok(())
    }

    /// Remove the title for `locale`. The last remaining title cannot be
    /// removed.
    pub fn remove_title(&mut self, locale: &str) -> Result<(), CoreError> {
        let index = self
            .titles
            .iter()
            .position(|t| t.locale == locale)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Title localization",
                id: locale.to_string(),
            })?;
        if self.titles.len() == 1 {
            return Err(CoreError::Validation(
                "A step needs at least one title localization".to_string(),
            ));
        }
        self.titles.remove(index);
        Ok(())
    }

    /// Remove the help entry for `locale`. The last remaining entry cannot
    /// be removed.
    pub fn remove_help(&mut self, locale: &str) -> Result<(), CoreError> {
        let index = self
            .helps
            .iter()
            .position(|h| h.locale == locale)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Help localization",
                id: locale.to_string(),
            })?;
        if self.helps.len() == 1 {
            return Err(CoreError::Validation(
                "A step needs at least one help localization".to_string(),
            ));
        }
        self.helps.remove(index);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Configuration payload of a `shootInspect` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootInspectConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Vec<Step>,
}

impl ShootInspectConfig {
    /// An empty step list.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            config: Vec::new(),
        }
    }

    pub fn add_step(&mut self, step: Step) {
        self.config.push(step);
    }

    pub fn remove_step(&mut self, index: usize) -> Result<Step, CoreError> {
        if index >= self.config.len() {
            return Err(CoreError::Validation(format!(
                "Step index {index} is out of range (0..{})",
                self.config.len()
            )));
        }
        Ok(self.config.remove(index))
    }

    pub fn move_step(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        move_item(&mut self.config, from, to)
    }

    /// Check every structural rule on every step.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::MissingId);
        }
        for (index, step) in self.config.iter().enumerate() {
            validate_step(step).map_err(|err| match err {
                CoreError::Validation(msg) => {
                    CoreError::Validation(format!("Step {}: {msg}", index + 1))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate one capture step.
///
/// - at least one title and one help localization
/// - locales unique within each list
/// - exactly the sub-field matching `imageType` is set
pub fn validate_step(step: &Step) -> Result<(), CoreError> {
    if step.titles.is_empty() {
        return Err(CoreError::Validation(
            "At least one title localization is required".to_string(),
        ));
    }
    if step.helps.is_empty() {
        return Err(CoreError::Validation(
            "At least one help localization is required".to_string(),
        ));
    }
    ensure_unique_locales("title", step.titles.iter().map(|t| t.locale.as_str()))?;
    ensure_unique_locales("help", step.helps.iter().map(|h| h.locale.as_str()))?;

    let (matching, others) = match step.image_type {
        ImageType::Standard => (
            &step.type_exterior,
            [&step.type_additional, &step.type_interior],
        ),
        ImageType::Additional => (
            &step.type_additional,
            [&step.type_exterior, &step.type_interior],
        ),
        ImageType::Interior => (
            &step.type_interior,
            [&step.type_exterior, &step.type_additional],
        ),
    };
    if matching.is_none() {
        return Err(CoreError::Validation(format!(
            "imageType {} requires its matching type field",
            step.image_type.code()
        )));
    }
    if others.iter().any(|field| field.is_some()) {
        return Err(CoreError::Validation(format!(
            "imageType {} must not carry the type fields of other image types",
            step.image_type.code()
        )));
    }
    Ok(())
}

fn ensure_unique_locales<'a>(
    list: &str,
    locales: impl Iterator<Item = &'a str>,
) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for locale in locales {
        if locale.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Every {list} localization needs a locale"
            )));
        }
        if !seen.insert(locale) {
            return Err(CoreError::Validation(format!(
                "Duplicate {list} locale '{locale}'"
            )));
        }
    }
    Ok(())
}

/// Parse a shoot-inspection payload from JSON text and validate it.
pub fn parse_config(raw: &str) -> Result<ShootInspectConfig, CoreError> {
    let config: ShootInspectConfig =
        serde_json::from_str(raw).map_err(|e| CoreError::parse("shootInspect block", &e))?;
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
