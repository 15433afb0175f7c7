//! Company records and the company duplication context.
//!
//! Duplicating a company copies its settings but never its identity: the
//! sender name and webhook URL are reset and must be supplied again (the
//! sender name is mandatory, the webhook optional but well-formed).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::ValidateUrl;

use crate::error::CoreError;
use crate::types::CompanyId;

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

/// Report settings of a company. Besides the identity fields the record
/// holds arbitrary nested settings, kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A client organization as returned by the company API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_company_id: Option<CompanyId>,
    #[serde(default)]
    pub report_settings: ReportSettings,
    #[serde(default)]
    pub config_modules: Value,
}

// ---------------------------------------------------------------------------
// Duplication context
// ---------------------------------------------------------------------------

/// Which related records the copy inherits from the source.
///
/// Carried through to the request untouched; the company API acts on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritanceToggles {
    pub journeys: bool,
    pub cost_settings: bool,
    pub sorting_rules: bool,
    pub webhook_events: bool,
}

impl Default for InheritanceToggles {
    fn default() -> Self {
        Self {
            journeys: true,
            cost_settings: false,
            sorting_rules: true,
            webhook_events: true,
        }
    }
}

/// A company the copy may be attached to as its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentCandidate {
    pub id: CompanyId,
    pub name: String,
}

/// Operator-editable staging state for duplicating a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDuplicationContext {
    pub source_company_id: CompanyId,
    pub name: String,
    pub sender_name: String,
    pub webhook_url: String,
    #[serde(default)]
    pub parent_company_id: Option<CompanyId>,
    /// Remaining report settings as pretty-printed JSON.
    pub report_settings_text: String,
    /// Config modules as pretty-printed JSON.
    pub config_modules_text: String,
    #[serde(default)]
    pub parent_candidates: Vec<ParentCandidate>,
    #[serde(default)]
    pub inherit: InheritanceToggles,
}

/// Request sent to the company API to create the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCompanyRequest {
    pub source_company_id: CompanyId,
    pub name: String,
    pub parent_company_id: Option<CompanyId>,
    pub report_settings: ReportSettings,
    pub config_modules: Value,
    pub inherit: InheritanceToggles,
}

impl CompanyDuplicationContext {
    /// Stage a duplication of `source`.
    ///
    /// `companies` is the full company list; every entry except the source
    /// becomes a parent candidate.
    pub fn from_company(source: &Company, companies: &[Company]) -> Result<Self, CoreError> {
        let parent_candidates = companies
            .iter()
            .filter(|c| c.id != source.id)
            .map(|c| ParentCandidate {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect();

        Ok(Self {
            source_company_id: source.id.clone(),
            name: format!("{} (Copy)", source.name.trim()),
            sender_name: String::new(),
            webhook_url: String::new(),
            parent_company_id: source.parent_company_id.clone(),
            report_settings_text: pretty(
                "report settings",
                &Value::Object(source.report_settings.extra.clone()),
            )?,
            config_modules_text: pretty("config modules", &source.config_modules)?,
            parent_candidates,
            inherit: InheritanceToggles::default(),
        })
    }

    /// Replace the candidate list, e.g. after re-reading the company list.
    pub fn refresh_candidates(&mut self, companies: &[Company]) {
        self.parent_candidates = companies
            .iter()
            .filter(|c| c.id != self.source_company_id)
            .map(|c| ParentCandidate {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect();
    }

    /// Validate the staged values and produce the outgoing request.
    pub fn build_request(&self) -> Result<DuplicateCompanyRequest, CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "Company name must not be empty".to_string(),
            ));
        }

        let sender_name = self.sender_name.trim();
        if sender_name.is_empty() {
            return Err(CoreError::Validation(
                "Sender name must not be empty".to_string(),
            ));
        }

        let webhook_url = self.webhook_url.trim();
        if !webhook_url.is_empty() {
            validate_webhook_url(webhook_url)?;
        }

        if let Some(parent) = &self.parent_company_id {
            if *parent == self.source_company_id {
                return Err(CoreError::Validation(
                    "A company cannot be duplicated under itself".to_string(),
                ));
            }
            if !self.parent_candidates.iter().any(|c| c.id == *parent) {
                return Err(CoreError::NotFound {
                    entity: "Company",
                    id: parent.clone(),
                });
            }
        }

        let extra = match parse_text("report settings", &self.report_settings_text)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(CoreError::Validation(
                    "Report settings must be a JSON object".to_string(),
                ));
            }
        };
        let config_modules = parse_text("config modules", &self.config_modules_text)?;

        Ok(DuplicateCompanyRequest {
            source_company_id: self.source_company_id.clone(),
            name: name.to_string(),
            parent_company_id: self.parent_company_id.clone(),
            report_settings: ReportSettings {
                sender_name: Some(sender_name.to_string()),
                webhook_url: (!webhook_url.is_empty()).then(|| webhook_url.to_string()),
                extra,
            },
            config_modules,
            inherit: self.inherit,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate a webhook URL: it must parse as an absolute `http`/`https` URL.
pub fn validate_webhook_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !has_scheme || !trimmed.validate_url() {
        return Err(CoreError::Validation(format!(
            "Webhook URL must be a valid http:// or https:// URL, got: '{trimmed}'"
        )));
    }
    Ok(())
}

fn pretty(context: &str, value: &Value) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(|e| CoreError::parse(context, &e))
}

/// Parse operator-edited settings text. Blank text means `null`.
fn parse_text(context: &str, text: &str) -> Result<Value, CoreError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| CoreError::parse(context, &e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
