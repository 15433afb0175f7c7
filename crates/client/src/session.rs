//! Editing session for one journey.
//!
//! Every local edit is applied to a working copy and committed only when it
//! succeeds, so a failed operation leaves the document exactly as it was.
//! Saving is split into prepare / submit / commit so a caller holding the
//! session behind a lock can release it while the upstream call is in
//! flight. Only one save per session may be in flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use inspectra_core::codec;
use inspectra_core::duplication::JourneyDuplication;
use inspectra_core::error::CoreError;
use inspectra_core::journey::JourneyDocument;
use inspectra_core::types::{CompanyId, Timestamp, WorkflowId};
use inspectra_core::workflow::{CreateWorkflowRequest, UpdateWorkflowRequest, WorkflowRecord};
use uuid::Uuid;

use crate::api::WorkflowApi;
use crate::error::{SessionError, WorkflowApiError};

/// Marks a save of one session as in flight for as long as it is alive.
#[derive(Debug)]
struct SaveInFlight(Arc<AtomicBool>);

impl SaveInFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for SaveInFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A validated save, ready to send. `revision` identifies the document
/// state it was built from.
///
/// The session refuses further saves until this value is committed or
/// dropped.
#[derive(Debug)]
pub struct PreparedSave {
    pub request: SaveRequest,
    pub revision: u64,
    _in_flight: SaveInFlight,
}

impl PreparedSave {
    /// Send the request upstream.
    pub async fn submit<A>(&self, api: &A) -> Result<WorkflowRecord, WorkflowApiError>
    where
        A: WorkflowApi + ?Sized,
    {
        self.request.clone().submit(api).await
    }
}

/// Upstream call needed to persist a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Create(CreateWorkflowRequest),
    Update {
        id: WorkflowId,
        request: UpdateWorkflowRequest,
        company_id: Option<CompanyId>,
    },
}

impl SaveRequest {
    /// Send the request upstream.
    pub async fn submit<A>(self, api: &A) -> Result<WorkflowRecord, WorkflowApiError>
    where
        A: WorkflowApi + ?Sized,
    {
        match self {
            Self::Create(request) => api.create_workflow(request).await,
            Self::Update {
                id,
                request,
                company_id,
            } => {
                api.update_workflow(&id, request, company_id.as_deref())
                    .await
            }
        }
    }
}

#[derive(Debug)]
pub struct JourneySession {
    id: Uuid,
    document: JourneyDocument,
    /// Changes made since the last successful save or load.
    dirty: bool,
    /// Bumped on every committed edit.
    revision: u64,
    saving: Arc<AtomicBool>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl JourneySession {
    /// A session over a new, empty journey.
    pub fn new(name: impl Into<String>, company_id: Option<CompanyId>) -> Self {
        let mut session = Self::from_document(JourneyDocument::new(name, company_id));
        session.dirty = true;
        session
    }

    pub fn from_document(document: JourneyDocument) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            document,
            dirty: false,
            revision: 0,
            saving: Arc::new(AtomicBool::new(false)),
            created_at: now,
            updated_at: now,
        }
    }

    /// Open a persisted workflow for editing.
    pub async fn load<A>(
        api: &A,
        workflow_id: &str,
        company_id: Option<&str>,
    ) -> Result<Self, SessionError>
    where
        A: WorkflowApi + ?Sized,
    {
        let record = api.get_workflow_by_id(workflow_id, company_id).await?;
        let document = JourneyDocument::from_record(record)?;
        tracing::info!(
            workflow_id = %workflow_id,
            block_count = document.blocks().len(),
            "Loaded journey"
        );
        Ok(Self::from_document(document))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document(&self) -> &JourneyDocument {
        &self.document
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a prepared save has not been committed or dropped yet.
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Apply one operator action atomically.
    pub fn edit<T>(
        &mut self,
        action: impl FnOnce(&mut JourneyDocument) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut working = self.document.clone();
        let result = action(&mut working)?;
        self.document = working;
        self.touch();
        Ok(result)
    }

    // -- persistence ----------------------------------------------------------

    /// Validate the document and build the upstream request for saving it.
    ///
    /// Fails with [`SessionError::SaveInProgress`] while another prepared
    /// save of this session is alive, so an unsaved journey is never
    /// created upstream twice.
    pub fn prepare_save(&self) -> Result<PreparedSave, SessionError> {
        let doc = &self.document;
        let request = match &doc.id {
            None => {
                doc.validate_for_save(true)?;
                SaveRequest::Create(doc.to_create_request()?)
            }
            Some(id) => {
                doc.validate_for_save(false)?;
                SaveRequest::Update {
                    id: id.clone(),
                    request: doc.to_update_request()?,
                    company_id: doc.company_id.clone(),
                }
            }
        };
        let in_flight = SaveInFlight::acquire(&self.saving).ok_or(SessionError::SaveInProgress)?;
        Ok(PreparedSave {
            request,
            revision: self.revision,
            _in_flight: in_flight,
        })
    }

    /// Record the workflow returned for a save and release the session for
    /// the next one.
    ///
    /// Without edits since the save was prepared, the document is rebuilt
    /// from the record so identifiers assigned upstream are taken over.
    /// Otherwise only the workflow id and the returned config ids are
    /// applied, and the session stays dirty.
    pub fn commit_save(&mut self, record: WorkflowRecord, prepared: PreparedSave) {
        let unchanged = self.revision == prepared.revision;
        self.document.id = Some(record.id.clone());

        if unchanged {
            let company_id = self.document.company_id.clone();
            match JourneyDocument::from_record(record.clone()) {
                Ok(mut document) => {
                    if document.company_id.is_none() {
                        document.company_id = company_id;
                    }
                    self.document = document;
                }
                Err(err) => {
                    tracing::warn!(
                        session_id = %self.id,
                        workflow_id = %record.id,
                        error = %err,
                        "Saved workflow could not be reloaded, keeping local document"
                    );
                    self.document.adopt_config_ids(&record.blocks);
                }
            }
        } else {
            self.document.adopt_config_ids(&record.blocks);
        }

        self.dirty = !unchanged;
        self.updated_at = chrono::Utc::now();
        drop(prepared);
    }

    /// Validate, persist and record the workflow id. On failure the
    /// document is left untouched.
    pub async fn save<A>(&mut self, api: &A) -> Result<WorkflowRecord, SessionError>
    where
        A: WorkflowApi + ?Sized,
    {
        let prepared = self.prepare_save()?;
        let record = prepared.submit(api).await.map_err(|err| {
            tracing::error!(session_id = %self.id, error = %err, "Failed to save journey");
            err
        })?;
        self.commit_save(record.clone(), prepared);
        tracing::info!(session_id = %self.id, workflow_id = %record.id, "Saved journey");
        Ok(record)
    }

    // -- import / export ------------------------------------------------------

    pub fn export(&self) -> Result<String, CoreError> {
        codec::export_journey(&self.document)
    }

    /// Replace the document with the contents of an export file.
    ///
    /// The persisted id and company of the session are kept when the file
    /// carries none, so saving afterwards updates the same workflow.
    pub fn import(&mut self, text: &str) -> Result<(), CoreError> {
        let mut imported = codec::import_journey(text)?;
        if imported.id.is_none() {
            imported.id = self.document.id.clone();
        }
        if imported.company_id.is_none() {
            imported.company_id = self.document.company_id.clone();
        }
        self.document = imported;
        self.touch();
        Ok(())
    }

    // -- duplication ----------------------------------------------------------

    /// Client-side copy as a new, unsaved session.
    ///
    /// `name` defaults to the source name with a copy suffix; `company_id`
    /// defaults to the source company.
    pub fn duplicate(
        &self,
        name: Option<String>,
        company_id: Option<CompanyId>,
    ) -> Result<JourneySession, CoreError> {
        let mut duplication = JourneyDuplication::new(&self.document);
        if let Some(name) = name {
            duplication.name = name;
        }
        if company_id.is_some() {
            duplication.company_id = company_id;
        }
        let copy = duplication.execute()?;

        let mut session = Self::from_document(copy);
        session.dirty = true;
        Ok(session)
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
        self.updated_at = chrono::Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
