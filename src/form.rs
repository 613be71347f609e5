// The listing form controller: draft state, submit-time coercion, and the
// upload-then-create submission sequence.

use crate::models::{Engine, Listing, NewListing, Transmission};
use crate::storage::{ImageFile, ObjectStore, upload_all};
use crate::supabase::ListingStore;

/// The in-progress, unsaved listing under edit. Every field is the raw text
/// the user typed; nothing is coerced until submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub name: String,
    pub price: String,
    pub engine: String,
    pub engine_size: String,
    pub mileage: String,
    pub transmission: String,
    pub color: String,
    pub year: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

impl ListingDraft {
    /// Coerces the raw fields into a typed record, collecting every field
    /// error instead of stopping at the first. `images` is left empty; the
    /// submission fills it in after the uploads complete.
    pub fn parse(&self) -> Result<NewListing, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "brand and model are required"));
        }

        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0);
        if price.is_none() {
            errors.push(FieldError::new("price", "price must be a non-negative number"));
        }

        let engine = match self.engine.trim().parse::<Engine>() {
            Ok(engine) => Some(engine),
            Err(message) => {
                errors.push(FieldError::new("engine", message));
                None
            }
        };

        let engine_size = self
            .engine_size
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite() && *s >= 0.0);
        if engine_size.is_none() {
            errors.push(FieldError::new(
                "engineSize",
                "engine size must be a non-negative number of liters",
            ));
        }

        // A u32 parse already rejects negatives and fractions.
        let mileage = self.mileage.trim().parse::<u32>().ok();
        if mileage.is_none() {
            errors.push(FieldError::new("mileage", "mileage must be a whole number of km"));
        }

        let transmission = match self.transmission.trim().parse::<Transmission>() {
            Ok(transmission) => Some(transmission),
            Err(message) => {
                errors.push(FieldError::new("transmission", message));
                None
            }
        };

        let year = self.year.trim().parse::<u32>().ok().filter(|y| *y > 0);
        if year.is_none() {
            errors.push(FieldError::new("year", "year must be a positive whole number"));
        }

        match (price, engine, engine_size, mileage, transmission, year) {
            (Some(price), Some(engine), Some(engine_size), Some(mileage), Some(transmission), Some(year))
                if errors.is_empty() =>
            {
                Ok(NewListing {
                    name: self.name.trim().to_string(),
                    price,
                    engine,
                    engine_size,
                    mileage,
                    transmission,
                    color: self.color.trim().to_string(),
                    year,
                    description: self.description.trim().to_string(),
                    images: Vec::new(),
                    location: self.location.trim().to_string(),
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The record was created; the caller performs the navigation away.
    Created(Listing),
    /// Submit-time coercion failed; the draft stays as typed.
    Invalid(Vec<FieldError>),
    /// Upload or insert failed; draft and selected files stay intact so the
    /// user can retry without re-entering anything.
    Failed(String),
    /// A submission is already in flight.
    AlreadySubmitting,
}

/// Owns a single draft and its selected files.
///
/// State machine: Editing -> (submit) -> Submitting -> back to Editing, with
/// cleared fields on success and an intact draft on any failure.
pub struct FormController {
    draft: ListingDraft,
    files: Vec<ImageFile>,
    state: FormState,
}

impl Default for FormController {
    fn default() -> Self {
        FormController::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        FormController {
            draft: ListingDraft::default(),
            files: Vec::new(),
            state: FormState::Editing,
        }
    }

    pub fn with_draft(draft: ListingDraft, files: Vec<ImageFile>) -> Self {
        FormController {
            draft,
            files,
            state: FormState::Editing,
        }
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ListingDraft {
        &mut self.draft
    }

    pub fn select_images(&mut self, files: Vec<ImageFile>) {
        self.files = files;
    }

    pub fn selected_files(&self) -> &[ImageFile] {
        &self.files
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Runs one submission: coerce the draft, upload every image, then insert
    /// the record. Uploads strictly precede the insert, and the whole
    /// sequence runs to completion or failure; there is no cancellation.
    pub async fn submit<S, O>(&mut self, store: &S, images: &O) -> SubmitOutcome
    where
        S: ListingStore + ?Sized,
        O: ObjectStore + ?Sized,
    {
        if self.state == FormState::Submitting {
            return SubmitOutcome::AlreadySubmitting;
        }

        let mut record = match self.draft.parse() {
            Ok(record) => record,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };

        self.state = FormState::Submitting;

        let urls = match upload_all(images, &self.files).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!("Image upload failed during submission: {}", e);
                self.state = FormState::Editing;
                return SubmitOutcome::Failed(e.to_string());
            }
        };
        record.images = urls;

        match store.create(&record).await {
            Ok(created) => {
                tracing::info!("Listing submitted successfully with ID: {}", created.id);
                self.draft = ListingDraft::default();
                self.files.clear();
                self.state = FormState::Editing;
                SubmitOutcome::Created(created)
            }
            Err(e) => {
                tracing::error!("Failed to create listing: {}", e);
                self.state = FormState::Editing;
                SubmitOutcome::Failed(format!("Failed to create listing: {}", e))
            }
        }
    }

    #[cfg(test)]
    fn force_submitting(&mut self) {
        self.state = FormState::Submitting;
    }
}
