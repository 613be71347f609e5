// Handlers rendering the marketplace pages

use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    auth::{GateDecision, admin_gate},
    auth_middleware::SessionUser,
    browse::{BrowseController, BrowseState},
    dashboard::DashboardController,
    error::{AppError, AppResult},
    filter::FilterSpec,
    form::{FormController, ListingDraft, SubmitOutcome},
    models::{Listing, User},
    storage::ImageFile,
    supabase::ListingStore,
};

// Slider defaults shown on the browse page; blank query fields fall back to
// these bounds.
const PRICE_RANGE: (f64, f64) = (0.0, 100_000.0);
const MILEAGE_RANGE: (u32, u32) = (0, 1_000_000);
const ENGINE_SIZE_RANGE: (f64, f64) = (1.0, 8.0);

/// The browse filters exactly as they arrived in the query string. Kept raw
/// so the form can echo what the user typed.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub price_min: String,
    #[serde(default)]
    pub price_max: String,
    #[serde(default)]
    pub mileage_min: String,
    #[serde(default)]
    pub mileage_max: String,
    #[serde(default)]
    pub size_min: String,
    #[serde(default)]
    pub size_max: String,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub location: String,
}

impl FilterQuery {
    fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            search: self.search.trim().to_string(),
            // "All" (and anything unparseable) clears the constraint
            engine: self.engine.trim().parse().ok(),
            year: self.year.trim().parse().ok(),
            price: (
                self.price_min.trim().parse().unwrap_or(PRICE_RANGE.0),
                self.price_max.trim().parse().unwrap_or(PRICE_RANGE.1),
            ),
            mileage: (
                self.mileage_min.trim().parse().unwrap_or(MILEAGE_RANGE.0),
                self.mileage_max.trim().parse().unwrap_or(MILEAGE_RANGE.1),
            ),
            engine_size: (
                self.size_min.trim().parse().unwrap_or(ENGINE_SIZE_RANGE.0),
                self.size_max.trim().parse().unwrap_or(ENGINE_SIZE_RANGE.1),
            ),
            transmission: self.transmission.trim().parse().ok(),
            color: match self.color.trim() {
                "" | "All" => None,
                color => Some(color.to_string()),
            },
            location: self.location.trim().to_string(),
        }
    }
}

// --- Templates ---

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    query: FilterQuery,
    error: Option<String>,
    no_data: bool,
    listings: Vec<Listing>,
}

#[derive(Template)]
#[template(path = "detail.html")]
struct DetailTemplate {
    listing: Listing,
}

#[derive(Template)]
#[template(path = "post.html")]
struct PostTemplate {
    draft: ListingDraft,
    errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    waiting: bool,
    error: Option<String>,
    listings: Vec<Listing>,
    users: Vec<User>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate;

// --- Page Handlers ---

/// The browse page: the full listing set is fetched, then filtered
/// in-process against the query-string spec.
pub async fn index(
    State(app_state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> AppResult<impl IntoResponse> {
    let mut controller = BrowseController::new(query.to_spec());
    controller.load(app_state.store.as_ref()).await;

    let (error, no_data, listings) = match controller.state() {
        // The load above has completed, so Loading never reaches a render;
        // the arm exists because the state does.
        BrowseState::Loading => (None, false, Vec::new()),
        BrowseState::Failed(message) => (Some(message.clone()), false, Vec::new()),
        BrowseState::NoData => (None, true, Vec::new()),
        BrowseState::Ready(_) => (None, false, controller.visible().unwrap_or_default()),
    };

    let template = IndexTemplate {
        query,
        error,
        no_data,
        listings,
    };
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render browse template: {}", e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}

pub async fn listing_detail(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let listing = app_state.store.fetch_by_id(&id).await?;

    let template = DetailTemplate { listing };
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render detail template: {}", e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}

pub async fn post_page() -> AppResult<impl IntoResponse> {
    render_post_form(ListingDraft::default(), Vec::new())
}

/// One full submission: multipart fields become the raw draft, files become
/// the selected images, and the form controller takes it from there.
pub async fn submit_listing(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut draft = ListingDraft::default();
    let mut files: Vec<ImageFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::InternalServerError(anyhow::Error::new(e).context("Failed to read form data"))
    })? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| {
                AppError::InternalServerError(
                    anyhow::Error::new(e).context("Failed to read uploaded image"),
                )
            })?;
            // Browsers send one empty part when no file was picked
            if bytes.is_empty() {
                continue;
            }
            files.push(ImageFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await.map_err(|e| {
                AppError::InternalServerError(
                    anyhow::Error::new(e).context("Failed to read form field"),
                )
            })?;
            match name.as_str() {
                "name" => draft.name = value,
                "price" => draft.price = value,
                "engine" => draft.engine = value,
                "engineSize" => draft.engine_size = value,
                "mileage" => draft.mileage = value,
                "transmission" => draft.transmission = value,
                "color" => draft.color = value,
                "year" => draft.year = value,
                "description" => draft.description = value,
                "location" => draft.location = value,
                other => tracing::debug!("Ignoring unknown form field '{}'", other),
            }
        }
    }

    let mut controller = FormController::with_draft(draft, files);
    match controller
        .submit(app_state.store.as_ref(), app_state.storage.as_ref())
        .await
    {
        SubmitOutcome::Created(listing) => {
            tracing::info!("Listing created successfully: {}", listing.id);
            Ok(Redirect::to("/").into_response())
        }
        SubmitOutcome::Invalid(field_errors) => {
            let errors = field_errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            Ok(render_post_form(controller.draft().clone(), errors)?.into_response())
        }
        SubmitOutcome::Failed(message) => {
            Ok(render_post_form(controller.draft().clone(), vec![message])?.into_response())
        }
        SubmitOutcome::AlreadySubmitting => Ok(render_post_form(
            controller.draft().clone(),
            vec!["A submission is already in progress.".to_string()],
        )?
        .into_response()),
    }
}

fn render_post_form(draft: ListingDraft, errors: Vec<String>) -> AppResult<Html<String>> {
    let template = PostTemplate { draft, errors };
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render post template: {}", e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}

/// The admin dashboard. The session tri-state decides everything: an
/// unresolved or absent session waits, a non-admin is redirected home, and
/// only an admin triggers the dual fetch.
pub async fn admin_page(
    State(app_state): State<AppState>,
    SessionUser(auth): SessionUser,
) -> AppResult<Response> {
    let template = match admin_gate(&auth) {
        GateDecision::Wait => AdminTemplate {
            waiting: true,
            error: None,
            listings: Vec::new(),
            users: Vec::new(),
        },
        GateDecision::RedirectHome => {
            return Ok(Redirect::to("/").into_response());
        }
        GateDecision::Proceed => match DashboardController::load(app_state.store.as_ref()).await {
            Ok(dashboard) => AdminTemplate {
                waiting: false,
                error: None,
                listings: dashboard.listings,
                users: dashboard.users,
            },
            Err(e) => {
                tracing::error!("Dashboard load failed: {}", e);
                // Neither collection is shown when either fetch failed
                AdminTemplate {
                    waiting: false,
                    error: Some("Failed to load data. Please try again.".to_string()),
                    listings: Vec::new(),
                    users: Vec::new(),
                }
            }
        },
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Failed to render admin template: {}", e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}

pub async fn login_page() -> AppResult<impl IntoResponse> {
    let template = LoginTemplate;
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render login template: {}", e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Engine, Transmission};

    #[test]
    fn blank_query_falls_back_to_the_slider_defaults() {
        let spec = FilterQuery::default().to_spec();
        assert_eq!(spec.price, PRICE_RANGE);
        assert_eq!(spec.mileage, MILEAGE_RANGE);
        assert_eq!(spec.engine_size, ENGINE_SIZE_RANGE);
        assert_eq!(spec.engine, None);
        assert_eq!(spec.year, None);
    }

    #[test]
    fn all_and_garbage_clear_the_enum_constraints() {
        let query = FilterQuery {
            engine: "All".to_string(),
            transmission: "whatever".to_string(),
            color: "All".to_string(),
            ..FilterQuery::default()
        };
        let spec = query.to_spec();
        assert_eq!(spec.engine, None);
        assert_eq!(spec.transmission, None);
        assert_eq!(spec.color, None);
    }

    #[test]
    fn populated_query_parses_into_typed_bounds() {
        let query = FilterQuery {
            search: " volvo ".to_string(),
            engine: "Diesel".to_string(),
            year: "2020".to_string(),
            price_min: "5000".to_string(),
            price_max: "20000".to_string(),
            transmission: "Semi-Automatic".to_string(),
            color: "Red".to_string(),
            ..FilterQuery::default()
        };
        let spec = query.to_spec();
        assert_eq!(spec.search, "volvo");
        assert_eq!(spec.engine, Some(Engine::Diesel));
        assert_eq!(spec.year, Some(2020));
        assert_eq!(spec.price, (5000.0, 20000.0));
        assert_eq!(spec.transmission, Some(Transmission::SemiAutomatic));
        assert_eq!(spec.color, Some("Red".to_string()));
    }
}
