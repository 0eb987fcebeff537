use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::application_service::contributor_service::{
    ContributorServiceError, SetAssociationCommand, WriteOutcome,
};
use crate::domain::{
    AntiForgeryToken, ContentItemId, ContributorAssociation, ContributorId, ContributorView,
    EditForm, Identity,
};

use super::template;
use super::AppState;

/// Header carrying the acting user's id, set by the fronting host.
pub const IDENTITY_HEADER: &str = "x-identity-id";

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssociationResponse {
    pub content_item_id: String,
    pub contributor_ids: Vec<ContributorId>,
    /// `stored` or `no_submission`; absent on plain reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl AssociationResponse {
    fn new(association: &ContributorAssociation, outcome: Option<String>) -> Self {
        Self {
            content_item_id: association.content_item_id().to_string(),
            contributor_ids: association.contributor_ids().to_vec(),
            outcome,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetContributorsRequest {
    pub token: Option<String>,
    /// Omitted means "no change requested"; an empty list clears.
    pub author: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EditFormResponse {
    pub form: EditForm,
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub content: String,
    #[serde(default)]
    pub singular: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderResponse {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SetOwnerRequest {
    pub owner: u64,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/contributors", get(list_contributors))
        .route(
            "/content/{id}/contributors",
            get(get_contributors).post(set_contributors),
        )
        .route("/content/{id}/contributors/form", get(edit_form))
        .route("/content/{id}/contributors/view", get(view_contributors))
        .route("/content/{id}/render", post(render_content))
        .route("/content/{id}/owner", put(set_owner))
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn service_error(e: ContributorServiceError) -> ApiError {
    let status = match e {
        ContributorServiceError::Denied(_) => StatusCode::FORBIDDEN,
        ContributorServiceError::IdentityDirectory(_)
        | ContributorServiceError::MetadataStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error(status, e.to_string())
}

/// Resolves the acting user from the identity header.
fn acting_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let raw = headers
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "missing identity"))?;

    let id: ContributorId = raw
        .parse()
        .map_err(|e| error(StatusCode::UNAUTHORIZED, format!("invalid identity: {e}")))?;

    state
        .service
        .identity_directory
        .find(id)
        .map(|user| user.identity())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, format!("unknown identity: {id}")))
}

async fn list_contributors(State(state): State<Arc<AppState>>) -> Json<Vec<Identity>> {
    Json(state.service.list_eligible_contributors())
}

async fn get_contributors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<AssociationResponse> {
    let association = state.service.get_association(&ContentItemId::new(id));
    Json(AssociationResponse::new(&association, None))
}

async fn set_contributors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SetContributorsRequest>,
) -> Result<Json<AssociationResponse>, ApiError> {
    let acting_identity = acting_identity(&state, &headers)?;

    let result = state
        .service
        .set_association(SetAssociationCommand {
            content_item_id: ContentItemId::new(id),
            submitted: req.author,
            acting_identity,
            token: req.token.map(AntiForgeryToken::new),
        })
        .map_err(service_error)?;

    // A silently refused write reads the same as a stored one
    let outcome = match result.outcome {
        WriteOutcome::Stored | WriteOutcome::Denied(_) => "stored",
        WriteOutcome::NoSubmission => "no_submission",
    };

    Ok(Json(AssociationResponse::new(
        &result.association,
        Some(outcome.to_string()),
    )))
}

async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<EditFormResponse>, ApiError> {
    let acting_identity = acting_identity(&state, &headers)?;

    let form = state
        .service
        .edit_form(&ContentItemId::new(id), &acting_identity)
        .map_err(service_error)?;
    let html = template::render_edit_form(&form);

    Ok(Json(EditFormResponse { form, html }))
}

async fn view_contributors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Vec<ContributorView>> {
    Json(state.service.render_contributor_list(&ContentItemId::new(id)))
}

async fn render_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RenderRequest>,
) -> Json<RenderResponse> {
    let views = state.service.render_contributor_list(&ContentItemId::new(id));
    let content =
        template::append_contributor_block(&req.content, &views, &state.heading, req.singular);
    Json(RenderResponse { content })
}

async fn set_owner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SetOwnerRequest>,
) -> Result<StatusCode, ApiError> {
    let acting_identity = acting_identity(&state, &headers)?;
    if !state.service.authorization.is_editor(&acting_identity) {
        return Err(error(StatusCode::FORBIDDEN, "only editors may assign owners"));
    }

    let owner = ContributorId::new(req.owner)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "owner must be a positive id"))?;
    let content_item_id = ContentItemId::new(id);

    tracing::info!(
        "Owner of {} set to {} by {}",
        content_item_id,
        owner,
        acting_identity.id
    );
    state
        .service
        .authorization
        .set_owner(&content_item_id, owner)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}
