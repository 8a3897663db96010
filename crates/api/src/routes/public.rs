//! Public site routes, served from the restricted pool.

use archsite_db::collection::Collection;
use archsite_db::models::career::Career;
use archsite_db::models::explore_content::ExploreContent;
use archsite_db::models::partner::Partner;
use archsite_db::models::project::Project;
use archsite_db::models::project_category::ProjectCategory;
use archsite_db::models::service::Service;
use archsite_db::models::team_member::TeamMember;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{collection, contact, newsletter, projects};
use crate::state::AppState;

/// Routes mounted at `/api/v1/public`.
///
/// ```text
/// GET  /projects                   -> list (published only)
/// GET  /projects/{slug}            -> project with category and partners
/// GET  /project-categories[/{slug}]
/// GET  /team[/{slug}]
/// GET  /services[/{slug}]
/// GET  /partners[/{slug}]
/// GET  /explore[/{slug}]
/// GET  /careers[/{slug}]
/// POST /contact                    -> contact form
/// POST /newsletter                 -> subscribe
/// POST /newsletter/unsubscribe     -> unsubscribe
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(collection::public_list::<Project>))
        .route("/projects/{slug}", get(projects::public_detail))
        .nest("/project-categories", published::<ProjectCategory>())
        .nest("/team", published::<TeamMember>())
        .nest("/services", published::<Service>())
        .nest("/partners", published::<Partner>())
        .nest("/explore", published::<ExploreContent>())
        .nest("/careers", published::<Career>())
        .route("/contact", post(contact::submit))
        .route("/newsletter", post(newsletter::subscribe))
        .route("/newsletter/unsubscribe", post(newsletter::unsubscribe))
}

/// List and fetch-by-slug for one collection.
fn published<C: Collection>() -> Router<AppState> {
    Router::new()
        .route("/", get(collection::public_list::<C>))
        .route("/{slug}", get(collection::public_get::<C>))
}
