//! Admin routes. Every handler takes `RequireAdmin`.

use archsite_db::collection::Editable;
use archsite_db::models::activity_log::ActivityLog;
use archsite_db::models::career::Career;
use archsite_db::models::contact_submission::ContactSubmission;
use archsite_db::models::explore_content::ExploreContent;
use archsite_db::models::media::Media;
use archsite_db::models::newsletter_subscriber::NewsletterSubscriber;
use archsite_db::models::partner::Partner;
use archsite_db::models::project::Project;
use archsite_db::models::project_category::ProjectCategory;
use archsite_db::models::service::Service;
use archsite_db::models::team_member::TeamMember;
use axum::routing::get;
use axum::Router;

use crate::handlers::{collection, dashboard, media, newsletter, projects};
use crate::state::AppState;

/// Routes mounted at `/api/v1/admin`.
///
/// ```text
/// GET|POST        /{collection}          list, create
/// GET|PUT|DELETE  /{collection}/{id}     fetch, partial update, delete
///
/// GET|PUT         /projects/{id}/partners
/// GET|PUT|DELETE  /contact/{id}          (no create; submissions come from the site)
/// GET|DELETE      /newsletter/{id}
/// GET             /media/stats
/// GET             /activity
/// GET             /stats
/// GET             /me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .nest(
            "/projects",
            crud::<Project>().route(
                "/{id}/partners",
                get(projects::list_partners).put(projects::set_partners),
            ),
        )
        .nest("/project-categories", crud::<ProjectCategory>())
        .nest("/team", crud::<TeamMember>())
        .nest("/services", crud::<Service>())
        .nest("/partners", crud::<Partner>())
        .nest("/explore", crud::<ExploreContent>())
        .nest("/careers", crud::<Career>())
        .nest(
            "/media",
            Router::new()
                .route("/", get(collection::admin_list::<Media>).post(media::create))
                .route("/stats", get(media::stats))
                .merge(by_id::<Media>()),
        )
        .nest(
            "/contact",
            Router::new()
                .route("/", get(collection::admin_list::<ContactSubmission>))
                .merge(by_id::<ContactSubmission>()),
        )
        .nest(
            "/newsletter",
            Router::new()
                .route("/", get(collection::admin_list::<NewsletterSubscriber>))
                .route(
                    "/{id}",
                    get(collection::admin_get::<NewsletterSubscriber>)
                        .delete(newsletter::admin_delete),
                ),
        )
        .route("/activity", get(collection::admin_list::<ActivityLog>))
        .route("/stats", get(dashboard::stats))
        .route("/me", get(dashboard::me))
}

/// Full CRUD for one collection.
fn crud<C: Editable>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(collection::admin_list::<C>).post(collection::admin_create::<C>),
        )
        .merge(by_id::<C>())
}

/// Fetch, update and delete by id.
fn by_id<C: Editable>() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(collection::admin_get::<C>)
            .put(collection::admin_update::<C>)
            .delete(collection::admin_delete::<C>),
    )
}

