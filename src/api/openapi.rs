use super::handlers::{auth, bookmarks, categories, health, icon, links, settings};
use utoipa::openapi::{InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut navhub_tag = Tag::new("navhub");
    navhub_tag.description = Some("Personal link directory API".to_string());

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Initialization, login and tier unlocks".to_string());

    let mut base = cargo_openapi();
    base.tags = Some(vec![navhub_tag, auth_tag]);

    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let router = OpenApiRouter::with_openapi(base)
        .routes(routes!(health::health))
        .routes(routes!(auth::init::init))
        .routes(routes!(auth::init::check_init))
        .routes(routes!(auth::login::login))
        .routes(routes!(auth::login::verify_token))
        .routes(routes!(auth::unlock::verify_hidden))
        .routes(routes!(auth::unlock::bookmarks_auth))
        .routes(routes!(auth::unlock::bookmarks_check))
        .routes(routes!(auth::passwords::update_hidden_password))
        .routes(routes!(auth::passwords::update_bookmark_password))
        .routes(routes!(links::list_links, links::create_link))
        .routes(routes!(links::reorder_links))
        .routes(routes!(links::update_link, links::delete_link))
        .routes(routes!(
            categories::list_categories,
            categories::create_category
        ))
        .routes(routes!(categories::reorder_categories))
        .routes(routes!(
            categories::update_category,
            categories::delete_category
        ))
        .routes(routes!(
            categories::get_default_category,
            categories::set_default_category
        ))
        .routes(routes!(
            bookmarks::list_bookmarks,
            bookmarks::create_bookmark
        ))
        .routes(routes!(bookmarks::delete_bookmark))
        .routes(routes!(
            settings::get_site_settings,
            settings::update_site_settings
        ))
        .routes(routes!(
            settings::get_admin_account,
            settings::update_admin_account
        ))
        .routes(routes!(
            settings::get_admin_path,
            settings::update_admin_path
        ))
        .routes(routes!(
            settings::get_security_settings,
            settings::update_security_settings
        ))
        .routes(routes!(icon::icon));

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.license = Some(License::new(env!("CARGO_PKG_LICENSE")));

    OpenApiBuilder::new().info(info).build()
}
