use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/product-query", product_query_routes())
        .nest("/sale", sale_routes())
        .nest("/purchases", purchase_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/payment-vault", payment_vault_routes())
        .nest("/flags", flag_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::products::list_products,
            handlers::products::create_product
        ))
        .routes(routes!(handlers::products::search_products))
        .routes(routes!(handlers::products::get_product))
}

fn product_query_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::products::product_query))
}

fn sale_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::sale::list_sale))
        .routes(routes!(handlers::sale::list_sale_optimized))
        .routes(routes!(handlers::sale::list_shop))
}

fn purchase_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::purchases::list_purchases,
        handlers::purchases::create_purchase
    ))
}

fn cart_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::cart::get_cart,
        handlers::cart::save_cart
    ))
}

fn checkout_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::checkout::borkedpay))
}

fn payment_vault_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::payment_vault::retrieve))
        .routes(routes!(handlers::payment_vault::store))
        .routes(routes!(handlers::payment_vault::decrypt))
}

fn flag_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::flags::list_flags,
            handlers::flags::create_flag
        ))
        .routes(routes!(handlers::flags::list_flag_descriptions))
        .routes(routes!(handlers::flags::list_flag_details))
        .routes(routes!(handlers::flags::update_flag_default))
        .routes(routes!(handlers::flags::delete_flag))
        .routes(routes!(handlers::flags::notify_flag_change))
}
