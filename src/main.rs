//! Demo: a short REST session against the sample collections.

use rest_collections::framework::{
    LoggingNotifier, Method, Representation, Request, RequestContext,
};
use rest_collections::lifecycle::{setup_tracing, RestSystem, PRODUCTS_PATH, USERS_PATH};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting REST collections demo");

    let system = RestSystem::new(Arc::new(LoggingNotifier)).map_err(|e| e.to_string())?;
    let admin = RequestContext::user("root").with_role("admin");
    let bob = RequestContext::user("bob");

    let span = tracing::info_span!("product_creation");
    let created = async {
        info!("Creating product as admin");
        system
            .registry
            .dispatch(
                PRODUCTS_PATH,
                Request::collection(Method::Post)
                    .with_context(admin.clone())
                    .with_payload(json!({"name": "Widget", "price": 9.5, "quantity": 12})),
            )
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    info!(status = ?created.status, body = ?created.body, "Product created");

    let listing = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::collection(Method::Get).with_representation(Representation::custom("csv")),
        )
        .await
        .map_err(|e| e.to_string())?;
    info!(body = ?listing.body, "Products as csv");

    let span = tracing::info_span!("user_edits");
    async {
        match system
            .registry
            .dispatch(
                USERS_PATH,
                Request::item(Method::Patch, "bob")
                    .with_context(bob.clone())
                    .with_payload(json!({"name": "Robert"})),
            )
            .await
        {
            Ok(reply) => info!(status = reply.status.code(), "Bob renamed himself"),
            Err(e) => warn!(error = %e, "Rename failed"),
        }
        match system
            .registry
            .dispatch(USERS_PATH, Request::item(Method::Delete, "alice").with_context(bob))
            .await
        {
            Ok(reply) => info!(status = reply.status.code(), "Alice deleted"),
            Err(e) => warn!(status = e.status().code(), error = %e, "Delete refused"),
        }
    }
    .instrument(span)
    .await;

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
