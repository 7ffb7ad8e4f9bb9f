use rest_collections::config::SystemConfig;
use rest_collections::framework::mock::RecordingNotifier;
use rest_collections::framework::{
    Body, Method, OperationKind, Representation, Request, RequestContext, ResourceError, Status,
};
use rest_collections::lifecycle::{RestSystem, PRODUCTS_PATH, USERS_PATH};
use serde_json::{json, Value};
use std::sync::Arc;

fn admin() -> RequestContext {
    RequestContext::user("root").with_role("admin")
}

fn csv() -> Representation {
    Representation::custom("csv")
}

/// Full end-to-end integration test with both real collections behind the registry.
#[tokio::test]
async fn test_full_rest_system_integration() {
    let notifier = RecordingNotifier::new();
    let system = RestSystem::new(Arc::new(notifier.clone())).expect("Failed to start system");
    assert_eq!(
        system.registry.paths(),
        vec![PRODUCTS_PATH.to_string(), USERS_PATH.to_string()]
    );

    // Seeded users are visible to everyone
    let listing = system
        .registry
        .dispatch(USERS_PATH, Request::collection(Method::Get))
        .await
        .expect("Failed to list users");
    let Some(Body::List(users)) = listing.body else {
        panic!("expected a list body");
    };
    let names: Vec<&str> = users.iter().filter_map(|u| u["name"].as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    // Create a product; the collection picks its id
    let created = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::collection(Method::Post)
                .with_context(admin())
                .with_payload(json!({"name": "Super Widget", "price": 25.5, "quantity": 100})),
        )
        .await
        .expect("Failed to create product");
    assert_eq!(created.status, Status::Created);
    let Some(Body::Id(product_id)) = created.body else {
        panic!("expected an id body");
    };
    assert!(product_id.starts_with("product_"));

    // Read it back through the typed client
    let reply = system
        .products
        .get(RequestContext::anonymous(), &product_id)
        .await
        .expect("Failed to get product");
    let Some(Body::Resource(product)) = reply.body else {
        panic!("expected a resource body");
    };
    assert_eq!(product.name, "Super Widget");
    assert_eq!(product.quantity, 100);

    // Restock
    let restocked = system
        .products
        .patch(admin(), &product_id, json!({"quantity": 90}))
        .await
        .expect("Failed to update product");
    assert_eq!(restocked.status, Status::NoContent);

    assert_eq!(
        notifier.batches(),
        vec![vec![product_id.clone()], vec![product_id.clone()]]
    );

    system.shutdown().await.expect("Failed to shutdown");
}

#[tokio::test]
async fn test_user_rights() {
    let notifier = RecordingNotifier::new();
    let system = RestSystem::new(Arc::new(notifier.clone())).unwrap();
    let bob = RequestContext::user("bob");

    // Bob may edit himself...
    let renamed = system
        .users
        .patch(bob.clone(), "bob", json!({"name": "Robert"}))
        .await
        .unwrap();
    assert_eq!(renamed.status, Status::NoContent);

    // ...but not Alice, and he may not delete anyone
    let edit_alice = system
        .users
        .patch(bob.clone(), "alice", json!({"name": "Mallory"}))
        .await;
    assert!(matches!(
        edit_alice,
        Err(ResourceError::Forbidden { kind: OperationKind::Update, .. })
    ));
    let delete_alice = system
        .registry
        .dispatch(USERS_PATH, Request::item(Method::Delete, "alice").with_context(bob))
        .await;
    assert_eq!(delete_alice.unwrap_err().status(), Status::Forbidden);

    // Admins create users under a chosen id
    let carol = system
        .users
        .put(admin(), "carol", json!({"name": "Carol", "email": "carol@example.com"}))
        .await
        .unwrap();
    assert_eq!(carol.status, Status::NoContent);

    // Users cannot be created through collection POST
    let posted = system
        .registry
        .dispatch(
            USERS_PATH,
            Request::collection(Method::Post)
                .with_context(admin())
                .with_payload(json!({"name": "Dave", "email": "dave@example.com"})),
        )
        .await;
    assert_eq!(posted.unwrap_err().status(), Status::MethodNotSupported);

    assert_eq!(
        system.users.ids().await.unwrap(),
        vec!["alice".to_string(), "bob".to_string(), "carol".to_string()]
    );
    let bob = system.users.snapshot().await.unwrap().remove("bob").unwrap();
    assert_eq!(bob.name, "Robert");
    assert_eq!(
        notifier.batches(),
        vec![vec!["bob".to_string()], vec!["carol".to_string()]]
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_products_csv_representation() {
    let system = RestSystem::new(Arc::new(RecordingNotifier::new())).unwrap();

    let put = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::item(Method::Put, "gadget")
                .with_context(admin())
                .with_representation(csv())
                .with_payload(json!("Gadget,3.5,4")),
        )
        .await
        .unwrap();
    assert_eq!(put.status, Status::NoContent);

    let read = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::item(Method::Get, "gadget").with_representation(csv()),
        )
        .await
        .unwrap();
    assert_eq!(read.body, Some(Body::Formatted(json!("gadget,Gadget,3.5,4"))));

    // Replace the whole collection from csv lines
    let replaced = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::collection(Method::Put)
                .with_context(admin())
                .with_representation(csv())
                .with_payload(json!({"bolt": "Bolt,0.25,500", "nut": "Nut,0.1,1000"})),
        )
        .await
        .unwrap();
    assert_eq!(replaced.status, Status::NoContent);

    let listing = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::collection(Method::Get).with_representation(csv()),
        )
        .await
        .unwrap();
    assert_eq!(
        listing.body,
        Some(Body::Formatted(json!(["bolt,Bolt,0.25,500", "nut,Nut,0.1,1000"])))
    );

    // Malformed csv is the caller's fault; users have no csv at all
    let malformed = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::item(Method::Put, "bad")
                .with_context(admin())
                .with_representation(csv())
                .with_payload(json!("just a name")),
        )
        .await;
    assert_eq!(malformed.unwrap_err().status(), Status::BadRequest);
    let users_csv = system
        .registry
        .dispatch(USERS_PATH, Request::item(Method::Get, "alice").with_representation(csv()))
        .await;
    assert_eq!(users_csv, Err(ResourceError::UnsupportedFormat("csv".into())));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_system_config_and_failing_persistence() {
    let config = SystemConfig::from_json(
        r#"{"collections": {"products": {"buffer_size": 4, "create_id_attempts": 3}}}"#,
    )
    .unwrap();
    let notifier = RecordingNotifier::failing();
    let system = RestSystem::with_config(&config, Arc::new(notifier.clone())).unwrap();

    let result = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::collection(Method::Post)
                .with_context(admin())
                .with_payload(json!({"name": "Ghost", "price": 1.0})),
        )
        .await;
    assert_eq!(result.unwrap_err().status(), Status::InternalError);
    assert!(system.products.ids().await.unwrap().is_empty());

    // Once persistence recovers the same request goes through
    notifier.set_failing(false);
    let retried = system
        .registry
        .dispatch(
            PRODUCTS_PATH,
            Request::collection(Method::Post)
                .with_context(admin())
                .with_payload(json!({"name": "Ghost", "price": 1.0})),
        )
        .await
        .unwrap();
    assert_eq!(retried.status, Status::Created);
    assert_eq!(notifier.batches().len(), 2);

    let listing: Vec<Value> = match system
        .registry
        .dispatch(PRODUCTS_PATH, Request::collection(Method::Get))
        .await
        .unwrap()
        .body
    {
        Some(Body::List(items)) => items,
        other => panic!("expected a list body, got {other:?}"),
    };
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["quantity"], json!(0));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_waits_for_outstanding_clients() {
    let system = RestSystem::new(Arc::new(RecordingNotifier::new())).unwrap();
    let users = system.users.clone();

    // A surviving clone keeps the actor alive, so shut down from a task
    let shutdown = tokio::spawn(system.shutdown());
    assert!(users.list_all().await.is_ok());
    drop(users);

    shutdown.await.unwrap().unwrap();
}
