use crate::config::SystemConfig;
use crate::framework::{
    CollectionActor, CollectionClient, ConfigError, PersistenceNotifier, RequestContext,
    ResourceCollection, ResourceError, Right, Rights,
};
use crate::lifecycle::registry::Registry;
use crate::model::{Product, ProductCsvFormatter, User};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

pub const USERS_PATH: &str = "/users";
pub const PRODUCTS_PATH: &str = "/products";

/// Errors raised while starting a [`RestSystem`].
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Seed data rejected: {0}")]
    Seed(#[from] ResourceError),
}

/// The composition root: owns every collection actor and the registry that
/// exposes them.
///
/// # Architecture
///
/// - **`/users`**: caller-assigned ids. Anyone may read; `admin` creates and
///   deletes; `admin` or the user themself updates.
/// - **`/products`**: server-assigned ids and a `csv` representation. Anyone may
///   read; only `admin` mutates.
///
/// # Example
///
/// ```ignore
/// let system = RestSystem::new(Arc::new(LoggingNotifier))?;
/// let reply = system
///     .registry
///     .dispatch("/products", Request::collection(Method::Get))
///     .await?;
/// system.shutdown().await?;
/// ```
pub struct RestSystem {
    pub users: CollectionClient<User>,
    pub products: CollectionClient<Product>,
    pub registry: Registry,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl RestSystem {
    pub fn new(notifier: Arc<dyn PersistenceNotifier>) -> Result<Self, StartupError> {
        Self::with_config(&SystemConfig::default(), notifier)
    }

    /// Builds both collections, seeds them, spawns their actors and mounts them.
    pub fn with_config(
        config: &SystemConfig,
        notifier: Arc<dyn PersistenceNotifier>,
    ) -> Result<Self, StartupError> {
        let mut users = ResourceCollection::new("users", user_rights()?, notifier.clone())
            .with_config(config.collection("users"));
        users.load_one("alice", &json!({"name": "Alice", "email": "alice@example.com"}))?;
        users.load_one("bob", &json!({"name": "Bob", "email": "bob@example.com"}))?;

        let products = ResourceCollection::new("products", product_rights(), notifier)
            .with_formatter(Arc::new(ProductCsvFormatter))
            .with_config(config.collection("products"));

        let (user_actor, users) = CollectionActor::new(users);
        let (product_actor, products) = CollectionActor::new(products);
        let user_handle = tokio::spawn(user_actor.run());
        let product_handle = tokio::spawn(product_actor.run());

        let mut registry = Registry::new();
        registry.register(USERS_PATH, Arc::new(users.clone()))?;
        registry.register(PRODUCTS_PATH, Arc::new(products.clone()))?;

        Ok(Self {
            users,
            products,
            registry,
            handles: vec![user_handle, product_handle],
        })
    }

    /// Drops every client (the registry's included), then waits for the actors.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.registry);
        drop(self.users);
        drop(self.products);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Collection task failed: {:?}", e);
                return Err(format!("Collection task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

fn is_admin(ctx: &RequestContext) -> bool {
    ctx.has_role("admin")
}

fn user_rights() -> Result<Rights<User>, ConfigError> {
    Rights::builder()
        .read(true)
        .update(Right::decide(|ctx: &RequestContext, user: &User| {
            is_admin(ctx) || ctx.is(&user.id)
        }))
        .otherwise(Right::decide(|ctx: &RequestContext, _: &User| is_admin(ctx)))
        .build()
}

fn product_rights() -> Rights<Product> {
    let admin_only = || Right::decide(|ctx: &RequestContext, _: &Product| is_admin(ctx));
    Rights::new(admin_only(), true, admin_only(), admin_only())
}
