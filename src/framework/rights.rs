//! # Rights Evaluator
//!
//! Every collection is configured once with a [`Rights`] table: one [`Right`] per
//! [`OperationKind`]. A right is either a constant answer or a decision function that
//! sees the caller's [`RequestContext`] and the specific resource instance.
//!
//! There is no implicit default. A collection creator either spells out all four
//! rights with [`Rights::new`], or uses [`Rights::builder`] and names a fallback with
//! [`RightsBuilder::otherwise`]. Forgetting a kind is a [`ConfigError::UnsetRight`],
//! never a silent allow.

use crate::framework::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// The four CRUD operation kinds rights are checked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Create,
        OperationKind::Read,
        OperationKind::Update,
        OperationKind::Delete,
    ];
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Create => "create",
            OperationKind::Read => "read",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Who is asking. Handed to every decision function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub principal: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(principal: impl Into<String>) -> Self {
        Self {
            principal: Some(principal.into()),
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// True when the caller is authenticated as `principal`.
    pub fn is(&self, principal: &str) -> bool {
        self.principal.as_deref() == Some(principal)
    }
}

/// Decision function resolving a right for one caller and one resource.
pub type Decision<T> = Arc<dyn Fn(&RequestContext, &T) -> bool + Send + Sync>;

/// A single right: a constant, or a decision made per caller and resource.
pub enum Right<T> {
    Static(bool),
    Decision(Decision<T>),
}

impl<T> Right<T> {
    pub fn allow() -> Self {
        Right::Static(true)
    }

    pub fn deny() -> Self {
        Right::Static(false)
    }

    pub fn decide(f: impl Fn(&RequestContext, &T) -> bool + Send + Sync + 'static) -> Self {
        Right::Decision(Arc::new(f))
    }

    pub fn evaluate(&self, ctx: &RequestContext, resource: &T) -> bool {
        match self {
            Right::Static(allowed) => *allowed,
            Right::Decision(decide) => decide(ctx, resource),
        }
    }
}

impl<T> From<bool> for Right<T> {
    fn from(allowed: bool) -> Self {
        Right::Static(allowed)
    }
}

impl<T> Clone for Right<T> {
    fn clone(&self) -> Self {
        match self {
            Right::Static(allowed) => Right::Static(*allowed),
            Right::Decision(decide) => Right::Decision(Arc::clone(decide)),
        }
    }
}

impl<T> fmt::Debug for Right<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Right::Static(allowed) => f.debug_tuple("Static").field(allowed).finish(),
            Right::Decision(_) => f.write_str("Decision(..)"),
        }
    }
}

/// The per-collection rights table. Immutable once built.
#[derive(Debug, Clone)]
pub struct Rights<T> {
    create: Right<T>,
    read: Right<T>,
    update: Right<T>,
    delete: Right<T>,
}

impl<T> Rights<T> {
    pub fn new(
        create: impl Into<Right<T>>,
        read: impl Into<Right<T>>,
        update: impl Into<Right<T>>,
        delete: impl Into<Right<T>>,
    ) -> Self {
        Self {
            create: create.into(),
            read: read.into(),
            update: update.into(),
            delete: delete.into(),
        }
    }

    /// Read allowed, every mutation denied.
    pub fn read_only() -> Self {
        Self::new(false, true, false, false)
    }

    pub fn builder() -> RightsBuilder<T> {
        RightsBuilder::default()
    }

    pub fn get(&self, kind: OperationKind) -> &Right<T> {
        match kind {
            OperationKind::Create => &self.create,
            OperationKind::Read => &self.read,
            OperationKind::Update => &self.update,
            OperationKind::Delete => &self.delete,
        }
    }

    pub fn authorize(&self, kind: OperationKind, ctx: &RequestContext, resource: &T) -> bool {
        self.get(kind).evaluate(ctx, resource)
    }
}

/// Builder for [`Rights`] that refuses to guess unset kinds.
pub struct RightsBuilder<T> {
    create: Option<Right<T>>,
    read: Option<Right<T>>,
    update: Option<Right<T>>,
    delete: Option<Right<T>>,
    otherwise: Option<Right<T>>,
}

impl<T> Default for RightsBuilder<T> {
    fn default() -> Self {
        Self {
            create: None,
            read: None,
            update: None,
            delete: None,
            otherwise: None,
        }
    }
}

impl<T> RightsBuilder<T> {
    pub fn create(mut self, right: impl Into<Right<T>>) -> Self {
        self.create = Some(right.into());
        self
    }

    pub fn read(mut self, right: impl Into<Right<T>>) -> Self {
        self.read = Some(right.into());
        self
    }

    pub fn update(mut self, right: impl Into<Right<T>>) -> Self {
        self.update = Some(right.into());
        self
    }

    pub fn delete(mut self, right: impl Into<Right<T>>) -> Self {
        self.delete = Some(right.into());
        self
    }

    /// Right used for every kind not set explicitly.
    pub fn otherwise(mut self, right: impl Into<Right<T>>) -> Self {
        self.otherwise = Some(right.into());
        self
    }

    pub fn build(self) -> Result<Rights<T>, ConfigError> {
        let otherwise = self.otherwise;
        let resolve = |right: Option<Right<T>>, kind| {
            right
                .or_else(|| otherwise.clone())
                .ok_or(ConfigError::UnsetRight(kind))
        };
        Ok(Rights {
            create: resolve(self.create, OperationKind::Create)?,
            read: resolve(self.read, OperationKind::Read)?,
            update: resolve(self.update, OperationKind::Update)?,
            delete: resolve(self.delete, OperationKind::Delete)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Doc {
        owner: String,
    }

    #[test]
    fn test_static_and_decision_rights() {
        let rights = Rights::new(
            false,
            true,
            Right::decide(|ctx: &RequestContext, doc: &Doc| ctx.is(&doc.owner)),
            Right::decide(|ctx: &RequestContext, _: &Doc| ctx.has_role("admin")),
        );
        let doc = Doc {
            owner: "alice".into(),
        };
        let alice = RequestContext::user("alice");
        let bob = RequestContext::user("bob");
        let admin = RequestContext::user("root").with_role("admin");

        assert!(!rights.authorize(OperationKind::Create, &admin, &doc));
        assert!(rights.authorize(OperationKind::Read, &RequestContext::anonymous(), &doc));
        assert!(rights.authorize(OperationKind::Update, &alice, &doc));
        assert!(!rights.authorize(OperationKind::Update, &bob, &doc));
        assert!(rights.authorize(OperationKind::Delete, &admin, &doc));
        assert!(!rights.authorize(OperationKind::Delete, &alice, &doc));
    }

    #[test]
    fn test_builder_rejects_unset_kind() {
        let result = Rights::<Doc>::builder().read(true).create(true).update(false).build();
        assert!(matches!(
            result,
            Err(ConfigError::UnsetRight(OperationKind::Delete))
        ));
    }

    #[test]
    fn test_builder_fallback_fills_unset_kinds() {
        let rights = Rights::<Doc>::builder().read(true).otherwise(false).build().unwrap();
        let doc = Doc { owner: "a".into() };
        let ctx = RequestContext::anonymous();
        assert!(rights.authorize(OperationKind::Read, &ctx, &doc));
        for kind in [OperationKind::Create, OperationKind::Update, OperationKind::Delete] {
            assert!(!rights.authorize(kind, &ctx, &doc), "{kind} should fall back to deny");
        }
    }
}
