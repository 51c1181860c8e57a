//! Governing-document resolution and access decisions
//!
//! [`AclChecker`] finds the control document that governs a resource by
//! walking up the container hierarchy, then asks the policy evaluator whether
//! the requested modes are granted:
//!
//! ```text
//! /docs/a.txt        → read /docs/a.txt.acl   (own document, no walk)
//!   not found        → read /docs/.acl        (inherited)
//!   not found        → read /.acl             (store root)
//!   not found        → MisconfiguredStore
//! ```
//!
//! A read that fails for any reason other than "not found" ends the check
//! with a server error; the walk never skips a document it could not read.

use crate::config::AclConfig;
use crate::errors::{describe_modes, AclError, AclResult};
use crate::mapper::{ResourceMapper, ResourcePath, UrlPathMapper};
use crate::mode::{AccessMode, ModeSet, WacAllow};
use crate::path::{
    control_document_path, governed_path, is_control_document, parent_container,
    MIN_CONTAINER_PATH_LEN,
};
use crate::policy::{
    Decision, DecisionRequest, JsonAclParser, PolicyEvaluator, PolicyGraph, PolicyParser,
    WacEvaluator,
};
use crate::request::{AccessRequest, AgentId, TrustContext};
use crate::store::{ControlDocumentStore, ReadError};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// The control document that governs a resource
#[derive(Clone, PartialEq, Eq)]
pub struct GoverningDocument {
    /// Physical path of the document
    pub path: String,
    /// Identifier of the document
    pub url: Url,
    /// Resource or container the document is attached to
    pub governed: Url,
    /// Whether the document was found on an ancestor container
    pub inherited: bool,
    text: String,
}

impl GoverningDocument {
    /// Raw document text
    pub fn text(&self) -> &str {
        &self.text
    }
}

// Document text stays out of Debug output so it cannot reach logs.
impl fmt::Debug for GoverningDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoverningDocument")
            .field("path", &self.path)
            .field("url", &self.url.as_str())
            .field("governed", &self.governed.as_str())
            .field("inherited", &self.inherited)
            .field("len", &self.text.len())
            .finish()
    }
}

/// Resolves governing control documents and decides access.
///
/// The configuration and collaborators are fixed at construction; a checker
/// holds no per-request state and can be shared freely across tasks.
#[derive(Clone)]
pub struct AclChecker {
    config: AclConfig,
    mapper: Arc<dyn ResourceMapper>,
    store: Arc<dyn ControlDocumentStore>,
    parser: Arc<dyn PolicyParser>,
    evaluator: Arc<dyn PolicyEvaluator>,
}

impl fmt::Debug for AclChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AclChecker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AclChecker {
    /// Checker over `store` using the reference mapper, parser and evaluator.
    ///
    /// Fails if the configuration does not validate.
    pub fn new<S>(config: AclConfig, store: S) -> AclResult<Self>
    where
        S: ControlDocumentStore + 'static,
    {
        config.validate()?;
        Ok(Self {
            mapper: Arc::new(UrlPathMapper::from_config(&config)?),
            store: Arc::new(store),
            parser: Arc::new(JsonAclParser::new()),
            evaluator: Arc::new(WacEvaluator::new()),
            config,
        })
    }

    /// Replace the path mapper
    pub fn with_mapper<M>(mut self, mapper: M) -> Self
    where
        M: ResourceMapper + 'static,
    {
        self.mapper = Arc::new(mapper);
        self
    }

    /// Replace the policy parser
    pub fn with_parser<P>(mut self, parser: P) -> Self
    where
        P: PolicyParser + 'static,
    {
        self.parser = Arc::new(parser);
        self
    }

    /// Replace the policy evaluator
    pub fn with_evaluator<E>(mut self, evaluator: E) -> Self
    where
        E: PolicyEvaluator + 'static,
    {
        self.evaluator = Arc::new(evaluator);
        self
    }

    /// Configuration this checker runs under
    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    /// Check that `agent` may perform `mode` on `resource`
    pub async fn check_access(
        &self,
        resource: &Url,
        agent: Option<&AgentId>,
        mode: AccessMode,
    ) -> AclResult<()> {
        let request = AccessRequest::new(resource.clone(), agent.cloned(), mode);
        self.check_request(&request).await
    }

    /// Check one request, including its origin
    pub async fn check_request(&self, request: &AccessRequest) -> AclResult<()> {
        self.bounded(self.check_unbounded(request)).await
    }

    /// Locate the governing document for `resource` without evaluating it
    pub async fn locate(&self, resource: &Url) -> AclResult<GoverningDocument> {
        self.bounded(async {
            let target = self.mapper.map_url_to_path(resource)?;
            self.locate_mapped(&target).await
        })
        .await
    }

    /// Modes `agent` holds on `resource`.
    ///
    /// On a control document every mode is only held together with `Control`.
    pub async fn permissions(
        &self,
        resource: &Url,
        agent: Option<&AgentId>,
        origin: Option<&str>,
    ) -> AclResult<ModeSet> {
        self.bounded(async {
            let target = self.mapper.map_url_to_path(resource)?;
            let document = self.locate_mapped(&target).await?;
            let graph = self.parse(&document)?;
            let trust = self.trust_context(origin);
            Ok(self.modes_held(&graph, &document, &target, agent, &trust))
        })
        .await
    }

    /// Agent and public modes on `resource`, ready to render as WAC-Allow
    pub async fn wac_allow(
        &self,
        resource: &Url,
        agent: Option<&AgentId>,
        origin: Option<&str>,
    ) -> AclResult<WacAllow> {
        self.bounded(async {
            let target = self.mapper.map_url_to_path(resource)?;
            let document = self.locate_mapped(&target).await?;
            let graph = self.parse(&document)?;
            let trust = self.trust_context(origin);
            let public = self.modes_held(&graph, &document, &target, None, &trust);
            let user = match agent {
                Some(_) => self.modes_held(&graph, &document, &target, agent, &trust),
                None => public.clone(),
            };
            Ok(WacAllow { user, public })
        })
        .await
    }

    async fn bounded<T, F>(&self, check: F) -> AclResult<T>
    where
        F: Future<Output = AclResult<T>>,
    {
        let Some(limit) = self.config.walk_timeout() else {
            return check.await;
        };
        match tokio::time::timeout(limit, check).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.config.walk_timeout_ms.unwrap_or_default();
                tracing::error!(timeout_ms, "Control document resolution timed out");
                Err(AclError::WalkTimedOut { timeout_ms })
            }
        }
    }

    async fn check_unbounded(&self, request: &AccessRequest) -> AclResult<()> {
        tracing::debug!(
            resource = %request.resource,
            agent = ?request.agent.as_ref().map(AgentId::as_str),
            mode = %request.mode,
            "Checking permissions"
        );

        let target = self.mapper.map_url_to_path(&request.resource)?;
        let required = ModeSet::required(
            request.mode,
            is_control_document(&target.path, &self.config.suffix),
        );

        let document = self.locate_mapped(&target).await?;
        let graph = self.parse(&document)?;
        let trust = self.trust_context(request.origin.as_deref());
        let agent = request.agent.as_ref();

        match self.decide(&graph, &document, &target, agent, &required, &trust) {
            Decision::Allowed => {
                tracing::debug!(
                    resource = %target.url,
                    document = %document.url,
                    "Access granted"
                );
                Ok(())
            }
            Decision::Denied { reason } => {
                let reason = reason.unwrap_or_else(|| {
                    format!("{} access to {} denied", describe_modes(&required), target.url)
                });
                tracing::warn!(
                    resource = %target.url,
                    document = %document.url,
                    required = %describe_modes(&required),
                    authenticated = agent.is_some(),
                    reason = %reason,
                    "Access denied"
                );
                Err(AclError::denied(agent.is_some(), reason))
            }
        }
    }

    /// Walk from `target` to its governing document.
    async fn locate_mapped(&self, target: &ResourcePath) -> AclResult<GoverningDocument> {
        let suffix = self.config.suffix.as_str();

        // A leaf with its own document is governed by it directly.
        let mut container = if target.is_container() {
            target.path.clone()
        } else {
            let candidate = control_document_path(&target.path, suffix);
            if let Some(text) = self.read_candidate(&candidate).await? {
                return self.governing(target, candidate, text, false);
            }
            parent_container(&target.path).to_string()
        };

        let mut steps = 0usize;
        loop {
            let candidate = format!("{container}{suffix}");
            if let Some(text) = self.read_candidate(&candidate).await? {
                let inherited = container != target.path;
                return self.governing(target, candidate, text, inherited);
            }

            if container == self.config.store_root {
                tracing::error!(
                    root = %self.config.store_root,
                    resource = %target.url,
                    "Server has been misconfigured: no root control document"
                );
                return Err(AclError::misconfigured_store(&self.config.store_root));
            }
            if container.len() <= MIN_CONTAINER_PATH_LEN {
                tracing::error!(
                    path = %container,
                    root = %self.config.store_root,
                    "Control document walk left the store without matching its root"
                );
                return Err(AclError::traversal_guard(container));
            }

            steps += 1;
            if steps > self.config.max_walk_depth {
                tracing::error!(
                    limit = self.config.max_walk_depth,
                    resource = %target.url,
                    "Control document walk exceeded its depth bound"
                );
                return Err(AclError::WalkDepthExceeded {
                    limit: self.config.max_walk_depth,
                });
            }
            container = parent_container(&container).to_string();
        }
    }

    async fn read_candidate(&self, path: &str) -> AclResult<Option<String>> {
        match self.store.read_text(path).await {
            Ok(text) => {
                tracing::debug!(path, "Found control document");
                Ok(Some(text))
            }
            Err(ReadError::NotFound) => {
                tracing::trace!(path, "No control document");
                Ok(None)
            }
            Err(ReadError::Unreadable { reason }) => {
                tracing::error!(path, reason = %reason, "Control document could not be read");
                Err(AclError::unreadable(path, reason))
            }
        }
    }

    fn governing(
        &self,
        target: &ResourcePath,
        path: String,
        text: String,
        inherited: bool,
    ) -> AclResult<GoverningDocument> {
        let url = self.mapper.map_path_to_url(&path, &target.url)?;
        let governed = self
            .mapper
            .map_path_to_url(governed_path(&path, &self.config.suffix), &target.url)?;
        tracing::debug!(
            resource = %target.url,
            document = %url,
            inherited,
            "Resolved governing control document"
        );
        Ok(GoverningDocument {
            path,
            url,
            governed,
            inherited,
            text,
        })
    }

    fn parse(&self, document: &GoverningDocument) -> AclResult<PolicyGraph> {
        self.parser
            .parse(&document.text, &document.url)
            .map_err(|e| {
                tracing::error!(path = %document.path, error = %e, "Control document is malformed");
                AclError::malformed(&document.path, e.summary())
            })
    }

    fn trust_context(&self, origin: Option<&str>) -> TrustContext {
        TrustContext {
            origin: origin.map(str::to_string),
            trusted_origins: self.config.trusted_origins.clone(),
            strict_origin: self.config.strict_origin,
        }
    }

    fn decide(
        &self,
        graph: &PolicyGraph,
        document: &GoverningDocument,
        target: &ResourcePath,
        agent: Option<&AgentId>,
        required: &ModeSet,
        trust: &TrustContext,
    ) -> Decision {
        self.evaluator.evaluate(&DecisionRequest {
            graph,
            document: &document.url,
            governed: &document.governed,
            inherited: document.inherited,
            resource: &target.url,
            agent,
            required,
            trust,
        })
    }

    fn modes_held(
        &self,
        graph: &PolicyGraph,
        document: &GoverningDocument,
        target: &ResourcePath,
        agent: Option<&AgentId>,
        trust: &TrustContext,
    ) -> ModeSet {
        let is_acl = is_control_document(&target.path, &self.config.suffix);
        AccessMode::ALL
            .into_iter()
            .filter(|mode| {
                let required = ModeSet::required(*mode, is_acl);
                self.decide(graph, document, target, agent, &required, trust)
                    .is_allowed()
            })
            .collect()
    }
}
