//! Web Access Control style evaluation

use super::document::normalize_origin;
use super::{Authorization, Decision, DecisionRequest, PolicyEvaluator};
use crate::mode::AccessMode;

/// Evaluates a [`PolicyGraph`](super::PolicyGraph) with WAC semantics.
///
/// Every required mode must be granted by an authorization that targets the
/// governed resource (`accessTo` for its own document, `default` for an
/// inherited one), matches the agent, and passes the origin check.
#[derive(Debug, Clone, Copy, Default)]
pub struct WacEvaluator;

impl WacEvaluator {
    /// Create an evaluator
    pub fn new() -> Self {
        Self
    }

    fn origin_permitted(request: &DecisionRequest<'_>, authorization: &Authorization) -> bool {
        let Some(origin) = request.trust.origin.as_deref() else {
            return true;
        };
        let origin = normalize_origin(origin);
        if origin == request.resource.origin().ascii_serialization() {
            return true;
        }
        if request.trust.is_trusted(&origin) {
            return true;
        }
        if !request.trust.strict_origin {
            return true;
        }
        authorization.origins.iter().any(|allowed| *allowed == origin)
    }

    fn check_mode(request: &DecisionRequest<'_>, mode: AccessMode) -> Result<(), String> {
        let mut candidates = request
            .graph
            .authorizations
            .iter()
            .filter(|auth| auth.targets(request.governed, request.inherited))
            .filter(|auth| auth.grants(mode))
            .filter(|auth| auth.applies_to_agent(request.agent))
            .peekable();

        if candidates.peek().is_none() {
            let who = request
                .agent
                .map_or_else(|| "anonymous agents".to_string(), ToString::to_string);
            return Err(format!(
                "No authorization grants {mode} to {who} on {}",
                request.resource
            ));
        }

        if candidates.any(|auth| Self::origin_permitted(request, auth)) {
            Ok(())
        } else {
            Err(format!(
                "Origin {} is not authorized for {mode} on {}",
                request.trust.origin.as_deref().unwrap_or_default(),
                request.resource
            ))
        }
    }
}

impl PolicyEvaluator for WacEvaluator {
    fn evaluate(&self, request: &DecisionRequest<'_>) -> Decision {
        for mode in request.required.iter() {
            if let Err(reason) = Self::check_mode(request, mode) {
                return Decision::deny(reason);
            }
        }
        Decision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ModeSet;
    use crate::policy::{JsonAclParser, PolicyGraph, PolicyParser};
    use crate::request::{AgentId, TrustContext};
    use url::Url;

    const DOC: &str = r##"{
        "authorizations": [
            {
                "id": "#owner",
                "agent": ["https://alice.example/profile#me"],
                "accessTo": ["./"],
                "default": ["./"],
                "mode": ["Read", "Write", "Control"],
                "origin": ["https://app.example"]
            },
            {
                "id": "#members",
                "agentClass": ["AuthenticatedAgent"],
                "default": ["./"],
                "mode": ["Read"]
            },
            {
                "id": "#public",
                "agentClass": ["Agent"],
                "accessTo": ["./"],
                "mode": ["Read"]
            }
        ]
    }"##;

    struct Fixture {
        graph: PolicyGraph,
        document: Url,
        governed: Url,
        resource: Url,
    }

    fn fixture() -> Fixture {
        let document = Url::parse("https://pod.example/docs/.acl").unwrap();
        Fixture {
            graph: JsonAclParser::new().parse(DOC, &document).unwrap(),
            governed: Url::parse("https://pod.example/docs/").unwrap(),
            resource: Url::parse("https://pod.example/docs/a.txt").unwrap(),
            document,
        }
    }

    fn decide(
        fx: &Fixture,
        inherited: bool,
        agent: Option<&AgentId>,
        required: &ModeSet,
        trust: &TrustContext,
    ) -> Decision {
        let resource = if inherited { &fx.resource } else { &fx.governed };
        WacEvaluator::new().evaluate(&DecisionRequest {
            graph: &fx.graph,
            document: &fx.document,
            governed: &fx.governed,
            inherited,
            resource,
            agent,
            required,
            trust,
        })
    }

    fn alice() -> AgentId {
        AgentId::new("https://alice.example/profile#me")
    }

    #[test]
    fn test_owner_holds_every_granted_mode() {
        let fx = fixture();
        let trust = TrustContext::default();
        let required: ModeSet = [AccessMode::Write, AccessMode::Control].into_iter().collect();
        assert!(decide(&fx, true, Some(&alice()), &required, &trust).is_allowed());
    }

    #[test]
    fn test_write_implies_append() {
        let fx = fixture();
        let trust = TrustContext::default();
        let required = ModeSet::from(AccessMode::Append);
        assert!(decide(&fx, true, Some(&alice()), &required, &trust).is_allowed());
    }

    #[test]
    fn test_inheritance_uses_default_not_access_to() {
        let fx = fixture();
        let trust = TrustContext::default();
        let read = ModeSet::from(AccessMode::Read);

        // `#public` only has accessTo, so anonymous reads stop at the container.
        assert!(decide(&fx, false, None, &read, &trust).is_allowed());
        assert!(!decide(&fx, true, None, &read, &trust).is_allowed());

        // `#members` only has default, so it covers descendants.
        let bob = AgentId::new("https://bob.example/#me");
        assert!(decide(&fx, true, Some(&bob), &read, &trust).is_allowed());
    }

    #[test]
    fn test_denial_reason_names_missing_mode() {
        let fx = fixture();
        let trust = TrustContext::default();
        let bob = AgentId::new("https://bob.example/#me");
        let required = ModeSet::from(AccessMode::Write);
        match decide(&fx, true, Some(&bob), &required, &trust) {
            Decision::Denied { reason: Some(reason) } => {
                assert!(reason.contains("Write"));
                assert!(reason.contains("https://bob.example/#me"));
                assert!(!reason.contains("#owner"));
            }
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_origin_checks() {
        let fx = fixture();
        let read = ModeSet::from(AccessMode::Read);

        let listed = TrustContext {
            origin: Some("https://app.example".to_string()),
            trusted_origins: Vec::new(),
            strict_origin: true,
        };
        assert!(decide(&fx, true, Some(&alice()), &read, &listed).is_allowed());

        let unlisted = TrustContext {
            origin: Some("https://evil.example".to_string()),
            ..listed.clone()
        };
        let write = ModeSet::from(AccessMode::Write);
        assert!(!decide(&fx, true, Some(&alice()), &write, &unlisted).is_allowed());

        let trusted = TrustContext {
            trusted_origins: vec!["https://evil.example/".to_string()],
            ..unlisted.clone()
        };
        assert!(decide(&fx, true, Some(&alice()), &write, &trusted).is_allowed());

        let lax = TrustContext {
            strict_origin: false,
            ..unlisted
        };
        assert!(decide(&fx, true, Some(&alice()), &write, &lax).is_allowed());

        let same_origin = TrustContext {
            origin: Some("https://pod.example".to_string()),
            trusted_origins: Vec::new(),
            strict_origin: true,
        };
        assert!(decide(&fx, true, Some(&alice()), &write, &same_origin).is_allowed());
    }
}
