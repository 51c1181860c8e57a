//! JSON control documents
//!
//! A document is a list of authorizations in the shape of the Web Access
//! Control vocabulary:
//!
//! ```json
//! {
//!   "authorizations": [
//!     {
//!       "id": "#owner",
//!       "agent": ["https://alice.example/profile#me"],
//!       "accessTo": ["./"],
//!       "default": ["./"],
//!       "mode": ["Read", "Write", "Control"]
//!     }
//!   ]
//! }
//! ```
//!
//! Relative identifiers resolve against the document's own URL.

use super::{AgentClass, Authorization, ParseError, PolicyGraph, PolicyParser};
use crate::mode::AccessMode;
use serde::Deserialize;
use url::Url;

const FOAF_AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";
const ACL_AUTHENTICATED_AGENT: &str = "http://www.w3.org/ns/auth/acl#AuthenticatedAgent";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    authorizations: Vec<RawAuthorization>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawAuthorization {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    agent: Vec<String>,
    #[serde(default)]
    agent_class: Vec<String>,
    #[serde(default)]
    access_to: Vec<String>,
    #[serde(default)]
    default: Vec<String>,
    #[serde(default)]
    mode: Vec<String>,
    #[serde(default)]
    origin: Vec<String>,
}

/// Parses JSON control documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAclParser;

impl JsonAclParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }
}

impl PolicyParser for JsonAclParser {
    fn parse(&self, text: &str, base: &Url) -> Result<PolicyGraph, ParseError> {
        let raw: RawDocument = serde_json::from_str(text).map_err(|e| ParseError::Syntax {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })?;
        let authorizations = raw
            .authorizations
            .into_iter()
            .map(|raw| resolve_authorization(raw, base))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PolicyGraph { authorizations })
    }
}

fn resolve_authorization(raw: RawAuthorization, base: &Url) -> Result<Authorization, ParseError> {
    Ok(Authorization {
        id: raw.id.as_deref().map(|id| resolve(base, id)).transpose()?,
        agents: raw
            .agent
            .iter()
            .map(|agent| resolve(base, agent).map(String::from))
            .collect::<Result<_, _>>()?,
        agent_classes: raw
            .agent_class
            .iter()
            .map(|class| parse_agent_class(class))
            .collect::<Result<_, _>>()?,
        access_to: resolve_all(base, &raw.access_to)?,
        defaults: resolve_all(base, &raw.default)?,
        modes: raw
            .mode
            .iter()
            .map(|mode| {
                mode.parse::<AccessMode>()
                    .map_err(|_| ParseError::UnknownMode(mode.clone()))
            })
            .collect::<Result<_, _>>()?,
        origins: raw
            .origin
            .iter()
            .map(|origin| normalize_origin(origin))
            .collect(),
    })
}

fn resolve(base: &Url, value: &str) -> Result<Url, ParseError> {
    base.join(value).map_err(|e| ParseError::InvalidIri {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn resolve_all(base: &Url, values: &[String]) -> Result<Vec<Url>, ParseError> {
    values.iter().map(|value| resolve(base, value)).collect()
}

fn parse_agent_class(value: &str) -> Result<AgentClass, ParseError> {
    match value {
        "Agent" | "foaf:Agent" | FOAF_AGENT => Ok(AgentClass::Everyone),
        "AuthenticatedAgent" | "acl:AuthenticatedAgent" | ACL_AUTHENTICATED_AGENT => {
            Ok(AgentClass::Authenticated)
        }
        _ => Err(ParseError::UnknownAgentClass(value.to_string())),
    }
}

/// Origins compare without a trailing slash
pub(crate) fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn base() -> Url {
        Url::parse("https://pod.example/docs/.acl").unwrap()
    }

    #[test]
    fn test_relative_identifiers_resolve_against_document() {
        let graph = JsonAclParser::new()
            .parse(
                r##"{
                    "authorizations": [{
                        "id": "#public",
                        "agentClass": ["foaf:Agent"],
                        "accessTo": ["./"],
                        "default": ["./"],
                        "mode": ["acl:Read"],
                        "origin": ["https://app.example/"]
                    }]
                }"##,
                &base(),
            )
            .unwrap();

        let auth = &graph.authorizations[0];
        assert_eq!(
            auth.id.as_ref().map(Url::as_str),
            Some("https://pod.example/docs/.acl#public")
        );
        assert_eq!(auth.access_to[0].as_str(), "https://pod.example/docs/");
        assert_eq!(auth.defaults[0].as_str(), "https://pod.example/docs/");
        assert_eq!(auth.agent_classes, vec![AgentClass::Everyone]);
        assert!(auth.modes.contains(AccessMode::Read));
        assert_eq!(auth.origins, vec!["https://app.example"]);
    }

    #[test]
    fn test_summary_does_not_quote_content() {
        let err = JsonAclParser::new()
            .parse(r#"{"authorizations":[{"mode":"secret-token"}]}"#, &base())
            .unwrap_err();
        assert!(err.to_string().contains("secret-token"));
        assert!(!err.summary().contains("secret-token"));
    }

    #[test]
    fn test_empty_document_grants_nothing() {
        let graph = JsonAclParser::new().parse("{}", &base()).unwrap();
        assert!(graph.authorizations.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        let parser = JsonAclParser::new();
        assert_matches!(
            parser.parse("@prefix acl: <#> .", &base()),
            Err(ParseError::Syntax { .. })
        );
        assert_matches!(
            parser.parse(r#"{"authorizations":[{"mode":["Delete"]}]}"#, &base()),
            Err(ParseError::UnknownMode(_))
        );
        assert_matches!(
            parser.parse(r#"{"authorizations":[{"agentClass":["Robot"]}]}"#, &base()),
            Err(ParseError::UnknownAgentClass(_))
        );
        assert_matches!(
            parser.parse(r#"{"authorizations":[{"grants":["Read"]}]}"#, &base()),
            Err(ParseError::Syntax { .. })
        );
    }
}
