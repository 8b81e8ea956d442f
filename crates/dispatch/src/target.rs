use bidwatch_core::config::WebhookConfig;

/// One of the two external workflow systems that receive approved records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalTarget {
    Jira,
    Monday,
}

impl ApprovalTarget {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "jira" => Some(Self::Jira),
            "monday" => Some(Self::Monday),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jira => "jira",
            Self::Monday => "monday",
        }
    }

    /// Jira approvals are confirmed back into the record store; Monday is
    /// fire-and-forget with no local confirmation semantics.
    pub fn requires_store_sync(&self) -> bool {
        matches!(self, Self::Jira)
    }

    pub fn endpoint<'a>(&self, config: &'a WebhookConfig) -> Option<&'a str> {
        match self {
            Self::Jira => config.jira_url.as_deref(),
            Self::Monday => config.monday_url.as_deref(),
        }
    }
}

impl std::fmt::Display for ApprovalTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use bidwatch_core::config::WebhookConfig;

    use super::ApprovalTarget;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(ApprovalTarget::parse("Jira"), Some(ApprovalTarget::Jira));
        assert_eq!(ApprovalTarget::parse(" monday "), Some(ApprovalTarget::Monday));
        assert_eq!(ApprovalTarget::parse("github"), None);
    }

    #[test]
    fn only_jira_requires_store_sync() {
        assert!(ApprovalTarget::Jira.requires_store_sync());
        assert!(!ApprovalTarget::Monday.requires_store_sync());
    }

    #[test]
    fn endpoint_selection_follows_the_target() {
        let config = WebhookConfig {
            jira_url: Some("https://hooks.example.test/add-jira".to_string()),
            monday_url: None,
            timeout_secs: 10,
        };

        assert_eq!(
            ApprovalTarget::Jira.endpoint(&config),
            Some("https://hooks.example.test/add-jira")
        );
        assert_eq!(ApprovalTarget::Monday.endpoint(&config), None);
    }
}
