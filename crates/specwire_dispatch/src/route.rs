//! Destination routing and the message header.

use tracing::debug;

use specwire_config::MessagingSettings;

use crate::error::{DispatchError, DispatchResult};

/// First line of every dispatched message.
pub const HEADER_TITLE: &str = "Prompt Engineering Spec";

const HEADER_RULE_WIDTH: usize = 24;

/// Chat id for the selected department, or the configured default.
pub fn resolve_destination(
    settings: &MessagingSettings,
    department: Option<&str>,
) -> DispatchResult<String> {
    if let Some(label) = department {
        let chat_id = settings
            .departments
            .get(label)
            .ok_or_else(|| DispatchError::UnknownDepartment(label.to_string()))?;
        debug!(department = label, "Routing to department chat");
        return Ok(chat_id.clone());
    }

    settings
        .default_chat_id
        .clone()
        .ok_or(DispatchError::NoDestination)
}

/// Title, rule, and optional department/submitter lines.
pub fn header(department: Option<&str>, submitter: Option<&str>) -> String {
    let mut meta = Vec::new();
    if let Some(department) = department.map(str::trim).filter(|d| !d.is_empty()) {
        meta.push(format!("Department: {}", department));
    }
    if let Some(submitter) = submitter.map(str::trim).filter(|s| !s.is_empty()) {
        meta.push(format!("Submitter: {}", submitter));
    }

    let rule = "=".repeat(HEADER_RULE_WIDTH);
    if meta.is_empty() {
        format!("{}\n{}\n", HEADER_TITLE, rule)
    } else {
        format!("{}\n{}\n{}\n\n", HEADER_TITLE, rule, meta.join("\n"))
    }
}

/// Full outgoing text: header followed by the document.
pub fn compose_message(document: &str, department: Option<&str>, submitter: Option<&str>) -> String {
    format!("{}{}", header(department, submitter), document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> MessagingSettings {
        let mut settings = MessagingSettings {
            default_chat_id: Some("-100".to_string()),
            ..Default::default()
        };
        settings
            .departments
            .insert("Support".to_string(), "-200".to_string());
        settings
    }

    #[test]
    fn test_department_route() {
        assert_eq!(resolve_destination(&settings(), Some("Support")).unwrap(), "-200");
    }

    #[test]
    fn test_default_route() {
        assert_eq!(resolve_destination(&settings(), None).unwrap(), "-100");
    }

    #[test]
    fn test_unknown_department() {
        assert!(matches!(
            resolve_destination(&settings(), Some("Legal")),
            Err(DispatchError::UnknownDepartment(_))
        ));
    }

    #[test]
    fn test_no_destination() {
        assert!(matches!(
            resolve_destination(&MessagingSettings::default(), None),
            Err(DispatchError::NoDestination)
        ));
    }

    #[test]
    fn test_header_with_meta() {
        assert_eq!(
            header(Some("Support"), Some("Ann (@ann)")),
            "Prompt Engineering Spec\n========================\nDepartment: Support\nSubmitter: Ann (@ann)\n\n"
        );
    }

    #[test]
    fn test_header_without_meta() {
        assert_eq!(
            header(None, Some("   ")),
            "Prompt Engineering Spec\n========================\n"
        );
    }

    #[test]
    fn test_compose_message() {
        let text = compose_message("# Bot", None, Some("Ann"));
        assert!(text.ends_with("Submitter: Ann\n\n# Bot"));
    }
}
