//! Utility functions

/// Mask the local part of an email address for log output.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let visible = if local.chars().count() > 2 { 2 } else { 1 };
            let kept: String = local.chars().take(visible).collect();
            format!("{}***@{}", kept, domain)
        }
        _ => "***".to_string(),
    }
}
