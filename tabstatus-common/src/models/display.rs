/// The two strings a participant is shown with: the prefix used in
/// broadcast lines and the label in the persistent name list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName {
    pub chat_prefix: String,
    pub list_label: String,
}

impl DisplayName {
    /// Used when the participant has no status.
    pub fn bare(name: &str) -> Self {
        Self {
            chat_prefix: name.to_string(),
            list_label: name.to_string(),
        }
    }
}
