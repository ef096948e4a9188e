use std::collections::BTreeSet;

/// Derives the category tag of a file from the extension in its name
#[derive(Debug, Clone)]
pub struct FileTypeClassifier {
    allowed: BTreeSet<String>,
}

impl FileTypeClassifier {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Top-level MIME type guessed from the extension, if it is an allowed category
    ///
    /// Names without a `.` have no extension and yield `None`.
    pub fn classify(&self, file_name: &str) -> Option<String> {
        if !file_name.contains('.') {
            return None;
        }

        let mime = mime_guess::from_path(file_name).first()?;
        let category = mime.type_().as_str();

        self.allowed
            .contains(category)
            .then(|| category.to_string())
    }
}
