use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Decides which uploaded filenames are acceptable images.
pub trait UploadPolicy: Send + Sync {
    fn is_allowed_extension(&self, filename: &str) -> bool;
}

/// Accepts a filename when the text after its last `.` is in the set,
/// ignoring case.
#[derive(Debug, Clone)]
pub struct ExtensionAllowList {
    extensions: HashSet<String>,
}

impl ExtensionAllowList {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ExtensionAllowList {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }
}

impl UploadPolicy for ExtensionAllowList {
    fn is_allowed_extension(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => self.extensions.contains(&ext.to_ascii_lowercase()),
            None => false,
        }
    }
}

/// Reduce a client-supplied filename to something safe to use as a single
/// path component. Accents are decomposed and anything non-ASCII dropped,
/// path separators and whitespace runs become `_`, every other character
/// outside `[A-Za-z0-9_.-]` is removed, and `.`/`_` are trimmed from both ends.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXTENSIONS;

    #[test]
    fn allow_list() {
        let policy = ExtensionAllowList::new(DEFAULT_EXTENSIONS);
        assert!(policy.is_allowed_extension("cat.png"));
        assert!(policy.is_allowed_extension("CAT.JPG"));
        assert!(policy.is_allowed_extension("archive.tar.gif"));
        assert!(!policy.is_allowed_extension("notes.txt"));
        assert!(!policy.is_allowed_extension("png"));
        assert!(!policy.is_allowed_extension("cat.png.exe"));
        assert!(!policy.is_allowed_extension("cat."));
    }

    #[test]
    fn secure_filenames() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\photos\\cat.png"), "C_photos_cat.png");
        assert_eq!(secure_filename(".hidden.png_"), "hidden.png");
        assert_eq!(secure_filename("i contain cool ümläuts.jpg"), "i_contain_cool_umlauts.jpg");
        assert_eq!(secure_filename("猫.png"), "png");
        assert_eq!(secure_filename("../.."), "");
    }
}
