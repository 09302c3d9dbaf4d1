//! Two-letter language codes, the English names used in LLM prompts and the
//! Vietnamese names shown in progress messages.

const LANGUAGES: &[(&str, &str, &str)] = &[
    ("vi", "Vietnamese", "tiếng Việt"),
    ("en", "English", "tiếng Anh"),
    ("ja", "Japanese", "tiếng Nhật"),
    ("ko", "Korean", "tiếng Hàn"),
    ("zh", "Chinese", "tiếng Trung"),
    ("es", "Spanish", "tiếng Tây Ban Nha"),
    ("fr", "French", "tiếng Pháp"),
    ("de", "German", "tiếng Đức"),
    ("it", "Italian", "tiếng Ý"),
    ("pt", "Portuguese", "tiếng Bồ Đào Nha"),
    ("ru", "Russian", "tiếng Nga"),
    ("ar", "Arabic", "tiếng Ả Rập"),
    ("th", "Thai", "tiếng Thái"),
];

fn lookup(code: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    LANGUAGES.iter().find(|(c, _, _)| c.eq_ignore_ascii_case(code.trim()))
}

/// English name of `code`, or the code itself when it is not in the table.
pub fn language_name(code: &str) -> &str {
    lookup(code).map(|(_, name, _)| *name).unwrap_or(code)
}

pub fn display_name(code: &str) -> &str {
    lookup(code).map(|(_, _, name)| *name).unwrap_or(code)
}
