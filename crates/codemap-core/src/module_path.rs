//! Module-path normalization shared by the symbol index and the file boxes.
//!
//! Both textual module hints (`"from pkg.utils import x"`, `"../utils/logger.py"`)
//! and file paths reduce to the same lowercase, dot-separated module key.

const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "pyi", "pyw", "js", "jsx", "mjs", "cjs", "ts", "tsx", "rs", "go", "java", "kt", "rb",
    "php", "cs", "c", "cc", "cpp", "h", "hpp", "swift",
];

/// Normalize a module hint into a module key.
///
/// Strips a leading `from`/`import` keyword and anything from an `import` clause
/// on, turns path separators into dots, collapses repeated dots and lowercases
/// the result. A source extension is only stripped from path-shaped hints;
/// `pkg.c` stays a dotted module.
pub fn normalize_module_hint(raw: &str) -> String {
    let mut hint = raw.trim();
    for keyword in ["from", "import"] {
        if let Some(rest) = strip_keyword(hint, keyword) {
            hint = rest;
            break;
        }
    }
    if let Some(idx) = import_clause_start(hint) {
        hint = &hint[..idx];
    }
    let hint = hint.trim();
    if hint.contains(['/', '\\']) {
        dotted_key(strip_source_extension(hint))
    } else {
        dotted_key(hint)
    }
}

/// Normalize a file path into a module key, dropping a known source extension.
pub fn normalize_file_path(path: &str) -> String {
    dotted_key(strip_source_extension(path.trim()))
}

/// Module key of a file: the declared module name when present, otherwise the path.
pub fn module_key_for_path(path: &str, declared: Option<&str>) -> String {
    declared
        .map(normalize_module_hint)
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| normalize_file_path(path))
}

/// `a.b.c` -> `a/b/c`
pub fn slash_form(key: &str) -> String {
    key.replace('.', "/")
}

fn dotted_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for ch in value.chars() {
        let ch = if ch == '/' || ch == '\\' { '.' } else { ch };
        if ch == '.' && key.ends_with('.') {
            continue;
        }
        key.extend(ch.to_lowercase());
    }
    key.trim_matches('.').to_string()
}

/// Matches `keyword` as a whole leading token, case-insensitively.
fn strip_keyword<'a>(value: &'a str, keyword: &str) -> Option<&'a str> {
    let head = value.get(..keyword.len())?;
    let rest = &value[keyword.len()..];
    if head.eq_ignore_ascii_case(keyword) && rest.chars().next().is_none_or(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Byte offset of the first standalone `import` token.
fn import_clause_start(value: &str) -> Option<usize> {
    let mut offset = 0;
    for token in value.split_inclusive(char::is_whitespace) {
        if token.trim_end().eq_ignore_ascii_case("import") {
            return Some(offset);
        }
        offset += token.len();
    }
    None
}

fn strip_source_extension(value: &str) -> &str {
    match value.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !stem.ends_with(['/', '\\', '.'])
                && SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) =>
        {
            stem
        }
        _ => value,
    }
}
