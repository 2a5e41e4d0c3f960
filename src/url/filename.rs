use url::Url;

/// Character that replaces path separators in generated filenames
const JOIN_CHAR: char = '_';

/// Extension appended to every generated filename
const MARKDOWN_EXT: &str = ".md";

/// Filename stem for the site root
const ROOT_STEM: &str = "index";

/// Documentation root path that gets its own index file
const DOCS_ROOT: &str = "docs";

/// Filename stem for the documentation root
const DOCS_ROOT_STEM: &str = "docs_index";

/// Maps a URL to the markdown filename it is persisted under
///
/// Only the path takes part: separators become `_`, leading and trailing
/// separators are dropped, the site root becomes `index.md` and the `/docs`
/// root becomes `docs_index.md`. The result depends on nothing but the URL,
/// so it is stable within and across sessions.
///
/// # Examples
///
/// ```
/// use doc_harvest::url::url_to_filename;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/docs/getting-started/install").unwrap();
/// assert_eq!(url_to_filename(&url), "docs_getting-started_install.md");
///
/// let root = Url::parse("https://example.com/").unwrap();
/// assert_eq!(url_to_filename(&root), "index.md");
/// ```
pub fn url_to_filename(url: &Url) -> String {
    let joined: String = url
        .path()
        .chars()
        .map(|c| if c == '/' { JOIN_CHAR } else { c })
        .collect();
    let stem = joined.trim_matches(JOIN_CHAR);

    let stem = match stem {
        "" => ROOT_STEM,
        DOCS_ROOT => DOCS_ROOT_STEM,
        other => other,
    };

    if stem.ends_with(MARKDOWN_EXT) {
        stem.to_string()
    } else {
        format!("{}{}", stem, MARKDOWN_EXT)
    }
}
