//! Parsing of the query parameters shared by all endpoints.

use indexmap::IndexMap;

/// Multi-valued query parameters in order of appearance.
pub type QueryMap = IndexMap<String, Vec<String>>;

/// Build a [`QueryMap`] from a raw query string.
///
/// Malformed query strings yield an empty map, parameters are never an error.
pub fn query_map(query_string: &str) -> QueryMap {
    let pairs = actix_web::web::Query::<Vec<(String, String)>>::from_query(query_string)
        .map(|query| query.into_inner())
        .unwrap_or_else(|e| {
            tracing::debug!("ignoring malformed query string {:?}: {}", query_string, e);
            Vec::new()
        });

    let mut result = QueryMap::new();
    for (key, value) in pairs {
        result.entry(key).or_default().push(value);
    }
    result
}

/// First value of the first present key in `keys`.
pub fn first<'a>(map: &'a QueryMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(|values| values.first()))
        .map(String::as_str)
}

/// Interpret a parameter value as boolean; only `true` (any case) is true.
pub fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Content format of the response body, given by `of`.
#[derive(Debug, Clone, Default, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Txt,
    Text,
    Xml,
    Das,
    Json,
    /// Anything else, answered with an "invalid format" body.
    #[strum(default)]
    Unknown(String),
}

impl OutputFormat {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Txt | Self::Text)
    }

    pub fn is_xml(&self) -> bool {
        matches!(self, Self::Xml | Self::Das)
    }
}

/// Attachment type, given by `fileformat`.
#[derive(Debug, Clone, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FileFormat {
    Xml,
    Excel,
    Txt,
    Text,
    #[strum(default)]
    Unknown(String),
}

impl FileFormat {
    /// Extension of the file inside zip attachments.
    pub fn extension(&self) -> &str {
        match self {
            Self::Xml => "xml",
            Self::Excel => "xls",
            Self::Txt | Self::Text | Self::Unknown(_) => "txt",
        }
    }
}

/// Replace the `newline` and `tab` keywords in separators.
fn separator(value: &str) -> String {
    if value.eq_ignore_ascii_case("newline") {
        "\n".to_string()
    } else if value.eq_ignore_ascii_case("tab") {
        "\t".to_string()
    } else {
        value.to_string()
    }
}

/// Formatting options and credentials of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    /// Separator between top-level result items.
    pub result_separator: String,
    /// Separator between records of one item.
    pub query_separator: String,
    pub output_format: OutputFormat,
    /// `None` for inline responses.
    pub file_format: Option<FileFormat>,
    pub output_compress: bool,
    pub output_row_names: bool,
    pub output_header: bool,
    /// Attachment name without extension.
    pub filename: String,
    pub user: String,
    pub password: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            result_separator: "//".to_string(),
            query_separator: "\n".to_string(),
            output_format: OutputFormat::Txt,
            file_format: None,
            output_compress: false,
            output_row_names: false,
            output_header: true,
            filename: "result".to_string(),
            user: "anonymous".to_string(),
            password: String::new(),
        }
    }
}

impl FormatOptions {
    /// Extract the options from `map`, falling back to defaults.
    pub fn from_query(map: &QueryMap) -> Self {
        let default = Self::default();
        let flag = |keys: &[&str], default: bool| first(map, keys).map(is_true).unwrap_or(default);

        Self {
            result_separator: first(map, &["result_separator"])
                .map(separator)
                .unwrap_or(default.result_separator),
            query_separator: first(map, &["query_separator"])
                .map(separator)
                .unwrap_or(default.query_separator),
            output_format: first(map, &["of", "output"])
                .map(|value| {
                    value
                        .parse()
                        .unwrap_or_else(|_| OutputFormat::Unknown(value.to_string()))
                })
                .unwrap_or(default.output_format),
            file_format: first(map, &["fileformat"])
                .filter(|value| !value.is_empty())
                .map(|value| {
                    value
                        .parse()
                        .unwrap_or_else(|_| FileFormat::Unknown(value.to_string()))
                }),
            output_compress: flag(&["outputcompress", "compress"], default.output_compress),
            output_row_names: flag(&["outputrownames"], default.output_row_names),
            output_header: flag(&["header"], default.output_header),
            filename: first(map, &["filename"])
                .map(str::to_string)
                .unwrap_or(default.filename),
            user: first(map, &["user"])
                .map(str::to_string)
                .unwrap_or(default.user),
            password: first(map, &["password"])
                .map(str::to_string)
                .unwrap_or(default.password),
        }
    }

    /// Parse the options from a raw query string.
    pub fn from_query_string(query_string: &str) -> Self {
        Self::from_query(&query_map(query_string))
    }
}

/// Query parameters understood by every data endpoint.
///
/// Only used for documenting the API; handlers parse the raw query string.
#[derive(Debug, Clone, Default, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FormatQuery {
    /// Separator between result items, `newline` and `tab` are keywords.
    pub result_separator: Option<String>,
    /// Separator between records of one item.
    pub query_separator: Option<String>,
    /// Output format: `txt`, `text`, `xml`, `das` or `json`.
    pub of: Option<String>,
    /// Attachment type: `txt`, `text`, `xml` or `excel`.
    pub fileformat: Option<String>,
    /// Attachment name without extension.
    pub filename: Option<String>,
    /// Prefix each text item with its query identifier.
    pub outputrownames: Option<bool>,
    /// Whether to emit the text header line.
    pub header: Option<bool>,
    /// Gzip inline output, zip attachments.
    pub outputcompress: Option<bool>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_when_absent() {
        assert_eq!(FormatOptions::from_query_string(""), FormatOptions::default());
        assert_eq!(
            FormatOptions::from_query_string("unrelated=1&another"),
            FormatOptions::default()
        );
    }

    #[rstest::rstest]
    #[case("result_separator=newline", "\n")]
    #[case("result_separator=NEWLINE", "\n")]
    #[case("result_separator=tab", "\t")]
    #[case("result_separator=%7C", "|")]
    #[case("result_separator=", "")]
    fn result_separator(#[case] query: &str, #[case] expected: &str) {
        assert_eq!(
            FormatOptions::from_query_string(query).result_separator,
            expected
        );
    }

    #[test]
    fn query_separator_keywords() {
        assert_eq!(
            FormatOptions::from_query_string("query_separator=tab").query_separator,
            "\t"
        );
        assert_eq!(
            FormatOptions::from_query_string("query_separator=;").query_separator,
            ";"
        );
    }

    #[rstest::rstest]
    #[case("of=json", OutputFormat::Json)]
    #[case("of=JSON", OutputFormat::Json)]
    #[case("output=xml", OutputFormat::Xml)]
    #[case("of=das", OutputFormat::Das)]
    #[case("of=text", OutputFormat::Text)]
    #[case("of=yaml", OutputFormat::Unknown("yaml".into()))]
    #[case("of=json&output=xml", OutputFormat::Json)]
    fn output_format(#[case] query: &str, #[case] expected: OutputFormat) {
        assert_eq!(FormatOptions::from_query_string(query).output_format, expected);
    }

    #[rstest::rstest]
    #[case("fileformat=", None)]
    #[case("fileformat=txt", Some(FileFormat::Txt))]
    #[case("fileformat=excel", Some(FileFormat::Excel))]
    #[case("fileformat=pdf", Some(FileFormat::Unknown("pdf".into())))]
    fn file_format(#[case] query: &str, #[case] expected: Option<FileFormat>) {
        assert_eq!(FormatOptions::from_query_string(query).file_format, expected);
    }

    #[test]
    fn first_value_wins() {
        let options = FormatOptions::from_query_string("filename=a&filename=b&user=x&password=y");

        assert_eq!(options.filename, "a");
        assert_eq!(options.user, "x");
        assert_eq!(options.password, "y");
    }

    #[rstest::rstest]
    #[case("outputcompress=true", true)]
    #[case("outputcompress=TRUE", true)]
    #[case("compress=true", true)]
    #[case("outputcompress=yes", false)]
    #[case("outputcompress=false&compress=true", false)]
    fn compress_flag(#[case] query: &str, #[case] expected: bool) {
        assert_eq!(FormatOptions::from_query_string(query).output_compress, expected);
    }

    #[test]
    fn header_and_row_names() {
        let options = FormatOptions::from_query_string("header=false&outputrownames=true");

        assert!(!options.output_header);
        assert!(options.output_row_names);
    }

    #[test]
    fn query_map_keeps_all_values() {
        let map = query_map("a=1&b=2&a=3");

        assert_eq!(map.get("a"), Some(&vec!["1".to_string(), "3".to_string()]));
        assert_eq!(first(&map, &["c", "b"]), Some("2"));
    }

    #[test]
    fn file_format_extension() {
        assert_eq!(FileFormat::Excel.extension(), "xls");
        assert_eq!(FileFormat::Text.extension(), "txt");
    }
}
