//! Rendering of query results into HTTP responses.
//!
//! A result is a slice of top-level items, usually one per queried
//! identifier.  Items are serialized as text, JSON or XML depending on the
//! `of` parameter.  The serialized body is then gzipped, zipped, or turned
//! into an attachment according to `fileformat` and `outputcompress`.

use std::io::Write as _;

use actix_web::{http::header, HttpResponse};
use itertools::Itertools as _;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::common::split_ids;
use crate::db::model::{
    ConservedRegion, CpGIsland, Cytoband, Exon, Gene, GenomeSequence, IntervalFeatureFrequency,
    MirnaDisease, MirnaGene, MirnaMature, MirnaTarget, Mutation, Pathway, Protein,
    ProteinFeature, ProteinInteraction, Pwm, RegulatoryRegion, Snp, SnpConsequenceType,
    StructuralVariation, Tfbs, Transcript, Xref,
};
use crate::db::region::Region;
use crate::reference::{HeaderTag, Species};

use super::error::{cors_header, error_response};
use super::params::{FileFormat, FormatOptions, OutputFormat};
use super::{APPLICATION_JSON, APPLICATION_OCTET_STREAM, TEXT_PLAIN, TEXT_XML};

/// Settings for rendering one item as text.
#[derive(Debug, Clone, Copy)]
pub struct TextContext<'a> {
    /// Separator between the records of one item.
    pub query_separator: &'a str,
    /// Placeholder for missing results.
    pub not_found: &'a str,
}

/// Text form of a result item.
pub trait TextRecord {
    fn to_text(&self, ctx: &TextContext<'_>) -> String;
}

/// Text form of records that have no columns of their own: the JSON document.
///
/// A record that fails to serialize is logged and shown as missing.
pub fn json_text<T: serde::Serialize>(value: &T, ctx: &TextContext<'_>) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::warn!("could not serialize record as JSON: {}", e);
        ctx.not_found.to_string()
    })
}

impl TextRecord for String {
    fn to_text(&self, _ctx: &TextContext<'_>) -> String {
        self.clone()
    }
}

impl<T: TextRecord> TextRecord for Option<T> {
    fn to_text(&self, ctx: &TextContext<'_>) -> String {
        match self {
            Some(value) => value.to_text(ctx),
            None => ctx.not_found.to_string(),
        }
    }
}

impl<T: TextRecord> TextRecord for Vec<T> {
    fn to_text(&self, ctx: &TextContext<'_>) -> String {
        if self.is_empty() {
            ctx.not_found.to_string()
        } else {
            self.iter()
                .map(|value| value.to_text(ctx))
                .join(ctx.query_separator)
        }
    }
}

/// Pairs, e.g., annotation entries, are written as two columns.
impl<A: std::fmt::Display, B: std::fmt::Display> TextRecord for (A, B) {
    fn to_text(&self, _ctx: &TextContext<'_>) -> String {
        format!("{}\t{}", self.0, self.1)
    }
}

/// Implement [`TextRecord`] through `Display`.
macro_rules! text_record_via_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl TextRecord for $ty {
                fn to_text(&self, _ctx: &TextContext<'_>) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

text_record_via_display!(
    Gene,
    Transcript,
    Exon,
    Snp,
    SnpConsequenceType,
    Protein,
    ProteinFeature,
    ProteinInteraction,
    Xref,
    Cytoband,
    GenomeSequence,
    Tfbs,
    Pwm,
    MirnaGene,
    MirnaMature,
    MirnaTarget,
    MirnaDisease,
    Mutation,
    RegulatoryRegion,
    ConservedRegion,
    CpGIsland,
    StructuralVariation,
    Pathway,
    IntervalFeatureFrequency,
    Region,
    Species,
);

/// Serialized body together with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serialized {
    pub body: String,
    pub content_type: &'static str,
}

/// Gzip `text` and write the bytes as a signed decimal list, e.g., `[31,-117,8,...]`.
pub fn gzip_legacy(text: &str) -> Result<String, anyhow::Error> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(text.as_bytes())?;
    let bytes = encoder.finish()?;
    Ok(format!(
        "[{}]",
        bytes.iter().map(|byte| *byte as i8).join(",")
    ))
}

/// Zip archive with a single deflated entry.
pub fn zip_single(entry_name: &str, content: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    writer
        .start_file(entry_name, options)
        .map_err(|e| anyhow::anyhow!("could not start zip entry {}: {}", entry_name, e))?;
    writer.write_all(content)?;
    let cursor = writer
        .finish()
        .map_err(|e| anyhow::anyhow!("could not finish zip archive: {}", e))?;
    Ok(cursor.into_inner())
}

fn xml_error(e: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!("could not write XML: {}", e)
}

/// Write `value` as element `name`; arrays become `<item>` children.
fn write_xml_value<W: std::io::Write>(
    writer: &mut quick_xml::Writer<W>,
    name: &str,
    value: &serde_json::Value,
) -> Result<(), anyhow::Error> {
    use serde_json::Value;

    let scalar = match value {
        Value::Null => {
            writer
                .write_event(Event::Empty(BytesStart::new(name)))
                .map_err(xml_error)?;
            return Ok(());
        }
        Value::Bool(value) => Some(value.to_string()),
        Value::Number(value) => Some(value.to_string()),
        Value::String(value) => Some(value.clone()),
        Value::Array(_) | Value::Object(_) => None,
    };

    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    match (scalar, value) {
        (Some(text), _) => writer
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(xml_error)?,
        (None, Value::Array(values)) => {
            for value in values {
                write_xml_value(writer, "item", value)?;
            }
        }
        (None, Value::Object(map)) => {
            for (key, value) in map {
                write_xml_value(writer, key, value)?;
            }
        }
        (None, _) => (),
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;

    Ok(())
}

/// Turns results into responses according to the request's format options.
#[derive(Debug, Clone)]
pub struct ResponseRenderer<'a> {
    options: &'a FormatOptions,
    not_found: &'a str,
    /// Query identifiers for `outputrownames`, by item position.
    row_names: Vec<String>,
}

impl<'a> ResponseRenderer<'a> {
    pub fn new(options: &'a FormatOptions, not_found: &'a str) -> Self {
        Self {
            options,
            not_found,
            row_names: Vec::new(),
        }
    }

    /// Use the comma separated identifiers in `query` as row names.
    pub fn with_query(mut self, query: &str) -> Self {
        self.row_names = split_ids(query);
        self
    }

    pub fn options(&self) -> &FormatOptions {
        self.options
    }

    /// Text form: optional header line, items joined by the result separator.
    pub fn to_text<T: TextRecord>(&self, items: &[T], header: Option<HeaderTag>) -> String {
        let ctx = TextContext {
            query_separator: &self.options.query_separator,
            not_found: self.not_found,
        };

        let header_line = header
            .filter(|_| self.options.output_header)
            .map(HeaderTag::header)
            .filter(|header| !header.is_empty())
            .map(|header| format!("#{}\n", header))
            .unwrap_or_default();
        let body = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let text = item.to_text(&ctx);
                match self.row_names.get(i) {
                    Some(name) if self.options.output_row_names => format!("{}:\t{}", name, text),
                    _ => text,
                }
            })
            .join(&self.options.result_separator);

        format!("{}{}", header_line, body)
    }

    /// JSON array keeping `null` items.
    pub fn to_json<T: serde::Serialize>(&self, items: &[T]) -> Result<String, anyhow::Error> {
        serde_json::to_string(items).map_err(|e| anyhow::anyhow!("could not write JSON: {}", e))
    }

    /// XML document with one `<item>` per result item below `<result>`.
    pub fn to_xml<T: serde::Serialize>(&self, items: &[T]) -> Result<String, anyhow::Error> {
        let mut writer = quick_xml::Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Start(BytesStart::new("result")))
            .map_err(xml_error)?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 && !self.options.result_separator.is_empty() {
                writer
                    .write_event(Event::Text(BytesText::new(&self.options.result_separator)))
                    .map_err(xml_error)?;
            }
            let value = serde_json::to_value(item)?;
            write_xml_value(&mut writer, "item", &value)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("result")))
            .map_err(xml_error)?;

        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Serialize `items` according to the output format.
    pub fn serialize<T>(
        &self,
        items: &[T],
        header: Option<HeaderTag>,
    ) -> Result<Serialized, anyhow::Error>
    where
        T: serde::Serialize + TextRecord,
    {
        let serialized = match &self.options.output_format {
            OutputFormat::Txt | OutputFormat::Text => Serialized {
                body: self.to_text(items, header),
                content_type: TEXT_PLAIN,
            },
            OutputFormat::Xml | OutputFormat::Das => Serialized {
                body: self.to_xml(items)?,
                content_type: TEXT_XML,
            },
            OutputFormat::Json => Serialized {
                body: self.to_json(items)?,
                content_type: APPLICATION_JSON,
            },
            OutputFormat::Unknown(value) => Serialized {
                body: format!("outputformat 'of' parameter not valid: {}", value),
                content_type: TEXT_PLAIN,
            },
        };
        Ok(serialized)
    }

    /// Build the response for an already serialized body.
    pub fn respond(&self, serialized: Serialized) -> Result<HttpResponse, anyhow::Error> {
        let Serialized { body, content_type } = serialized;
        tracing::debug!(
            "creating response: file format {:?}, output format {:?}, compress {}",
            &self.options.file_format,
            &self.options.output_format,
            self.options.output_compress
        );

        let Some(file_format) = self.options.file_format.as_ref() else {
            let body = if self.options.output_compress {
                gzip_legacy(&body)?
            } else {
                body
            };
            return Ok(HttpResponse::Ok()
                .content_type(content_type)
                .insert_header(cors_header())
                .body(body));
        };

        if self.options.output_compress {
            let entry = format!("{}.{}", self.options.filename, file_format.extension());
            let archive = zip_single(&entry, body.as_bytes())?;
            return Ok(self.attachment(archive, &format!("{}.zip", self.options.filename)));
        }

        match file_format {
            FileFormat::Txt | FileFormat::Text => Ok(self.attachment(
                body.into_bytes(),
                &format!("{}.txt", self.options.filename),
            )),
            // xml and excel attachments are served inline as raw bytes
            FileFormat::Xml | FileFormat::Excel | FileFormat::Unknown(_) => Ok(HttpResponse::Ok()
                .content_type(APPLICATION_OCTET_STREAM)
                .insert_header(cors_header())
                .body(body)),
        }
    }

    fn attachment(&self, bytes: Vec<u8>, filename: &str) -> HttpResponse {
        HttpResponse::Ok()
            .content_type(APPLICATION_OCTET_STREAM)
            .insert_header(cors_header())
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ))
            .body(bytes)
    }

    /// Render `items`, turning any failure into an error response.
    pub fn render<T>(&self, items: &[T], header: Option<HeaderTag>) -> HttpResponse
    where
        T: serde::Serialize + TextRecord,
    {
        match self
            .serialize(items, header)
            .and_then(|serialized| self.respond(serialized))
        {
            Ok(response) => response,
            Err(e) => error_response(self.options, &e.to_string()),
        }
    }

    /// Render preformatted text as `text/plain`.
    pub fn render_text(&self, text: impl Into<String>) -> HttpResponse {
        self.respond_or_error(Serialized {
            body: text.into(),
            content_type: TEXT_PLAIN,
        })
    }

    /// Render an already serialized body, turning failures into error responses.
    pub fn respond_or_error(&self, serialized: Serialized) -> HttpResponse {
        self.respond(serialized)
            .unwrap_or_else(|e| error_response(self.options, &e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use std::io::Read as _;

    use actix_web::body::MessageBody as _;
    use pretty_assertions::assert_eq;

    use super::*;

    fn body_bytes(response: HttpResponse) -> Result<Vec<u8>, anyhow::Error> {
        Ok(response
            .into_body()
            .try_into_bytes()
            .map_err(|_| anyhow::anyhow!("streaming body"))?
            .to_vec())
    }

    fn header_value(response: &HttpResponse, name: header::HeaderName) -> Option<String> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn with_null() -> Vec<Option<String>> {
        vec![Some("a".into()), None, Some("b".into())]
    }

    #[test]
    fn text_keeps_positions_of_missing_items() {
        let options = FormatOptions::default();
        let renderer = ResponseRenderer::new(&options, "not found");

        let text = renderer.to_text(&with_null(), None);

        assert_eq!(text.split("//").count(), 3);
        assert_eq!(text, "a//not found//b");
    }

    #[test]
    fn text_nested_lists_and_header() {
        let options = FormatOptions::from_query_string("result_separator=newline&query_separator=;");
        let renderer = ResponseRenderer::new(&options, "-");
        let items = vec![
            vec!["x".to_string(), "y".to_string()],
            Vec::new(),
        ];

        assert_eq!(
            renderer.to_text(&items, Some(HeaderTag::Xref)),
            "#ID\tdescription\nx;y\n-"
        );
    }

    #[test]
    fn text_without_header() {
        let options = FormatOptions::from_query_string("header=false");
        let renderer = ResponseRenderer::new(&options, "-");

        assert_eq!(
            renderer.to_text(&["x".to_string()], Some(HeaderTag::Xref)),
            "x"
        );
        assert_eq!(
            ResponseRenderer::new(&FormatOptions::default(), "-")
                .to_text(&["x".to_string()], Some(HeaderTag::Pathway)),
            "x"
        );
    }

    #[test]
    fn text_row_names() {
        let options = FormatOptions::from_query_string("outputrownames=true&result_separator=tab");
        let renderer = ResponseRenderer::new(&options, "-").with_query("BRCA2,NOPE");
        let items: Vec<Option<String>> = vec![Some("g".into()), None];

        assert_eq!(renderer.to_text(&items, None), "BRCA2:\tg\tNOPE:\t-");
    }

    #[test]
    fn json_keeps_nulls() -> Result<(), anyhow::Error> {
        let options = FormatOptions::from_query_string("of=json");
        let renderer = ResponseRenderer::new(&options, "-");

        let serialized = renderer.serialize(&with_null(), None)?;

        assert_eq!(serialized.content_type, APPLICATION_JSON);
        assert_eq!(serialized.body, r#"["a",null,"b"]"#);

        Ok(())
    }

    #[rstest::rstest]
    #[case("of=xml")]
    #[case("of=das")]
    fn xml_is_well_formed(#[case] query: &str) -> Result<(), anyhow::Error> {
        let options = FormatOptions::from_query_string(query);
        let renderer = ResponseRenderer::new(&options, "-");
        let items = vec![
            Some(Gene {
                stable_id: "ENSG1".into(),
                description: "a < b & c".into(),
                ..Default::default()
            }),
            None,
        ];

        let serialized = renderer.serialize(&items, Some(HeaderTag::Gene))?;
        assert_eq!(serialized.content_type, TEXT_XML);
        assert!(serialized.body.starts_with("<?xml"));
        assert!(serialized.body.contains("<stableId>ENSG1</stableId>"));
        assert!(serialized.body.contains("a &lt; b &amp; c"));
        assert!(serialized.body.contains("<item/>"));

        let mut reader = quick_xml::Reader::from_str(&serialized.body);
        let mut items_seen = 0;
        loop {
            match reader.read_event()? {
                Event::Eof => break,
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"item" => {
                    items_seen += 1
                }
                _ => (),
            }
        }
        assert_eq!(items_seen, 2);

        Ok(())
    }

    #[test]
    fn unknown_format_is_reported_in_body() -> Result<(), anyhow::Error> {
        let options = FormatOptions::from_query_string("of=yaml");
        let response = ResponseRenderer::new(&options, "-").render(&with_null(), None);

        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
        assert_eq!(
            header_value(&response, header::CONTENT_TYPE).as_deref(),
            Some(TEXT_PLAIN)
        );
        assert_eq!(
            String::from_utf8(body_bytes(response)?)?,
            "outputformat 'of' parameter not valid: yaml"
        );

        Ok(())
    }

    #[test]
    fn cors_header_always_present() {
        let options = FormatOptions::default();
        let response = ResponseRenderer::new(&options, "-").render_text("x");

        assert_eq!(
            header_value(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
            Some("*")
        );
    }

    #[test]
    fn gzip_legacy_encoding() -> Result<(), anyhow::Error> {
        let encoded = gzip_legacy("hello")?;

        assert!(encoded.starts_with("[31,-117,8,"));
        assert!(encoded.ends_with(']'));
        assert!(!encoded.contains(' '));

        let bytes = encoded
            .trim_matches(|c| c == '[' || c == ']')
            .split(',')
            .map(|b| b.parse::<i8>().map(|b| b as u8))
            .collect::<Result<Vec<_>, _>>()?;
        let mut decoded = String::new();
        flate2::read::GzDecoder::new(bytes.as_slice()).read_to_string(&mut decoded)?;
        assert_eq!(decoded, "hello");

        Ok(())
    }

    #[test]
    fn compressed_inline_response() -> Result<(), anyhow::Error> {
        let options = FormatOptions::from_query_string("outputcompress=true");
        let response = ResponseRenderer::new(&options, "-").render_text("hello");

        assert_eq!(
            header_value(&response, header::CONTENT_TYPE).as_deref(),
            Some(TEXT_PLAIN)
        );
        assert!(String::from_utf8(body_bytes(response)?)?.starts_with("[31,-117,"));

        Ok(())
    }

    #[test]
    fn zip_attachment() -> Result<(), anyhow::Error> {
        let options =
            FormatOptions::from_query_string("fileformat=txt&outputcompress=true&filename=genes");
        let response = ResponseRenderer::new(&options, "-").render(&with_null(), None);

        assert_eq!(
            header_value(&response, header::CONTENT_TYPE).as_deref(),
            Some(APPLICATION_OCTET_STREAM)
        );
        assert_eq!(
            header_value(&response, header::CONTENT_DISPOSITION).as_deref(),
            Some("attachment; filename=genes.zip")
        );

        let bytes = body_bytes(response)?;
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_name("genes.txt")?;
        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        assert_eq!(content, "a//-//b");

        Ok(())
    }

    #[test]
    fn text_attachment() -> Result<(), anyhow::Error> {
        let options = FormatOptions::from_query_string("fileformat=text");
        let response = ResponseRenderer::new(&options, "-").render_text("hello");

        assert_eq!(
            header_value(&response, header::CONTENT_DISPOSITION).as_deref(),
            Some("attachment; filename=result.txt")
        );
        assert_eq!(body_bytes(response)?, b"hello".to_vec());

        Ok(())
    }

    #[test]
    fn excel_file_format_is_raw() -> Result<(), anyhow::Error> {
        let options = FormatOptions::from_query_string("fileformat=excel");
        let response = ResponseRenderer::new(&options, "-").render_text("hello");

        assert_eq!(
            header_value(&response, header::CONTENT_TYPE).as_deref(),
            Some(APPLICATION_OCTET_STREAM)
        );
        assert_eq!(header_value(&response, header::CONTENT_DISPOSITION), None);
        assert_eq!(body_bytes(response)?, b"hello".to_vec());

        Ok(())
    }

    #[test]
    fn pair_text() {
        let ctx = TextContext {
            query_separator: "\n",
            not_found: "-",
        };

        assert_eq!(("E2F1", "HeLa").to_text(&ctx), "E2F1\tHeLa");
    }

    struct Unserializable;

    impl serde::Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("broken record"))
        }
    }

    #[test]
    fn json_text_falls_back_to_placeholder() {
        let ctx = TextContext {
            query_separator: "\n",
            not_found: "-",
        };

        assert_eq!(json_text(&Unserializable, &ctx), "-");
        assert_eq!(json_text(&vec!["a"], &ctx), r#"["a"]"#);
    }
}
