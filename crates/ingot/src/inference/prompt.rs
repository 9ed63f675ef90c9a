//! The fixed conversion instruction sent to the inference service.

/// Delimiter separating the instruction from the document text.
const DOCUMENT_DELIMITER: &str = "---";

/// Build the conversion instruction for a raw delimited document.
///
/// The instruction pins down the contract the materializer depends on:
/// first line supplies the object keys, one object per subsequent line,
/// scalar values coerced to their natural JSON types, and a bare JSON
/// array with nothing around it. The document text is appended verbatim
/// after a delimiter line, untrimmed and unparsed.
pub fn build_prompt(raw_text: &str) -> String {
    format!(
        r#"Task: convert the CSV data below into a JSON array of objects.

Rules:
- Treat the first line as the field names and use them as the object keys.
- Convert each subsequent line into one object in the array.
- Infer the natural type of every value: numeric text becomes a JSON number, true/false text becomes a JSON boolean, everything else stays a string. Never leave a number or boolean quoted.
- Reply with exactly one JSON array of objects. No Markdown code fences, no commentary, nothing before or after the array.

The CSV data:
{delimiter}
{raw_text}
{delimiter}
"#,
        delimiter = DOCUMENT_DELIMITER,
    )
}
