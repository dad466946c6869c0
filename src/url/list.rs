use csv::{ReaderBuilder, Trim};

/// Reads a bulk URL list
///
/// Accepts either a plain text file with one URL per line or a CSV file whose
/// first column holds the URLs. A leading `url` header is skipped, as are
/// blank lines and lines starting with `#`. Entries are returned in file order
/// without validation or deduplication.
///
/// # Examples
///
/// ```
/// use pagescope::url::parse_url_list;
///
/// let urls = parse_url_list("url,notes\nhttps://a.example,home\n\nhttps://b.example\n");
/// assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
/// ```
pub fn parse_url_list(content: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut urls = Vec::new();
    let mut seen_entry = false;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Skipping unreadable line in URL list: {}", e);
                continue;
            }
        };

        let first = match record.get(0) {
            Some(field) if !field.is_empty() => field,
            _ => continue,
        };

        let is_header = !seen_entry && first.eq_ignore_ascii_case("url");
        seen_entry = true;
        if is_header {
            continue;
        }

        urls.push(first.to_string());
    }

    urls
}
